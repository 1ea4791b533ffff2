use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions raised while reading and reconciling report inputs.
///
/// Everything here stops the run. Per-record gaps never surface as errors;
/// they stay as the `"NA"` sentinel on the record.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("column `{column}` not found in {}", path.display())]
    MissingColumn { column: String, path: PathBuf },

    #[error("date `{value}` ({context}) is not in YYYY-MM-DD format")]
    InvalidDate { value: String, context: String },

    #[error("unrecognised admin-1 code `{code}` in `{value}`")]
    UnknownAdminCode { code: String, value: String },

    #[error("invalid value `{value}` in column `{column}`: {reason}")]
    InvalidValue {
        value: String,
        column: String,
        reason: String,
    },

    #[error("no trees found in tree directory {}", .0.display())]
    NoTrees(PathBuf),

    #[error("multiple tree names found in {}: {}", path.display(), stems.join(", "))]
    MultipleTreeStems { path: PathBuf, stems: Vec<String> },

    #[error("cannot derive a tree identifier from {}", .0.display())]
    TreeName(PathBuf),

    #[error("failed to parse tree {}: {message}", path.display())]
    TreeParse { path: PathBuf, message: String },

    #[error("field `{0}` was not declared in the configured field lists")]
    UndeclaredField(String),

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: niffler::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
