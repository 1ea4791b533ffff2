use crate::error::{ReportError, Result};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Header-aware CSV reader for metadata files, plain or gzip compressed.
pub struct MetadataReader {
    path: PathBuf,
    headers: Vec<String>,
    index: HashMap<String, usize>,
    reader: csv::Reader<Box<dyn Read>>,
}

/// One data row, looked up by column name.
pub struct Row<'a> {
    record: &'a StringRecord,
    index: &'a HashMap<String, usize>,
    pub number: usize,
}

impl<'a> Row<'a> {
    /// Trimmed cell for `column`, `None` when the file has no such column.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.index
            .get(column)
            .and_then(|&i| self.record.get(i))
            .map(str::trim)
    }

    /// Trimmed cell for `column`, empty when absent.
    pub fn value(&self, column: &str) -> &'a str {
        self.get(column).unwrap_or("")
    }
}

impl MetadataReader {
    pub fn open(path: &Path) -> Result<Self> {
        let (raw, _format) = niffler::from_path(path).map_err(|source| ReportError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(raw);
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();
        Ok(Self {
            path: path.to_path_buf(),
            headers,
            index,
            reader,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    /// Fail with the first column of `columns` missing from the header.
    pub fn require<S: AsRef<str>>(&self, columns: &[S]) -> Result<()> {
        for column in columns {
            let column = column.as_ref();
            if !self.has_column(column) {
                return Err(ReportError::MissingColumn {
                    column: column.to_string(),
                    path: self.path.clone(),
                });
            }
        }
        Ok(())
    }

    /// Visit every data row in file order. Row numbers start at 1.
    pub fn for_each_row<F>(&mut self, mut visit: F) -> Result<()>
    where
        F: FnMut(&Row<'_>) -> Result<()>,
    {
        let index = &self.index;
        let mut record = StringRecord::new();
        let mut number = 0;
        while self.reader.read_record(&mut record)? {
            number += 1;
            let row = Row {
                record: &record,
                index,
                number,
            };
            visit(&row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn rows_are_read_by_column_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.csv");
        fs::write(&path, "sequence_name, country ,sample_date\nA, UK ,2020-01-01\nB,,\n").unwrap();

        let mut reader = MetadataReader::open(&path).unwrap();
        assert!(reader.has_column("country"));
        reader.require(&["sequence_name", "sample_date"]).unwrap();

        let mut seen = Vec::new();
        reader
            .for_each_row(|row| {
                seen.push((row.number, row.value("sequence_name").to_string(), row.value("country").to_string()));
                assert_eq!(row.get("missing"), None);
                Ok(())
            })
            .unwrap();
        assert_eq!(
            seen,
            vec![
                (1, "A".to_string(), "UK".to_string()),
                (2, "B".to_string(), "".to_string())
            ]
        );
    }

    #[test]
    fn missing_columns_name_the_column_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtered.csv");
        fs::write(&path, "query_id,query\nQ1,A\n").unwrap();
        let reader = MetadataReader::open(&path).unwrap();
        let err = reader.require(&["query_id", "closest"]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("closest"));
        assert!(message.contains("filtered.csv"));
    }
}
