use crate::error::Result;
use csv::WriterBuilder;
use log::debug;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// A report table: one index column followed by the data columns, every
/// cell already formatted for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub index_column: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(index_column: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            index_column: index_column.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row: the index value, then one cell per column. Short rows
    /// are padded with empty cells.
    pub fn push_row(&mut self, index: impl Into<String>, cells: Vec<String>) {
        let mut row = Vec::with_capacity(self.columns.len() + 1);
        row.push(index.into());
        row.extend(cells);
        row.resize(self.columns.len() + 1, String::new());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.index_column.as_str()).chain(self.columns.iter().map(String::as_str))
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let position = self.headers().position(|h| h == column)?;
        self.rows
            .get(row)
            .and_then(|r| r.get(position))
            .map(String::as_str)
    }

    pub fn index_values(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().filter_map(|r| r.first()).map(String::as_str)
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut writer = WriterBuilder::new().from_path(path)?;
        writer.write_record(self.headers())?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        debug!("Wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_padded_and_addressable_by_column() {
        let mut table = Table::new("Query ID", ["Tree", "SNPs"]);
        table.push_row("Q1", vec!["Tree 1".to_string()]);
        assert_eq!(table.get(0, "Query ID"), Some("Q1"));
        assert_eq!(table.get(0, "Tree"), Some("Tree 1"));
        assert_eq!(table.get(0, "SNPs"), Some(""));
        assert_eq!(table.get(0, "Missing"), None);
    }

    #[test]
    fn csv_output_starts_with_the_index_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables").join("query.csv");
        let mut table = Table::new("Name", ["Country"]);
        table.push_row("seq, 1", vec!["UK".to_string()]);
        table.write_csv(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "Name,Country\n\"seq, 1\",UK\n");
    }
}
