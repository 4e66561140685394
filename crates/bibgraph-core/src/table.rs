//! Tabular input: CSV export loaded into a header and rows of optional cells

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// One data record. Cells that are absent or blank are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    number: usize,
    cells: Vec<Option<String>>,
}

impl Row {
    /// Build a row from raw cell values; blank values become `None`.
    pub fn new<I, S>(number: usize, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells = cells
            .into_iter()
            .map(|c| {
                let c = c.into();
                if c.trim().is_empty() {
                    None
                } else {
                    Some(c)
                }
            })
            .collect();
        Self { number, cells }
    }

    /// 1-based record position, header counted as 1.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Raw (untrimmed) value of the cell at `index`, if present and non-blank.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }
}

/// A fully loaded table: trimmed header names plus data rows.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            headers: headers.iter().map(|h| clean_header(h)).collect(),
            rows,
        }
    }

    /// Load a CSV file from disk.
    pub fn from_path(path: &Path, delimiter: u8) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open input file: {}", path.display()))?;
        Self::from_reader(file, delimiter)
            .with_context(|| format!("Failed to read CSV: {}", path.display()))
    }

    /// Load CSV data with a header row.
    ///
    /// Short records are padded with missing cells; surplus cells are ignored.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .context("Failed to read CSV header")?
            .iter()
            .map(clean_header)
            .collect();
        if headers.iter().all(String::is_empty) {
            anyhow::bail!("CSV header is empty");
        }

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("Failed to parse CSV record {}", i + 2))?;
            rows.push(Row::new(i + 2, record.iter().take(headers.len())));
        }
        log::debug!("Loaded {} rows x {} columns", rows.len(), headers.len());

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Header names are matched after trimming; a leading UTF-8 BOM is dropped.
fn clean_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_cells_are_missing() {
        let row = Row::new(2, ["a", "", "  ", " b "]);
        assert_eq!(row.get(0), Some("a"));
        assert_eq!(row.get(1), None);
        assert_eq!(row.get(2), None);
        assert_eq!(row.get(3), Some(" b "));
        assert_eq!(row.get(9), None);
    }

    #[test]
    fn read_csv_trims_headers() {
        let data = "\u{feff} DOI ,Title\n10.1/x,Hello\n";
        let table = Table::from_reader(data.as_bytes(), b',').unwrap();
        assert_eq!(table.headers(), ["DOI", "Title"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].get(1), Some("Hello"));
        assert_eq!(table.rows()[0].number(), 2);
    }

    #[test]
    fn short_records_are_padded() {
        let data = "A,B,C\n1\n1,2,3,4\n";
        let table = Table::from_reader(data.as_bytes(), b',').unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].get(1), None);
        assert_eq!(table.rows()[1].get(2), Some("3"));
        assert_eq!(table.rows()[1].get(3), None);
        assert_eq!(table.rows()[1].number(), 3);
    }

    #[test]
    fn numbers_count_records_not_lines() {
        let data = "A,B\n\"two\nlines\",1\nx,2\n";
        let table = Table::from_reader(data.as_bytes(), b',').unwrap();
        assert_eq!(table.rows()[0].get(0), Some("two\nlines"));
        assert_eq!(table.rows()[1].number(), 3);
    }

    #[test]
    fn quoted_semicolons_survive() {
        let data = "Author(s) ID;Title\n\"1;2\";T\n";
        let table = Table::from_reader(data.as_bytes(), b';').unwrap();
        assert_eq!(table.rows()[0].get(0), Some("1;2"));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(Table::from_reader("".as_bytes(), b',').is_err());
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let data: &[u8] = b"A\n\xff\xfe\n";
        assert!(Table::from_reader(data, b',').is_err());
    }
}
