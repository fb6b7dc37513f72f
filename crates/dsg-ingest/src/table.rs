//! Delimited data files.

use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{IngestError, Result};

/// A header row and the data rows below it, as raw strings.
///
/// Rows keep the number of cells they were given; short or long rows are
/// reported by standardization, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// How a data file is split into cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFormat {
    pub delimiter: u8,
    /// Lines starting with this byte are skipped.
    pub comment: Option<u8>,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            comment: Some(b'#'),
        }
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Reads a data file; the first non-blank, non-comment line is the header.
pub fn read_data_table(path: &Path, format: TableFormat) -> Result<DataTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(format.delimiter)
        .comment(format.comment)
        .from_path(path)
        .map_err(|e| csv_error(path, &e))?;

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, &e))?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        match headers {
            None => headers = Some(record.iter().map(normalize_header).collect()),
            Some(_) => rows.push(record.iter().map(normalize_cell).collect()),
        }
    }
    let headers = headers.ok_or_else(|| IngestError::NoHeader {
        path: path.to_path_buf(),
    })?;
    debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = rows.len(),
        "read data table"
    );
    Ok(DataTable { headers, rows })
}

fn csv_error(path: &Path, err: &csv::Error) -> IngestError {
    if let csv::ErrorKind::Io(io) = err.kind() {
        return IngestError::io(path, std::io::Error::new(io.kind(), io.to_string()));
    }
    IngestError::Csv {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "# cruise 33RO20100105\n\n\u{feff}Date \t  Sea  Temp\n2010-01-05\t 18.2 \n\t\n2010-01-06\n"
        )
        .unwrap();
        let table = read_data_table(file.path(), TableFormat::default()).unwrap();
        assert_eq!(table.headers, vec!["Date", "Sea Temp"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["2010-01-05".to_string(), "18.2".to_string()],
                vec!["2010-01-06".to_string()],
            ]
        );
    }

    #[test]
    fn empty_files_have_no_header() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            read_data_table(file.path(), TableFormat::default()),
            Err(IngestError::NoHeader { .. })
        ));
        assert!(matches!(
            read_data_table(Path::new("/nonexistent/data.tsv"), TableFormat::default()),
            Err(IngestError::Io { .. })
        ));
    }
}
