//! Delimited text tables read from a directory, one `<table>.csv` per table

use super::{LoadError, LoadResult, RecordSource, Row, Table};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads `<root>/<table>.csv` files with a header row.
///
/// Fields may be quoted and quoted fields may span lines; the line number
/// recorded for a row is the line it starts on. A row shorter than the
/// header reaches the record parser with its trailing columns absent, so it
/// fails as a malformed row naming the first missing column.
#[derive(Debug, Clone)]
pub struct DelimitedDirectory {
    root: PathBuf,
    delimiter: u8,
}

impl DelimitedDirectory {
    pub fn new(root: impl AsRef<Path>) -> Self {
        DelimitedDirectory {
            root: root.as_ref().to_path_buf(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, table: Table) -> PathBuf {
        self.root.join(table.file_name())
    }
}

impl RecordSource for DelimitedDirectory {
    fn read_table(&mut self, table: Table) -> LoadResult<Vec<Row>> {
        let path = self.path_of(table);
        debug!("Reading {} from {:?}", table, path);

        let csv_err = |source: csv::Error| LoadError::Csv { table, source };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_path(&path)
            .map_err(csv_err)?;

        let headers = reader.headers().map_err(csv_err)?.clone();
        let width = headers.len();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(csv_err)?;
            let line = record.position().map_or(0, |pos| pos.line());
            let fields: IndexMap<String, String> = headers
                .iter()
                .zip(record.iter())
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect();
            let row = Row::new(table, line, fields);
            if record.len() > width {
                return Err(row.malformed(
                    &format!("#{}", width + 1),
                    format!("is beyond the {} header columns", width),
                ));
            }
            rows.push(row);
        }
        Ok(rows)
    }
}
