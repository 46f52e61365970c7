use tracing::debug;

use super::error::CsvError;
use super::file_store::{FileMode, FileStore};

/// Reads delimited text files out of a `FileStore`.
///
/// Rows are returned as plain strings with no header handling; rows may
/// have different lengths and blank lines are skipped.
#[derive(Debug, Clone)]
pub struct CsvReader<'a> {
    store: &'a FileStore,
    delimiter: u8,
}

impl<'a> CsvReader<'a> {
    pub fn new(store: &'a FileStore) -> Self { Self { store, delimiter: b',' } }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn set_delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.delimiter = delimiter;
        self
    }

    pub fn read_csv(&self, relative: &str) -> Result<Vec<Vec<String>>, CsvError> {
        let handle = self.store.get_file_handle(relative, FileMode::Read)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(handle);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|source| CsvError::Parse {
                path: self.store.get_real_file_path(relative).unwrap_or_default(),
                source,
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        debug!(target: "ulpf::storage", "csv: read {} rows from '{}'", rows.len(), relative);
        Ok(rows)
    }
}
