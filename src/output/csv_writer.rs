//! Append-only CSV record output

use crate::output::{OutputResult, ProductRecord};
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Writes product records as header-less CSV rows
pub struct RecordWriter {
    writer: csv::Writer<File>,
}

impl RecordWriter {
    /// Opens the output file
    ///
    /// With `append` false the file is truncated (or created) so a fresh crawl
    /// starts from an empty output. With `append` true rows accumulate across
    /// resumed runs.
    pub fn create(path: &Path, append: bool) -> OutputResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;

        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        Ok(Self { writer })
    }

    /// Appends one record
    pub fn write(&mut self, record: &ProductRecord) -> OutputResult<()> {
        self.writer.serialize(record)?;
        Ok(())
    }

    /// Flushes buffered rows to disk
    pub fn flush(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Reads every record from a CSV output file
pub fn read_records(path: &Path) -> OutputResult<Vec<ProductRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    let records = reader
        .deserialize()
        .collect::<Result<Vec<ProductRecord>, csv::Error>>()?;

    Ok(records)
}
