//! Append-only results file

use crate::extract::ResultRecord;
use crate::HarvestError;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Appends `term,title` lines to a file
///
/// The file is opened for every batch and closed again before `append`
/// returns, on success and on failure alike. Previous contents are never
/// touched, so rerunning a crawl appends duplicate lines.
#[derive(Debug, Clone)]
pub struct ResultSink {
    path: PathBuf,
}

impl ResultSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Appends one line per record, creating the file if needed
    ///
    /// An empty batch is a no-op and does not create the file. Records are not
    /// escaped: a title containing a comma produces a line with more than two
    /// fields.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::Sink`] if the file cannot be opened or written.
    /// Lines written before the failure stay on disk.
    pub fn append(&self, records: &[ResultRecord]) -> Result<(), HarvestError> {
        if records.is_empty() {
            return Ok(());
        }

        self.write_lines(records).map_err(|source| HarvestError::Sink {
            path: self.path.clone(),
            source,
        })
    }

    fn write_lines(&self, records: &[ResultRecord]) -> std::io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);

        for record in records {
            writeln!(writer, "{}", record.to_line())?;
        }

        writer.flush()
    }
}
