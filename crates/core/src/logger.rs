use crate::{
    error::{CoreError, Result},
    model::LogRow,
};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Column titles of the log file, in file order.
///
/// The leading spaces are part of the titles; existing logs carry them.
pub const HEADER: [&str; LogRow::COLUMN_COUNT] = [
    "Time",
    " CPU Utilization",
    " Memory (Used)",
    " Memory (Available)",
    " Network Utilization",
    " Disk Utilization",
];

/// Append-only CSV log with a single writer.
///
/// Every row reopens the file in append mode, so rows already on disk are
/// never touched by a later write.
#[derive(Debug, Clone)]
pub struct CsvLogger {
    path: PathBuf,
}

impl CsvLogger {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with the header row if it does not exist yet.
    ///
    /// Returns whether the header was written. An existing file is left as is.
    pub fn ensure_header(&self) -> Result<bool> {
        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(CoreError::log_file(&self.path, e)),
        };

        self.write_record(file, HEADER)?;
        tracing::info!(path = %self.path.display(), "created log file");
        Ok(true)
    }

    /// Append exactly one row and flush it
    pub fn append(&self, row: &LogRow) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| CoreError::log_file(&self.path, e))?;

        self.write_record(file, row.fields())
    }

    fn write_record(&self, file: File, fields: [&str; LogRow::COLUMN_COUNT]) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::CRLF)
            .from_writer(file);

        writer.write_record(fields)?;
        let mut file = writer
            .into_inner()
            .map_err(|e| CoreError::log_file(&self.path, e.into_error()))?;
        file.flush().map_err(|e| CoreError::log_file(&self.path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn row(time: &str, network: &str) -> LogRow {
        LogRow {
            time: time.to_string(),
            cpu: "3.5%".to_string(),
            memory_available: "1.00GB".to_string(),
            memory_used: "512.00MB".to_string(),
            network: network.to_string(),
            disk: "sda - IOPS: 0 Read Speed: 0.00B/s Write Speed: 0.00B/s Reads: 1 Writes: 2"
                .to_string(),
        }
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let logger = CsvLogger::new(dir.path().join("log.csv"));

        assert!(logger.ensure_header().unwrap());
        assert!(!logger.ensure_header().unwrap());
        assert!(!logger.ensure_header().unwrap());

        let contents = fs::read_to_string(logger.path()).unwrap();
        assert_eq!(
            contents,
            "Time, CPU Utilization, Memory (Used), Memory (Available), Network Utilization, Disk Utilization\r\n"
        );
    }

    #[test]
    fn test_existing_file_is_not_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.csv");
        fs::write(&path, "previous contents\r\n").unwrap();

        let logger = CsvLogger::new(&path);
        assert!(!logger.ensure_header().unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous contents\r\n");
    }

    #[test]
    fn test_append_keeps_prior_rows() {
        let dir = tempfile::tempdir().unwrap();
        let logger = CsvLogger::new(dir.path().join("log.csv"));
        logger.ensure_header().unwrap();

        logger.append(&row("t1", "eth0 - a\r\nlo - b")).unwrap();
        logger.ensure_header().unwrap();
        logger.append(&row("t2", "eth0 - c")).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(logger.path())
            .unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 6);

        let records: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][0], "t1");
        assert_eq!(&records[0][4], "eth0 - a\r\nlo - b");
        assert_eq!(&records[1][0], "t2");
        assert_eq!(&records[1][3], "512.00MB");
    }

    #[test]
    fn test_multiline_cell_is_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let logger = CsvLogger::new(dir.path().join("log.csv"));
        logger.append(&row("t1", "eth0 - a\r\nlo - b")).unwrap();

        let contents = fs::read_to_string(logger.path()).unwrap();
        assert!(contents.contains("\"eth0 - a\r\nlo - b\""));
        assert!(contents.ends_with("\r\n"));
    }

    #[test]
    fn test_append_to_missing_directory_fails_loudly() {
        let dir = tempfile::tempdir().unwrap();
        let logger = CsvLogger::new(dir.path().join("missing").join("log.csv"));

        let err = logger.append(&row("t", "")).unwrap_err();
        assert!(matches!(err, CoreError::LogFile { .. }));
        assert!(logger.ensure_header().is_err());
    }
}
