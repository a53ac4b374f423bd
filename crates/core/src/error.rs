use thiserror::Error;

/// Core errors for the host scanner
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("System information error: {0}")]
    SystemInfo(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Log file error at {path}: {source}")]
    LogFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(target_os = "linux")]
    #[error("Procfs error: {0}")]
    Procfs(#[from] procfs::ProcError),
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    pub fn system_info<S: Into<String>>(msg: S) -> Self {
        Self::SystemInfo(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    pub fn log_file<P: AsRef<std::path::Path>>(path: P, source: std::io::Error) -> Self {
        Self::LogFile {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
