pub mod config;
pub mod error;
pub mod format;
pub mod logger;
pub mod metrics;
pub mod model;
pub mod rate;
pub mod scheduler;
pub mod shutdown;

pub use config::{CliConfig, Config};
pub use error::{CoreError, Result};
pub use logger::CsvLogger;
pub use metrics::{MetricsCollector, SnapshotSource};
pub use model::*;
pub use scheduler::{Scheduler, Sleeper, ThreadSleeper};
