use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Cumulative byte counters for one network interface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetCounters {
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

/// Cumulative I/O counters for one block device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskCounters {
    pub read_bytes: u64,
    pub write_bytes: u64,
    pub read_count: u64,
    pub write_count: u64,
}

/// Point-in-time reading of cumulative counters, keyed by entity name.
///
/// Entries keep the order they were captured in. A snapshot is never mutated
/// after capture; rates are derived by comparing two of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterSnapshot<C> {
    entries: Vec<(String, C)>,
}

pub type NetworkSnapshot = CounterSnapshot<NetCounters>;
pub type DiskSnapshot = CounterSnapshot<DiskCounters>;

impl<C> CounterSnapshot<C> {
    pub fn new(entries: Vec<(String, C)>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn get(&self, name: &str) -> Option<&C> {
        self.entries
            .iter()
            .find(|(entity, _)| entity == name)
            .map(|(_, counters)| counters)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &C)> {
        self.entries
            .iter()
            .map(|(entity, counters)| (entity.as_str(), counters))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(entity, _)| entity.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<C> Default for CounterSnapshot<C> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<C> FromIterator<(String, C)> for CounterSnapshot<C> {
    fn from_iter<I: IntoIterator<Item = (String, C)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Memory usage in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub used: u64,
    pub available: u64,
}

/// Network interface rates over one sampling window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetRate {
    pub interface: String,
    pub upload_bytes_per_sec: f64,
    pub download_bytes_per_sec: f64,
    pub utilization_percent: f64,
    pub bytes_sent_total: u64,
    pub bytes_recv_total: u64,
    pub missing_from_second: bool, // interface vanished between the two snapshots
}

/// Disk rates over one sampling window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskRate {
    pub disk: String,
    /// Sum of read and write byte deltas. Despite the name this is byte
    /// throughput, not an operation count.
    pub iops: u64,
    pub read_bytes_per_sec: f64,
    pub write_bytes_per_sec: f64,
    pub read_count_total: u64,
    pub write_count_total: u64,
    pub missing_from_second: bool,
}

/// Everything measured during one pass of the scheduler loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleCycle {
    pub timestamp: DateTime<Local>,
    pub cpu_percent: Option<f32>,
    pub memory: Option<MemoryUsage>,
    pub networks: Vec<NetRate>,
    pub disks: Vec<DiskRate>,
}

/// One CSV record, already rendered to text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    pub time: String,
    pub cpu: String,
    pub memory_available: String,
    pub memory_used: String,
    pub network: String,
    pub disk: String,
}

impl LogRow {
    pub const COLUMN_COUNT: usize = 6;

    /// Fields in file column order
    pub fn fields(&self) -> [&str; Self::COLUMN_COUNT] {
        [
            &self.time,
            &self.cpu,
            &self.memory_available,
            &self.memory_used,
            &self.network,
            &self.disk,
        ]
    }
}
