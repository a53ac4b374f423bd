pub mod cpu;
pub mod disk;
pub mod memory;
pub mod network;

pub use cpu::CpuCollector;
pub use disk::DiskCollector;
pub use memory::MemoryCollector;
pub use network::NetworkCollector;

use crate::{
    error::Result,
    model::{DiskSnapshot, MemoryUsage, NetworkSnapshot},
};

/// Read-only access to the host's current counters.
///
/// Every call returns a fresh reading. Network and disk readings are
/// cumulative counters; rates come from comparing two of them.
pub trait SnapshotSource {
    /// Cumulative byte counters for every interface the OS reports right now
    fn sample_network(&mut self) -> Result<NetworkSnapshot>;

    /// Cumulative I/O counters for every block device the OS reports right now
    fn sample_disks(&mut self) -> Result<DiskSnapshot>;

    /// Overall CPU utilization in percent since the previous call
    fn sample_cpu(&mut self) -> Result<f32>;

    /// Current memory usage
    fn sample_memory(&mut self) -> Result<MemoryUsage>;
}

/// Snapshot source backed by the real operating system
pub struct MetricsCollector {
    cpu: CpuCollector,
    memory: MemoryCollector,
    disk: DiskCollector,
    network: NetworkCollector,
}

impl MetricsCollector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            cpu: CpuCollector::new()?,
            memory: MemoryCollector::new()?,
            disk: DiskCollector::new()?,
            network: NetworkCollector::new()?,
        })
    }
}

impl SnapshotSource for MetricsCollector {
    fn sample_network(&mut self) -> Result<NetworkSnapshot> {
        self.network.collect()
    }

    fn sample_disks(&mut self) -> Result<DiskSnapshot> {
        self.disk.collect()
    }

    fn sample_cpu(&mut self) -> Result<f32> {
        self.cpu.collect()
    }

    fn sample_memory(&mut self) -> Result<MemoryUsage> {
        self.memory.collect()
    }
}
