use crate::{
    error::Result,
    model::{DiskCounters, DiskSnapshot},
};

/// `/proc/diskstats` always counts in 512-byte sectors, whatever the device's block size.
#[cfg(target_os = "linux")]
const SECTOR_SIZE: u64 = 512;

pub struct DiskCollector;

impl DiskCollector {
    pub fn new() -> Result<Self> {
        #[cfg(not(target_os = "linux"))]
        tracing::warn!(
            "per-disk I/O counters are only available on Linux; disk column will stay empty"
        );

        Ok(Self)
    }

    #[cfg(target_os = "linux")]
    pub fn collect(&mut self) -> Result<DiskSnapshot> {
        let stats = procfs::diskstats()?;

        let entries = stats
            .into_iter()
            .map(|stat| {
                (
                    stat.name,
                    DiskCounters {
                        read_bytes: stat.sectors_read.saturating_mul(SECTOR_SIZE),
                        write_bytes: stat.sectors_written.saturating_mul(SECTOR_SIZE),
                        read_count: stat.reads,
                        write_count: stat.writes,
                    },
                )
            })
            .collect::<Vec<_>>();

        tracing::trace!(disks = entries.len(), "disk snapshot captured");
        Ok(DiskSnapshot::new(entries))
    }

    #[cfg(not(target_os = "linux"))]
    pub fn collect(&mut self) -> Result<DiskSnapshot> {
        Ok(DiskSnapshot::empty())
    }
}
