use crate::error::{CoreError, Result};
use sysinfo::System;

pub struct CpuCollector {
    sys: System,
}

impl CpuCollector {
    pub fn new() -> Result<Self> {
        let mut sys = System::new();
        // Baseline; the first collect() reports usage since this refresh.
        sys.refresh_cpu();

        Ok(Self { sys })
    }

    /// Overall CPU usage across all cores since the previous refresh.
    ///
    /// Not clamped: the platform may briefly report slightly above 100.
    pub fn collect(&mut self) -> Result<f32> {
        self.sys.refresh_cpu();

        let cpus = self.sys.cpus();
        if cpus.is_empty() {
            return Err(CoreError::system_info("no CPUs reported by the OS"));
        }

        let total: f32 = cpus.iter().map(|cpu| cpu.cpu_usage()).sum();
        Ok(total / cpus.len() as f32)
    }
}
