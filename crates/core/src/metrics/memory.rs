use crate::{
    error::{CoreError, Result},
    model::MemoryUsage,
};
use sysinfo::System;

pub struct MemoryCollector {
    sys: System,
}

impl MemoryCollector {
    pub fn new() -> Result<Self> {
        let sys = System::new();

        Ok(Self { sys })
    }

    pub fn collect(&mut self) -> Result<MemoryUsage> {
        self.sys.refresh_memory();

        if self.sys.total_memory() == 0 {
            return Err(CoreError::system_info("memory statistics unavailable"));
        }

        Ok(MemoryUsage {
            used: self.sys.used_memory(),
            available: self.sys.available_memory(),
        })
    }
}
