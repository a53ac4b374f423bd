use crate::{
    error::Result,
    model::{NetCounters, NetworkSnapshot},
};
use sysinfo::Networks;

pub struct NetworkCollector {
    networks: Networks,
}

impl NetworkCollector {
    pub fn new() -> Result<Self> {
        let networks = Networks::new_with_refreshed_list();

        Ok(Self { networks })
    }

    /// Capture cumulative counters for every interface, loopback included.
    ///
    /// The interface list is re-read on every call so that interfaces which
    /// come up between cycles are picked up.
    pub fn collect(&mut self) -> Result<NetworkSnapshot> {
        self.networks.refresh_list();
        self.networks.refresh();

        let mut entries: Vec<(String, NetCounters)> = (&self.networks)
            .into_iter()
            .map(|(interface_name, data)| {
                (
                    interface_name.clone(),
                    NetCounters {
                        bytes_sent: data.total_transmitted(),
                        bytes_recv: data.total_received(),
                    },
                )
            })
            .collect();

        // sysinfo keeps interfaces in a hash map; sort for a stable row layout
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        tracing::trace!(interfaces = entries.len(), "network snapshot captured");
        Ok(NetworkSnapshot::new(entries))
    }
}
