//! Turns pairs of cumulative counter snapshots into per-second rates.
//!
//! Every entity of the first snapshot yields exactly one rate record. An
//! entity that is missing from the second snapshot (an interface that went
//! down, a device that was detached) is treated as zero-delta: its rates are
//! zero and its totals are taken from the first snapshot.

use crate::model::{
    CounterSnapshot, DiskCounters, DiskRate, DiskSnapshot, NetRate, NetworkSnapshot,
};
use std::time::Duration;

/// Separation between the two snapshots of a pair
pub const SAMPLE_WINDOW: Duration = Duration::from_secs(1);

/// Walk the first snapshot in order, pairing each entity with its counterpart
/// in the second. Missing counterparts fall back to the first reading.
fn paired<'a, C: Copy>(
    first: &'a CounterSnapshot<C>,
    second: &'a CounterSnapshot<C>,
) -> impl Iterator<Item = (&'a str, C, C, bool)> + 'a {
    first.iter().map(move |(name, before)| match second.get(name) {
        Some(after) => (name, *before, *after, false),
        None => {
            tracing::debug!(
                entity = name,
                "entity missing from second snapshot, using zero delta"
            );
            (name, *before, *before, true)
        }
    })
}

fn per_second(delta: u64, window: Duration) -> f64 {
    delta as f64 / window.as_secs_f64()
}

/// Network rates over `window`.
///
/// Utilization is `(upload_bytes + download_bytes * 8) / bandwidth_bytes * 100`.
/// Only the download side is converted to bits; the asymmetry is kept as is
/// because existing logs were produced with it.
pub fn network_rates(
    first: &NetworkSnapshot,
    second: &NetworkSnapshot,
    bandwidth_bytes: f64,
    window: Duration,
) -> Vec<NetRate> {
    paired(first, second)
        .map(|(name, before, after, missing)| {
            let sent = after.bytes_sent.saturating_sub(before.bytes_sent);
            let recv = after.bytes_recv.saturating_sub(before.bytes_recv);
            let upload = per_second(sent, window);
            let download = per_second(recv, window);

            let utilization_percent = if bandwidth_bytes > 0.0 {
                (upload + download * 8.0) / bandwidth_bytes * 100.0
            } else {
                0.0
            };

            NetRate {
                interface: name.to_string(),
                upload_bytes_per_sec: upload,
                download_bytes_per_sec: download,
                utilization_percent,
                bytes_sent_total: after.bytes_sent,
                bytes_recv_total: after.bytes_recv,
                missing_from_second: missing,
            }
        })
        .collect()
}

/// Disk rates over `window`.
pub fn disk_rates(first: &DiskSnapshot, second: &DiskSnapshot, window: Duration) -> Vec<DiskRate> {
    paired(first, second)
        .map(|(name, before, after, missing)| {
            let (read, write) = byte_deltas(&before, &after);

            DiskRate {
                disk: name.to_string(),
                iops: read.saturating_add(write),
                read_bytes_per_sec: per_second(read, window),
                write_bytes_per_sec: per_second(write, window),
                read_count_total: after.read_count,
                write_count_total: after.write_count,
                missing_from_second: missing,
            }
        })
        .collect()
}

fn byte_deltas(before: &DiskCounters, after: &DiskCounters) -> (u64, u64) {
    (
        after.read_bytes.saturating_sub(before.read_bytes),
        after.write_bytes.saturating_sub(before.write_bytes),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NetCounters;

    fn net(entries: &[(&str, u64, u64)]) -> NetworkSnapshot {
        entries
            .iter()
            .map(|(name, sent, recv)| {
                (
                    name.to_string(),
                    NetCounters {
                        bytes_sent: *sent,
                        bytes_recv: *recv,
                    },
                )
            })
            .collect()
    }

    fn disk(entries: &[(&str, u64, u64, u64, u64)]) -> DiskSnapshot {
        entries
            .iter()
            .map(|(name, rb, wb, rc, wc)| {
                (
                    name.to_string(),
                    DiskCounters {
                        read_bytes: *rb,
                        write_bytes: *wb,
                        read_count: *rc,
                        write_count: *wc,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_reference_network_rates() {
        let first = net(&[("eth0", 1000, 2000)]);
        let second = net(&[("eth0", 1500, 2800)]);

        let rates = network_rates(&first, &second, 1_000_000_000.0, SAMPLE_WINDOW);
        assert_eq!(rates.len(), 1);

        let eth0 = &rates[0];
        assert_eq!(eth0.interface, "eth0");
        assert_eq!(eth0.upload_bytes_per_sec, 500.0);
        assert_eq!(eth0.download_bytes_per_sec, 800.0);
        assert_eq!(
            eth0.utilization_percent,
            (500.0 + 800.0 * 8.0) / 1_000_000_000.0 * 100.0
        );
        assert_eq!(eth0.bytes_sent_total, 1500);
        assert_eq!(eth0.bytes_recv_total, 2800);
        assert!(!eth0.missing_from_second);
    }

    #[test]
    fn test_missing_interface_is_zero_delta() {
        let first = net(&[("eth0", 10, 20), ("wlan0", 100, 200), ("lo", 5, 5)]);
        let second = net(&[("eth0", 30, 50), ("lo", 9, 9)]);

        let rates = network_rates(&first, &second, 1e9, SAMPLE_WINDOW);
        let names: Vec<_> = rates.iter().map(|r| r.interface.as_str()).collect();
        assert_eq!(names, ["eth0", "wlan0", "lo"]);

        let wlan = &rates[1];
        assert!(wlan.missing_from_second);
        assert_eq!(wlan.upload_bytes_per_sec, 0.0);
        assert_eq!(wlan.download_bytes_per_sec, 0.0);
        assert_eq!(wlan.utilization_percent, 0.0);
        assert_eq!(wlan.bytes_sent_total, 100);
        assert_eq!(wlan.bytes_recv_total, 200);

        assert_eq!(rates[0].upload_bytes_per_sec, 20.0);
        assert_eq!(rates[0].download_bytes_per_sec, 30.0);
        assert_eq!(rates[2].upload_bytes_per_sec, 4.0);
    }

    #[test]
    fn test_new_interface_in_second_is_ignored() {
        let first = net(&[("eth0", 0, 0)]);
        let second = net(&[("eth0", 1, 1), ("tun0", 50, 50)]);

        let rates = network_rates(&first, &second, 1e9, SAMPLE_WINDOW);
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].interface, "eth0");
    }

    #[test]
    fn test_counter_reset_clamps_to_zero() {
        let first = net(&[("eth0", u64::MAX - 10, 5000)]);
        let second = net(&[("eth0", 3, 100)]);

        let rates = network_rates(&first, &second, 1e9, SAMPLE_WINDOW);
        assert_eq!(rates[0].upload_bytes_per_sec, 0.0);
        assert_eq!(rates[0].download_bytes_per_sec, 0.0);
        assert!(rates[0].utilization_percent >= 0.0);
    }

    #[test]
    fn test_rates_are_non_negative_for_every_entity() {
        let first = net(&[("a", 9, 1), ("b", 0, 0), ("c", 7, 7), ("d", 100, 100)]);
        let second = net(&[("a", 1, 9), ("b", 4, 4), ("d", 50, 150)]);

        let rates = network_rates(&first, &second, 1e9, SAMPLE_WINDOW);
        assert_eq!(rates.len(), first.len());
        for rate in &rates {
            assert!(rate.upload_bytes_per_sec >= 0.0);
            assert!(rate.download_bytes_per_sec >= 0.0);
            assert!(rate.utilization_percent >= 0.0);
        }
    }

    #[test]
    fn test_window_scales_rates() {
        let first = net(&[("eth0", 0, 0)]);
        let second = net(&[("eth0", 1000, 4000)]);

        let rates = network_rates(&first, &second, 1e9, Duration::from_secs(2));
        assert_eq!(rates[0].upload_bytes_per_sec, 500.0);
        assert_eq!(rates[0].download_bytes_per_sec, 2000.0);
    }

    #[test]
    fn test_disk_rates_and_iops() {
        let first = disk(&[("sda", 4096, 8192, 10, 20), ("nvme0n1", 0, 0, 0, 0)]);
        let second = disk(&[("sda", 6144, 12288, 12, 25), ("nvme0n1", 512, 0, 1, 0)]);

        let rates = disk_rates(&first, &second, SAMPLE_WINDOW);
        assert_eq!(rates.len(), 2);

        let sda = &rates[0];
        assert_eq!(sda.disk, "sda");
        assert_eq!(sda.read_bytes_per_sec, 2048.0);
        assert_eq!(sda.write_bytes_per_sec, 4096.0);
        // byte throughput, not an operation count
        assert_eq!(sda.iops, 2048 + 4096);
        assert_eq!(sda.read_count_total, 12);
        assert_eq!(sda.write_count_total, 25);

        assert_eq!(rates[1].iops, 512);
    }

    #[test]
    fn test_detached_disk_is_zero_delta() {
        let first = disk(&[("sda", 100, 100, 1, 1), ("sdb", 500, 700, 3, 4)]);
        let second = disk(&[("sda", 200, 300, 2, 2)]);

        let rates = disk_rates(&first, &second, SAMPLE_WINDOW);
        assert_eq!(rates.len(), 2);

        let sdb = &rates[1];
        assert!(sdb.missing_from_second);
        assert_eq!(sdb.iops, 0);
        assert_eq!(sdb.read_bytes_per_sec, 0.0);
        assert_eq!(sdb.write_bytes_per_sec, 0.0);
        assert_eq!(sdb.read_count_total, 3);
        assert_eq!(sdb.write_count_total, 4);
    }

    #[test]
    fn test_empty_snapshots() {
        let rates = disk_rates(&DiskSnapshot::empty(), &DiskSnapshot::empty(), SAMPLE_WINDOW);
        assert!(rates.is_empty());
    }
}
