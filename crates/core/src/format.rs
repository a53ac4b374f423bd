//! Rendering of a sample cycle into CSV cells.
//!
//! The network and disk columns hold one line per entity. Lines are joined
//! with CR+LF so spreadsheet tools show them as a single multi-line cell once
//! the CSV writer quotes the field.

use crate::model::{DiskRate, LogRow, NetRate, SampleCycle};

/// Separator between entity lines inside one cell
pub const CELL_LINE_SEPARATOR: &str = "\r\n";

/// Timestamp layout of the Time column
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

const UNAVAILABLE: &str = "n/a";
const UNITS: [&str; 6] = ["", "K", "M", "G", "T", "P"];

/// Human-scaled byte count, e.g. `1.50KB`.
///
/// Divides by 1024 until the value is under 1024, two decimals. Values past
/// the petabyte range stay in PB.
pub fn format_bytes(bytes: f64) -> String {
    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2}{}B", value, UNITS[unit])
}

fn format_speed(bytes_per_sec: f64) -> String {
    format!("{}/s", format_bytes(bytes_per_sec))
}

/// Entity names come from the OS; keep them on one line.
fn sanitize_entity(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_control() { '?' } else { c })
        .collect()
}

pub fn format_network_line(rate: &NetRate) -> String {
    format!(
        "{} - Utilization: {}% Download Speed: {} Upload Speed: {} Upload: {} Download: {}",
        sanitize_entity(&rate.interface),
        rate.utilization_percent,
        format_speed(rate.download_bytes_per_sec),
        format_speed(rate.upload_bytes_per_sec),
        format_bytes(rate.bytes_sent_total as f64),
        format_bytes(rate.bytes_recv_total as f64),
    )
}

pub fn format_disk_line(rate: &DiskRate) -> String {
    format!(
        "{} - IOPS: {} Read Speed: {} Write Speed: {} Reads: {} Writes: {}",
        sanitize_entity(&rate.disk),
        rate.iops,
        format_speed(rate.read_bytes_per_sec),
        format_speed(rate.write_bytes_per_sec),
        rate.read_count_total,
        rate.write_count_total,
    )
}

pub fn format_network_cell(rates: &[NetRate]) -> String {
    rates
        .iter()
        .map(format_network_line)
        .collect::<Vec<_>>()
        .join(CELL_LINE_SEPARATOR)
}

pub fn format_disk_cell(rates: &[DiskRate]) -> String {
    rates
        .iter()
        .map(format_disk_line)
        .collect::<Vec<_>>()
        .join(CELL_LINE_SEPARATOR)
}

/// Render a whole cycle into the six CSV columns
pub fn format_row(cycle: &SampleCycle) -> LogRow {
    let (memory_available, memory_used) = match cycle.memory {
        Some(memory) => (
            format_bytes(memory.available as f64),
            format_bytes(memory.used as f64),
        ),
        None => (UNAVAILABLE.to_string(), UNAVAILABLE.to_string()),
    };

    LogRow {
        time: cycle.timestamp.format(TIME_FORMAT).to_string(),
        cpu: cycle
            .cpu_percent
            .map(|cpu| format!("{:.1}%", cpu))
            .unwrap_or_else(|| UNAVAILABLE.to_string()),
        memory_available,
        memory_used,
        network: format_network_cell(&cycle.networks),
        disk: format_disk_cell(&cycle.disks),
    }
}

/// Console rendering of a row for verbose mode
pub fn format_console(row: &LogRow) -> String {
    format!(
        "{}\n {} CPU Utilization\n {} Mem Avail {} In Use\n{}\n{}",
        row.time,
        row.cpu,
        row.memory_available,
        row.memory_used,
        row.network.replace(CELL_LINE_SEPARATOR, "\n"),
        row.disk.replace(CELL_LINE_SEPARATOR, "\n"),
    )
}
