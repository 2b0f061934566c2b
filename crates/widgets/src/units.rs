/// Format a byte count as a human-readable string (e.g. `"7.3 GiB"`).
pub fn format_bytes(bytes: u64) -> String {
    const GIB: u64 = 1 << 30;
    const MIB: u64 = 1 << 20;
    const KIB: u64 = 1 << 10;

    match bytes {
        b if b >= GIB => format!("{:.1} GiB", b as f64 / GIB as f64),
        b if b >= MIB => format!("{:.1} MiB", b as f64 / MIB as f64),
        b if b >= KIB => format!("{:.1} KiB", b as f64 / KIB as f64),
        b => format!("{b} B"),
    }
}

/// Meter fill (0–100) for a bytes/second rate: one step per 10 KB/s,
/// saturating at 1000 KB/s.
pub fn meter_level(bytes_per_sec: f64) -> u8 {
    let kb = (bytes_per_sec / 1024.0).max(0.0);
    (kb / 10.0).min(100.0) as u8
}
