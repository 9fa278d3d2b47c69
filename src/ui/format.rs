/// Format bytes/sec as "12.3 KB/s" (binary units, one decimal)
pub fn format_speed(bytes_per_sec: f64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = 1024.0 * 1024.0;

    if bytes_per_sec < KIB {
        format!("{:.1} B/s", bytes_per_sec)
    } else if bytes_per_sec < MIB {
        format!("{:.1} KB/s", bytes_per_sec / KIB)
    } else {
        format!("{:.1} MB/s", bytes_per_sec / MIB)
    }
}

/// Format a byte count as "3.4 MB" (file-size style, decimal units)
pub fn format_bytes(bytes: f64) -> String {
    const UNITS: [&str; 5] = ["KB", "MB", "GB", "TB", "PB"];

    if bytes.abs() < 1000.0 {
        return format!("{:.0} B", bytes);
    }
    let mut value = bytes / 1000.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if value.abs() < 1000.0 {
            break;
        }
        value /= 1000.0;
        unit = next;
    }
    format!("{:.1} {}", value, unit)
}
