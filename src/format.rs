const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable size with an integer value, e.g. `"2 KB"`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Byte".to_string();
    }

    let mut exponent = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && exponent < UNITS.len() - 1 {
        scaled /= 1024.0;
        exponent += 1;
    }

    format!("{} {}", scaled.round() as u64, UNITS[exponent])
}
