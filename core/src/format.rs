//! Display helpers for dashboard values.

/// Base-1024 unit labels, bytes through terabytes.
const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count as a human-readable size with two decimal places.
///
/// Zero is special-cased to `"0 B"`. Values past the terabyte range stay
/// expressed in TB.
///
/// ```
/// use monitor_core::format_bytes;
///
/// assert_eq!(format_bytes(0), "0 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1536), "1.50 KB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let exp = ((bytes.ilog2() / 10) as usize).min(UNITS.len() - 1);
    let value = bytes as f64 / (1u64 << (10 * exp)) as f64;
    format!("{value:.2} {}", UNITS[exp])
}
