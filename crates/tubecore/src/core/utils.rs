//! Human-readable formatting helpers shared by the bot and the CLI

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Formats a byte count with one decimal, e.g. `1.5KB`, `80.0MB`.
///
/// ```
/// use tubecore::core::utils::format_file_size;
///
/// assert_eq!(format_file_size(0), "0B");
/// assert_eq!(format_file_size(1536), "1.5KB");
/// ```
pub fn format_file_size(size_bytes: u64) -> String {
    if size_bytes == 0 {
        return "0B".to_string();
    }

    let mut size = size_bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.1}{}", size, SIZE_UNITS[unit])
}

/// Formats seconds as `MM:SS`, or `HH:MM:SS` once an hour is reached.
pub fn format_duration(seconds: u64) -> String {
    if seconds == 0 {
        return "00:00".to_string();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Groups digits by thousands: `1234567` -> `1,234,567`
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0B");
        assert_eq!(format_file_size(512), "512.0B");
        assert_eq!(format_file_size(1024), "1.0KB");
        assert_eq!(format_file_size(80 * 1024 * 1024), "80.0MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.0GB");
        // GB is the largest unit
        assert_eq!(format_file_size(2048 * 1024 * 1024 * 1024), "2048.0GB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(59), "00:59");
        assert_eq!(format_duration(212), "03:32");
        assert_eq!(format_duration(3600), "01:00:00");
        assert_eq!(format_duration(3725), "01:02:05");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
