/// Convert an hours/minutes/seconds triple to seconds
pub fn hms_to_seconds(hours: u32, minutes: u32, seconds: u32) -> u32 {
    hours * 3600 + minutes * 60 + seconds
}

/// Format seconds for display: "MM:SS", or "HH:MM:SS" once the hour field is non-zero
pub fn format_time(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hms_to_seconds() {
        assert_eq!(hms_to_seconds(0, 1, 5), 65);
        assert_eq!(hms_to_seconds(1, 0, 0), 3600);
        assert_eq!(hms_to_seconds(12, 34, 56), 45296);
    }

    #[test]
    fn test_format_time_without_hours() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(3599), "59:59");
    }

    #[test]
    fn test_format_time_with_hours() {
        assert_eq!(format_time(3600), "01:00:00");
        assert_eq!(format_time(45296), "12:34:56");
    }
}
