/// Date/time display helpers.
///
/// The dashboard renders backend timestamps in DD.MM.YYYY order throughout.
use chrono::{DateTime, Utc};

/// Format a backend timestamp as "DD.MM.YYYY HH:MM:SS".
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%d.%m.%Y %H:%M:%S").to_string()
}

/// Format a backend timestamp as "DD.MM.YYYY".
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format("%d.%m.%Y").to_string()
}

/// Format an optional timestamp, falling back to a dash.
pub fn format_datetime_opt(dt: &Option<DateTime<Utc>>) -> String {
    dt.as_ref().map(format_datetime).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_datetime() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 15, 14, 2, 26).unwrap();
        assert_eq!(format_datetime(&dt), "15.03.2024 14:02:26");
    }

    #[test]
    fn test_format_date() {
        let dt = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(format_date(&dt), "31.12.2024");
    }

    #[test]
    fn test_format_datetime_opt_none() {
        assert_eq!(format_datetime_opt(&None), "-");
    }
}
