use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const DATE_FORMATS: [&str; 4] = ["%B %d, %Y", "%b %d, %Y", "%m/%d/%Y", "%Y-%m-%d"];
const TIME_FORMATS: [&str; 2] = ["%I:%M %p", "%H:%M"];

/// Combines the extracted date and time substrings into one timestamp.
///
/// Both substrings must parse for a timestamp to come back; a half-parsed
/// pair yields `None` so a record never carries a date with a made-up time.
pub fn combine_date_time(date_str: &str, time_str: &str) -> Option<NaiveDateTime> {
    let date = parse_date(date_str)?;
    let time = parse_time(time_str)?;
    Some(NaiveDateTime::new(date, time))
}

fn parse_date(date_str: &str) -> Option<NaiveDate> {
    let date_str = date_str.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(date_str, format) {
            return Some(date);
        }
    }

    tracing::warn!("could not parse auction date string: '{}'", date_str);
    None
}

fn parse_time(time_str: &str) -> Option<NaiveTime> {
    let time_str = time_str.trim();
    for format in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(time_str, format) {
            return Some(time);
        }
    }

    tracing::warn!("could not parse auction time string: '{}'", time_str);
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_month_name() {
        let dt = combine_date_time("March 3, 2025", "2:30 PM").unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2025-03-03 14:30");
    }

    #[test]
    fn test_abbreviated_month_name() {
        let dt = combine_date_time("Aug 10, 2025", "1:00 AM").unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2025-08-10 01:00");
    }

    #[test]
    fn test_slash_separated() {
        let dt = combine_date_time("10/26/2023", "10:00 AM").unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2023-10-26 10:00");
    }

    #[test]
    fn test_iso_date_and_24_hour_time() {
        let dt = combine_date_time("2025-03-03", "14:30").unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2025-03-03 14:30");
    }

    #[test]
    fn test_unparsable_date() {
        assert!(combine_date_time("next Tuesday", "2:30 PM").is_none());
    }

    #[test]
    fn test_unparsable_time() {
        assert!(combine_date_time("March 3, 2025", "half past two").is_none());
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert!(combine_date_time("  March 3, 2025 ", " 2:30 PM ").is_some());
    }
}
