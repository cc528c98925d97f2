//! Date and time parsing/formatting shared by both views.
//!
//! Canonical storage is `YYYY-MM-DD` for dates and 24-hour `HH:MM` for times.
//! Farmer-facing views render 12-hour times ("10:00 AM"); vet-facing views
//! keep the 24-hour form ("14:00").

use chrono::{NaiveDate, NaiveTime};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_24H: &str = "%H:%M";
const TIME_12H: &str = "%I:%M %p";

/// Parse a canonical `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Parse a wall-clock time in either 24-hour ("14:00") or 12-hour ("2:00 PM") form.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, TIME_24H)
        .or_else(|_| NaiveTime::parse_from_str(&s.to_uppercase(), TIME_12H))
        .ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Long display form, e.g. "Friday, Dec 15".
pub fn format_date_long(date: NaiveDate) -> String {
    date.format("%A, %b %-d").to_string()
}

pub fn format_time_24h(time: NaiveTime) -> String {
    time.format(TIME_24H).to_string()
}

/// 12-hour display form without a leading zero, e.g. "9:00 AM".
pub fn format_time_12h(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_time_forms() {
        let afternoon = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
        assert_eq!(parse_time("14:00"), Some(afternoon));
        assert_eq!(parse_time("2:00 PM"), Some(afternoon));
        assert_eq!(parse_time("02:00 pm"), Some(afternoon));
        assert_eq!(parse_time(""), None);
        assert_eq!(parse_time("25:00"), None);
    }

    #[test]
    fn test_format_times() {
        let t = NaiveTime::from_hms_opt(9, 5, 0).unwrap();
        assert_eq!(format_time_24h(t), "09:05");
        assert_eq!(format_time_12h(t), "9:05 AM");
        let noon = NaiveTime::from_hms_opt(12, 30, 0).unwrap();
        assert_eq!(format_time_12h(noon), "12:30 PM");
    }

    #[test]
    fn test_dates() {
        let d = parse_date("2023-12-15").unwrap();
        assert_eq!(format_date(d), "2023-12-15");
        assert_eq!(format_date_long(d), "Friday, Dec 15");
        assert!(parse_date("Tomorrow").is_none());
    }
}
