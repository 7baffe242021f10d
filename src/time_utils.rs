use chrono::{NaiveDate, NaiveDateTime};

/// Parse a compact minute-resolution timestamp: YYYYMMDDHHMM
pub fn parse_minute_timestamp(time_str: &str) -> Result<NaiveDateTime, String> {
    if time_str.len() != 12 {
        return Err(format!(
            "Timestamp must be YYYYMMDDHHMM, got: {}",
            time_str
        ));
    }

    NaiveDateTime::parse_from_str(time_str, "%Y%m%d%H%M")
        .map_err(|_| format!("Could not parse timestamp: {}", time_str))
}

/// Format a date as the compact YYYYMMDD day token used in file references.
pub fn compact_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Daily dates from `start` through `end`, inclusive.
pub fn daily_dates(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|date| *date <= end).collect()
}
