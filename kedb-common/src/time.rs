//! Date utilities

use chrono::{Local, NaiveDate};

/// Today's date in the local timezone, as stamped on new documents
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `YYYY-MM-DD`, the format used in the revision table
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_today_is_reasonable() {
        let date = today();
        assert!(date.year() >= 2000);
        assert!(date.year() < 2100);
    }

    #[test]
    fn test_format_date_zero_pads() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        assert_eq!(format_date(date), "2026-03-04");
    }
}
