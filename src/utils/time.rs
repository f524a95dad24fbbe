use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};

use crate::error::{Error, Result};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Complete ISO-8601 timestamp (date, time and offset); bare dates are rejected.
pub fn from_rfc3339(s: &str) -> anyhow::Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s.trim())?.with_timezone(&Utc))
}

/// Parses `YYYY-MM-DD`, falling back to the date part of an RFC 3339 timestamp.
///
/// The date is read in the offset the timestamp carries, not in UTC.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let trimmed = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|e| Error::InvalidDate(format!("{}: {}", trimmed, e)))
}

/// Whole years elapsed between `birth` and `today`; negative for future dates.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn age_counts_birthday_not_yet_reached() {
        assert_eq!(age_on(d(2000, 6, 15), d(2020, 6, 14)), 19);
        assert_eq!(age_on(d(2000, 6, 15), d(2020, 6, 15)), 20);
        assert_eq!(age_on(d(2000, 6, 15), d(2020, 12, 31)), 20);
    }

    #[test]
    fn leap_day_birthday_turns_over_on_march_first() {
        assert_eq!(age_on(d(2004, 2, 29), d(2022, 2, 28)), 17);
        assert_eq!(age_on(d(2004, 2, 29), d(2022, 3, 1)), 18);
    }

    #[test]
    fn timestamps_require_time_and_offset() {
        assert!(from_rfc3339("2025-03-01T09:00:00Z").is_ok());
        assert!(from_rfc3339("2025-03-01T09:00:00.000+01:00").is_ok());
        assert!(from_rfc3339("2025-03-01").is_err());
        assert!(from_rfc3339("2025-03-01T09:00:00").is_err());
    }

    #[test]
    fn parse_date_accepts_both_forms() {
        assert_eq!(parse_date("1990-05-15").unwrap(), d(1990, 5, 15));
        assert_eq!(parse_date("1990-05-15T00:00:00Z").unwrap(), d(1990, 5, 15));
        assert!(matches!(
            parse_date("15/05/1990"),
            Err(Error::InvalidDate(_))
        ));
    }

    #[test]
    fn parse_date_keeps_the_sender_offset() {
        assert_eq!(
            parse_date("2000-05-15T00:00:00+02:00").unwrap(),
            d(2000, 5, 15)
        );
        assert_eq!(
            parse_date("2000-05-15T23:30:00-05:00").unwrap(),
            d(2000, 5, 15)
        );
    }
}
