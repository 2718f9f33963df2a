//! Display formatting for dashboard tables.

use chrono::{DateTime, Datelike, Utc};

/// English ordinal suffix for a day of the month.
const fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Format a timestamp as a long date with an ordinal day, e.g. `January 1st, 2024`.
///
/// The date is taken in UTC.
#[must_use]
pub fn long_date(at: DateTime<Utc>) -> String {
    let day = at.day();
    format!(
        "{} {day}{}, {}",
        at.format("%B"),
        ordinal_suffix(day),
        at.year()
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_ordinal_suffixes() {
        assert_eq!(long_date(date(1, 1)), "January 1st, 2024");
        assert_eq!(long_date(date(2, 2)), "February 2nd, 2024");
        assert_eq!(long_date(date(3, 3)), "March 3rd, 2024");
        assert_eq!(long_date(date(4, 4)), "April 4th, 2024");
        assert_eq!(long_date(date(10, 21)), "October 21st, 2024");
        assert_eq!(long_date(date(12, 31)), "December 31st, 2024");
    }

    #[test]
    fn test_teens_use_th() {
        assert_eq!(long_date(date(5, 11)), "May 11th, 2024");
        assert_eq!(long_date(date(5, 12)), "May 12th, 2024");
        assert_eq!(long_date(date(5, 13)), "May 13th, 2024");
    }
}
