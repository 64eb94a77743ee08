//! Calendar constants shared by the weather aggregation and the solver.

pub const SECS_IN_HOUR: f64 = 3_600.0;
pub const SECS_IN_DAY: f64 = 86_400.0;
pub const HOURS_IN_DAY: usize = 24;
pub const MONTHS_IN_YEAR: usize = 12;

pub const DAYS_IN_COMMON_YEAR: usize = 365;
pub const DAYS_IN_LEAP_YEAR: usize = 366;

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_year(leap: bool) -> usize {
    if leap {
        DAYS_IN_LEAP_YEAR
    } else {
        DAYS_IN_COMMON_YEAR
    }
}

/// Whole-day average month length (30 for both common and leap years).
pub fn average_days_in_month(days_in_year: usize) -> usize {
    days_in_year / MONTHS_IN_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_year_rule() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn month_length_is_truncated() {
        assert_eq!(average_days_in_month(days_in_year(false)), 30);
        assert_eq!(average_days_in_month(days_in_year(true)), 30);
    }
}
