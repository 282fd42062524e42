use chrono::NaiveDate;

/// Last day of a calendar month.
pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

/// Build a date, clamping the day to the end of the month when it overflows
/// (e.g. day 31 in a 30-day month). Start days past a month's end are a
/// supported configuration and must never produce an invalid date.
fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.max(1).min(last_day_of_month(year, month));
    // Day is within 1..=last_day_of_month by construction.
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("invalid clamped date {year}-{month:02}-{day:02}"))
}

/// Resolve the accounting cycle labelled (year, month) to inclusive date
/// bounds. With start_day == 1 this is the plain calendar month; otherwise
/// the cycle runs from start_day of the previous month through start_day - 1
/// of the labelled month, rolling the year back across January.
pub fn resolve(year: i32, month: u32, start_day: u32) -> (NaiveDate, NaiveDate) {
    if start_day <= 1 {
        let from = clamped_date(year, month, 1);
        let to = clamped_date(year, month, last_day_of_month(year, month));
        return (from, to);
    }

    let (prev_year, prev_month) = if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    };

    let from = clamped_date(prev_year, prev_month, start_day);
    let to = clamped_date(year, month, start_day - 1);
    (from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_mid_year_cycle() {
        let (from, to) = resolve(2026, 6, 25);
        assert_eq!(from, ymd(2026, 5, 25));
        assert_eq!(to, ymd(2026, 6, 24));
    }

    #[test]
    fn test_year_boundary_rollback() {
        let (from, to) = resolve(2026, 1, 25);
        assert_eq!(from, ymd(2025, 12, 25));
        assert_eq!(to, ymd(2026, 1, 24));
    }

    #[test]
    fn test_start_day_one_is_calendar_month() {
        let (from, to) = resolve(2026, 2, 1);
        assert_eq!(from, ymd(2026, 2, 1));
        assert_eq!(to, ymd(2026, 2, 28));
    }

    #[test]
    fn test_start_day_clamps_in_short_previous_month() {
        // Cycle labelled March with start day 31: "Feb 31" clamps to Feb 28.
        let (from, to) = resolve(2026, 3, 31);
        assert_eq!(from, ymd(2026, 2, 28));
        assert_eq!(to, ymd(2026, 3, 30));
    }

    #[test]
    fn test_start_day_clamps_in_leap_february() {
        let (from, _) = resolve(2028, 3, 31);
        assert_eq!(from, ymd(2028, 2, 29));
    }

    #[test]
    fn test_end_day_clamps_in_thirty_day_month() {
        // Cycle labelled April with start day 31: end "Apr 30" is already the
        // month's last day; the start clamps inside 31-day March untouched.
        let (from, to) = resolve(2026, 4, 31);
        assert_eq!(from, ymd(2026, 3, 31));
        assert_eq!(to, ymd(2026, 4, 30));
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2026, 1), 31);
        assert_eq!(last_day_of_month(2026, 4), 30);
        assert_eq!(last_day_of_month(2026, 2), 28);
        assert_eq!(last_day_of_month(2028, 2), 29);
        assert_eq!(last_day_of_month(2026, 12), 31);
    }

    #[test]
    fn test_bounds_are_always_ordered() {
        for month in 1..=12 {
            for start_day in 1..=31 {
                let (from, to) = resolve(2026, month, start_day);
                assert!(from <= to, "resolve(2026, {month}, {start_day}) gave {from} > {to}");
            }
        }
    }
}
