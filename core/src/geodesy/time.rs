//! Julian-date helpers. Dates are `yyyyddd` integers, times `hhmmss`.

use std::fmt;

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];
const MONTH_START: [i32; 13] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365];

fn full_year(year: i32) -> i32 {
    if year >= 1900 {
        year
    } else if year > 70 {
        year + 1900
    } else {
        year + 2000
    }
}

/// Fractional day number used to order and compare analyses.
///
/// Returns 0.0 for a missing day of year or a negative time. Two-digit
/// years are widened with a 1970 pivot.
pub fn calctime(julian_date: i32, hhmmss: i32) -> f64 {
    if julian_date % 1000 == 0 || hhmmss < 0 {
        return 0.0;
    }
    let year = julian_date / 1000;
    let date = if year < 1900 {
        if year > 70 {
            1_900_000 + julian_date
        } else {
            2_000_000 + julian_date
        }
    } else {
        julian_date
    };
    let seconds = f64::from(hhmmss % 100) / 3600.0;
    let minutes = f64::from((hhmmss / 100) % 100) / 60.0;
    let hours = f64::from(hhmmss / 10000);
    f64::from(date) + (hours + minutes + seconds) / 24.0
}

/// Day/month/year to `yyyyddd`, `None` when day or month is out of range.
pub fn idmyyd(day: i32, month: i32, year: i32) -> Option<i32> {
    if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
        return None;
    }
    let year = full_year(year);
    let mut day_of_year = day + MONTH_START[(month - 1) as usize];
    if year % 4 == 0 && month > 2 {
        day_of_year += 1;
    }
    Some(year * 1000 + day_of_year)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDate {
    pub day: i32,
    pub month: i32,
    pub year: i32,
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let index = (self.month.clamp(1, 12) - 1) as usize;
        write!(f, "{:04}{}{:02}", self.year, MONTHS[index], self.day)
    }
}

/// Inverse of [`idmyyd`], leap-year aware.
pub fn yddmy(julian_date: i32) -> CalendarDate {
    let year = full_year(julian_date / 1000);
    let day_of_year = julian_date % 1000;
    let leap = year % 4 == 0;
    let month_start = |month: usize| MONTH_START[month - 1] + i32::from(leap && month > 2);

    let month = (1..=12)
        .rev()
        .find(|&m| month_start(m) < day_of_year)
        .unwrap_or(1);
    CalendarDate {
        day: day_of_year - month_start(month),
        month: month as i32,
        year,
    }
}

/// `yyyyddd` to the `YYYYMONDD` form, e.g. `2000MAR13`.
pub fn julian_to_cmonth(julian_date: i32) -> String {
    yddmy(julian_date).to_string()
}

/// Parses `YYYYMONDD` back into `yyyyddd`.
pub fn cmonth_to_julian(text: &str) -> Option<i32> {
    let text = text.trim();
    let month_at = text.find(|c: char| c.is_ascii_alphabetic())?;
    let day_at = month_at + text[month_at..].find(|c: char| c.is_ascii_digit())?;
    let year: i32 = text[..month_at].parse().ok()?;
    let month_name = &text[month_at..day_at];
    let day: i32 = text[day_at..].parse().ok()?;
    let month = MONTHS.iter().position(|m| *m == month_name)? as i32 + 1;
    idmyyd(day, month, year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calctime_adds_day_fraction() {
        assert_eq!(calctime(2005250, 120000), 2005250.5);
        assert_eq!(calctime(2005250, 0), 2005250.0);
        assert!((calctime(2005250, 60000) - 2005250.25).abs() < 1e-9);
    }

    #[test]
    fn calctime_widens_two_digit_years() {
        assert_eq!(calctime(99001, 0), 1999001.0);
        assert_eq!(calctime(5001, 0), 2005001.0);
    }

    #[test]
    fn calctime_flags_missing_values() {
        assert_eq!(calctime(2005000, 120000), 0.0);
        assert_eq!(calctime(2005250, -1), 0.0);
    }

    #[test]
    fn idmyyd_handles_leap_years() {
        assert_eq!(idmyyd(13, 3, 2000), Some(2000073));
        assert_eq!(idmyyd(13, 3, 2001), Some(2001072));
        assert_eq!(idmyyd(1, 1, 5), Some(2005001));
        assert_eq!(idmyyd(0, 3, 2000), None);
        assert_eq!(idmyyd(1, 13, 2000), None);
    }

    #[test]
    fn yddmy_inverts_idmyyd() {
        for (day, month, year) in [(29, 2, 2004), (1, 3, 2004), (31, 12, 2003), (15, 8, 2005)] {
            let julian = idmyyd(day, month, year).unwrap();
            assert_eq!(yddmy(julian), CalendarDate { day, month, year });
        }
    }

    #[test]
    fn month_strings_round_trip() {
        assert_eq!(julian_to_cmonth(2000073), "2000MAR13");
        assert_eq!(cmonth_to_julian("2000MAR13"), Some(2000073));
        assert_eq!(cmonth_to_julian("2000XYZ13"), None);
        assert_eq!(cmonth_to_julian("MAR13"), None);
    }
}
