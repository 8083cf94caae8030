//! Post date parsing, ordering and display.
//!
//! Index files carry dates as ISO-8601 strings of varying precision:
//!
//! | Input                          | Accepted | Notes                     |
//! |--------------------------------|----------|---------------------------|
//! | `2025-01-05`                   | yes      | midnight UTC              |
//! | `2025-01-05T10:30`             | yes      | seconds default to 0      |
//! | `2025-01-05T10:30:15.250Z`     | yes      | fraction ignored          |
//! | `2025-01-05 10:30:15+02:00`    | yes      | offset applied            |
//! | `05/01/2025`, `soon`, `""`     | no       | sorts as the epoch        |

use anyhow::{Result, bail};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar date with optional time of day and UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Offset from UTC in minutes (`+02:00` → 120)
    pub offset_minutes: i16,
}

impl PostDate {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            offset_minutes: 0,
        }
    }

    pub const fn from_ymd(year: u16, month: u8, day: u8) -> Self {
        Self::new(year, month, day, 0, 0, 0)
    }

    /// Parse a date or date-time string. Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.trim().as_bytes();
        if bytes.len() < 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return None;
        }

        let year = parse_digits(&bytes[0..4])? as u16;
        let month = parse_digits(&bytes[5..7])? as u8;
        let day = parse_digits(&bytes[8..10])? as u8;
        let mut date = Self::from_ymd(year, month, day);

        let rest = &bytes[10..];
        if !rest.is_empty() {
            if !matches!(rest[0], b'T' | b't' | b' ') {
                return None;
            }
            date.apply_time(&rest[1..])?;
        }

        date.validate().ok()?;
        Some(date)
    }

    /// Parse `HH:MM[:SS[.fff]][Z|±HH:MM]`.
    fn apply_time(&mut self, bytes: &[u8]) -> Option<()> {
        if bytes.len() < 5 || bytes[2] != b':' {
            return None;
        }
        self.hour = parse_digits(&bytes[0..2])? as u8;
        self.minute = parse_digits(&bytes[3..5])? as u8;

        let mut rest = &bytes[5..];
        if rest.first() == Some(&b':') {
            if rest.len() < 3 {
                return None;
            }
            self.second = parse_digits(&rest[1..3])? as u8;
            rest = &rest[3..];
        }
        if rest.first() == Some(&b'.') {
            let frac = rest[1..].iter().take_while(|b| b.is_ascii_digit()).count();
            if frac == 0 {
                return None;
            }
            rest = &rest[1 + frac..];
        }

        match rest {
            [] | [b'Z' | b'z'] => {}
            [sign @ (b'+' | b'-'), hh1, hh2, b':', mm1, mm2] => {
                let hours = parse_digits(&[*hh1, *hh2])? as i16;
                let minutes = parse_digits(&[*mm1, *mm2])? as i16;
                if hours > 23 || minutes > 59 {
                    return None;
                }
                let offset = hours * 60 + minutes;
                self.offset_minutes = if *sign == b'-' { -offset } else { offset };
            }
            _ => return None,
        }
        Some(())
    }

    pub fn validate(&self) -> Result<()> {
        let Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            ..
        } = *self;

        if !(1..=12).contains(&month) {
            bail!("month is invalid: {month}");
        }

        let max_days = Self::days_in_month(year, month);
        if day == 0 || day > max_days {
            bail!("day is invalid: {day}");
        }
        if hour > 23 {
            bail!("hour is invalid: {hour}");
        }
        if minute > 59 {
            bail!("minute is invalid: {minute}");
        }
        if second > 59 {
            bail!("second is invalid: {second}");
        }

        Ok(())
    }

    #[inline]
    fn is_leap_year(year: u16) -> bool {
        year.is_multiple_of(4) && (!year.is_multiple_of(100) || year.is_multiple_of(400))
    }

    #[inline]
    fn days_in_month(year: u16, month: u8) -> u8 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if Self::is_leap_year(year) => 29,
            2 => 28,
            _ => 0,
        }
    }

    /// Seconds since 1970-01-01T00:00:00Z.
    pub fn unix_seconds(&self) -> i64 {
        let days = days_from_civil(self.year as i64, self.month as i64, self.day as i64);
        let secs = self.hour as i64 * 3600 + self.minute as i64 * 60 + self.second as i64;
        days * 86_400 + secs - self.offset_minutes as i64 * 60
    }

    /// Short display form, e.g. `Jan 5, 2025`. Months outside 1..=12 are
    /// printed as numbers.
    pub fn format_short(&self) -> String {
        let month = usize::from(self.month)
            .checked_sub(1)
            .and_then(|idx| MONTHS.get(idx));
        match month {
            Some(name) => format!("{name} {}, {}", self.day, self.year),
            None => format!("{} {}, {}", self.month, self.day, self.year),
        }
    }
}

/// Ordering key for an optional date string.
///
/// Missing and unparseable dates map to the epoch, so they sort as the oldest.
pub fn sort_timestamp(date: Option<&str>) -> i64 {
    date.and_then(PostDate::parse)
        .map_or(0, |d| d.unix_seconds())
}

/// Display a date in short form, or verbatim when it does not parse.
pub fn display_date(date: &str) -> String {
    PostDate::parse(date).map_or_else(|| date.to_owned(), |d| d.format_short())
}

/// Days between 1970-01-01 and the given proleptic Gregorian date.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Parse a run of ASCII digits
#[inline]
fn parse_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() {
        return None;
    }
    let mut result = 0u32;
    for &b in bytes {
        let d = b.wrapping_sub(b'0');
        if d > 9 {
            return None;
        }
        result = result * 10 + d as u32;
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_only() {
        let d = PostDate::parse("2025-01-05").unwrap();
        assert_eq!(d, PostDate::from_ymd(2025, 1, 5));
    }

    #[test]
    fn test_parse_datetime_variants() {
        let d = PostDate::parse("2025-01-05T10:30").unwrap();
        assert_eq!((d.hour, d.minute, d.second), (10, 30, 0));

        let d = PostDate::parse("2025-01-05T10:30:15.250Z").unwrap();
        assert_eq!(d.second, 15);
        assert_eq!(d.offset_minutes, 0);

        let d = PostDate::parse("2025-01-05 10:30:15+02:00").unwrap();
        assert_eq!(d.offset_minutes, 120);

        let d = PostDate::parse("2025-01-05T10:30:15-05:30").unwrap();
        assert_eq!(d.offset_minutes, -330);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(PostDate::parse("").is_none());
        assert!(PostDate::parse("soon").is_none());
        assert!(PostDate::parse("05/01/2025").is_none());
        assert!(PostDate::parse("2025-13-01").is_none());
        assert!(PostDate::parse("2023-02-29").is_none());
        assert!(PostDate::parse("2025-01-05T25:00").is_none());
        assert!(PostDate::parse("2025-01-05X10:00").is_none());
        assert!(PostDate::parse("2025-01-05T10:00+0200").is_none());
    }

    #[test]
    fn test_validate_leap_year() {
        assert!(PostDate::from_ymd(2024, 2, 29).validate().is_ok());
        assert!(PostDate::from_ymd(2000, 2, 29).validate().is_ok());
        assert!(PostDate::from_ymd(1900, 2, 29).validate().is_err());
    }

    #[test]
    fn test_unix_seconds() {
        assert_eq!(PostDate::from_ymd(1970, 1, 1).unix_seconds(), 0);
        assert_eq!(PostDate::from_ymd(1970, 1, 2).unix_seconds(), 86_400);
        assert_eq!(PostDate::from_ymd(2000, 3, 1).unix_seconds(), 951_868_800);
        assert_eq!(PostDate::from_ymd(1969, 12, 31).unix_seconds(), -86_400);
    }

    #[test]
    fn test_offset_shifts_instant() {
        let utc = PostDate::parse("2025-01-05T10:00:00Z").unwrap();
        let plus_two = PostDate::parse("2025-01-05T12:00:00+02:00").unwrap();
        assert_eq!(utc.unix_seconds(), plus_two.unix_seconds());
    }

    #[test]
    fn test_sort_timestamp_missing_is_epoch() {
        assert_eq!(sort_timestamp(None), 0);
        assert_eq!(sort_timestamp(Some("not a date")), 0);
        assert!(sort_timestamp(Some("2025-01-01")) > 0);
    }

    #[test]
    fn test_format_short() {
        assert_eq!(PostDate::from_ymd(2025, 1, 5).format_short(), "Jan 5, 2025");
        assert_eq!(PostDate::from_ymd(2024, 12, 25).format_short(), "Dec 25, 2024");
        assert_eq!(PostDate::from_ymd(2024, 0, 3).format_short(), "0 3, 2024");
        assert_eq!(PostDate::from_ymd(2024, 13, 3).format_short(), "13 3, 2024");
    }

    #[test]
    fn test_display_date_falls_back_to_input() {
        assert_eq!(display_date("2025-03-01"), "Mar 1, 2025");
        assert_eq!(display_date("someday"), "someday");
    }
}
