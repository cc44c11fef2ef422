//! Calendar arithmetic between epoch milliseconds and ISO-8601 strings.
//!
//! There is no timezone database on a device. Only UTC is produced, and on
//! input a numeric `±HH[:MM]` offset is the one correction applied.

use super::Error;
use core::fmt::Write;
use heapless::String;

/// Length of `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub const TIMESTAMP_LEN: usize = 24;

/// Length of `YYYY-MM-DD`.
pub const DATE_LEN: usize = 10;

/// An ISO-8601 UTC timestamp with millisecond precision.
pub type Timestamp = String<TIMESTAMP_LEN>;

/// An ISO-8601 calendar date.
pub type Date = String<DATE_LEN>;

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

// `YYYY-MM-DDTHH:MM:SS`
const MIN_LEN: usize = 19;

/// Gregorian leap year test.
pub const fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 4 == 0 && year % 100 != 0)
}

/// Number of days in `year`.
pub const fn days_in_year(year: i32) -> i64 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Number of days in `month` (1-12) of `year`.
pub const fn days_in_month(year: i32, month: u32) -> i64 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Parses an ISO-8601 date-time into milliseconds since the UNIX epoch.
///
/// Accepts `YYYY-MM-DDTHH:MM:SS`, optionally followed by a fraction of a
/// second (milliseconds are kept, finer digits dropped) and then either `Z`
/// or a numeric offset `±HH[:MM]`, which is removed to yield UTC.
///
/// ```rust
/// use qsense::time::iso8601::parse;
///
/// assert_eq!(parse("2024-01-01T00:00:00.000Z"), Ok(1_704_067_200_000));
/// assert_eq!(parse("2024-01-01T02:00:00+02:00"), Ok(1_704_067_200_000));
/// assert!(parse("").is_err());
/// ```
pub fn parse(iso: &str) -> Result<i64, Error> {
    let bytes = iso.trim().as_bytes();
    if bytes.is_empty() {
        return Err(Error::Empty);
    }
    if bytes.len() < MIN_LEN {
        return Err(Error::Malformed);
    }

    let year = digits(&bytes[0..4])? as i32;
    let month = digits(&bytes[5..7])?;
    let day = digits(&bytes[8..10])? as i64;
    let hour = digits(&bytes[11..13])? as i64;
    let minute = digits(&bytes[14..16])? as i64;
    let second = digits(&bytes[17..19])? as i64;

    if year < 1970
        || !(1..=12).contains(&month)
        || day < 1
        || day > days_in_month(year, month)
        || hour > 23
        || minute > 59
        || second > 59
    {
        return Err(Error::OutOfRange);
    }

    let mut rest = &bytes[MIN_LEN..];

    let mut millis = 0;
    if let Some((b'.', fraction)) = rest.split_first() {
        let len = fraction.iter().take_while(|b| b.is_ascii_digit()).count();
        if len == 0 {
            return Err(Error::Malformed);
        }
        let mut scale = 100;
        for digit in &fraction[..len.min(3)] {
            millis += i64::from(digit - b'0') * scale;
            scale /= 10;
        }
        rest = &fraction[len..];
    }

    let offset = match rest.split_first() {
        Some((sign @ (b'+' | b'-'), zone)) => {
            let hours = zone.get(0..2).ok_or(Error::Malformed)?;
            let minutes = match zone.get(2..) {
                Some([b':', m0, m1, ..]) | Some([m0, m1, ..]) => digits(&[*m0, *m1])? as i64,
                _ => 0,
            };
            let offset = digits(hours)? as i64 * MILLIS_PER_HOUR + minutes * MILLIS_PER_MINUTE;
            if *sign == b'-' { -offset } else { offset }
        }
        _ => 0,
    };

    let mut epoch = millis
        + second * MILLIS_PER_SECOND
        + minute * MILLIS_PER_MINUTE
        + hour * MILLIS_PER_HOUR
        + (day - 1) * MILLIS_PER_DAY;

    for m in 1..month {
        epoch += days_in_month(year, m) * MILLIS_PER_DAY;
    }
    for y in 1970..year {
        epoch += days_in_year(y) * MILLIS_PER_DAY;
    }

    Ok(epoch - offset)
}

/// Formats milliseconds since the UNIX epoch as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
///
/// Negative values are treated as the epoch itself. Years beyond 9999 do
/// not fit the fixed-width form and produce a truncated string.
///
/// ```rust
/// use qsense::time::iso8601::format;
///
/// assert_eq!(format(1_709_164_800_123).as_str(), "2024-02-29T00:00:00.123Z");
/// ```
pub fn format(epoch_millis: i64) -> Timestamp {
    let mut epoch = epoch_millis.max(0);

    let millis = epoch % MILLIS_PER_SECOND;
    epoch /= MILLIS_PER_SECOND;
    let second = epoch % 60;
    epoch /= 60;
    let minute = epoch % 60;
    epoch /= 60;
    let hour = epoch % 24;
    let mut days = epoch / 24;

    let mut year = 1970;
    while days >= days_in_year(year) {
        days -= days_in_year(year);
        year += 1;
    }

    let mut month = 1;
    while days >= days_in_month(year, month) {
        days -= days_in_month(year, month);
        month += 1;
    }

    let mut out = Timestamp::new();
    let _ = write!(
        out,
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        year,
        month,
        days + 1,
        hour,
        minute,
        second,
        millis
    );
    out
}

/// The date part (`YYYY-MM-DD`) of a timestamp.
pub fn date(timestamp: &str) -> Date {
    let date = timestamp.split('T').next().unwrap_or_default();
    Date::try_from(date).unwrap_or_default()
}

fn digits(field: &[u8]) -> Result<u32, Error> {
    field.iter().try_fold(0u32, |acc, b| {
        if b.is_ascii_digit() {
            Ok(acc * 10 + u32::from(b - b'0'))
        } else {
            Err(Error::Malformed)
        }
    })
}
