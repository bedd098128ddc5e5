use anyhow::{bail, Context, Result};
use chrono::{Local, LocalResult, NaiveDate, NaiveTime};

/// Calendar dates are entered as `dd.mm.yyyy`.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Parses a `dd.mm.yyyy` calendar date.
///
/// Parsing is strict: out-of-range components and trailing input are errors,
/// not rolled over.
///
/// # Errors
///
/// Returns an error if `input` does not match [`DATE_FORMAT`].
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .with_context(|| format!("invalid date {input:?}: expected dd.mm.yyyy"))
}

/// Returns midnight on `date` in the system local zone, as epoch seconds.
///
/// When a DST fold makes local midnight ambiguous, the earlier instant wins.
///
/// # Errors
///
/// Returns an error for the rare zones where a DST gap removes midnight on
/// `date` entirely.
pub fn local_midnight(date: NaiveDate) -> Result<i64> {
    match date.and_time(NaiveTime::MIN).and_local_timezone(Local) {
        LocalResult::Single(moment) | LocalResult::Ambiguous(moment, _) => Ok(moment.timestamp()),
        LocalResult::None => {
            bail!("midnight on {date} does not exist in the local time zone")
        }
    }
}

/// Converts a start/end date pair into epoch-second window bounds.
///
/// The bounds are meant for a half-open `[start, end)` timestamp window, so
/// an end date of `01.02.2020` covers January 2020 up to its final second.
///
/// # Errors
///
/// Returns an error if either date fails [`parse_date`] or [`local_midnight`].
pub fn period_bounds(start: &str, end: &str) -> Result<(i64, i64)> {
    Ok((
        local_midnight(parse_date(start)?)?,
        local_midnight(parse_date(end)?)?,
    ))
}
