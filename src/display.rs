//! Text formatting for the CLI.

use crate::address::Address;

const MS_PER_SECOND: i64 = 1000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Which units to include in [`human_time_remaining`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRemainingOpts {
    pub days: bool,
    pub hours: bool,
    pub minutes: bool,
    pub seconds: bool,
}

impl TimeRemainingOpts {
    pub fn all() -> Self {
        TimeRemainingOpts {
            days: true,
            hours: true,
            minutes: true,
            seconds: true,
        }
    }
}

/// Distance between `until_ms` and `now_ms` as text.
///
/// Without options only the largest non-zero unit is shown ("3 days").
/// With options every selected non-zero unit is listed, the last one joined
/// with "and" ("1 days, 2 hours and 5 seconds"). The distance is absolute,
/// so past timestamps read the same as future ones.
pub fn human_time_remaining(until_ms: i64, now_ms: i64, opts: Option<TimeRemainingOpts>) -> String {
    let remaining = until_ms.saturating_sub(now_ms).saturating_abs();

    let days = remaining / MS_PER_DAY;
    let hours = remaining % MS_PER_DAY / MS_PER_HOUR;
    let minutes = remaining % MS_PER_HOUR / MS_PER_MINUTE;
    let seconds = remaining % MS_PER_MINUTE / MS_PER_SECOND;

    let Some(opts) = opts else {
        return if days > 0 {
            format!("{} days", days)
        } else if hours > 0 {
            format!("{} hours", hours)
        } else if minutes > 0 {
            format!("{} minutes", minutes)
        } else {
            format!("{} seconds", seconds)
        };
    };

    let parts: Vec<String> = [
        (opts.days, days, "days"),
        (opts.hours, hours, "hours"),
        (opts.minutes, minutes, "minutes"),
        (opts.seconds, seconds, "seconds"),
    ]
    .into_iter()
    .filter(|(wanted, value, _)| *wanted && *value > 0)
    .map(|(_, value, unit)| format!("{} {}", value, unit))
    .collect();

    match parts.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}

/// `abcdef...uvwxyz` style abbreviation keeping `len` characters per side.
pub fn shorten(text: &str, len: usize) -> String {
    let head: String = text.chars().take(len).collect();
    let count = text.chars().count();
    let tail: String = text.chars().skip(count.saturating_sub(len)).collect();
    format!("{}...{}", head, tail)
}

pub fn shorten_address(address: &Address, len: usize) -> String {
    shorten(&address.to_string(), len)
}
