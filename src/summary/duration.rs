use crate::model::Timed;
use std::fmt;
use tracing::debug;

/// Wall-clock runtime of a build, step or service in whole seconds.
///
/// Renders as `1h2m3s`, `4m0s`, `10s` or `0s`; negative spans keep a leading
/// `-` instead of being rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Elapsed(i64);

impl Elapsed {
    pub fn from_secs(secs: i64) -> Self {
        Elapsed(secs)
    }
}

/// Runtime of `item`, measuring up to `now` while it is still pending or
/// running.
pub fn elapsed<T: Timed>(item: &T, now: i64) -> Elapsed {
    let finished = if is_unfinished(item.status()) {
        now
    } else {
        item.finished()
    };
    let duration = Elapsed(finished.saturating_sub(item.started()));
    debug!(status = item.status(), %duration, "calculated duration");
    duration
}

fn is_unfinished(status: &str) -> bool {
    status.eq_ignore_ascii_case("pending") || status.eq_ignore_ascii_case("running")
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            f.write_str("-")?;
        }
        let total = self.0.unsigned_abs();
        let (hours, minutes, seconds) = (total / 3600, total / 60 % 60, total % 60);

        if hours > 0 {
            write!(f, "{hours}h{minutes}m{seconds}s")
        } else if minutes > 0 {
            write!(f, "{minutes}m{seconds}s")
        } else {
            write!(f, "{seconds}s")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseElapsedError(String);

impl fmt::Display for ParseElapsedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid duration {:?}", self.0)
    }
}

impl std::error::Error for ParseElapsedError {}

/// Parses a duration string into fractional seconds.
///
/// Accepts the rendered form plus fractional values and the `ms`, `us`/`µs`
/// and `ns` units, e.g. `1h2m3s`, `1.5s`, `-250ms`. A bare `0` is zero.
pub fn parse_secs(text: &str) -> Result<f64, ParseElapsedError> {
    let invalid = || ParseElapsedError(text.to_string());

    let (negative, mut rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if rest == "0" {
        return Ok(0.0);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total = 0.0;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(invalid)?;
        if number_len == 0 {
            return Err(invalid());
        }
        let value: f64 = rest[..number_len].parse().map_err(|_| invalid())?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let scale = match &rest[..unit_len] {
            "h" => 3600.0,
            "m" => 60.0,
            "s" => 1.0,
            "ms" => 1e-3,
            "us" | "µs" | "μs" => 1e-6,
            "ns" => 1e-9,
            _ => return Err(invalid()),
        };
        total += value * scale;
        rest = &rest[unit_len..];
    }

    Ok(if negative { -total } else { total })
}
