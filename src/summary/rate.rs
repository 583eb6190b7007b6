use super::duration::parse_secs;
use tracing::trace;

/// Log throughput in whole bytes per second, formatted as `<N> B/s`.
///
/// `duration` is a rendered duration such as `1h2m3s`. A duration that is
/// zero, negative or unparseable yields `0 B/s`.
pub fn log_rate(duration: &str, size: u64) -> String {
    format!("{} B/s", bytes_per_sec(duration, size))
}

fn bytes_per_sec(duration: &str, size: u64) -> u64 {
    match parse_secs(duration) {
        Ok(secs) if secs > 0.0 => (size as f64 / secs) as u64,
        Ok(_) => 0,
        Err(err) => {
            trace!(%err, "unable to compute log rate");
            0
        }
    }
}
