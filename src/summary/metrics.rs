use crate::model::{Log, LogOwner};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, trace};

/// Line count and byte size of one log payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogMetrics {
    pub lines: u64,
    pub size: u64,
}

impl LogMetrics {
    pub fn of(data: &[u8]) -> Self {
        LogMetrics {
            lines: data.iter().filter(|&&byte| byte == b'\n').count() as u64,
            size: data.len() as u64,
        }
    }
}

/// Maps each step or service to its log entry.
///
/// A resource is expected to own at most one log per build. When the server
/// returns several entries for the same owner, the first one in list order is
/// used and the rest are ignored. Logs without an owner are skipped.
pub struct LogIndex<'a> {
    by_owner: HashMap<LogOwner, &'a Log>,
}

impl<'a> LogIndex<'a> {
    pub fn new(logs: &'a [Log]) -> Self {
        let mut by_owner = HashMap::with_capacity(logs.len());
        for log in logs {
            let Some(owner) = log.owner() else {
                trace!(log = log.id, "skipping log without owner");
                continue;
            };
            match by_owner.entry(owner) {
                Entry::Vacant(slot) => {
                    slot.insert(log);
                }
                Entry::Occupied(first) => {
                    debug!(?owner, kept = first.get().id, ignored = log.id, "duplicate log entry");
                }
            }
        }
        LogIndex { by_owner }
    }

    pub fn get(&self, owner: LogOwner) -> Option<&'a Log> {
        self.by_owner.get(&owner).copied()
    }

    /// Metrics for the log owned by `owner`, or zeroes when it has none.
    pub fn metrics(&self, owner: LogOwner) -> LogMetrics {
        self.get(owner)
            .map(|log| LogMetrics::of(&log.data))
            .unwrap_or_default()
    }
}

const SIZE_UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// Formats a byte count with SI (base 1000) units: `6 B`, `300 B`, `1.5 kB`,
/// `15 MB`.
pub fn human_size(bytes: u64) -> String {
    if bytes < 10 {
        return format!("{bytes} B");
    }

    let mut exponent = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1000.0 && exponent < SIZE_UNITS.len() - 1 {
        scaled /= 1000.0;
        exponent += 1;
    }

    let rounded = (scaled * 10.0 + 0.5).floor() / 10.0;
    if rounded < 10.0 {
        format!("{rounded:.1} {}", SIZE_UNITS[exponent])
    } else {
        format!("{rounded:.0} {}", SIZE_UNITS[exponent])
    }
}
