use super::duration::elapsed;
use super::metrics::{LogIndex, LogMetrics, human_size};
use super::rate::log_rate;
use crate::model::{Build, Resource};
use tracing::{debug, trace};

/// One line of the summary table, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub kind: String,
    pub name: String,
    pub number: String,
    pub status: String,
    pub duration: String,
    pub lines: String,
    pub size: String,
    pub rate: String,
}

impl Row {
    pub fn cells(&self) -> [&str; 8] {
        [
            &self.kind,
            &self.name,
            &self.number,
            &self.status,
            &self.duration,
            &self.lines,
            &self.size,
            &self.rate,
        ]
    }
}

/// Build-wide running totals of log lines and bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub lines: u64,
    pub size: u64,
}

impl Totals {
    #[must_use]
    pub fn add(self, metrics: LogMetrics) -> Totals {
        Totals {
            lines: self.lines + metrics.lines,
            size: self.size + metrics.size,
        }
    }
}

/// Display order: stable ascending sort by number, then reversed so the
/// highest number comes first.
pub fn display_order<R: Resource>(resources: &[R]) -> Vec<&R> {
    let mut ordered: Vec<&R> = resources.iter().collect();
    ordered.sort_by_key(|r| r.number());
    ordered.reverse();
    ordered
}

/// Produces a row per resource in display order and returns `totals` with
/// every resource's log metrics added.
pub fn resource_rows<R: Resource>(
    resources: &[R],
    index: &LogIndex<'_>,
    now: i64,
    totals: Totals,
) -> (Vec<Row>, Totals) {
    debug!(kind = R::KIND, count = resources.len(), "adding rows to build summary");

    let mut totals = totals;
    let rows = display_order(resources)
        .into_iter()
        .map(|resource| {
            trace!(kind = R::KIND, name = resource.name(), "adding row");

            let metrics = index.metrics(resource.owner());
            let duration = elapsed(resource, now).to_string();
            let rate = log_rate(&duration, metrics.size);
            totals = totals.add(metrics);

            Row {
                kind: R::KIND.to_string(),
                name: resource.name().to_string(),
                number: resource.number().to_string(),
                status: resource.status().to_string(),
                duration,
                lines: metrics.lines.to_string(),
                size: human_size(metrics.size),
                rate,
            }
        })
        .collect();

    (rows, totals)
}

/// The final row: the build's own runtime with the accumulated log totals.
pub fn build_row(build: &Build, totals: Totals, now: i64) -> Row {
    debug!(number = build.number, ?totals, "adding build row to build summary");

    let duration = elapsed(build, now).to_string();
    Row {
        kind: "build".to_string(),
        name: String::new(),
        number: build.number.to_string(),
        status: build.status.clone(),
        rate: log_rate(&duration, totals.size),
        duration,
        lines: totals.lines.to_string(),
        size: human_size(totals.size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Log, Service, Step};

    fn step(id: i64, number: i64, name: &str) -> Step {
        Step {
            id,
            number,
            name: name.to_string(),
            status: "success".to_string(),
            started: 0,
            finished: 10,
            ..Default::default()
        }
    }

    fn step_log(step_id: i64, size: usize) -> Log {
        Log {
            step_id: Some(step_id),
            data: vec![b'x'; size],
            ..Default::default()
        }
    }

    #[test]
    fn orders_highest_number_first() {
        let steps = vec![step(1, 3, "c"), step(2, 1, "a"), step(3, 2, "b")];
        let numbers: Vec<i64> = display_order(&steps).iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![3, 2, 1]);
    }

    #[test]
    fn ties_are_reversed_after_a_stable_sort() {
        let steps = vec![step(1, 1, "first"), step(2, 2, "other"), step(3, 1, "second")];
        let names: Vec<&str> = display_order(&steps).iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["other", "second", "first"]);
    }

    #[test]
    fn accumulates_sizes_across_rows() {
        let steps = vec![step(1, 1, "build"), step(2, 2, "test")];
        let logs = vec![step_log(1, 100), step_log(2, 200)];
        let index = LogIndex::new(&logs);

        let (rows, totals) = resource_rows(&steps, &index, 0, Totals::default());
        assert_eq!(totals, Totals { lines: 0, size: 300 });
        assert_eq!(rows[0].name, "test");
        assert_eq!(rows[0].size, "200 B");
        assert_eq!(rows[1].size, "100 B");

        let build = Build {
            number: 4,
            status: "success".to_string(),
            finished: 10,
            ..Default::default()
        };
        let row = build_row(&build, totals, 0);
        assert_eq!(row.size, "300 B");
        assert_eq!(row.rate, "30 B/s");
    }

    #[test]
    fn totals_thread_through_passes() {
        let services = vec![Service {
            id: 1,
            number: 1,
            name: "postgres".to_string(),
            ..Default::default()
        }];
        let logs = vec![Log {
            service_id: Some(1),
            data: b"ready\n".to_vec(),
            ..Default::default()
        }];
        let index = LogIndex::new(&logs);
        let start = Totals { lines: 2, size: 10 };

        let (rows, totals) = resource_rows(&services, &index, 0, start);
        assert_eq!(rows[0].kind, "service");
        assert_eq!(rows[0].lines, "1");
        assert_eq!(totals, Totals { lines: 3, size: 16 });
    }

    #[test]
    fn resources_without_logs_render_zero_metrics() {
        let steps = vec![step(1, 1, "clone")];
        let index = LogIndex::new(&[]);

        let (rows, totals) = resource_rows(&steps, &index, 0, Totals::default());
        assert_eq!(totals, Totals::default());
        assert_eq!(rows[0].lines, "0");
        assert_eq!(rows[0].size, "0 B");
        assert_eq!(rows[0].rate, "0 B/s");
        assert_eq!(rows[0].duration, "10s");
    }
}
