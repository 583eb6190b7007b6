//! Build summary: per-resource log metrics rendered as a text table.
//!
//! The summary works entirely on data that has already been fetched and never
//! fails; missing logs or timestamps show up as zero-valued cells.

pub mod duration;
pub mod metrics;
pub mod rate;
pub mod rows;

use crate::model::{Build, Log, Service, Step};
use comfy_table::presets::NOTHING;
use comfy_table::{ColumnConstraint, ContentArrangement, Table, Width};
use metrics::LogIndex;
use rows::{Row, Totals, build_row, resource_rows};
use tracing::debug;

pub use duration::Elapsed;
pub use metrics::{LogMetrics, human_size};
pub use rate::log_rate;

pub const HEADER: [&str; 8] = [
    "TYPE",
    "NAME",
    "NUMBER",
    "STATUS",
    "DURATION",
    "LOG LINES",
    "LOG SIZE",
    "LOG RATE",
];

const SEPARATOR: [&str; 8] = [
    "----------",
    "--------------------",
    "----------",
    "----------",
    "----------",
    "----------",
    "---------------",
    "---------------",
];

pub const DEFAULT_MAX_COL_WIDTH: usize = 50;

/// Everything fetched for one build.
#[derive(Debug, Clone, Copy)]
pub struct SummaryInput<'a> {
    pub build: &'a Build,
    pub logs: &'a [Log],
    pub services: &'a [Service],
    pub steps: &'a [Step],
}

/// The computed rows of a build summary, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub services: Vec<Row>,
    pub steps: Vec<Row>,
    pub build: Row,
    pub totals: Totals,
}

impl Summary {
    /// Computes every row. `now` (unix seconds) stands in for the finish
    /// time of anything still pending or running.
    pub fn compute(input: SummaryInput<'_>, now: i64) -> Self {
        debug!(
            build = input.build.number,
            logs = input.logs.len(),
            services = input.services.len(),
            steps = input.steps.len(),
            "creating build summary"
        );

        let index = LogIndex::new(input.logs);
        let (services, totals) = resource_rows(input.services, &index, now, Totals::default());
        let (steps, totals) = resource_rows(input.steps, &index, now, totals);
        let build = build_row(input.build, totals, now);

        Summary {
            services,
            steps,
            build,
            totals,
        }
    }

    /// Renders the table: header, services, steps, separator, build total.
    /// Cells longer than `max_col_width` characters wrap onto extra lines;
    /// `0` leaves them on one line.
    pub fn render(&self, max_col_width: usize) -> String {
        let mut table = Table::new();
        table
            .load_preset(NOTHING)
            .set_content_arrangement(ContentArrangement::Disabled);

        table.add_row(HEADER);
        for row in self.services.iter().chain(&self.steps) {
            table.add_row(row.cells());
        }
        table.add_row(SEPARATOR);
        table.add_row(self.build.cells());

        // the upper boundary includes the right padding
        let limit = u16::try_from(max_col_width.saturating_add(2)).unwrap_or(u16::MAX);
        for column in table.column_iter_mut() {
            column.set_padding((0, 2));
            if max_col_width > 0 {
                column.set_constraint(ColumnConstraint::UpperBoundary(Width::Fixed(limit)));
            }
        }

        table.to_string()
    }
}

/// Convenience for computing and rendering in one go.
pub fn render(input: SummaryInput<'_>, now: i64, max_col_width: usize) -> String {
    Summary::compute(input, now).render(max_col_width)
}
