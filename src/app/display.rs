//! Statistics rendering for the harness

use colored::*;
use flowqueue::queue::{QueueStats, SystemQueue};
use std::collections::BTreeMap;

const NAME_COLUMN_WIDTH: usize = 10;
const NUMBER_COLUMN_WIDTH: usize = 10;

/// Render one line per queue, with a header
pub fn render_stats_table(stats: &BTreeMap<String, QueueStats>, use_color: bool) -> String {
    let header = format!(
        "{:<name$} {:>num$} {:>num$} {:>num$} {:>num$} {:>num$} {:>num$} {:>num$}",
        "QUEUE",
        "SIZE",
        "IN",
        "OUT",
        "DROPPED",
        "IN/s",
        "OUT/s",
        "DROP/s",
        name = NAME_COLUMN_WIDTH,
        num = NUMBER_COLUMN_WIDTH,
    );

    let mut lines = vec![if use_color {
        header.cyan().to_string()
    } else {
        header
    }];

    for (name, queue_stats) in stats {
        let padded_name = format!("{:<width$}", name, width = NAME_COLUMN_WIDTH);
        let name_cell = match (use_color, SystemQueue::from_name(name)) {
            (false, _) => padded_name,
            (true, Some(_)) => padded_name.dimmed().to_string(),
            (true, None) => padded_name.blue().to_string(),
        };

        let dropped_cell = format!(
            "{:>width$}",
            queue_stats.dropped_total,
            width = NUMBER_COLUMN_WIDTH
        );
        let dropped_cell = if use_color && queue_stats.dropped_total > 0 {
            dropped_cell.yellow().to_string()
        } else {
            dropped_cell
        };

        lines.push(format!(
            "{} {:>num$} {:>num$} {:>num$} {} {:>num$.1} {:>num$.1} {:>num$.1}",
            name_cell,
            queue_stats.size,
            queue_stats.in_total,
            queue_stats.out_total,
            dropped_cell,
            queue_stats.in_rate,
            queue_stats.out_rate,
            queue_stats.dropped_rate,
            num = NUMBER_COLUMN_WIDTH,
        ));
    }

    lines.join("\n")
}

/// Render the statistics map as pretty JSON
pub fn render_stats_json(
    stats: &BTreeMap<String, QueueStats>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(stats)
}

/// Single log line summarising a queue
pub fn summary_line(name: &str, stats: &QueueStats) -> String {
    format!(
        "{}: size={} in={} ({:.1}/s) out={} ({:.1}/s) dropped={} ({:.1}/s)",
        name,
        stats.size,
        stats.in_total,
        stats.in_rate,
        stats.out_total,
        stats.out_rate,
        stats.dropped_total,
        stats.dropped_rate
    )
}
