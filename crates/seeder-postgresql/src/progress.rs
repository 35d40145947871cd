//! Per-table load progress and metrics.
//!
//! Progress is purely observational: it logs through `tracing` and keeps
//! [`TableMetrics`] for the final report, and never influences what is
//! inserted. Every call is a no-op when no table is active.

use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default minimum interval between progress log lines for one table.
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(2);

/// Metrics for one tracked table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableMetrics {
    /// Table name.
    pub table: &'static str,
    /// Number of rows announced when tracking started.
    pub expected: u64,
    /// Number of rows inserted.
    pub rows: u64,
    /// Number of acknowledged batches.
    pub batches: u64,
    /// Time from start to finish.
    pub duration: Duration,
}

impl TableMetrics {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.rows as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

#[derive(Debug)]
struct ActiveTable {
    name: &'static str,
    total: u64,
    done: u64,
    batches: u64,
    started: Instant,
    last_report: Instant,
}

/// Tracks one table at a time plus the whole run's elapsed time.
#[derive(Debug)]
pub struct ProgressTracker {
    started: Instant,
    report_interval: Duration,
    active: Option<ActiveTable>,
    finished: Vec<TableMetrics>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            report_interval: DEFAULT_REPORT_INTERVAL,
            active: None,
            finished: Vec::new(),
        }
    }

    /// Set the minimum interval between progress lines.
    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    /// Begin tracking `name`; a table still active is finished first.
    pub fn start_table(&mut self, name: &'static str, total: u64) {
        if self.active.is_some() {
            self.finish();
        }
        let now = Instant::now();
        info!(table = name, total, "Seeding table");
        self.active = Some(ActiveTable {
            name,
            total,
            done: 0,
            batches: 0,
            started: now,
            last_report: now,
        });
    }

    /// Advance the active table by `rows` acknowledged rows.
    pub fn add(&mut self, rows: u64) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        active.done += rows;
        active.batches += 1;

        if active.last_report.elapsed() >= self.report_interval {
            active.last_report = Instant::now();
            info!(
                table = active.name,
                done = active.done,
                total = active.total,
                "{:.1}% loaded",
                percent(active.done, active.total)
            );
        } else {
            debug!(
                table = active.name,
                done = active.done,
                total = active.total,
                "Batch loaded"
            );
        }
    }

    /// Close out the active table and record its metrics.
    pub fn finish(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        let metrics = TableMetrics {
            table: active.name,
            expected: active.total,
            rows: active.done,
            batches: active.batches,
            duration: active.started.elapsed(),
        };
        info!(
            table = metrics.table,
            rows = metrics.rows,
            elapsed = %format_duration(metrics.duration),
            "Seeded table ({:.0} rows/sec)",
            metrics.rows_per_second()
        );
        self.finished.push(metrics);
    }

    /// Name of the table being tracked, if any.
    pub fn active_table(&self) -> Option<&'static str> {
        self.active.as_ref().map(|a| a.name)
    }

    /// Time since the tracker was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Metrics for every finished table, in finish order.
    pub fn tables(&self) -> &[TableMetrics] {
        &self.finished
    }

    pub fn into_tables(self) -> Vec<TableMetrics> {
        self.finished
    }
}

fn percent(done: u64, total: u64) -> f64 {
    if total == 0 {
        100.0
    } else {
        (done as f64 / total as f64 * 100.0).min(100.0)
    }
}

/// Compact human duration: seconds below a minute, then minutes, then hours.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{secs:.1}s")
    } else if secs < 3600.0 {
        format!("{:.1}m", secs / 60.0)
    } else {
        format!("{:.1}h", secs / 3600.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calls_without_active_table_are_noops() {
        let mut tracker = ProgressTracker::new();
        tracker.add(10);
        tracker.finish();
        assert!(tracker.tables().is_empty());
        assert_eq!(tracker.active_table(), None);
    }

    #[test]
    fn test_tracks_rows_and_batches() {
        let mut tracker = ProgressTracker::new().with_report_interval(Duration::ZERO);
        tracker.start_table("customers", 2500);
        tracker.add(1000);
        tracker.add(1000);
        tracker.add(500);
        tracker.finish();

        let metrics = &tracker.tables()[0];
        assert_eq!(metrics.table, "customers");
        assert_eq!(metrics.rows, 2500);
        assert_eq!(metrics.batches, 3);
        assert_eq!(metrics.expected, 2500);
    }

    #[test]
    fn test_starting_new_table_finishes_previous() {
        let mut tracker = ProgressTracker::new();
        tracker.start_table("categories", 10);
        tracker.add(10);
        tracker.start_table("suppliers", 5);
        assert_eq!(tracker.active_table(), Some("suppliers"));
        assert_eq!(tracker.tables().len(), 1);
    }

    #[test]
    fn test_metrics_rate() {
        let metrics = TableMetrics {
            table: "products",
            expected: 1000,
            rows: 1000,
            batches: 10,
            duration: Duration::from_secs(10),
        };
        assert_eq!(metrics.rows_per_second(), 100.0);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1.5m");
        assert_eq!(format_duration(Duration::from_secs(5400)), "1.5h");
        assert_eq!(percent(5, 0), 100.0);
    }
}
