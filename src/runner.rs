//! Batched processing of an accepted import: the ticker that drives an
//! [`ImportJob`] from 0 to a terminal status.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{error, info};

use crate::config::ProcessingConfig;
use crate::error::ImportError;
use crate::history::ImportHistory;
use crate::models::{ColumnMapping, ImportJob, JobStatus, ParsedTable, Severity};

/// One accepted row, projected onto the mapped catalog fields in mapping order.
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub values: Vec<(String, String)>,
}

/// Destination for accepted rows. A sink error fails the whole job with
/// partial counts; there is no retry policy.
pub trait RowSink: Send {
    fn write(&mut self, record: &ProductRecord) -> Result<(), ImportError>;
    fn flush(&mut self) -> Result<(), ImportError> {
        Ok(())
    }
}

/// Discards rows; used when the caller only wants the counters.
pub struct NoopSink;

impl RowSink for NoopSink {
    fn write(&mut self, _record: &ProductRecord) -> Result<(), ImportError> {
        Ok(())
    }
}

/// Fails after a fixed number of accepted rows. Drives the `Failed` terminal
/// path, which clean data can never reach through the live pipeline.
pub struct FaultSink {
    fail_after: usize,
    written: usize,
}

impl FaultSink {
    pub fn new(fail_after: usize) -> Self {
        Self {
            fail_after,
            written: 0,
        }
    }
}

impl RowSink for FaultSink {
    fn write(&mut self, _record: &ProductRecord) -> Result<(), ImportError> {
        if self.written >= self.fail_after {
            return Err(ImportError::Sink("injected fault".into()));
        }
        self.written += 1;
        Ok(())
    }
}

/// Everything a processing run needs, detached from the wizard so the wizard
/// can be reset while the run is in flight.
pub struct JobContext {
    pub job: Arc<Mutex<ImportJob>>,
    pub history: Arc<Mutex<ImportHistory>>,
    pub generation: Arc<AtomicU64>,
    pub run_generation: u64,
    pub table: ParsedTable,
    pub mappings: Vec<ColumnMapping>,
    pub cfg: ProcessingConfig,
}

/// Field keys of the mapped columns, in mapping order. This is the header of
/// any row-level export of the run.
pub fn mapped_field_keys(mappings: &[ColumnMapping]) -> Vec<String> {
    mappings
        .iter()
        .filter_map(|m| m.target_field.clone())
        .collect()
}

fn build_record(table: &ParsedTable, row_idx: usize, mappings: &[ColumnMapping]) -> ProductRecord {
    let values = mappings
        .iter()
        .enumerate()
        .filter_map(|(col_idx, m)| {
            m.target_field
                .as_ref()
                .map(|field| (field.clone(), table.cell(row_idx, col_idx).to_string()))
        })
        .collect();
    ProductRecord { values }
}

/// Process the table in row batches on a fixed-interval ticker. Progress is
/// monotonically non-decreasing and reaches exactly 100 only on completion;
/// a stale run (wizard reset bumped the generation) stops without mutating
/// the job or the history.
pub async fn run_job(ctx: JobContext, mut sink: Box<dyn RowSink>) {
    let total = ctx.table.row_count();
    // 0-based data row indexes carrying at least one error-severity issue;
    // those rows are counted but never handed to the sink.
    let error_row_set: HashSet<usize> = {
        let job = ctx.job.lock().expect("job lock poisoned");
        job.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .map(|i| i.row.saturating_sub(2))
            .collect()
    };

    let mut interval = tokio::time::interval(Duration::from_millis(ctx.cfg.tick_ms));
    let mut cursor = 0usize;
    loop {
        interval.tick().await;
        if stale(&ctx) {
            return;
        }

        let end = (cursor + ctx.cfg.rows_per_tick).min(total);
        for row_idx in cursor..end {
            if error_row_set.contains(&row_idx) {
                continue;
            }
            let record = build_record(&ctx.table, row_idx, &ctx.mappings);
            if let Err(e) = sink.write(&record) {
                fail_job(&ctx, row_idx, &e);
                return;
            }
        }
        cursor = end;

        if stale(&ctx) {
            return;
        }
        if cursor >= total {
            if let Err(e) = sink.flush() {
                fail_job(&ctx, cursor, &e);
                return;
            }
            complete_job(&ctx, total);
            return;
        }
        let mut job = ctx.job.lock().expect("job lock poisoned");
        job.processed_rows = cursor;
        job.progress = ((cursor * 100) / total) as u8;
        job.success_rows = cursor.saturating_sub(job.error_rows);
        info!(
            "[import] progress: {}% ({} / {} rows)",
            job.progress, job.processed_rows, job.total_rows
        );
    }
}

fn stale(ctx: &JobContext) -> bool {
    ctx.generation.load(Ordering::SeqCst) != ctx.run_generation
}

fn complete_job(ctx: &JobContext, total: usize) {
    let finished = {
        let mut job = ctx.job.lock().expect("job lock poisoned");
        job.status = JobStatus::Completed;
        job.progress = 100;
        job.processed_rows = total;
        job.success_rows = total.saturating_sub(job.error_rows);
        job.completed_at = Some(chrono::Utc::now());
        info!(
            "[import] completed: {} rows imported, {} rows with errors",
            job.success_rows, job.error_rows
        );
        job.clone()
    };
    ctx.history
        .lock()
        .expect("history lock poisoned")
        .prepend(finished);
}

fn fail_job(ctx: &JobContext, processed: usize, cause: &ImportError) {
    let finished = {
        let mut job = ctx.job.lock().expect("job lock poisoned");
        let total = job.total_rows;
        job.status = JobStatus::Failed;
        job.processed_rows = processed;
        job.progress = if total == 0 {
            0
        } else {
            ((processed * 100) / total).min(99) as u8
        };
        job.success_rows = processed.saturating_sub(job.error_rows);
        job.completed_at = Some(chrono::Utc::now());
        error!("[import] failed after {} rows: {}", processed, cause);
        job.clone()
    };
    ctx.history
        .lock()
        .expect("history lock poisoned")
        .prepend(finished);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::build_mappings;

    fn demo_table(rows: usize) -> ParsedTable {
        let header = vec!["Nombre".to_string(), "Precio".to_string()];
        let data = (0..rows)
            .map(|i| vec![format!("Producto {i}"), format!("{}.99", i + 1)])
            .collect();
        ParsedTable::new(header, data)
    }

    fn context(rows: usize, cfg: ProcessingConfig) -> JobContext {
        let table = demo_table(rows);
        let mappings = build_mappings(table.header());
        let job = ImportJob::new("demo.csv".into(), rows, Vec::new());
        JobContext {
            job: Arc::new(Mutex::new(job)),
            history: Arc::new(Mutex::new(ImportHistory::new())),
            generation: Arc::new(AtomicU64::new(0)),
            run_generation: 0,
            table,
            mappings,
            cfg,
        }
    }

    fn fast_cfg(rows_per_tick: usize) -> ProcessingConfig {
        ProcessingConfig {
            tick_ms: 1,
            rows_per_tick,
        }
    }

    #[tokio::test]
    async fn completes_with_consistent_counters() {
        let ctx = context(7, fast_cfg(3));
        let job_handle = ctx.job.clone();
        let history = ctx.history.clone();
        run_job(ctx, Box::new(NoopSink)).await;

        let job = job_handle.lock().unwrap().clone();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress, 100);
        assert_eq!(job.processed_rows, 7);
        assert_eq!(job.success_rows + job.error_rows, job.total_rows);
        assert!(job.completed_at.is_some());
        let history = history.lock().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.jobs()[0].id, job.id);
    }

    #[tokio::test]
    async fn empty_table_completes_immediately() {
        let ctx = context(0, fast_cfg(10));
        let job_handle = ctx.job.clone();
        run_job(ctx, Box::new(NoopSink)).await;
        let job = job_handle.lock().unwrap().clone();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress, 100);
        assert_eq!(job.processed_rows, 0);
    }

    #[tokio::test]
    async fn sink_error_fails_the_job_with_partial_counts() {
        let ctx = context(10, fast_cfg(2));
        let job_handle = ctx.job.clone();
        let history = ctx.history.clone();
        run_job(ctx, Box::new(FaultSink::new(5))).await;

        let job = job_handle.lock().unwrap().clone();
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.progress < 100);
        assert!(job.processed_rows < job.total_rows);
        assert!(job.completed_at.is_some());
        assert_eq!(history.lock().unwrap().jobs()[0].status, JobStatus::Failed);
    }

    #[tokio::test]
    async fn stale_generation_leaves_job_untouched() {
        let mut ctx = context(5, fast_cfg(2));
        ctx.run_generation = 0;
        ctx.generation.store(1, Ordering::SeqCst);
        let job_handle = ctx.job.clone();
        let history = ctx.history.clone();
        let before = job_handle.lock().unwrap().clone();
        run_job(ctx, Box::new(NoopSink)).await;

        let after = job_handle.lock().unwrap().clone();
        assert_eq!(after.status, before.status);
        assert_eq!(after.processed_rows, before.processed_rows);
        assert_eq!(after.progress, before.progress);
        assert!(history.lock().unwrap().is_empty());
    }

    #[test]
    fn record_projection_follows_mapping_order() {
        let table = demo_table(1);
        let mappings = build_mappings(table.header());
        let record = build_record(&table, 0, &mappings);
        assert_eq!(
            record.values,
            vec![
                ("name".to_string(), "Producto 0".to_string()),
                ("price".to_string(), "1.99".to_string()),
            ]
        );
        assert_eq!(mapped_field_keys(&mappings), vec!["name", "price"]);
    }
}
