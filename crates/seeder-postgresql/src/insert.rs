//! Bulk insert contract and batched loading.

use crate::context::RunContext;
use crate::error::SeederError;
use crate::progress::ProgressTracker;
use async_trait::async_trait;
use seeder_core::{Row, TableSpec};
use tracing::debug;
use uuid::Uuid;

/// PostgreSQL accepts at most this many bind parameters per statement.
pub const MAX_BIND_PARAMETERS: usize = 65_535;

/// A store that can load rows of a described table.
#[async_trait]
pub trait BulkInserter: Send + Sync {
    /// Load `rows` through the store's bulk path and return the number of
    /// rows it acknowledged.
    async fn copy_rows(&self, table: &TableSpec, rows: &[Row]) -> Result<u64, SeederError>;

    /// Insert `rows` with a multi-row `INSERT ... RETURNING id` and return
    /// the ids in submission order. Only needed for store-assigned ids.
    async fn insert_returning_ids(
        &self,
        table: &TableSpec,
        rows: &[Row],
    ) -> Result<Vec<Uuid>, SeederError>;

    /// Load `rows` in one call, rejecting any acknowledged-count mismatch.
    async fn bulk_insert(&self, table: &TableSpec, rows: &[Row]) -> Result<u64, SeederError> {
        if rows.is_empty() {
            return Ok(0);
        }
        let expected = rows.len() as u64;
        let actual = self.copy_rows(table, rows).await?;
        if actual != expected {
            return Err(SeederError::CopyMismatch {
                table: table.name,
                expected,
                actual,
            });
        }
        Ok(actual)
    }
}

/// Load `rows` in consecutive chunks of at most `batch_size`.
///
/// Chunks run in order, each under `ctx`. The first failing chunk stops the
/// load and is reported with its row offset; chunks before it stay
/// committed. An empty `rows` is a no-op that leaves `progress` untouched.
pub async fn bulk_insert_batched<I>(
    inserter: &I,
    ctx: &RunContext,
    table: &TableSpec,
    rows: &[Row],
    batch_size: usize,
    mut progress: Option<&mut ProgressTracker>,
) -> Result<u64, SeederError>
where
    I: BulkInserter + ?Sized,
{
    if batch_size == 0 {
        return Err(SeederError::Config(format!(
            "batch size for '{}' must be greater than zero",
            table.name
        )));
    }
    if rows.is_empty() {
        return Ok(0);
    }

    let mut inserted = 0u64;
    for (index, batch) in rows.chunks(batch_size).enumerate() {
        let offset = (index * batch_size) as u64;
        let acknowledged = ctx
            .run(table.name, inserter.bulk_insert(table, batch))
            .await
            .map_err(|e| e.at_offset(table.name, offset))?;

        inserted += acknowledged;
        if let Some(progress) = progress.as_deref_mut() {
            progress.add(acknowledged);
        }
        debug!(
            table = table.name,
            offset,
            rows = acknowledged,
            "Batch committed"
        );
    }

    Ok(inserted)
}

/// Quote an identifier for PostgreSQL.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub(crate) fn column_list(table: &TableSpec) -> String {
    table
        .column_names()
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build `INSERT INTO t (...) VALUES ($1, ...), (...) RETURNING "id"` for
/// `row_count` rows of `table`.
pub fn insert_returning_sql(table: &TableSpec, row_count: usize) -> String {
    let width = table.width();
    let mut param_idx = 1;
    let mut placeholders: Vec<String> = Vec::with_capacity(row_count);

    for _ in 0..row_count {
        let row_placeholders: Vec<String> = (0..width)
            .map(|_| {
                let p = format!("${param_idx}");
                param_idx += 1;
                p
            })
            .collect();
        placeholders.push(format!("({})", row_placeholders.join(", ")));
    }

    format!(
        "INSERT INTO {} ({}) VALUES {} RETURNING \"id\"",
        quote_ident(table.name),
        column_list(table),
        placeholders.join(", ")
    )
}

/// Rows per `INSERT ... RETURNING` statement that stay within the bind
/// parameter limit.
pub fn rows_per_statement(table: &TableSpec) -> usize {
    (MAX_BIND_PARAMETERS / table.width().max(1)).max(1)
}

/// Inserter that acknowledges every row without storing anything.
///
/// Used for dry runs, which still exercise every generator and batch.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunInserter;

#[async_trait]
impl BulkInserter for DryRunInserter {
    async fn copy_rows(&self, _table: &TableSpec, rows: &[Row]) -> Result<u64, SeederError> {
        Ok(rows.len() as u64)
    }

    async fn insert_returning_ids(
        &self,
        table: &TableSpec,
        rows: &[Row],
    ) -> Result<Vec<Uuid>, SeederError> {
        rows.iter()
            .map(|row| {
                row.first().and_then(|v| v.as_uuid()).ok_or_else(|| {
                    SeederError::Config(format!("row for '{}' has no uuid id", table.name))
                })
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::Mutex;

    /// Records every call; can fail or under-acknowledge a chosen call.
    #[derive(Default)]
    pub struct RecordingInserter {
        pub calls: Mutex<Vec<(&'static str, usize)>>,
        pub fail_on_call: Option<usize>,
        pub short_on_call: Option<usize>,
    }

    impl RecordingInserter {
        pub fn calls(&self) -> Vec<(&'static str, usize)> {
            self.calls.lock().unwrap().clone()
        }

        pub fn sizes(&self) -> Vec<usize> {
            self.calls().into_iter().map(|(_, n)| n).collect()
        }

        pub fn rows_for(&self, table: &str) -> usize {
            self.calls()
                .into_iter()
                .filter(|(t, _)| *t == table)
                .map(|(_, n)| n)
                .sum()
        }
    }

    #[async_trait]
    impl BulkInserter for RecordingInserter {
        async fn copy_rows(&self, table: &TableSpec, rows: &[Row]) -> Result<u64, SeederError> {
            assert!(
                rows.iter().all(|r| r.len() == table.width()),
                "{table} row width"
            );
            let call = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((table.name, rows.len()));
                calls.len() - 1
            };
            if self.fail_on_call == Some(call) {
                return Err(SeederError::Config("injected failure".into()));
            }
            if self.short_on_call == Some(call) {
                return Ok(rows.len() as u64 - 1);
            }
            Ok(rows.len() as u64)
        }

        async fn insert_returning_ids(
            &self,
            table: &TableSpec,
            rows: &[Row],
        ) -> Result<Vec<Uuid>, SeederError> {
            DryRunInserter.insert_returning_ids(table, rows).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::RecordingInserter;
    use super::*;
    use seeder_core::ColumnSpec;
    use seeder_core::ColumnType;
    use tokio_test::{assert_err, assert_ok};

    const WIDGETS: TableSpec = TableSpec::new(
        "widgets",
        &[
            ColumnSpec::new("id", ColumnType::Uuid),
            ColumnSpec::new("name", ColumnType::Text),
        ],
    );

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| vec![Uuid::new_v4().into(), format!("w{i}").into()])
            .collect()
    }

    #[tokio::test]
    async fn test_batches_of_1000_1000_500() {
        let inserter = RecordingInserter::default();
        let mut progress = ProgressTracker::new();
        progress.start_table("widgets", 2500);

        let inserted = bulk_insert_batched(
            &inserter,
            &RunContext::new(),
            &WIDGETS,
            &rows(2500),
            1000,
            Some(&mut progress),
        )
        .await
        .unwrap();
        progress.finish();

        assert_eq!(inserted, 2500);
        assert_eq!(inserter.sizes(), vec![1000, 1000, 500]);
        assert_eq!(progress.tables()[0].rows, 2500);
        assert_eq!(progress.tables()[0].batches, 3);
    }

    #[tokio::test]
    async fn test_batch_size_covering_all_rows_is_one_call() {
        let inserter = RecordingInserter::default();
        let data = rows(42);
        let inserted = bulk_insert_batched(&inserter, &RunContext::new(), &WIDGETS, &data, 42, None)
            .await
            .unwrap();
        assert_eq!(inserted, 42);
        assert_eq!(inserter.sizes(), vec![42]);
    }

    #[tokio::test]
    async fn test_empty_rows_is_noop() {
        let inserter = RecordingInserter::default();
        let mut progress = ProgressTracker::new();
        progress.start_table("widgets", 0);

        let inserted = assert_ok!(
            bulk_insert_batched(
                &inserter,
                &RunContext::new(),
                &WIDGETS,
                &[],
                1000,
                Some(&mut progress)
            )
            .await
        );
        progress.finish();

        assert_eq!(inserted, 0);
        assert!(inserter.calls().is_empty());
        assert_eq!(progress.tables()[0].batches, 0);
    }

    #[tokio::test]
    async fn test_mismatch_reports_offset() {
        let inserter = RecordingInserter {
            short_on_call: Some(1),
            ..Default::default()
        };
        let err = bulk_insert_batched(
            &inserter,
            &RunContext::new(),
            &WIDGETS,
            &rows(2500),
            1000,
            None,
        )
        .await
        .unwrap_err();

        assert_eq!(err.batch_offset(), Some(1000));
        assert!(matches!(
            err.root(),
            SeederError::CopyMismatch {
                table: "widgets",
                expected: 1000,
                actual: 999
            }
        ));
        // fail fast: the third chunk is never sent
        assert_eq!(inserter.sizes(), vec![1000, 1000]);
    }

    #[tokio::test]
    async fn test_failure_stops_at_first_bad_chunk() {
        let inserter = RecordingInserter {
            fail_on_call: Some(2),
            ..Default::default()
        };
        let err = bulk_insert_batched(&inserter, &RunContext::new(), &WIDGETS, &rows(25), 10, None)
            .await
            .unwrap_err();
        assert_eq!(err.batch_offset(), Some(20));
        assert_eq!(inserter.sizes(), vec![10, 10, 5]);
    }

    #[tokio::test]
    async fn test_zero_batch_size_rejected() {
        let inserter = RecordingInserter::default();
        let result =
            bulk_insert_batched(&inserter, &RunContext::new(), &WIDGETS, &rows(3), 0, None).await;
        assert!(matches!(assert_err!(result), SeederError::Config(_)));
    }

    #[tokio::test]
    async fn test_cancelled_context_sends_nothing() {
        let inserter = RecordingInserter::default();
        let ctx = RunContext::new();
        ctx.cancel();
        let err = bulk_insert_batched(&inserter, &ctx, &WIDGETS, &rows(3), 2, None)
            .await
            .unwrap_err();
        assert!(matches!(err, SeederError::Cancelled { table: "widgets" }));
        assert!(inserter.calls().is_empty());
    }

    #[test]
    fn test_insert_returning_sql() {
        assert_eq!(
            insert_returning_sql(&WIDGETS, 2),
            "INSERT INTO \"widgets\" (\"id\", \"name\") VALUES ($1, $2), ($3, $4) RETURNING \"id\""
        );
        assert_eq!(rows_per_statement(&WIDGETS), 32_767);
    }

    #[tokio::test]
    async fn test_dry_run_returns_client_ids() {
        let data = rows(3);
        let ids = DryRunInserter
            .insert_returning_ids(&WIDGETS, &data)
            .await
            .unwrap();
        let expected: Vec<Uuid> = data.iter().map(|r| r[0].as_uuid().unwrap()).collect();
        assert_eq!(ids, expected);
    }
}
