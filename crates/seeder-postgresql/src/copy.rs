//! PostgreSQL inserter using the binary `COPY ... FROM STDIN` protocol.

use crate::error::SeederError;
use crate::insert::{
    column_list, insert_returning_sql, quote_ident, rows_per_statement, BulkInserter,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use postgres_types::{ToSql, Type};
use rust_decimal::Decimal;
use seeder_core::{ColumnType, Row, SqlValue, TableSpec};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_postgres::binary_copy::BinaryCopyInWriter;
use tokio_postgres::config::SslMode;
use tokio_postgres::{Client, Config, NoTls};
use tracing::debug;
use uuid::Uuid;

/// PostgreSQL wire type for a column.
pub fn pg_type(column_type: ColumnType) -> Type {
    match column_type {
        ColumnType::Uuid => Type::UUID,
        ColumnType::Text => Type::TEXT,
        ColumnType::Bool => Type::BOOL,
        ColumnType::Int4 => Type::INT4,
        ColumnType::Int8 => Type::INT8,
        ColumnType::Numeric => Type::NUMERIC,
        ColumnType::TimestampTz => Type::TIMESTAMPTZ,
    }
}

/// Convert a row value to a boxed ToSql trait object.
///
/// The binary protocol needs NULLs typed by their column, so `Null` maps to
/// `None` of the column's Rust type.
fn to_boxed_sql(value: &SqlValue, column_type: ColumnType) -> Box<dyn ToSql + Sync + Send> {
    match value {
        SqlValue::Null => match column_type {
            ColumnType::Uuid => Box::new(None::<Uuid>),
            ColumnType::Text => Box::new(None::<String>),
            ColumnType::Bool => Box::new(None::<bool>),
            ColumnType::Int4 => Box::new(None::<i32>),
            ColumnType::Int8 => Box::new(None::<i64>),
            ColumnType::Numeric => Box::new(None::<Decimal>),
            ColumnType::TimestampTz => Box::new(None::<DateTime<Utc>>),
        },
        SqlValue::Bool(b) => Box::new(*b),
        SqlValue::Int32(i) => Box::new(*i),
        SqlValue::Int64(i) => Box::new(*i),
        SqlValue::Decimal(d) => Box::new(*d),
        SqlValue::Text(s) => Box::new(s.clone()),
        SqlValue::Uuid(u) => Box::new(*u),
        SqlValue::TimestampTz(ts) => Box::new(*ts),
    }
}

fn row_params(
    table: &TableSpec,
    row: &Row,
) -> Result<Vec<Box<dyn ToSql + Sync + Send>>, SeederError> {
    if row.len() != table.width() {
        return Err(SeederError::Config(format!(
            "row for '{}' has {} values, expected {}",
            table.name,
            row.len(),
            table.width()
        )));
    }
    Ok(row
        .iter()
        .zip(table.columns)
        .map(|(value, column)| to_boxed_sql(value, column.column_type))
        .collect())
}

/// `COPY "t" ("a", ...) FROM STDIN (FORMAT binary)` for `table`.
pub fn copy_sql(table: &TableSpec) -> String {
    format!(
        "COPY {} ({}) FROM STDIN (FORMAT binary)",
        quote_ident(table.name),
        column_list(table)
    )
}

/// Bulk inserter over one shared PostgreSQL client.
///
/// The client is locked for the duration of a single call and released
/// afterwards; no transaction spans more than one call.
#[derive(Clone)]
pub struct PgCopyInserter {
    client: Arc<Mutex<Client>>,
}

impl PgCopyInserter {
    /// Connect to PostgreSQL and verify the connection.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let inserter = PgCopyInserter::connect(
    ///     "host=localhost user=bananas_user password=bananas_pass dbname=bananas_dev",
    /// ).await?;
    /// ```
    pub async fn connect(connection_string: &str) -> Result<Self, SeederError> {
        let client = connect_client(connection_string).await?;
        Ok(Self::with_client(Arc::new(Mutex::new(client))))
    }

    /// Create an inserter over an existing client.
    pub fn with_client(client: Arc<Mutex<Client>>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> Arc<Mutex<Client>> {
        self.client.clone()
    }
}

/// Parse a connection string (URL or key/value form).
///
/// Connections are made without TLS, so only `sslmode` `disable` and
/// `prefer` are accepted; `prefer` then connects in plaintext.
pub fn parse_connection_config(connection_string: &str) -> Result<Config, SeederError> {
    let config: Config = connection_string.parse()?;
    match config.get_ssl_mode() {
        SslMode::Disable | SslMode::Prefer => Ok(config),
        mode => Err(SeederError::Config(format!(
            "sslmode {mode:?} needs TLS, which is not supported; use disable or prefer"
        ))),
    }
}

/// Open a client and spawn its connection task.
pub async fn connect_client(connection_string: &str) -> Result<Client, SeederError> {
    let config = parse_connection_config(connection_string)?;
    let (client, connection) = config.connect(NoTls).await?;

    // Spawn the connection task
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("PostgreSQL connection error: {}", e);
        }
    });

    // Test connection
    client.simple_query("SELECT 1").await?;
    Ok(client)
}

#[async_trait]
impl BulkInserter for PgCopyInserter {
    async fn copy_rows(&self, table: &TableSpec, rows: &[Row]) -> Result<u64, SeederError> {
        if rows.is_empty() {
            return Ok(0);
        }
        let types: Vec<Type> = table.column_types().into_iter().map(pg_type).collect();
        let connection_error = |source| SeederError::Connection {
            table: table.name,
            source,
        };

        let client = self.client.lock().await;
        let sink = client
            .copy_in(&copy_sql(table))
            .await
            .map_err(connection_error)?;
        let writer = BinaryCopyInWriter::new(sink, &types);
        futures::pin_mut!(writer);

        for row in rows {
            let params = row_params(table, row)?;
            let param_refs: Vec<&(dyn ToSql + Sync)> = params
                .iter()
                .map(|p| p.as_ref() as &(dyn ToSql + Sync))
                .collect();
            writer
                .as_mut()
                .write(&param_refs)
                .await
                .map_err(connection_error)?;
        }

        let copied = writer.finish().await.map_err(connection_error)?;
        drop(client); // Release lock

        debug!(table = table.name, rows = copied, "COPY finished");
        Ok(copied)
    }

    async fn insert_returning_ids(
        &self,
        table: &TableSpec,
        rows: &[Row],
    ) -> Result<Vec<Uuid>, SeederError> {
        let mut ids = Vec::with_capacity(rows.len());
        let client = self.client.lock().await;

        for statement_rows in rows.chunks(rows_per_statement(table)) {
            let sql = insert_returning_sql(table, statement_rows.len());
            let mut params: Vec<Box<dyn ToSql + Sync + Send>> =
                Vec::with_capacity(statement_rows.len() * table.width());
            for row in statement_rows {
                params.extend(row_params(table, row)?);
            }
            let param_refs: Vec<&(dyn ToSql + Sync)> = params
                .iter()
                .map(|p| p.as_ref() as &(dyn ToSql + Sync))
                .collect();

            let returned = client
                .query(&sql, &param_refs)
                .await
                .map_err(|source| SeederError::Connection {
                    table: table.name,
                    source,
                })?;
            for row in returned {
                ids.push(row.try_get::<_, Uuid>(0)?);
            }
        }

        Ok(ids)
    }
}

/// Whether `customers` still holds fewer than `target_customers` rows.
pub async fn needs_seeding(client: &Client, target_customers: u64) -> Result<bool, SeederError> {
    let row = client
        .query_one("SELECT COUNT(*) FROM \"customers\"", &[])
        .await?;
    let count: i64 = row.get(0);
    Ok((count.max(0) as u64) < target_customers)
}
