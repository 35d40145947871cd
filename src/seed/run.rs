//! Seed, estimate and check command runners.

use anyhow::Context;
use seeder_core::SeedConfig;
use seeder_postgresql::{
    connect_client, needs_seeding, CommonSeedArgs, ConnectionArgs, DryRunInserter,
    PgCopyInserter, PostgreSQLSeedArgs, RunContext, SeedReport, Seeder,
};
use tokio_util::sync::CancellationToken;

use super::mask_connection_password;
use crate::config::duration::parse_duration;

/// Seed PostgreSQL with the configured dataset.
///
/// `cancel` is tripped by the signal handler; a cancelled run returns an error.
pub async fn run_seed(
    args: PostgreSQLSeedArgs,
    cancel: CancellationToken,
) -> anyhow::Result<Option<SeedReport>> {
    let config = args
        .common
        .resolve_config()
        .context("Invalid seeding configuration")?;

    let mut ctx = RunContext::new().with_cancellation(cancel);
    if let Some(timeout) = &args.timeout {
        let timeout = parse_duration(timeout).context("Invalid --timeout")?;
        tracing::info!("Run will be aborted after {:?}", timeout);
        ctx = ctx.with_timeout(timeout);
    }

    let conn_str = args.connection.connection_string();
    let masked = mask_connection_password(&conn_str);

    if args.dry_run {
        tracing::info!(
            "[DRY-RUN] Would seed PostgreSQL with ~{} records (preset={}, seed={})",
            config.total_records_estimate(),
            args.common.preset,
            config.seed
        );
        tracing::info!("[DRY-RUN] Connection: {}", masked);

        let mut seeder = Seeder::new(DryRunInserter, config)?;
        let report = seeder.seed_all(&ctx).await?;
        log_report(&report);
        return Ok(Some(report));
    }

    tracing::info!("Connecting to {}", masked);
    let inserter = PgCopyInserter::connect(&conn_str)
        .await
        .with_context(|| format!("Failed to connect to {masked}"))?;

    if args.skip_if_seeded {
        let client = inserter.client();
        let client = client.lock().await;
        let needed = needs_seeding(&client, config.customers)
            .await
            .context("Failed to check existing data")?;
        if !needed {
            tracing::info!(
                "Database already holds at least {} customers, skipping seeding",
                config.customers
            );
            return Ok(None);
        }
    }

    let mut seeder = Seeder::new(inserter, config)?;
    let report = seeder.seed_all(&ctx).await?;
    log_report(&report);
    Ok(Some(report))
}

/// Print the estimated row count of every table.
pub fn run_estimate(common: &CommonSeedArgs) -> anyhow::Result<SeedConfig> {
    let config = common
        .resolve_config()
        .context("Invalid seeding configuration")?;

    println!(
        "Estimated records (preset={}, seed={}):",
        common.preset, config.seed
    );
    for (table, rows) in config.estimate_by_table() {
        println!("  {table:<26} {rows:>14}");
    }
    println!("  {:<26} {:>14}", "total", config.total_records_estimate());
    Ok(config)
}

/// Report whether the target database still needs seeding.
pub async fn run_check(
    connection: &ConnectionArgs,
    common: &CommonSeedArgs,
) -> anyhow::Result<bool> {
    let config = common
        .resolve_config()
        .context("Invalid seeding configuration")?;
    let conn_str = connection.connection_string();
    let masked = mask_connection_password(&conn_str);

    let client = connect_client(&conn_str)
        .await
        .with_context(|| format!("Failed to connect to {masked}"))?;
    let needed = needs_seeding(&client, config.customers)
        .await
        .context("Failed to check existing data")?;

    if needed {
        println!(
            "Database needs seeding (fewer than {} customers)",
            config.customers
        );
    } else {
        println!("Database is already seeded");
    }
    Ok(needed)
}

fn log_report(report: &SeedReport) {
    for metrics in &report.tables {
        tracing::info!(
            "  {}: {} rows in {} batches ({:.0} rows/sec)",
            metrics.table,
            metrics.rows,
            metrics.batches,
            metrics.rows_per_second()
        );
    }
    tracing::info!(
        "Seeded {} rows across {} tables in {:?}",
        report.total_rows(),
        report.rows_by_table.len(),
        report.elapsed
    );
}
