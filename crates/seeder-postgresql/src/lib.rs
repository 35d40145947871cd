//! PostgreSQL bulk loader and seeding orchestrator for bench-seeder.
//!
//! This crate takes the rows produced by `seeder-generator` and loads them
//! into PostgreSQL through the binary `COPY` protocol:
//!
//! - [`BulkInserter`] - The store seam; [`PgCopyInserter`] is the real one,
//!   [`DryRunInserter`] acknowledges rows without storing them
//! - [`bulk_insert_batched`] - Consecutive fail-fast batches under a [`RunContext`]
//! - [`ProgressTracker`] - Per-table progress through `tracing`
//! - [`Seeder`] - Runs the six seeding phases in dependency order
//!
//! # Example
//!
//! ```rust,ignore
//! use seeder_core::Preset;
//! use seeder_postgresql::{PgCopyInserter, RunContext, Seeder};
//!
//! let inserter = PgCopyInserter::connect("host=localhost user=bananas_user dbname=bananas_dev").await?;
//! let mut seeder = Seeder::new(inserter, Preset::Small.config())?;
//! let report = seeder.seed_all(&RunContext::new()).await?;
//! println!("seeded {} rows", report.total_rows());
//! ```

pub mod args;
pub mod context;
pub mod copy;
pub mod error;
pub mod insert;
pub mod progress;
pub mod seeder;

pub use args::{CommonSeedArgs, ConnectionArgs, PostgreSQLSeedArgs};
pub use context::RunContext;
pub use copy::{connect_client, copy_sql, needs_seeding, parse_connection_config, PgCopyInserter};
pub use error::SeederError;
pub use insert::{bulk_insert_batched, BulkInserter, DryRunInserter};
pub use progress::{ProgressTracker, TableMetrics};
pub use seeder::{Phase, SeedReport, Seeder};
