//! Core types for the bench-seeder bulk data loader.
//!
//! This crate provides the vocabulary shared by the generator and the
//! store-specific inserters:
//!
//! - [`SqlValue`] - A single column value in a generated row
//! - [`TableSpec`] - Static description of a target table and its columns
//! - [`SeedConfig`] - Target record counts and fan-out ranges, with presets
//!
//! # Architecture
//!
//! ```text
//! seeder-core (this crate)
//!    │
//!    ├─── seeder-generator   (produces Rows for each TableSpec)
//!    │
//!    └─── seeder-postgresql  (maps SqlValue/ColumnType to tokio-postgres)
//! ```
//!
//! # Example
//!
//! ```rust
//! use seeder_core::{Preset, SeedConfig};
//!
//! let config = SeedConfig::from_yaml_with_base("products: 250", Preset::Small.config()).unwrap();
//! assert_eq!(config.products, 250);
//! assert_eq!(config.customers, 10_000);
//! ```

pub mod config;
pub mod schema;
pub mod values;

// Re-exports for convenience
pub use config::{ConfigError, FanOut, Preset, SeedConfig};
pub use schema::{ColumnSpec, ColumnType, TableSpec};
pub use values::{Row, SqlValue};
