//! Synthetic data generator for bench-seeder.
//!
//! This crate produces the rows for every seeded table. Generators are pure:
//! they read and extend an [`IdMap`] and draw from a seeded [`GenContext`],
//! but never talk to a database. The same seed, pinned clock and config
//! reproduce the same dataset.
//!
//! # Architecture
//!
//! ```text
//! SeedConfig ──► GenContext (StdRng + now)
//!                     │
//!                     ▼
//! ┌──────────────────────────────────────┐
//! │  generators::{master, products, ...} │──► Vec<Row> per TableSpec
//! └──────────────────┬───────────────────┘
//!                    │ publish / pick
//!                    ▼
//!               IdMap (append-only id pools)
//! ```
//!
//! Foreign keys are always drawn from ids that were published earlier in the
//! run, so rows can be bulk-loaded in phase order without reading anything
//! back from the store.
//!
//! # Example
//!
//! ```rust
//! use seeder_generator::generators::master::generate_categories;
//! use seeder_generator::{GenContext, IdMap};
//!
//! let mut ctx = GenContext::from_seed(42);
//! let mut ids = IdMap::new();
//! let rows = generate_categories(&mut ctx, &mut ids, 10, 0.2);
//! assert_eq!(rows.len(), 10);
//! assert_eq!(ids.categories().len(), 10);
//! ```

pub mod chunked;
pub mod context;
pub mod error;
pub mod generators;
pub mod id_map;
pub mod tables;

// Re-exports for convenience
pub use chunked::ChunkedProducer;
pub use context::GenContext;
pub use error::GeneratorError;
pub use id_map::{EntityKind, IdMap, OrderKind};
