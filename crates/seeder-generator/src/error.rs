//! Error type for generator operations.

use crate::id_map::EntityKind;

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// A foreign-key pool needed for this table has no ids yet
    #[error("Cannot generate '{table}': no {pool} ids have been generated")]
    EmptyPool {
        table: &'static str,
        pool: EntityKind,
    },

    /// The requested generation cannot be expressed
    #[error("Invalid generator configuration: {0}")]
    InvalidConfig(String),
}
