//! Error types for the PostgreSQL seeder.

use crate::seeder::Phase;
use seeder_generator::GeneratorError;
use thiserror::Error;

/// Errors that can occur while seeding PostgreSQL.
#[derive(Error, Debug)]
pub enum SeederError {
    /// A generator could not produce valid rows.
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// The store acknowledged a different number of rows than were sent.
    #[error("Copy into '{table}' acknowledged {actual} rows, expected {expected}")]
    CopyMismatch {
        table: &'static str,
        expected: u64,
        actual: u64,
    },

    /// A batch failed; earlier batches of the same table stay committed.
    #[error("Batch at row offset {offset} of '{table}' failed")]
    Batch {
        table: &'static str,
        offset: u64,
        #[source]
        source: Box<SeederError>,
    },

    /// Acquiring or using the connection failed while loading a table.
    #[error("Connection error while loading '{table}'")]
    Connection {
        table: &'static str,
        #[source]
        source: tokio_postgres::Error,
    },

    /// PostgreSQL connection or query error outside a table load.
    #[error("PostgreSQL error: {0}")]
    PostgreSQL(#[from] tokio_postgres::Error),

    /// The run was cancelled while loading a table.
    #[error("Cancelled while loading '{table}'")]
    Cancelled { table: &'static str },

    /// The run deadline passed while loading a table.
    #[error("Deadline exceeded while loading '{table}'")]
    DeadlineExceeded { table: &'static str },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A seeding phase failed; later phases were not run.
    #[error("Phase '{phase}' failed")]
    Phase {
        phase: Phase,
        #[source]
        source: Box<SeederError>,
    },
}

impl SeederError {
    /// Attach the failing batch offset, leaving cancellation untouched.
    pub(crate) fn at_offset(self, table: &'static str, offset: u64) -> Self {
        match self {
            SeederError::Cancelled { .. } | SeederError::DeadlineExceeded { .. } => self,
            other => SeederError::Batch {
                table,
                offset,
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, past phase and batch wrappers.
    pub fn root(&self) -> &SeederError {
        match self {
            SeederError::Phase { source, .. } | SeederError::Batch { source, .. } => source.root(),
            other => other,
        }
    }

    /// Row offset of the failing batch, if a batch failed.
    pub fn batch_offset(&self) -> Option<u64> {
        match self {
            SeederError::Batch { offset, .. } => Some(*offset),
            SeederError::Phase { source, .. } => source.batch_offset(),
            _ => None,
        }
    }

    /// Whether the run stopped because of cancellation or its deadline.
    pub fn is_interrupted(&self) -> bool {
        matches!(
            self.root(),
            SeederError::Cancelled { .. } | SeederError::DeadlineExceeded { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_wrapping() {
        let err = SeederError::CopyMismatch {
            table: "customers",
            expected: 10,
            actual: 9,
        }
        .at_offset("customers", 2000);
        let err = SeederError::Phase {
            phase: Phase::Customers,
            source: Box::new(err),
        };

        assert_eq!(err.batch_offset(), Some(2000));
        assert!(matches!(err.root(), SeederError::CopyMismatch { actual: 9, .. }));
        assert!(!err.is_interrupted());
    }

    #[test]
    fn test_cancellation_is_not_wrapped() {
        let err = SeederError::Cancelled { table: "products" }.at_offset("products", 5);
        assert!(matches!(err, SeederError::Cancelled { .. }));
        assert!(err.is_interrupted());
        assert_eq!(err.batch_offset(), None);
    }
}
