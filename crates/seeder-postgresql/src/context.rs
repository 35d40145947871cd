//! Ambient cancellation and deadline for a seeding run.

use crate::error::SeederError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation token and optional deadline every batch runs under.
///
/// Neither cancellation nor an expired deadline is retried: the in-flight
/// batch is abandoned and the error ends the run.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing token, e.g. one tripped by a signal handler.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Abort once `timeout` has elapsed from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// A clone of the run's token.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fail fast if the run is already cancelled or past its deadline.
    pub fn check(&self, table: &'static str) -> Result<(), SeederError> {
        if self.cancel.is_cancelled() {
            return Err(SeederError::Cancelled { table });
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(SeederError::DeadlineExceeded { table });
        }
        Ok(())
    }

    /// Run `operation` for `table`, abandoning it on cancellation or deadline.
    pub async fn run<T, F>(&self, table: &'static str, operation: F) -> Result<T, SeederError>
    where
        F: Future<Output = Result<T, SeederError>>,
    {
        self.check(table)?;

        let guarded = async {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(SeederError::Cancelled { table }),
                result = operation => result,
            }
        };

        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, guarded)
                .await
                .unwrap_or_else(|_| Err(SeederError::DeadlineExceeded { table })),
            None => guarded.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_passes_result_through() {
        let ctx = RunContext::new();
        let value = ctx.run("t", async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let ctx = RunContext::new();
        ctx.cancel();
        let result = ctx.run("products", async { Ok(()) }).await;
        assert!(matches!(
            result,
            Err(SeederError::Cancelled { table: "products" })
        ));
    }

    #[tokio::test]
    async fn test_cancel_mid_operation() {
        let ctx = RunContext::new();
        let token = ctx.cancellation_token();
        let result = ctx
            .run("orders", async move {
                token.cancel();
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(SeederError::Cancelled { .. })));
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let ctx = RunContext::new().with_timeout(Duration::from_millis(50));
        let result = ctx
            .run("inventory", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;
        assert!(matches!(
            result,
            Err(SeederError::DeadlineExceeded { table: "inventory" })
        ));
        assert!(ctx.check("inventory").is_err());
    }
}
