//! Operator interaction used by the pipelines

use async_trait::async_trait;
use std::io;
use std::time::Duration;

/// The two points where a pipeline waits on the operator
#[async_trait]
pub trait OperatorPrompt: Send + Sync {
    /// Give the operator `duration` to interrupt before `label` happens.
    async fn countdown(&self, label: &str, duration: Duration) -> io::Result<()>;

    /// Block until the operator acknowledges `message`.
    async fn confirm(&self, message: &str) -> io::Result<()>;
}

/// Never waits and confirms everything
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

#[async_trait]
impl OperatorPrompt for AutoConfirm {
    async fn countdown(&self, _label: &str, _duration: Duration) -> io::Result<()> {
        Ok(())
    }

    async fn confirm(&self, _message: &str) -> io::Result<()> {
        Ok(())
    }
}
