use async_trait::async_trait;

/// Blocking yes/no prompt shown before destructive operations.
///
/// Blocks the user, not the runtime: other in-flight requests keep running
/// while an implementation waits for an answer.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}
