use std::io::Write;
use std::sync::Arc;
use async_trait::async_trait;
use tokio::io::{BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::warn;

use resource_cell::Confirm;

pub type InputLines = Arc<Mutex<Lines<BufReader<Stdin>>>>;

/// Yes/no prompt answered on the console's own input stream.
pub struct StdinConfirm {
    input: InputLines,
}

impl StdinConfirm {
    pub fn new(input: InputLines) -> Self {
        Self { input }
    }
}

#[async_trait]
impl Confirm for StdinConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        let _ = std::io::stdout().flush();

        match self.input.lock().await.next_line().await {
            Ok(Some(answer)) => is_yes(&answer),
            Ok(None) => false,
            Err(e) => {
                warn!("Could not read confirmation: {}", e);
                false
            }
        }
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
