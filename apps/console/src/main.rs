use std::sync::Arc;
use dotenv::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod prompt;
mod router;
mod views;

use notification_cell::{NotificationChannel, NotificationSettings};
use resource_cell::Confirm;
use shared_api_client::ApiClient;
use shared_config::AppConfig;

use crate::prompt::StdinConfirm;
use crate::router::ConsoleRouter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Logs go to stderr so they do not interleave with the tables on stdout
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting HospitalConnect admin console");

    let config = AppConfig::from_env();
    info!("Using records API at {}", config.api_base_url);

    // One channel for the whole application, injected into every view
    let notifier = NotificationChannel::new(NotificationSettings::from(&config));
    router::spawn_toast_printer(&notifier);

    let input = Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()));
    let confirm: Arc<dyn Confirm> = Arc::new(StdinConfirm::new(input.clone()));

    let api = ApiClient::new(&config);
    let router = ConsoleRouter::new(&api, notifier, confirm);

    router.run(input).await
}
