mod app;
mod capture;
mod config;
mod hooks;
mod messages;
mod reveal;
mod session;
mod shortcuts;

use app::App;
use config::Config;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting slate video capture daemon");

    // Load configuration
    let config = Config::load()?;
    config.validate()?;

    let app = App::new(config)?;
    app.run().await
}
