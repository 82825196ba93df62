//! slirc - console IRC client.

use slirc_client::config::{self, Config, LogFormat};
use slirc_client::{console, telemetry};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "client.toml".to_string());

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            telemetry::init(LogFormat::Text);
            error!(path = %config_path, error = %e, "Failed to load config");
            return Err(e.into());
        }
    };

    telemetry::init(config.log.format);

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        return Err(anyhow::anyhow!(
            "{} configuration error(s) in {config_path}",
            errors.len()
        ));
    }

    info!(
        server = %config.server.address,
        nick = %config.identity.nick,
        "Starting slirc"
    );

    console::run(config).await?;

    info!("Goodbye");
    Ok(())
}
