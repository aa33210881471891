//! cfg_loader - configuration check tool
//!
//! Loads `<CFG_PATH>/<NAME>.env` the way a service does at startup and prints
//! the result as JSON with the database password masked.
//!
//! Usage: cfg_loader [NAME]   (NAME defaults to `config`)

use cfg_loader::{logging, must_load};

const DEFAULT_CONFIG_NAME: &str = "config";

fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_NAME.to_string());

    let config = must_load(&name);
    tracing::info!("Service would bind to {}", config.bind_addr());

    println!("{}", serde_json::to_string_pretty(&config.redacted())?);

    Ok(())
}
