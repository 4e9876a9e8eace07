mod api;
mod bootstrap;
mod chart;
mod config;
mod forms;
mod guard;
mod ledger;
mod logging;
mod models;
mod run;
mod session;
mod ui;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use tracing::info;

use crate::api::{ApiClient, HttpTransport};
use crate::config::Config;
use crate::session::{AppContext, SessionStore};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let proj_dirs = directories::ProjectDirs::from("com", "expensetui", "ExpenseTUI")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

    logging::init(data_dir)?;
    info!("Starting expensetui {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load(proj_dirs.config_dir())?;
    let transport = HttpTransport::new(&config.api_url, config.timeout())?;
    let store = SessionStore::open(data_dir)?;
    let mut ctx = AppContext::new(store, ApiClient::new(transport));
    ctx.restore();

    match args.len() {
        1 => run::as_tui(&mut ctx),
        _ => run::as_cli(&args, &mut ctx),
    }
}
