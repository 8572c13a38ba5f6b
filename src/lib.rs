pub mod cli;
pub mod core;
pub mod dispatcher;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::messages::Messages;
use crate::core::session::UserId;
use crate::dispatcher::Dispatcher;
use crate::providers::OpenErApiProvider;
use crate::store::MemorySessionStore;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Rates,
    Chat { user_id: UserId },
}

/// Wires the rate provider, session store and locale from `config`.
pub fn build_dispatcher(config: &AppConfig) -> Result<Dispatcher> {
    let provider = OpenErApiProvider::new(config.rates_base_url())?;
    let sessions = Arc::new(MemorySessionStore::with_ttl(config.session_ttl()));

    Ok(Dispatcher::new(
        Arc::new(provider),
        sessions,
        Messages::for_locale(config.locale),
    ))
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("ratebot starting...");
    let config = load_config(config_path)?;

    match command {
        AppCommand::Rates => {
            let provider = OpenErApiProvider::new(config.rates_base_url())?;
            cli::rates::run(&provider).await
        }
        AppCommand::Chat { user_id } => {
            let dispatcher = build_dispatcher(&config)?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            cli::chat::run(&dispatcher, user_id, stdin, &mut stdout).await
        }
    }
}
