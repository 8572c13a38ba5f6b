use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use ratebot::core::log::init_logging;
use ratebot::core::session::UserId;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display today's exchange rates
    Rates,
    /// Talk to the bot from the terminal
    Chat {
        /// User id the console session acts as
        #[arg(short, long, default_value_t = 1)]
        user_id: UserId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let command = match cli.command {
        Some(Commands::Setup) => return ratebot::cli::setup::setup(),
        Some(Commands::Rates) => ratebot::AppCommand::Rates,
        Some(Commands::Chat { user_id }) => ratebot::AppCommand::Chat { user_id },
        None => {
            Cli::command().print_help()?;
            return Ok(());
        }
    };

    let result = ratebot::run_command(command, cli.config_path.as_deref()).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
