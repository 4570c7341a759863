//! recap - Summaries and main points from long transcripts
//!
//! Entry point for the recap CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use recap::cli::{Cli, Commands, ConfigCommand};
use recap::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        recap::cli::completions::print(shell);
        return Ok(());
    }

    let config_path = match cli.config {
        Some(path) => path,
        None => Settings::config_path()?,
    };

    // `config path` and `config init` must work even with a broken config file.
    if let Commands::Config(cmd @ (ConfigCommand::Path | ConfigCommand::Init { .. })) = cli.command
    {
        init_logging(cli.verbose, "info");
        return recap::cli::commands::config_command(&Settings::default(), &config_path, cmd);
    }

    // Load configuration only for runtime commands.
    dotenvy::dotenv().ok();
    let settings = Settings::load_from(&config_path)?;
    init_logging(cli.verbose, &settings.general.log_level);

    if config_path.exists() {
        tracing::debug!("Loaded configuration from {}", config_path.display());
    } else {
        tracing::info!("No config file found, using defaults");
    }

    match cli.command {
        Commands::Extract {
            input,
            output,
            stdout,
        } => {
            recap::cli::commands::extract(&settings, &input, output, stdout).await?;
        }
        Commands::Summarize { input } => {
            recap::cli::commands::summarize(&settings, &input).await?;
        }
        Commands::Points { input } => {
            recap::cli::commands::points(&settings, &input).await?;
        }
        Commands::Chunks {
            input,
            max_tokens,
            overlap,
        } => {
            recap::cli::commands::show_chunks(&settings, &input, max_tokens, overlap)?;
        }
        Commands::Config(cmd) => {
            recap::cli::commands::config_command(&settings, &config_path, cmd)?;
        }
        Commands::Completions { .. } => unreachable!(),
    }

    Ok(())
}

fn init_logging(verbose: bool, level: &str) {
    let default_level = if verbose { "debug" } else { level };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
