//! WalletScore CLI: run the scoring service or score a single address.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use walletscore::config::{generate_config_template, Config};
use walletscore::explorer::EtherscanClient;
use walletscore::model::{LinearModel, StandardScaler};
use walletscore::scoring::ScoringPipeline;
use walletscore::server;
use walletscore::utils::logging::init_logging;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP scoring service
    Serve,

    /// Score a single wallet address and print the result
    Score {
        /// Wallet address (0x…)
        address: String,
    },

    /// Write a commented configuration template
    Config {
        /// Output file path
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,
    },
}

fn load_config(path: &PathBuf) -> anyhow::Result<Config> {
    // Runs before logging is up, hence eprintln for the missing-file note.
    // A file that exists but fails to parse is an error: serving with
    // default explorer/model settings instead of the operator's is worse
    // than refusing to start.
    if path.exists() {
        return Config::from_file(path)
            .with_context(|| format!("loading config file {}", path.display()));
    }

    eprintln!("config file {} not found - using defaults", path.display());
    let mut config = Config::default();
    config.apply_env_overrides();
    Ok(config)
}

fn build_pipeline(config: &Config) -> anyhow::Result<Arc<ScoringPipeline>> {
    config.validate().context("invalid configuration")?;

    let fetcher = EtherscanClient::new(&config.explorer).context("building explorer client")?;
    let model = LinearModel::from_file(&config.model.model_path)
        .with_context(|| format!("loading model artifact {}", config.model.model_path))?;
    let scaler = StandardScaler::from_file(&config.model.scaler_path)
        .with_context(|| format!("loading scaler artifact {}", config.model.scaler_path))?;

    Ok(Arc::new(ScoringPipeline::new(
        Arc::new(fetcher),
        Arc::new(model),
        Arc::new(scaler),
        config.explorer.tx_limit,
    )))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    match args.command {
        | Commands::Config { output } => {
            // No logging setup needed for a one-shot file write
            std::fs::write(&output, generate_config_template())
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Wrote configuration template to {}", output.display());
            Ok(())
        }
        | Commands::Serve => {
            let config = init_and_load(&args)?;
            let pipeline = build_pipeline(&config)?;
            server::run(pipeline, &config.server).await?;
            Ok(())
        }
        | Commands::Score { ref address } => {
            let config = init_and_load(&args)?;
            let pipeline = build_pipeline(&config)?;
            let result = pipeline.score_wallet(address).await?;

            println!("Wallet: {}", result.wallet);
            println!("Score:  {:.2} / 100", result.score);
            println!("Label:  {}", result.label);
            println!("Flags:  {}", result.flags.join("; "));
            Ok(())
        }
    }
}

/// Load the config, then bring logging up at the configured level
/// (`--debug` and `WALLETSCORE_LOG` take precedence).
fn init_and_load(args: &Args) -> anyhow::Result<Config> {
    let config = load_config(&args.config)?;
    let level = if args.debug { "debug" } else { config.app.log_level.as_str() };
    init_logging(level);
    Ok(config)
}
