//! Stockcast command line.
//!
//! Runs one prediction or history lookup against the configured market
//! data source and prints the JSON result to stdout.
//!
//! # Usage
//! ```sh
//! cargo run -- predict AAPL
//! cargo run -- history RELIANCE.NS --period 3mo
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use stockcast::application::bootstrap::ServicesBootstrap;
use stockcast::config::Config;
use stockcast::infrastructure::observability::init_tracing;

#[derive(Parser, Debug)]
#[command(author, version, about = "Stock price prediction from live bars", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predict the next close for a ticker
    Predict {
        /// Exchange symbol, e.g. AAPL or RELIANCE.NS
        ticker: String,
    },
    /// Daily closes for a ticker
    History {
        ticker: String,
        /// One of 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max
        #[arg(short, long)]
        period: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = Config::from_env()?;
    init_tracing(config.observability.log_format);

    let services = ServicesBootstrap::init(&config, None)?;

    let output = match args.command {
        Command::Predict { ticker } => {
            serde_json::to_string_pretty(&services.prediction.predict(&ticker).await)?
        }
        Command::History { ticker, period } => serde_json::to_string_pretty(
            &services
                .history
                .get_history(&ticker, period.as_deref())
                .await,
        )?,
    };
    println!("{}", output);

    Ok(())
}
