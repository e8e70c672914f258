use std::time::Duration;

use clap::Parser;
use log::{debug, info};
use tokio::signal;

use config::{Credentials, OracleConfig};
use price_oracle::PriceOracle;

#[derive(Parser, Debug)]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Query again every N seconds until interrupted
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    poll_interval_sec: Option<u64>,

    /// Assets to price, defaults to every configured asset
    assets: Vec<String>,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    simple_logger::SimpleLogger::new().env().init().unwrap();

    let args = Args::parse();
    debug!("Args: {:?}", args);

    // Load configuration from yaml
    let config = OracleConfig::from_file(&args.config).expect("Failed to load config file");
    let credentials = Credentials::from_env();

    let oracle = PriceOracle::build(&config, &credentials).expect("Failed to build price oracle");

    let assets = if args.assets.is_empty() {
        let mut assets: Vec<String> = config.assets.keys().cloned().collect();
        assets.sort();
        assets
    } else {
        args.assets
    };

    match args.poll_interval_sec {
        Some(period) => run_poller(&oracle, &assets, Duration::from_secs(period)).await,
        None => print_prices(&oracle, &assets).await,
    }
}

async fn print_prices(oracle: &PriceOracle, assets: &[String]) {
    for asset in assets {
        let price = oracle.get_price(asset).await;
        println!("{}\t{}\t{}", asset, price, oracle.quote_ticker());
    }
}

async fn run_poller(oracle: &PriceOracle, assets: &[String], period: Duration) {
    info!("Polling {} assets every {}s", assets.len(), period.as_secs());

    let mut interval = tokio::time::interval(period);
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => print_prices(oracle, assets).await,
            _ = &mut shutdown => break,
        }
    }

    info!("Oracle stopped.");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Unable to handle ctrl+c");
    };
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("signal received, shutting down");
}
