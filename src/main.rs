mod checks;
mod collectors;
mod config;
mod error;
mod format;
mod journal;
mod retention;
mod watchdog;

use clap::Parser;
use collectors::system::SysinfoSource;
use config::WatchdogConfig;
use error::cause_chain;
use std::path::PathBuf;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use watchdog::Watchdog;

#[derive(Parser, Debug)]
#[command(name = "hostwatch")]
#[command(version)]
struct Cli {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    print_default_config: bool,
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    if cli.print_default_config {
        println!("{}", WatchdogConfig::example_yaml());
        return;
    }

    let cfg = match cli.config {
        Some(path) => match WatchdogConfig::load_from_file(&path) {
            Ok(cfg) => cfg,
            Err(err) => {
                error!(error = %err, "failed to load configuration");
                std::process::exit(1);
            }
        },
        None => WatchdogConfig::default(),
    };

    info!(
        log_path = %cfg.log_path.display(),
        interval_secs = cfg.check_interval_secs,
        cpu_threshold = cfg.cpu_threshold_percent,
        ram_threshold = cfg.ram_threshold_percent,
        net_threshold_mb = cfg.net_threshold_mb,
        "starting hostwatch"
    );

    let watchdog = match Watchdog::new(cfg, SysinfoSource::new()) {
        Ok(w) => w,
        Err(err) => {
            error!(error = %cause_chain(&err), "failed to sample initial network baseline");
            std::process::exit(1);
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for Ctrl+C");
            // Dropping the sender would stop the watchdog.
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
        let _ = shutdown_tx.send(true);
    });

    watchdog.run(shutdown_rx).await;
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
