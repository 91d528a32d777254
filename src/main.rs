use std::path::PathBuf;
use std::process;

use clap::Parser;
use server::prelude::*;

/// Wake a server over LAN whenever it drops off an otherwise healthy network.
#[derive(Parser, Debug)]
#[command(name = "wol-watch", version)]
struct Cli {
    /// JSON configuration file, defaults to config.json next to the executable
    #[arg(short, long, conflicts_with = "env")]
    config: Option<PathBuf>,
    /// Read the configuration from environment variables (WOL_SERVER_IP, ...)
    #[arg(long)]
    env: bool,
}

#[derive(thiserror::Error, Debug)]
enum Error {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Monitor(#[from] server::monitor::Error),
    #[error("cannot install termination handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

async fn load_config(cli: Cli) -> Result<MonitorConfig, ConfigError> {
    if cli.env {
        let config = MonitorConfig::from_env()?;
        log::info!("Configuration loaded successfully from environment");
        return Ok(config);
    }
    let path = cli.config.unwrap_or_else(|| DEFAULT_CONFIG_PATH.clone());
    let config = MonitorConfig::from_file(&path).await?;
    log::info!("Configuration loaded successfully from {}", path.display());
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), Error> {
    let config = match load_config(cli).await {
        Ok(config) => config,
        Err(err @ ConfigError::NotFound(_)) => {
            log::info!(
                "Please create a config.json file with the required settings, or pass --env."
            );
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };
    config.log_summary();

    let (sender, shutdown) = async_channel::bounded(1);
    ctrlc::set_handler(move || {
        log::info!("Termination requested, stopping monitor");
        sender.close();
    })?;

    let mut monitor = Monitor::new(config, PingProber::new(), UdpTransmitter, LogSink);
    monitor.run(shutdown).await?;
    Ok(())
}

fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    if let Err(err) = async_std::task::block_on(run(cli)) {
        log::error!("{}", err);
        process::exit(1);
    }
}
