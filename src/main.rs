mod cli;
mod command;
mod config;
mod console;
mod device;
mod transport;

use ade_shared::{DispatchConfig, Dispatcher};
use anyhow::Result;
use clap::Parser;
use cli::Cli;
use config::{ControllerConfig, TransportConfig};
use console::Console;
use device::{ControlUnit, Device, LogGateway, MemoryStorage, ThreadDelay};
use transport::{SerialConnector, TcpConnector, TransportConnector};

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = Cli::parse().into_config();

    info!("ADE controller starting: {}", config.device_id);
    info!("  Firmware: {}", config.version);
    info!("  Console: {}", config.transport);

    let registry = command::build_registry(&config)?;
    info!("Registered {} commands", registry.len());
    let dispatcher = Dispatcher::new(
        registry,
        DispatchConfig {
            verbose_nak: config.verbose_nak,
        },
    );

    let device = Device::new(
        Box::new(MemoryStorage::new()),
        Box::new(ControlUnit::new()),
        Box::new(ThreadDelay),
    );
    let mut console = Console::new(dispatcher, device, Box::new(LogGateway), config.max_line);

    match config.transport.clone() {
        TransportConfig::Serial { port, baud } => {
            serve_until_shutdown(&SerialConnector::new(port, baud), &mut console, &config).await?
        }
        TransportConfig::Tcp { address } => {
            serve_until_shutdown(&TcpConnector::new(address), &mut console, &config).await?
        }
    }

    info!("Control unit left {}", console.device().control.state());
    Ok(())
}

async fn serve_until_shutdown<T: TransportConnector>(
    connector: &T,
    console: &mut Console,
    config: &ControllerConfig,
) -> Result<()> {
    tokio::select! {
        _ = console::run(connector, console, config) => Ok(()),
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Shutting down");
            Ok(())
        }
    }
}
