//! Command-line options

use crate::config::{ControllerConfig, TransportConfig, DEFAULT_BAUD};
use clap::Parser;

/// ADE alarm controller console
#[derive(Parser, Debug)]
#[command(name = "ade-controller", version)]
pub struct Cli {
    /// Serial device of the command console
    #[arg(long, value_name = "PORT")]
    pub serial: Option<String>,

    /// Serial baud rate
    #[arg(long, default_value_t = DEFAULT_BAUD)]
    pub baud: u32,

    /// Listen for a console on a TCP address instead of a serial port
    #[arg(long, value_name = "ADDR", conflicts_with = "serial")]
    pub tcp: Option<String>,

    /// Controller ID used in logs
    #[arg(long)]
    pub device_id: Option<String>,

    /// Explain NAK replies
    #[arg(long)]
    pub verbose_nak: bool,

    /// Longest accepted request line, in bytes
    #[arg(long, value_name = "BYTES")]
    pub max_line: Option<usize>,
}

impl Cli {
    /// Apply the options on top of the default configuration
    pub fn into_config(self) -> ControllerConfig {
        let mut config = ControllerConfig::default();

        if let Some(address) = self.tcp {
            config.transport = TransportConfig::Tcp { address };
        } else if let TransportConfig::Serial { port, baud } = &mut config.transport {
            if let Some(serial) = self.serial {
                *port = serial;
            }
            *baud = self.baud;
        }

        if let Some(device_id) = self.device_id {
            config.device_id = device_id;
        }
        if let Some(max_line) = self.max_line {
            config.max_line = max_line;
        }
        config.verbose_nak |= self.verbose_nak;
        config
    }
}
