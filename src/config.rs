//! Controller configuration

use ade_shared::codec::DEFAULT_MAX_LINE;
use std::fmt;
use std::time::Duration;

/// Default serial device of the console port
pub const DEFAULT_SERIAL_PORT: &str = "/dev/ttyUSB0";

/// Default console baud rate
pub const DEFAULT_BAUD: u32 = 115_200;

/// Where the command console is reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportConfig {
    /// Serial port (the real board)
    Serial { port: String, baud: u32 },
    /// TCP listener (desk simulation)
    Tcp { address: String },
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig::Serial {
            port: DEFAULT_SERIAL_PORT.into(),
            baud: DEFAULT_BAUD,
        }
    }
}

impl fmt::Display for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportConfig::Serial { port, baud } => write!(f, "serial {} @ {}", port, baud),
            TransportConfig::Tcp { address } => write!(f, "tcp {}", address),
        }
    }
}

/// Configuration for the controller
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller ID used in logs
    pub device_id: String,
    /// Console transport
    pub transport: TransportConfig,
    /// Reconnection delay (initial)
    pub reconnect_delay: Duration,
    /// Maximum reconnection delay
    pub max_reconnect_delay: Duration,
    /// Longest accepted request line, in bytes
    pub max_line: usize,
    /// Explain NAK replies
    pub verbose_nak: bool,
    /// Firmware version tag reported by `ver`
    pub version: String,
    /// Sender number given to SMS injected with `test_sms`
    pub test_sms_sender: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            device_id: "ade-001".into(),
            transport: TransportConfig::default(),
            reconnect_delay: Duration::from_secs(1),
            max_reconnect_delay: Duration::from_secs(30),
            max_line: DEFAULT_MAX_LINE,
            verbose_nak: cfg!(debug_assertions),
            version: env!("CARGO_PKG_VERSION").into(),
            test_sms_sender: "console".into(),
        }
    }
}
