pub mod serial;
pub mod tcp;
pub mod traits;

pub use serial::{SerialConnector, SerialTransportStream};
pub use tcp::{TcpConnector, TcpTransportStream};
pub use traits::{TransportConnector, TransportStream};
