//! ADE command layer
//!
//! This crate provides the text command engine of the ADE alarm controller:
//! matching a request line to a registered command, decoding its typed
//! arguments, running the handler and encoding the reply line.
//!
//! ```text
//! line -> registry lookup -> decode (arg format) -> handler -> encode (result format) -> reply
//! ```

pub mod channel_mask;
pub mod codec;
pub mod dispatch;
pub mod marshal;
pub mod parser;
pub mod registry;
pub mod reply;

// Re-export commonly used types at crate root
pub use dispatch::{DispatchConfig, Dispatcher, Outcome};
pub use marshal::{ArgSlot, ArgSlots, Format, FormatTag, SlotError, SlotKind, MAX_ARGS};
pub use registry::{Access, CommandTemplate, ExecError, Handler, Origin, Registry, RegistryError};
