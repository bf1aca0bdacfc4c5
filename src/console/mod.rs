//! Command console over the configured transport

mod session;

pub use session::{run, Console};
