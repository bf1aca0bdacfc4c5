//! Device collaborators reachable from command handlers
//!
//! This module provides:
//! - Configuration storage (destinations, alert text, channel masks)
//! - The control unit (calibration, monitoring)
//! - Blocking delays
//! - SMS intake and delivery

mod control;
mod sms;
mod storage;

pub use control::{Control, ControlError, ControlState, ControlUnit};
pub use sms::{LogGateway, SmsGateway, SmsMessage};
pub use storage::{MemoryStorage, Storage, StorageError, MAX_MSG_TEXT, MAX_SMS_DEST, MAX_SMS_NUM};

use std::time::Duration;

/// Blocking millisecond delay
pub trait Delay {
    fn delay_ms(&mut self, ms: u64);
}

/// Delay backed by `std::thread::sleep`
#[derive(Debug, Default)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn delay_ms(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }
}

/// Capability set handed to every command handler
pub struct Device {
    pub storage: Box<dyn Storage + Send>,
    pub control: Box<dyn Control + Send>,
    pub delay: Box<dyn Delay + Send>,
    /// SMS queued for dispatch once the current command has answered
    pub sms_inbox: Vec<SmsMessage>,
}

impl Device {
    pub fn new(
        storage: Box<dyn Storage + Send>,
        control: Box<dyn Control + Send>,
        delay: Box<dyn Delay + Send>,
    ) -> Self {
        Self {
            storage,
            control,
            delay,
            sms_inbox: Vec::new(),
        }
    }
}
