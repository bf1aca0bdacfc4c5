//! Configuration storage
//!
//! Holds the SMS destination list, the alert text and the two channel
//! masks. On the board these live in EEPROM; [`MemoryStorage`] keeps them
//! in RAM with the same limits.

use ade_shared::ExecError;
use thiserror::Error;

/// Number of SMS destination slots (numbered from 1)
pub const MAX_SMS_DEST: u8 = 8;

/// Longest phone number, in characters
pub const MAX_SMS_NUM: usize = 16;

/// Longest alert text, in characters
pub const MAX_MSG_TEXT: usize = 64;

/// Errors reported by the storage
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Destination {0} out of range (1..={MAX_SMS_DEST})")]
    BadSlot(i64),

    #[error("Phone number too long: {0} chars (max: {MAX_SMS_NUM})")]
    NumberTooLong(usize),

    #[error("Alert text too long: {0} chars (max: {MAX_MSG_TEXT})")]
    TextTooLong(usize),
}

impl From<StorageError> for ExecError {
    fn from(e: StorageError) -> Self {
        ExecError::failed(e.to_string())
    }
}

/// Persistent controller settings
pub trait Storage {
    /// Phone number stored in destination `slot`, empty when unset
    fn sms_dest(&self, slot: i64) -> Result<String, StorageError>;

    /// Store a phone number; an empty number clears the slot
    fn set_sms_dest(&mut self, slot: i64, number: &str) -> Result<(), StorageError>;

    fn alert_text(&self) -> String;

    fn set_alert_text(&mut self, text: &str) -> Result<(), StorageError>;

    fn enabled_mask(&self) -> u16;

    fn set_enabled_mask(&mut self, mask: u16);

    fn critical_mask(&self) -> u16;

    fn set_critical_mask(&mut self, mask: u16);
}

/// RAM backed storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    destinations: [String; MAX_SMS_DEST as usize],
    alert_text: String,
    enabled_mask: u16,
    critical_mask: u16,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(slot: i64) -> Result<usize, StorageError> {
        if (1..=i64::from(MAX_SMS_DEST)).contains(&slot) {
            Ok((slot - 1) as usize)
        } else {
            Err(StorageError::BadSlot(slot))
        }
    }
}

impl Storage for MemoryStorage {
    fn sms_dest(&self, slot: i64) -> Result<String, StorageError> {
        Ok(self.destinations[Self::index(slot)?].clone())
    }

    fn set_sms_dest(&mut self, slot: i64, number: &str) -> Result<(), StorageError> {
        let index = Self::index(slot)?;
        let len = number.chars().count();
        if len > MAX_SMS_NUM {
            return Err(StorageError::NumberTooLong(len));
        }
        self.destinations[index] = number.to_string();
        Ok(())
    }

    fn alert_text(&self) -> String {
        self.alert_text.clone()
    }

    fn set_alert_text(&mut self, text: &str) -> Result<(), StorageError> {
        let len = text.chars().count();
        if len > MAX_MSG_TEXT {
            return Err(StorageError::TextTooLong(len));
        }
        self.alert_text = text.to_string();
        Ok(())
    }

    fn enabled_mask(&self) -> u16 {
        self.enabled_mask
    }

    fn set_enabled_mask(&mut self, mask: u16) {
        self.enabled_mask = mask;
    }

    fn critical_mask(&self) -> u16 {
        self.critical_mask
    }

    fn set_critical_mask(&mut self, mask: u16) {
        self.critical_mask = mask;
    }
}
