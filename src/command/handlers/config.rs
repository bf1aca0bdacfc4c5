//! Configuration command handlers (SMS destinations, alert text)

use crate::device::{Device, MAX_SMS_DEST};
use ade_shared::{ArgSlots, ExecError};
use std::fmt::Write;
use tracing::info;

/// Handle `an <slot> <number>`: store an SMS destination
pub fn handle_add_number(args: &mut ArgSlots, device: &mut Device) -> Result<(), ExecError> {
    let slot = args.int(1)?;
    let number = args.text(2)?;

    info!("[CFG] <= Add number {}) {}", slot, number);
    device.storage.set_sms_dest(slot, number)?;
    Ok(())
}

/// Handle `cn <slot>`: clear an SMS destination
pub fn handle_clear_number(args: &mut ArgSlots, device: &mut Device) -> Result<(), ExecError> {
    let slot = args.int(1)?;

    info!("[CFG] <= Remove number {})", slot);
    device.storage.set_sms_dest(slot, "")?;
    Ok(())
}

/// Handle `vn`: list every SMS destination slot
pub fn handle_list_numbers(args: &mut ArgSlots, device: &mut Device) -> Result<(), ExecError> {
    let mut listing = String::from("SMS destinations:");
    for slot in 1..=i64::from(MAX_SMS_DEST) {
        let number = device.storage.sms_dest(slot)?;
        // Writing into a String cannot fail
        let _ = write!(listing, " {}) {};", slot, number);
    }

    info!("[CFG] => {}", listing);
    args.reply_text(0, listing)?;
    Ok(())
}

/// Handle `ii <text>`: set the alert identification text
pub fn handle_set_alert_text(args: &mut ArgSlots, device: &mut Device) -> Result<(), ExecError> {
    let text = args.text(1)?;

    info!("[CFG] <= Set identification: {}", text);
    device.storage.set_alert_text(text)?;
    Ok(())
}

/// Handle `li`: report the alert identification text
pub fn handle_get_alert_text(args: &mut ArgSlots, device: &mut Device) -> Result<(), ExecError> {
    let reply = format!("Identification: {}", device.storage.alert_text());

    info!("[CFG] => {}", reply);
    args.reply_text(0, reply)?;
    Ok(())
}
