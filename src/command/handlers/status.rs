//! Status report handler

use crate::device::Device;
use ade_shared::channel_mask;
use ade_shared::{ArgSlots, ExecError};

fn channel_list(mask: u16) -> String {
    let list: Vec<String> = channel_mask::channels(mask).map(|ch| ch.to_string()).collect();
    if list.is_empty() {
        "none".to_string()
    } else {
        list.join(",")
    }
}

/// Handle `rs`: one line summary of mode and channel masks
pub fn handle_status(args: &mut ArgSlots, device: &mut Device) -> Result<(), ExecError> {
    let report = format!(
        "Status: {} enabled={} critical={}",
        device.control.state(),
        channel_list(device.storage.enabled_mask()),
        channel_list(device.storage.critical_mask()),
    );
    args.reply_text(0, report)?;
    Ok(())
}
