//! System command handlers (ping, sleep)

use crate::device::Device;
use ade_shared::{ArgSlots, ExecError};
use tracing::debug;

/// Handle `ping`: answers with an empty reply
pub fn handle_ping(_args: &mut ArgSlots, _device: &mut Device) -> Result<(), ExecError> {
    Ok(())
}

/// Handle `sleep <ms>`
///
/// Blocks the whole command loop for the requested time.
pub fn handle_sleep(args: &mut ArgSlots, device: &mut Device) -> Result<(), ExecError> {
    let ms = args.int(1)?;
    let ms = u64::try_from(ms).map_err(|_| ExecError::failed(format!("Negative delay: {ms}")))?;

    debug!("[SYS] Sleeping {} ms", ms);
    device.delay.delay_ms(ms);
    Ok(())
}
