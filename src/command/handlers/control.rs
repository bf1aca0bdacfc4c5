//! Control unit handlers (fc, am, dm, fl)

use crate::device::Device;
use ade_shared::{ArgSlots, ExecError};
use tracing::info;

/// Handle `fc`: force a new calibration
pub fn handle_force_calibration(_args: &mut ArgSlots, device: &mut Device) -> Result<(), ExecError> {
    info!("[CTRL] <= Force calibration");
    device.control.calibrate()?;
    Ok(())
}

/// Handle `am`: start monitoring the enabled channels
pub fn handle_enable_monitoring(_args: &mut ArgSlots, device: &mut Device) -> Result<(), ExecError> {
    info!("[CTRL] <= Enable monitoring");
    device.control.enable_monitoring()?;
    Ok(())
}

/// Handle `dm`: stop monitoring
pub fn handle_disable_monitoring(args: &mut ArgSlots, device: &mut Device) -> Result<(), ExecError> {
    info!("[CTRL] <= Disable monitoring");
    device.control.disable_monitoring()?;
    args.reply_text(0, "Monitoring disabled")?;
    Ok(())
}

/// Handle `fl`: force the spoiled (flashing) state
pub fn handle_force_spoiled(_args: &mut ArgSlots, device: &mut Device) -> Result<(), ExecError> {
    info!("[CTRL] <= Force spoiled");
    device.control.set_spoiled()?;
    Ok(())
}
