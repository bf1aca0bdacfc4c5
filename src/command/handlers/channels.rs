//! Channel mask handlers (aa, ra, ac, rc)
//!
//! Each takes a list of channel numbers, decoded with
//! [`channel_mask::decode`]. An empty decoded mask leaves the stored mask
//! untouched.

use crate::device::Device;
use ade_shared::channel_mask::{self, NO_CHANNELS};
use ade_shared::{ArgSlots, ExecError};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MaskTarget {
    Enabled,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MaskOp {
    Add,
    Remove,
}

fn update_mask(
    args: &ArgSlots,
    device: &mut Device,
    target: MaskTarget,
    op: MaskOp,
) -> Result<(), ExecError> {
    let mask = channel_mask::decode(args.text(1)?);
    if mask == NO_CHANNELS {
        return Ok(());
    }

    let current = match target {
        MaskTarget::Enabled => device.storage.enabled_mask(),
        MaskTarget::Critical => device.storage.critical_mask(),
    };
    let updated = match op {
        MaskOp::Add => current | mask,
        MaskOp::Remove => current & !mask,
    };

    info!(
        "[CFG] {:?} {:?} channels (0x{:04X}, 0x{:04X})",
        op, target, mask, updated
    );
    match target {
        MaskTarget::Enabled => device.storage.set_enabled_mask(updated),
        MaskTarget::Critical => device.storage.set_critical_mask(updated),
    }
    Ok(())
}

/// Handle `aa <channels>`
pub fn handle_add_enabled(args: &mut ArgSlots, device: &mut Device) -> Result<(), ExecError> {
    update_mask(args, device, MaskTarget::Enabled, MaskOp::Add)
}

/// Handle `ra <channels>`
pub fn handle_remove_enabled(args: &mut ArgSlots, device: &mut Device) -> Result<(), ExecError> {
    update_mask(args, device, MaskTarget::Enabled, MaskOp::Remove)
}

/// Handle `ac <channels>`
pub fn handle_add_critical(args: &mut ArgSlots, device: &mut Device) -> Result<(), ExecError> {
    update_mask(args, device, MaskTarget::Critical, MaskOp::Add)
}

/// Handle `rc <channels>`
pub fn handle_remove_critical(args: &mut ArgSlots, device: &mut Device) -> Result<(), ExecError> {
    update_mask(args, device, MaskTarget::Critical, MaskOp::Remove)
}
