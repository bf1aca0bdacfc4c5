//! Command table of the controller
//!
//! This module handles:
//! - Registering every console/SMS command with its formats and access
//! - Wiring each command to its handler

pub mod handlers;

use crate::config::ControllerConfig;
use crate::device::Device;
use ade_shared::{Access, Registry, RegistryError};

/// Build the registry of all controller commands.
///
/// `help` is registered last so it can list every other name.
pub fn build_registry(config: &ControllerConfig) -> Result<Registry<Device>, RegistryError> {
    let mut registry = Registry::<Device>::new();

    // System
    let version = config.version.clone();
    registry.add("ver", "", "s", Access::Remote, move |args, _device: &mut Device| {
        args.reply_text(0, version.as_str())?;
        Ok(())
    })?;
    registry.add("sleep", "d", "", Access::Remote, handlers::handle_sleep)?;
    registry.add("ping", "", "", Access::Remote, handlers::handle_ping)?;

    let sender = config.test_sms_sender.clone();
    registry.add("test_sms", "t", "", Access::Console, move |args, device: &mut Device| {
        handlers::handle_test_sms(&sender, args, device)
    })?;

    // SMS destinations and alert text
    registry.add("an", "ds", "", Access::Remote, handlers::handle_add_number)?;
    registry.add("cn", "d", "", Access::Remote, handlers::handle_clear_number)?;
    registry.add("vn", "", "s", Access::Remote, handlers::handle_list_numbers)?;
    registry.add("ii", "t", "", Access::Remote, handlers::handle_set_alert_text)?;
    registry.add("li", "", "s", Access::Remote, handlers::handle_get_alert_text)?;

    // Channel masks
    registry.add("aa", "t", "", Access::Remote, handlers::handle_add_enabled)?;
    registry.add("ra", "t", "", Access::Remote, handlers::handle_remove_enabled)?;
    registry.add("ac", "t", "", Access::Remote, handlers::handle_add_critical)?;
    registry.add("rc", "t", "", Access::Remote, handlers::handle_remove_critical)?;

    // Control unit
    registry.add("fc", "", "", Access::Remote, handlers::handle_force_calibration)?;
    registry.add("am", "", "", Access::Remote, handlers::handle_enable_monitoring)?;
    registry.add("dm", "", "s", Access::Remote, handlers::handle_disable_monitoring)?;
    registry.add("fl", "", "", Access::Remote, handlers::handle_force_spoiled)?;
    registry.add("rs", "", "s", Access::Remote, handlers::handle_status)?;

    let mut names: Vec<&str> = registry.names().collect();
    names.push("help");
    let listing = names.join(" ");
    registry.add("help", "", "s", Access::Console, move |args, _device: &mut Device| {
        args.reply_text(0, listing.as_str())?;
        Ok(())
    })?;

    Ok(registry)
}
