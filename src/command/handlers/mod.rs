//! Command handlers, grouped like the command table

mod channels;
mod config;
mod control;
mod status;
mod system;

pub use channels::{
    handle_add_critical, handle_add_enabled, handle_remove_critical, handle_remove_enabled,
};
pub use config::{
    handle_add_number, handle_clear_number, handle_get_alert_text, handle_list_numbers,
    handle_set_alert_text,
};
pub use control::{
    handle_disable_monitoring, handle_enable_monitoring, handle_force_calibration,
    handle_force_spoiled,
};
pub use status::handle_status;
pub use system::{handle_ping, handle_sleep};
pub use test::handle_test_sms;

#[cfg(test)]
pub(crate) mod testing {
    use crate::device::{ControlUnit, Delay, Device, MemoryStorage};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    /// Delay that only records the requested time
    #[derive(Debug, Clone, Default)]
    pub struct RecordingDelay(pub Arc<AtomicU64>);

    impl Delay for RecordingDelay {
        fn delay_ms(&mut self, ms: u64) {
            self.0.fetch_add(ms, Ordering::SeqCst);
        }
    }

    /// Fresh device with RAM storage, returning the delay probe too
    pub fn test_device() -> (Device, Arc<AtomicU64>) {
        let delay = RecordingDelay::default();
        let slept = delay.0.clone();
        let device = Device::new(
            Box::new(MemoryStorage::new()),
            Box::new(ControlUnit::new()),
            Box::new(delay),
        );
        (device, slept)
    }
}
