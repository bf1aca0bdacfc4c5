//! Control unit state machine
//!
//! Tracks the operating mode of the alarm front-end and refuses the mode
//! changes that make no sense from the current one.

use ade_shared::ExecError;
use std::fmt;
use thiserror::Error;
use tracing::info;

/// Operating mode of the control unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    /// Powered, not watching the channels
    Idle,
    /// Learning the channel baselines
    Calibrating,
    /// Watching the enabled channels
    Monitoring,
    /// Alarm lamp forced to flash
    Spoiled,
}

impl fmt::Display for ControlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlState::Idle => write!(f, "idle"),
            ControlState::Calibrating => write!(f, "calibrating"),
            ControlState::Monitoring => write!(f, "monitoring"),
            ControlState::Spoiled => write!(f, "spoiled"),
        }
    }
}

/// Requests that move the control unit between modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    CalibrationForced,
    MonitoringEnabled,
    MonitoringDisabled,
    SpoiledForced,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("Cannot apply {event:?} while {from}")]
    InvalidTransition { from: ControlState, event: ControlEvent },
}

impl From<ControlError> for ExecError {
    fn from(e: ControlError) -> Self {
        ExecError::failed(e.to_string())
    }
}

/// Operations the command layer may request
pub trait Control {
    fn calibrate(&mut self) -> Result<(), ControlError>;

    fn enable_monitoring(&mut self) -> Result<(), ControlError>;

    fn disable_monitoring(&mut self) -> Result<(), ControlError>;

    fn set_spoiled(&mut self) -> Result<(), ControlError>;

    fn state(&self) -> ControlState;
}

/// In-process control unit
#[derive(Debug)]
pub struct ControlUnit {
    current_state: ControlState,
    calibrations: u32,
}

impl Default for ControlUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlUnit {
    /// Create a control unit in Idle state
    pub fn new() -> Self {
        Self {
            current_state: ControlState::Idle,
            calibrations: 0,
        }
    }

    /// Number of calibrations started since power-up
    pub fn calibrations(&self) -> u32 {
        self.calibrations
    }

    /// Apply an event, returning the new state
    pub fn process_event(&mut self, event: ControlEvent) -> Result<ControlState, ControlError> {
        let from = self.current_state;
        let to = next_state(from, event).ok_or(ControlError::InvalidTransition { from, event })?;

        if event == ControlEvent::CalibrationForced {
            self.calibrations += 1;
        }
        if from != to {
            info!("[CONTROL] {} -> {}", from, to);
        }
        self.current_state = to;
        Ok(to)
    }
}

/// Next state for an event, if the transition is valid
fn next_state(from: ControlState, event: ControlEvent) -> Option<ControlState> {
    use ControlEvent::*;
    use ControlState::*;

    match (from, event) {
        // Calibration may always be forced, even mid-calibration
        (_, CalibrationForced) => Some(Calibrating),

        (_, MonitoringEnabled) => Some(Monitoring),
        (_, MonitoringDisabled) => Some(Idle),

        // Baselines are meaningless until calibration ends
        (Calibrating, SpoiledForced) => None,
        (_, SpoiledForced) => Some(Spoiled),
    }
}

impl Control for ControlUnit {
    fn calibrate(&mut self) -> Result<(), ControlError> {
        self.process_event(ControlEvent::CalibrationForced).map(|_| ())
    }

    fn enable_monitoring(&mut self) -> Result<(), ControlError> {
        self.process_event(ControlEvent::MonitoringEnabled).map(|_| ())
    }

    fn disable_monitoring(&mut self) -> Result<(), ControlError> {
        self.process_event(ControlEvent::MonitoringDisabled).map(|_| ())
    }

    fn set_spoiled(&mut self) -> Result<(), ControlError> {
        self.process_event(ControlEvent::SpoiledForced).map(|_| ())
    }

    fn state(&self) -> ControlState {
        self.current_state
    }
}
