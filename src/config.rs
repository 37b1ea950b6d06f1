//! System configuration parameters
//!
//! All tunable timing parameters for the PetFeeder controller.
//! Nothing here is persisted: every boot starts from [`ControllerConfig::default`].

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::session::Animal;

/// Core controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    // --- Motion ---
    /// How long after the last PIR edge motion counts as active (ms)
    pub motion_active_ms: u32,

    // --- Companion protocol ---
    /// How long to wait for a companion verdict before giving up (ms).
    /// Must exceed the companion's recognition window (15 s).
    pub response_timeout_ms: u32,
    /// Interval between `ARDUINO_HEARTBEAT` lines (ms)
    pub heartbeat_interval_ms: u32,
    /// Silence from the companion after which liveness is reported stale (ms)
    pub liveness_stale_ms: u32,

    // --- Indicator ---
    /// LED toggle period while flashing (ms)
    pub blink_interval_ms: u32,
    /// Total length of one success flash (ms)
    pub flash_duration_ms: u32,

    // --- Session ---
    /// Target animal selected at boot
    pub default_target: Animal,

    // --- Link ---
    /// UART baud rate for the companion link
    pub serial_baud: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            // Motion
            motion_active_ms: 5_000,

            // Companion protocol
            response_timeout_ms: 20_000,
            heartbeat_interval_ms: 10_000,
            liveness_stale_ms: 30_000,

            // Indicator
            blink_interval_ms: 250,
            flash_duration_ms: 3_000,

            // Session
            default_target: Animal::Dog,

            // Link
            serial_baud: 9_600,
        }
    }
}

impl ControllerConfig {
    /// Reject values that would break the timing state machines.
    pub fn validate(&self) -> Result<(), Error> {
        if self.motion_active_ms == 0 {
            return Err(Error::Config("motion_active_ms must be non-zero"));
        }
        if self.response_timeout_ms == 0 {
            return Err(Error::Config("response_timeout_ms must be non-zero"));
        }
        if self.heartbeat_interval_ms == 0 {
            return Err(Error::Config("heartbeat_interval_ms must be non-zero"));
        }
        if self.blink_interval_ms == 0 || self.blink_interval_ms >= self.flash_duration_ms {
            return Err(Error::Config("blink_interval_ms must be in 1..flash_duration_ms"));
        }
        if self.liveness_stale_ms < self.heartbeat_interval_ms {
            return Err(Error::Config("liveness_stale_ms shorter than heartbeat interval"));
        }
        if self.serial_baud == 0 {
            return Err(Error::Config("serial_baud must be non-zero"));
        }
        Ok(())
    }
}
