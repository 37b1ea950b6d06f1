//! Shared mutable context threaded through every indicator handler.
//!
//! The control loop writes the inputs (`now_ms`, `motion_active`,
//! `flash_requested`) before each tick and reads `led_on` afterwards.
//! Handlers never touch hardware.

use crate::config::ControllerConfig;

/// LED level while flashing, as a pure function of time since the flash
/// began.  Starts on and toggles every `blink_interval_ms`.
pub fn flash_output(elapsed_ms: u64, blink_interval_ms: u32) -> bool {
    let interval = u64::from(blink_interval_ms.max(1));
    (elapsed_ms / interval) % 2 == 0
}

/// The blackboard passed to every state handler.
pub struct FsmContext {
    // -- Timing --
    /// Current uptime (ms).  Written by the control loop before each tick.
    pub now_ms: u64,
    /// Milliseconds since the current state was entered.  Written by the
    /// engine; while flashing this is the time into the sequence.
    pub ms_in_state: u64,

    // -- Inputs --
    /// Motion-active derivation for this tick.
    pub motion_active: bool,
    /// Set to start (or restart) a flash; consumed by the handlers.
    pub flash_requested: bool,

    // -- Output --
    /// Desired LED level after this tick.
    pub led_on: bool,

    // -- Configuration --
    pub blink_interval_ms: u32,
    pub flash_duration_ms: u32,
}

impl FsmContext {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            now_ms: 0,
            ms_in_state: 0,
            motion_active: false,
            flash_requested: false,
            led_on: false,
            blink_interval_ms: config.blink_interval_ms,
            flash_duration_ms: config.flash_duration_ms,
        }
    }

    /// Only meaningful while in `Flashing`.
    pub fn flash_finished(&self) -> bool {
        self.ms_in_state >= u64::from(self.flash_duration_ms)
    }
}
