//! Interrupt-driven motion latch.
//!
//! The PIR sensor raises a rising edge on its GPIO.  The ISR does the
//! absolute minimum: it sets a flag.  The control loop consumes the flag
//! once per tick, so any number of edges between two ticks collapse into
//! a single motion event.
//!
//! ```text
//! ┌─────────────┐   trigger()   ┌──────────────┐   take()   ┌──────────────┐
//! │ PIR GPIO ISR│──────────────▶│  MotionLatch │───────────▶│  Main Loop   │
//! └─────────────┘               │ (AtomicBool) │            │  (consumer)  │
//!                               └──────────────┘            └──────────────┘
//! ```

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Single-bit mailbox between an ISR and the control loop.
///
/// Set and consume are each one atomic operation, so an edge that lands
/// while the loop is consuming is either seen now or on the next tick;
/// never lost, never counted twice.
pub struct MotionLatch {
    pending: AtomicBool,
    edges: AtomicU32,
}

impl MotionLatch {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            edges: AtomicU32::new(0),
        }
    }

    /// Record an edge.  Safe to call from ISR context (lock-free).
    #[inline]
    pub fn trigger(&self) {
        self.edges.fetch_add(1, Ordering::Relaxed);
        self.pending.store(true, Ordering::Release);
    }

    /// Consume the latch: `true` if at least one edge arrived since the
    /// last call.  Called from the main loop only.
    #[inline]
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Raw PIR edges since boot (diagnostic; wraps).
    pub fn edge_count(&self) -> u32 {
        self.edges.load(Ordering::Relaxed)
    }
}

impl Default for MotionLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// The latch shared with the PIR interrupt.
pub static MOTION_LATCH: MotionLatch = MotionLatch::new();

/// GPIO ISR entry point registered by `drivers::hw_init`.
///
/// # Safety
/// Called by the ESP-IDF GPIO ISR service; `_arg` is unused.
pub unsafe extern "C" fn motion_isr_handler(_arg: *mut core::ffi::c_void) {
    MOTION_LATCH.trigger();
}
