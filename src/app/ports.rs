//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControllerService (domain)
//! ```
//!
//! Driven adapters (serial link, LED, clock, event sinks) implement these
//! traits.  The [`ControllerService`](super::service::ControllerService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::error::LinkError;

// ───────────────────────────────────────────────────────────────
// Link port (driven adapter: domain ↔ companion serial line)
// ───────────────────────────────────────────────────────────────

/// Byte-oriented, line-framed channel to the companion.
pub trait LinkPort {
    /// Read up to `buf.len()` bytes.  Never blocks; returns 0 when no data
    /// is available.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LinkError>;

    /// Write one already-terminated line.
    fn write_line(&mut self, line: &str) -> Result<(), LinkError>;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → LED)
// ───────────────────────────────────────────────────────────────

/// The single status LED.
pub trait IndicatorPort {
    fn set_indicator(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic, boot-relative clock.
pub trait TimePort {
    /// Milliseconds since boot.  Never goes backwards.
    fn uptime_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
