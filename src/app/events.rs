//! Outbound application events.
//!
//! The [`ControllerService`](super::service::ControllerService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them.

use serde::Serialize;

use crate::error::LinkError;
use crate::fsm::StateId;
use crate::link::RejectReason;
use crate::session::Animal;

/// Why a consumed motion edge did not become a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    CompanionNotReady,
    RequestInFlight,
}

/// How an outstanding request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The configured target was confirmed; the indicator flashes.
    TargetConfirmed(Animal),
    /// Some other animal (or an unrecognised species) was confirmed.
    OtherConfirmed(Option<Animal>),
    Rejected(RejectReason),
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started with this target.
    Started(Animal),

    // ── Companion lifecycle ───────────────────────────────────
    CompanionReady,
    CompanionShutdown { request_abandoned: bool },
    /// No `PI_READY`/`PI_PONG` for the configured window.
    LivenessStale { silent_ms: u64 },

    // ── Request protocol ──────────────────────────────────────
    RequestIssued,
    MotionDropped(DropReason),
    /// A verdict arrived.  `outstanding` is false for a late reply.
    RequestResolved { verdict: Verdict, outstanding: bool },
    RequestTimedOut { waited_ms: u64 },

    // ── Target configuration ──────────────────────────────────
    TargetChanged { from: Animal, to: Animal },
    TargetUnchanged(Animal),
    TargetRejected,
    /// `PI_ACK_TARGET:<X>` received; `matches` compares against the current target.
    TargetAcknowledged { animal: Option<Animal>, matches: bool },

    // ── Indicator ─────────────────────────────────────────────
    IndicatorChanged { from: StateId, to: StateId },
    FlashTest,

    // ── Link ──────────────────────────────────────────────────
    LineIgnored,
    CommandDropped,
    LinkFault(LinkError),
    Heartbeat(StatusSnapshot),
}

/// Point-in-time controller status, suitable for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub uptime_ms: u64,
    pub companion_ready: bool,
    pub target: Animal,
    pub request_outstanding: bool,
    pub indicator: StateId,
    pub motion_active: bool,
    /// Motion events consumed from the latch since boot.
    pub motion_events: u32,
    /// Raw PIR edges seen by the ISR since boot.  Exceeds `motion_events`
    /// when several edges fall between two ticks.
    pub pir_edges: u32,
    pub lines_dropped: u32,
}
