//! Companion session state and the single-request protocol.
//!
//! ```text
//!          [motion && ready]
//!   IDLE ─────────────────────▶ AWAITING_RESPONSE
//!    ▲                                │
//!    └──[verdict | timeout | PI_SHUTTING_DOWN]
//! ```
//!
//! At most one request is ever in flight.  Motion that arrives while
//! awaiting a verdict, or while the companion is not ready, is dropped
//! rather than queued.  The session only changes state; the caller
//! (the control loop) owns the serial link and decides what to send.

use core::fmt;
use core::str::FromStr;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Target animal
// ---------------------------------------------------------------------------

/// Species the feeder is configured to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Animal {
    Cat,
    Dog,
}

impl Animal {
    /// Wire spelling used on the companion link.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cat => "CAT",
            Self::Dog => "DOG",
        }
    }
}

impl FromStr for Animal {
    type Err = Error;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("CAT") {
            Ok(Self::Cat)
        } else if s.eq_ignore_ascii_case("DOG") {
            Ok(Self::Dog)
        } else {
            Err(Error::InvalidTarget)
        }
    }
}

impl fmt::Display for Animal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Request state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    AwaitingResponse { issued_at_ms: u64 },
}

/// What became of a consumed motion edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionOutcome {
    /// A request was opened; the caller must send `MOTION_DETECTED`.
    Requested,
    /// Dropped: the companion has not announced readiness.
    CompanionNotReady,
    /// Dropped: a request is already in flight.
    RequestInFlight,
}

/// Result of a successful [`Session::set_target`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetUpdate {
    Changed { from: Animal, to: Animal },
    Unchanged(Animal),
}

/// `true` once strictly more than `timeout_ms` has passed since `issued_at_ms`.
pub fn response_timed_out(issued_at_ms: u64, now_ms: u64, timeout_ms: u32) -> bool {
    now_ms.saturating_sub(issued_at_ms) > u64::from(timeout_ms)
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct Session {
    companion_ready: bool,
    target: Animal,
    request: RequestState,
    /// Last `PI_READY` / `PI_PONG` (ms since boot).
    last_liveness_ms: u64,
    /// Latched so a stale companion is reported once per silence.
    liveness_reported_stale: bool,
}

impl Session {
    pub fn new(target: Animal) -> Self {
        Self {
            companion_ready: false,
            target,
            request: RequestState::Idle,
            last_liveness_ms: 0,
            liveness_reported_stale: false,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn companion_ready(&self) -> bool {
        self.companion_ready
    }

    pub fn target(&self) -> Animal {
        self.target
    }

    pub fn request(&self) -> RequestState {
        self.request
    }

    pub fn request_outstanding(&self) -> bool {
        matches!(self.request, RequestState::AwaitingResponse { .. })
    }

    pub fn last_liveness_ms(&self) -> u64 {
        self.last_liveness_ms
    }

    // ── Request protocol ──────────────────────────────────────

    /// Offer a consumed motion edge to the protocol.
    pub fn on_motion(&mut self, now_ms: u64) -> MotionOutcome {
        if !self.companion_ready {
            debug!("SESSION: motion dropped, companion not ready");
            return MotionOutcome::CompanionNotReady;
        }
        if self.request_outstanding() {
            debug!("SESSION: motion dropped, request already in flight");
            return MotionOutcome::RequestInFlight;
        }
        self.request = RequestState::AwaitingResponse { issued_at_ms: now_ms };
        info!("SESSION: request opened at {} ms", now_ms);
        MotionOutcome::Requested
    }

    /// A verdict line arrived.  Returns `true` if it closed a request.
    pub fn resolve_request(&mut self) -> bool {
        let was_outstanding = self.request_outstanding();
        self.request = RequestState::Idle;
        was_outstanding
    }

    /// Close the request if it has waited too long.
    /// Returns how long it waited, exactly once per request.
    pub fn check_timeout(&mut self, now_ms: u64, timeout_ms: u32) -> Option<u64> {
        match self.request {
            RequestState::AwaitingResponse { issued_at_ms }
                if response_timed_out(issued_at_ms, now_ms, timeout_ms) =>
            {
                self.request = RequestState::Idle;
                let waited = now_ms.saturating_sub(issued_at_ms);
                warn!("SESSION: no verdict after {} ms, request abandoned", waited);
                Some(waited)
            }
            _ => None,
        }
    }

    // ── Companion lifecycle ───────────────────────────────────

    /// `PI_READY` handshake.  The caller re-sends the target afterwards.
    pub fn on_companion_ready(&mut self, now_ms: u64) {
        if !self.companion_ready {
            info!("SESSION: companion ready");
        }
        self.companion_ready = true;
        self.on_liveness_reply(now_ms);
    }

    /// `PI_SHUTTING_DOWN`.  Returns `true` if an outstanding request was abandoned.
    pub fn on_companion_shutdown(&mut self) -> bool {
        self.companion_ready = false;
        let abandoned = self.resolve_request();
        info!(
            "SESSION: companion shutting down{}",
            if abandoned { ", request abandoned" } else { "" }
        );
        abandoned
    }

    pub fn on_liveness_reply(&mut self, now_ms: u64) {
        self.last_liveness_ms = now_ms;
        self.liveness_reported_stale = false;
    }

    /// `true` the first tick a ready companion has been silent for `stale_ms`.
    /// Readiness is left untouched; only `PI_SHUTTING_DOWN` clears it.
    pub fn check_liveness(&mut self, now_ms: u64, stale_ms: u32) -> bool {
        if !self.companion_ready || self.liveness_reported_stale {
            return false;
        }
        if now_ms.saturating_sub(self.last_liveness_ms) >= u64::from(stale_ms) {
            self.liveness_reported_stale = true;
            return true;
        }
        false
    }

    // ── Configuration ─────────────────────────────────────────

    /// Select a new target animal from operator input.
    ///
    /// Only `CAT` / `DOG` (any case) are accepted.  The change applies
    /// locally at once; the caller forwards it to a ready companion.
    pub fn set_target(&mut self, candidate: &str) -> Result<TargetUpdate> {
        let next: Animal = candidate.parse()?;
        if next == self.target {
            return Ok(TargetUpdate::Unchanged(next));
        }
        let from = self.target;
        self.target = next;
        info!("SESSION: target {} -> {}", from, next);
        Ok(TargetUpdate::Changed { from, to: next })
    }
}
