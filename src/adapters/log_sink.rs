//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to the USB-CDC console in production,
//! not the companion UART).

use log::{info, warn};

use crate::app::events::{AppEvent, DropReason, Verdict};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(target) => {
                info!("START | target={}", target);
            }

            // ── Companion ─────────────────────────────────────
            AppEvent::CompanionReady => info!("LINK | companion ready"),
            AppEvent::CompanionShutdown { request_abandoned } => {
                info!("LINK | companion shutting down | abandoned_request={}", request_abandoned);
            }
            AppEvent::LivenessStale { silent_ms } => {
                warn!("LINK | companion silent for {} ms", silent_ms);
            }
            AppEvent::LineIgnored => info!("LINK | unrecognised line ignored"),
            AppEvent::CommandDropped => warn!("LINK | operator command dropped"),
            AppEvent::LinkFault(e) => warn!("LINK | {}", e),

            // ── Session ───────────────────────────────────────
            AppEvent::RequestIssued => info!("SESSION | MOTION_DETECTED sent, awaiting verdict"),
            AppEvent::MotionDropped(reason) => {
                let why = match reason {
                    DropReason::CompanionNotReady => "companion not ready",
                    DropReason::RequestInFlight => "request in flight",
                };
                info!("SESSION | motion dropped ({})", why);
            }
            AppEvent::RequestResolved { verdict, outstanding } => {
                let late = if *outstanding { "" } else { " (no request outstanding)" };
                match verdict {
                    Verdict::TargetConfirmed(a) => info!("SESSION | {} confirmed{}", a, late),
                    Verdict::OtherConfirmed(Some(a)) => {
                        info!("SESSION | {} confirmed, not the target{}", a, late);
                    }
                    Verdict::OtherConfirmed(None) => {
                        info!("SESSION | unknown species confirmed{}", late);
                    }
                    Verdict::Rejected(r) => info!("SESSION | rejected: {}{}", r.as_str(), late),
                }
            }
            AppEvent::RequestTimedOut { waited_ms } => {
                warn!("SESSION | no verdict after {} ms", waited_ms);
            }
            AppEvent::TargetChanged { from, to } => info!("SESSION | target {} -> {}", from, to),
            AppEvent::TargetUnchanged(a) => info!("SESSION | target already {}", a),
            AppEvent::TargetRejected => warn!("SESSION | invalid target rejected"),
            AppEvent::TargetAcknowledged { animal, matches } => match animal {
                Some(a) => info!("SESSION | companion acked {} | matches={}", a, matches),
                None => warn!("SESSION | companion acked unknown animal"),
            },

            // ── Indicator ─────────────────────────────────────
            AppEvent::IndicatorChanged { from, to } => {
                info!("LED | {} -> {}", from.name(), to.name());
            }
            AppEvent::FlashTest => info!("LED | test flash requested"),

            AppEvent::Heartbeat(s) => match serde_json::to_string(s) {
                Ok(json) => info!("STATUS | {}", json),
                Err(_) => info!("STATUS | {:?}", s),
            },
        }
    }
}
