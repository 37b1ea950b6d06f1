//! Line vocabulary shared with the companion and the operator console.
//!
//! Every inbound line classifies into exactly one [`Message`]; nothing
//! is rejected at this layer.  Unrecognised text becomes
//! [`Message::Unknown`] and the dispatcher decides what to do with it.

use core::fmt;

use crate::session::Animal;

/// Why the companion closed a request without confirming an animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// `WRONG_ANIMAL_DETECTED`
    WrongAnimal,
    /// `NO_ANIMAL_DETECTED_BY_AI`
    NoAnimal,
    /// `AI_NOT_READY`
    AiNotReady,
    /// `NO_TARGET_CONFIGURED`
    NoTargetConfigured,
    /// `PI_ERR_UNK_TARGET:<X>`, `PI_ERROR_PROCESSING`, other `PI_ERR…`
    CompanionError,
}

impl RejectReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WrongAnimal => "wrong animal",
            Self::NoAnimal => "no animal",
            Self::AiNotReady => "recogniser not ready",
            Self::NoTargetConfigured => "no target configured",
            Self::CompanionError => "companion error",
        }
    }
}

/// A classified inbound line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message<'a> {
    // ── Companion → controller ────────────────────────────────
    PiReady,
    PiShuttingDown,
    PiPong,
    /// `PI_ACK_TARGET:<X>`; `None` if `<X>` is not a known animal.
    AckTarget(Option<Animal>),
    /// `<X>_CONFIRMED`; `None` for an unrecognised species.
    Confirmed(Option<Animal>),
    Rejected(RejectReason),

    // ── Operator → controller ─────────────────────────────────
    /// `SET_TARGET:<raw>`; the argument is validated by the session.
    SetTarget(&'a str),
    TestFlash,

    Unknown(&'a str),
}

const ACK_TARGET_PREFIX: &str = "PI_ACK_TARGET:";
const SET_TARGET_PREFIX: &str = "SET_TARGET:";
const CONFIRMED_SUFFIX: &str = "_CONFIRMED";

impl<'a> Message<'a> {
    /// Classify one trimmed line.
    pub fn parse(line: &'a str) -> Self {
        match line {
            "PI_READY" => return Self::PiReady,
            "PI_SHUTTING_DOWN" => return Self::PiShuttingDown,
            "PI_PONG" => return Self::PiPong,
            "TEST_FLASH" => return Self::TestFlash,
            "WRONG_ANIMAL_DETECTED" => return Self::Rejected(RejectReason::WrongAnimal),
            "NO_ANIMAL_DETECTED_BY_AI" => return Self::Rejected(RejectReason::NoAnimal),
            "AI_NOT_READY" => return Self::Rejected(RejectReason::AiNotReady),
            "NO_TARGET_CONFIGURED" => return Self::Rejected(RejectReason::NoTargetConfigured),
            _ => {}
        }

        if let Some(animal) = line.strip_prefix(ACK_TARGET_PREFIX) {
            return Self::AckTarget(animal.parse().ok());
        }
        if line.starts_with("PI_ERR") {
            return Self::Rejected(RejectReason::CompanionError);
        }
        if let Some(arg) = line.strip_prefix(SET_TARGET_PREFIX) {
            return Self::SetTarget(arg);
        }
        if let Some(species) = line.strip_suffix(CONFIRMED_SUFFIX) {
            if !species.is_empty() {
                return Self::Confirmed(species.parse().ok());
            }
        }
        Self::Unknown(line)
    }
}

/// Lines the controller sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outbound {
    Booting,
    MotionDetected,
    Heartbeat,
    TargetAnimal(Animal),
}

impl fmt::Display for Outbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Booting => f.write_str("ARDUINO_BOOTING"),
            Self::MotionDetected => f.write_str("MOTION_DETECTED"),
            Self::Heartbeat => f.write_str("ARDUINO_HEARTBEAT"),
            Self::TargetAnimal(a) => write!(f, "TARGET_ANIMAL:{a}"),
        }
    }
}
