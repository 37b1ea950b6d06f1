//! Serial link to the companion: line framing and message vocabulary.
//!
//! ```text
//! UART bytes ──▶ LineReader ──▶ Message::parse ──▶ ControllerService
//! ControllerService ──▶ Outbound ──▶ encode_line ──▶ UART bytes
//! ```

pub mod codec;
pub mod messages;

pub use codec::{LineReader, MAX_LINE_LEN, encode_line};
pub use messages::{Message, Outbound, RejectReason};
