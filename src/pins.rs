//! GPIO / peripheral pin assignments for the PetFeeder controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Motion sensor (HC-SR501 PIR)
// ---------------------------------------------------------------------------

/// Digital input: PIR output, HIGH while motion is sensed.
/// Interrupt on the rising edge.
pub const PIR_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Status LED
// ---------------------------------------------------------------------------

/// Digital output: indicator LED (active HIGH).
pub const LED_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// Companion link (UART1)
// ---------------------------------------------------------------------------

/// ESP-IDF UART peripheral used for the companion link.
pub const COMPANION_UART: i32 = 1;
pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;

/// UART driver ring buffer sizes (bytes).
pub const UART_RX_BUF: i32 = 256;
pub const UART_TX_BUF: i32 = 256;

/// UART hardware RX FIFO depth on the ESP32-S3 (bytes).
pub const UART_HW_FIFO_LEN: usize = 128;
