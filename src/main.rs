//! PetFeeder Controller Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single cooperative polling loop and one
//! GPIO interrupt (the PIR motion latch).
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        LogEventSink        Esp32TimeAdapter   │
//! │  (Link + Indicator)     (EventSink)         (TimePort)         │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │           ControllerService (pure logic)               │    │
//! │  │  Session · LED FSM · LineReader · CommandQueue         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  PIR ISR ──▶ MOTION_LATCH (AtomicBool)                          │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use petfeeder::adapters::hardware::HardwareAdapter;
use petfeeder::adapters::log_sink::LogEventSink;
use petfeeder::adapters::time::Esp32TimeAdapter;
use petfeeder::adapters::uart::UartLink;
use petfeeder::app::service::ControllerService;
use petfeeder::config::ControllerConfig;
use petfeeder::drivers::hw_init;
use petfeeder::drivers::status_led::{GpioOutput, StatusLed};
use petfeeder::events::MOTION_LATCH;
use petfeeder::pins;

/// Loop period.  Short relative to every configured interval so timing
/// decisions stay within a few milliseconds of their deadline.
const LOOP_PERIOD_MS: u32 = 10;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PetFeeder controller v{}          ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (compile-time defaults, never persisted) ──
    let config = ControllerConfig::default();
    config.validate()?;

    // ── 3. Peripherals ────────────────────────────────────────
    hw_init::init_peripherals(config.serial_baud)?;
    hw_init::init_isr_service()?;

    let led = StatusLed::new(GpioOutput::new(pins::LED_GPIO));
    let link = UartLink::new(pins::COMPANION_UART);
    let mut hw = HardwareAdapter::new(link, led);
    let clock = Esp32TimeAdapter::new();
    let mut sink = LogEventSink::new();

    // ── 4. Application core ───────────────────────────────────
    let mut app = ControllerService::new(config);
    app.start(&clock, &mut hw, &mut sink);

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        app.tick(&clock, &mut hw, &MOTION_LATCH, &mut sink);
        esp_idf_hal::delay::FreeRtos::delay_ms(LOOP_PERIOD_MS);
    }
}
