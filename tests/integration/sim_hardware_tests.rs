//! The production adapters wired together in host simulation mode.
//!
//! Same wiring as `main.rs`, minus the ESP-IDF bootstrap: the UART link
//! runs on in-memory buffers and the LED pin is a no-op.

use petfeeder::adapters::hardware::HardwareAdapter;
use petfeeder::adapters::log_sink::LogEventSink;
use petfeeder::adapters::uart::UartLink;
use petfeeder::app::service::ControllerService;
use petfeeder::config::ControllerConfig;
use petfeeder::drivers::hw_init;
use petfeeder::drivers::status_led::{GpioOutput, StatusLed};
use petfeeder::events::MotionLatch;
use petfeeder::fsm::StateId;
use petfeeder::pins;

use super::mock_hw::ManualClock;

fn written_lines(hw: &mut HardwareAdapter<GpioOutput>) -> Vec<String> {
    String::from_utf8(hw.link_mut().take_written())
        .expect("controller writes ASCII")
        .lines()
        .map(str::to_owned)
        .collect()
}

#[test]
fn production_wiring_runs_a_full_cycle() {
    let config = ControllerConfig::default();
    config.validate().expect("defaults are valid");
    hw_init::init_peripherals(config.serial_baud).expect("sim init");
    hw_init::init_isr_service().expect("sim isr");

    let led = StatusLed::new(GpioOutput::new(pins::LED_GPIO));
    let mut hw = HardwareAdapter::new(UartLink::new(pins::COMPANION_UART), led);
    let clock = ManualClock::new(0);
    let latch = MotionLatch::new();
    let mut sink = LogEventSink::new();
    let mut app = ControllerService::new(config);

    app.start(&clock, &mut hw, &mut sink);
    assert_eq!(written_lines(&mut hw), ["ARDUINO_BOOTING"]);

    hw.link_mut().inject(b"PI_READY\n");
    clock.set(100);
    app.tick(&clock, &mut hw, &latch, &mut sink);
    assert_eq!(written_lines(&mut hw), ["TARGET_ANIMAL:DOG"]);

    latch.trigger();
    clock.set(500);
    app.tick(&clock, &mut hw, &latch, &mut sink);
    assert_eq!(written_lines(&mut hw), ["MOTION_DETECTED"]);
    assert!(hw.led().is_on());

    hw.link_mut().inject(b"DOG_CONFIRMED\n");
    clock.set(900);
    app.tick(&clock, &mut hw, &latch, &mut sink);
    assert_eq!(app.indicator_state(), StateId::Flashing);

    clock.set(10_000);
    app.tick(&clock, &mut hw, &latch, &mut sink);
    assert_eq!(written_lines(&mut hw), ["ARDUINO_HEARTBEAT"]);
    assert_eq!(app.indicator_state(), StateId::Idle);
    assert!(!hw.led().is_on());
}
