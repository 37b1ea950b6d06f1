//! Fuzz target: `ControllerService::tick` on hostile link input
//!
//! The first byte of each chunk drives time and the motion latch; the rest
//! is fed to the service as companion input.  Checks that the controller
//! never panics and never has more than one request outstanding.
//!
//! cargo fuzz run fuzz_controller_input

#![no_main]

use std::cell::Cell;

use libfuzzer_sys::fuzz_target;
use petfeeder::app::events::AppEvent;
use petfeeder::app::ports::{EventSink, IndicatorPort, LinkPort, TimePort};
use petfeeder::app::service::ControllerService;
use petfeeder::config::ControllerConfig;
use petfeeder::error::LinkError;
use petfeeder::events::MotionLatch;

struct Clock(Cell<u64>);

impl TimePort for Clock {
    fn uptime_ms(&self) -> u64 {
        self.0.get()
    }
}

#[derive(Default)]
struct Hw {
    rx: Vec<u8>,
}

impl LinkPort for Hw {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        let n = buf.len().min(self.rx.len());
        buf[..n].copy_from_slice(&self.rx[..n]);
        self.rx.drain(..n);
        Ok(n)
    }

    fn write_line(&mut self, _line: &str) -> Result<(), LinkError> {
        Ok(())
    }
}

impl IndicatorPort for Hw {
    fn set_indicator(&mut self, _on: bool) {}
}

#[derive(Default)]
struct Outstanding {
    open: bool,
}

impl EventSink for Outstanding {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::RequestIssued => {
                assert!(!self.open, "second request while one is outstanding");
                self.open = true;
            }
            AppEvent::RequestResolved { .. }
            | AppEvent::RequestTimedOut { .. }
            | AppEvent::CompanionShutdown { .. } => self.open = false,
            _ => {}
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let mut app = ControllerService::new(ControllerConfig::default());
    let clock = Clock(Cell::new(0));
    let latch = MotionLatch::new();
    let mut hw = Hw::default();
    let mut sink = Outstanding::default();
    app.start(&clock, &mut hw, &mut sink);

    for chunk in data.chunks(16) {
        let (ctl, payload) = chunk.split_first().unwrap_or((&0, &[]));
        clock.0.set(clock.0.get() + u64::from(ctl & 0x7f) * 100);
        if ctl & 0x80 != 0 {
            latch.trigger();
        }
        hw.rx.extend_from_slice(payload);
        app.tick(&clock, &mut hw, &latch, &mut sink);
    }
});
