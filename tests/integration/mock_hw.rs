//! Mock hardware adapter for integration tests.
//!
//! Records every line written and every LED level so tests can assert on
//! the full history without touching real UART or GPIO registers.

use std::cell::Cell;
use std::collections::VecDeque;

use petfeeder::app::events::AppEvent;
use petfeeder::app::ports::{EventSink, IndicatorPort, LinkPort, TimePort};
use petfeeder::app::service::ControllerService;
use petfeeder::config::ControllerConfig;
use petfeeder::error::LinkError;
use petfeeder::events::MotionLatch;

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Bytes the companion has "sent", not yet read.
    pub rx: VecDeque<u8>,
    /// Lines the controller wrote, terminator stripped.
    pub sent: Vec<String>,
    /// Every level written to the LED, in order.
    pub led_writes: Vec<bool>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            rx: VecDeque::new(),
            sent: Vec::new(),
            led_writes: Vec::new(),
            fail_reads: false,
            fail_writes: false,
        }
    }

    pub fn push_line(&mut self, line: &str) {
        self.rx.extend(line.as_bytes());
        self.rx.push_back(b'\n');
    }

    pub fn led(&self) -> bool {
        self.led_writes.last().copied().unwrap_or(false)
    }

    pub fn count_sent(&self, line: &str) -> usize {
        self.sent.iter().filter(|l| l.as_str() == line).count()
    }

    pub fn take_sent(&mut self) -> Vec<String> {
        std::mem::take(&mut self.sent)
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkPort for MockHardware {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        if self.fail_reads {
            return Err(LinkError::ReadFailed);
        }
        let n = buf.len().min(self.rx.len());
        for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write_line(&mut self, line: &str) -> Result<(), LinkError> {
        if self.fail_writes {
            return Err(LinkError::WriteFailed);
        }
        assert!(line.ends_with('\n'), "every line must be newline-terminated");
        self.sent.push(line.trim_end_matches('\n').to_owned());
        Ok(())
    }
}

impl IndicatorPort for MockHardware {
    fn set_indicator(&mut self, on: bool) {
        self.led_writes.push(on);
    }
}

// ── ManualClock ───────────────────────────────────────────────

pub struct ManualClock(Cell<u64>);

#[allow(dead_code)]
impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self(Cell::new(start_ms))
    }

    pub fn set(&self, ms: u64) {
        self.0.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl TimePort for ManualClock {
    fn uptime_ms(&self) -> u64 {
        self.0.get()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Rig: service + mocks wired together ───────────────────────

pub struct Rig {
    pub app: ControllerService,
    pub hw: MockHardware,
    pub clock: ManualClock,
    pub latch: MotionLatch,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    /// Started service at t = 0 with the boot line already consumed.
    pub fn boot() -> Self {
        Self::boot_with(ControllerConfig::default())
    }

    pub fn boot_with(config: ControllerConfig) -> Self {
        let mut rig = Self {
            app: ControllerService::new(config),
            hw: MockHardware::new(),
            clock: ManualClock::new(0),
            latch: MotionLatch::new(),
            sink: RecordingSink::new(),
        };
        rig.app.start(&rig.clock, &mut rig.hw, &mut rig.sink);
        assert_eq!(rig.hw.take_sent(), ["ARDUINO_BOOTING"]);
        rig
    }

    /// Boot, then complete the `PI_READY` handshake at t = 0.
    pub fn ready() -> Self {
        let mut rig = Self::boot();
        rig.line("PI_READY");
        rig.tick();
        assert_eq!(rig.hw.take_sent(), ["TARGET_ANIMAL:DOG"]);
        rig
    }

    pub fn tick(&mut self) {
        self.app.tick(&self.clock, &mut self.hw, &self.latch, &mut self.sink);
    }

    pub fn tick_at(&mut self, ms: u64) {
        self.clock.set(ms);
        self.tick();
    }

    pub fn line(&mut self, line: &str) {
        self.hw.push_line(line);
    }

    pub fn motion(&mut self) {
        self.latch.trigger();
    }
}
