//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the companion UART and the status LED, exposing them through
//! [`LinkPort`] and [`IndicatorPort`].  On non-espidf targets the
//! underlying drivers use cfg-gated simulation stubs.

use embedded_hal::digital::OutputPin;

use crate::adapters::uart::UartLink;
use crate::app::ports::{IndicatorPort, LinkPort};
use crate::drivers::status_led::StatusLed;
use crate::error::LinkError;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P: OutputPin> {
    link: UartLink,
    led: StatusLed<P>,
}

impl<P: OutputPin> HardwareAdapter<P> {
    pub fn new(link: UartLink, led: StatusLed<P>) -> Self {
        Self { link, led }
    }

    pub fn link_mut(&mut self) -> &mut UartLink {
        &mut self.link
    }

    pub fn led(&self) -> &StatusLed<P> {
        &self.led
    }
}

// ── LinkPort implementation ───────────────────────────────────

impl<P: OutputPin> LinkPort for HardwareAdapter<P> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        self.link.read(buf)
    }

    fn write_line(&mut self, line: &str) -> Result<(), LinkError> {
        self.link.write_line(line)
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl<P: OutputPin> IndicatorPort for HardwareAdapter<P> {
    fn set_indicator(&mut self, on: bool) {
        self.led.set(on);
    }
}
