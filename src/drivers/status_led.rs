//! Single-colour status LED driver.
//!
//! Generic over any [`embedded_hal::digital::OutputPin`].
//!
//! ## Dual-target design
//!
//! On ESP-IDF: [`GpioOutput`] drives the pin via hw_init.
//! On host/test: [`GpioOutput`] is a no-op; tests supply their own pin.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, OutputPin};
use log::warn;

use crate::drivers::hw_init;

pub struct StatusLed<P: OutputPin> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> StatusLed<P> {
    /// Takes ownership of the pin and drives it low.
    pub fn new(mut pin: P) -> Self {
        if pin.set_low().is_err() {
            warn!("LED: initial set_low failed");
        }
        Self { pin, on: false }
    }

    pub fn set(&mut self, on: bool) {
        let result = if on { self.pin.set_high() } else { self.pin.set_low() };
        match result {
            Ok(()) => self.on = on,
            Err(e) => warn!("LED: pin write failed: {:?}", e),
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Release the underlying pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

/// Raw ESP-IDF GPIO output configured by [`hw_init::init_peripherals`].
pub struct GpioOutput {
    pin: i32,
}

impl GpioOutput {
    pub const fn new(pin: i32) -> Self {
        Self { pin }
    }
}

impl ErrorType for GpioOutput {
    type Error = Infallible;
}

impl OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), Infallible> {
        hw_init::gpio_write(self.pin, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        hw_init::gpio_write(self.pin, true);
        Ok(())
    }
}
