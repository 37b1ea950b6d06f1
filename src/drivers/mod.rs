//! Hardware initialisation and peripheral drivers.

pub mod hw_init;
pub mod status_led;
