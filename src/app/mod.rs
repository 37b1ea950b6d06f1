//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the controller's rules: the request protocol with
//! the companion, target configuration, and indicator orchestration.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
