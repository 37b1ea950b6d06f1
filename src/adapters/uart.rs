//! UART link adapter.
//!
//! Implements [`LinkPort`] over the companion UART.
//!
//! - **`target_os = "espidf"`** — raw `uart_read_bytes` with a zero tick
//!   timeout (never blocks the control loop) and `uart_write_bytes`.
//! - **`not(target_os = "espidf")`** — in-memory buffers for host-side
//!   simulation: inject inbound bytes, inspect what was written.

use crate::app::ports::LinkPort;
use crate::error::LinkError;

#[cfg(not(target_os = "espidf"))]
use std::collections::VecDeque;

pub struct UartLink {
    #[cfg(target_os = "espidf")]
    port: i32,
    #[cfg(not(target_os = "espidf"))]
    rx: VecDeque<u8>,
    #[cfg(not(target_os = "espidf"))]
    tx: Vec<u8>,
}

impl UartLink {
    /// Wrap a UART whose driver was installed by `hw_init::init_peripherals`.
    #[cfg(target_os = "espidf")]
    pub fn new(port: i32) -> Self {
        Self { port }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(_port: i32) -> Self {
        Self {
            rx: VecDeque::new(),
            tx: Vec::new(),
        }
    }

    /// Queue bytes as if the companion had sent them.
    #[cfg(not(target_os = "espidf"))]
    pub fn inject(&mut self, data: &[u8]) {
        self.rx.extend(data);
    }

    /// Drain everything written so far.
    #[cfg(not(target_os = "espidf"))]
    pub fn take_written(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.tx)
    }
}

#[cfg(target_os = "espidf")]
impl LinkPort for UartLink {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        // SAFETY: the driver for `port` is installed before the loop starts;
        // `buf` is valid for `buf.len()` bytes.  Zero ticks = non-blocking.
        let n = unsafe {
            esp_idf_svc::sys::uart_read_bytes(
                self.port as esp_idf_svc::sys::uart_port_t,
                buf.as_mut_ptr().cast(),
                buf.len() as u32,
                0,
            )
        };
        usize::try_from(n).map_err(|_| LinkError::ReadFailed)
    }

    fn write_line(&mut self, line: &str) -> Result<(), LinkError> {
        // SAFETY: `line` is valid for `line.len()` bytes; the driver copies
        // into its TX ring buffer before returning.
        let n = unsafe {
            esp_idf_svc::sys::uart_write_bytes(
                self.port as esp_idf_svc::sys::uart_port_t,
                line.as_ptr().cast(),
                line.len(),
            )
        };
        if usize::try_from(n).ok() == Some(line.len()) {
            Ok(())
        } else {
            Err(LinkError::WriteFailed)
        }
    }
}

#[cfg(not(target_os = "espidf"))]
impl LinkPort for UartLink {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        let n = buf.len().min(self.rx.len());
        for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write_line(&mut self, line: &str) -> Result<(), LinkError> {
        self.tx.extend_from_slice(line.as_bytes());
        Ok(())
    }
}
