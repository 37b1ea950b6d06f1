//! One-shot hardware peripheral initialization.
//!
//! Configures the PIR input, the LED output and the companion UART using
//! raw ESP-IDF sys calls, then installs the GPIO ISR service.  Called once
//! from `main()` before the control loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    UartInitFailed(i32),
    IsrInstallFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::UartInitFailed(rc)   => write!(f, "UART driver install failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

impl From<HwInitError> for crate::error::Error {
    fn from(e: HwInitError) -> Self {
        match e {
            HwInitError::GpioConfigFailed(_) => Self::Init("GPIO config"),
            HwInitError::UartInitFailed(_) => Self::Init("UART driver"),
            HwInitError::IsrInstallFailed(_) => Self::Init("GPIO ISR service"),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals(baud: u32) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_gpio()?;
        init_uart(baud)?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(_baud: u32) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio() -> Result<(), HwInitError> {
    // PIR has a push-pull output; pull-down keeps the line low if unplugged.
    let pir_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::PIR_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_POSEDGE,
    };
    let ret = unsafe { gpio_config(&pir_cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }

    let led_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::LED_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&led_cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }
    unsafe { gpio_set_level(pins::LED_GPIO, 0) };

    info!("hw_init: GPIO configured (PIR={}, LED={})", pins::PIR_GPIO, pins::LED_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was configured during init_gpio(). Main-loop only.
    unsafe { gpio_set_level(pin, if high { 1 } else { 0 }); }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── UART ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_uart(baud: u32) -> Result<(), HwInitError> {
    let port = pins::COMPANION_UART as uart_port_t;
    let cfg = uart_config_t {
        baud_rate: baud as i32,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };
    let ret = unsafe { uart_param_config(port, &cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::UartInitFailed(ret)); }

    // -1 = UART_PIN_NO_CHANGE for RTS/CTS.
    let ret = unsafe { uart_set_pin(port, pins::UART_TX_GPIO, pins::UART_RX_GPIO, -1, -1) };
    if ret != ESP_OK as i32 { return Err(HwInitError::UartInitFailed(ret)); }

    let ret = unsafe {
        uart_driver_install(
            port,
            pins::UART_RX_BUF,
            pins::UART_TX_BUF,
            0,
            core::ptr::null_mut(),
            0,
        )
    };
    if ret != ESP_OK as i32 { return Err(HwInitError::UartInitFailed(ret)); }

    info!("hw_init: UART{} at {} baud (TX={}, RX={})",
        pins::COMPANION_UART, baud, pins::UART_TX_GPIO, pins::UART_RX_GPIO);
    Ok(())
}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
use crate::events::motion_isr_handler;

/// Install the per-pin GPIO ISR service and register the PIR handler.
/// Call after init_peripherals() and before the control loop.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable). The handler registered
    // below only stores to an atomic.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        gpio_set_intr_type(pins::PIR_GPIO, gpio_int_type_t_GPIO_INTR_POSEDGE);
        let ret = gpio_isr_handler_add(pins::PIR_GPIO, Some(motion_isr_handler), core::ptr::null_mut());
        if ret != ESP_OK {
            return Err(HwInitError::IsrInstallFailed(ret));
        }
        gpio_intr_enable(pins::PIR_GPIO);

        info!("hw_init: ISR service installed (PIR rising edge)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}
