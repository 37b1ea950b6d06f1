//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements     | Connects to               |
//! |-------------|----------------|---------------------------|
//! | `hardware`  | LinkPort       | companion UART            |
//! |             | IndicatorPort  | status LED GPIO           |
//! | `log_sink`  | EventSink      | console log output        |
//! | `time`      | TimePort       | ESP32 system timer        |
//! | `uart`      | LinkPort       | ESP-IDF UART driver       |

pub mod hardware;
pub mod log_sink;
pub mod time;
pub mod uart;
