//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements      | Connects to                     |
//! |------------|-----------------|---------------------------------|
//! | `gpio`     | PinChannel      | ESP32 GPIO/ADC, embedded-hal, sim |
//! | `log_sink` | EventSink       | Serial log output               |
//! | `nvs`      | ConfigPort      | NVS / in-memory store           |
//! | `radio`    | PacketTransport | Bounded queues fed by the radio |
//! | `time`     | —               | ESP32 system timer / Instant    |

pub mod gpio;
pub mod log_sink;
pub mod nvs;
pub mod radio;
pub mod time;
