//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SwitchService (domain)
//! ```
//!
//! Driven adapters (GPIO/ADC channels, the radio transport, NVS storage,
//! event sinks) implement these traits. The domain core consumes them via
//! generics and never touches hardware directly.

use crate::config::SystemConfig;
use crate::packet::Packet;

// ───────────────────────────────────────────────────────────────
// Pin channel port (driven adapter: hardware ↔ domain)
// ───────────────────────────────────────────────────────────────

/// A single digital or analog line.
///
/// This is the only hardware contract the power switch requires: an
/// oversampled read and a binary drive. Analog inputs return the averaged
/// raw converter value; digital inputs return 0 or 1 regardless of the
/// requested sample count.
pub trait PinChannel {
    /// Read the line, averaging `samples` conversions.
    fn read(&mut self, samples: u16) -> u16;

    /// Drive the line high (`true`) or low (`false`). No-op for inputs.
    fn set(&mut self, high: bool);
}

// ───────────────────────────────────────────────────────────────
// Packet transport port (driven adapter: domain ↔ radio)
// ───────────────────────────────────────────────────────────────

/// Decoded-packet gateway to the radio transport.
///
/// Framing, retries, acknowledgment and identifier negotiation live in the
/// transport collaborator. The core only drains inbound packets once per
/// tick and queues outbound ones best-effort — delivery guarantees are the
/// transport's business, so `enqueue_outbound` is infallible and drops on a
/// full queue.
pub trait PacketTransport {
    /// Queue a packet for transmission.
    fn enqueue_outbound(&mut self, packet: Packet);

    /// Take the next received packet, if any. Never blocks.
    fn next_inbound(&mut self) -> Option<Packet>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, a future
/// coordinator-side audit trail, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting. Invalid
/// ranges should be rejected with [`ConfigError::ValidationFailed`], not
/// silently clamped — a corrupted or hostile stored blob must not be able
/// to disable the current-draw safety check (e.g. `threshold_ma = 0`).
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
