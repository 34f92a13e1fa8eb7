//! Outbound application events.
//!
//! The [`SwitchService`](super::service::SwitchService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them — log to serial, feed a future
//! coordinator-side audit trail, etc.

/// What caused a power-state action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// An ENABLE command packet.
    Command,
    /// A PING keep-alive recovering a stalled or powered-off node.
    Ping,
    /// The physical lock-power-on override switch.
    LockSwitch,
    /// The dead-man timer expired in auto mode.
    DeadMan,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (output forced to the safe Off default).
    Started,

    /// The output was energized.
    SwitchedOn(Trigger),

    /// A graceful shutdown began: the shutdown signal line is asserted and
    /// the service is now waiting for load current to fall.
    ShutdownStarted(Trigger),

    /// A graceful shutdown completed; the output is de-energized.
    SwitchedOff,

    /// Logical state said "on" but no load current was measured; the output
    /// was hard powered off to resynchronize.
    DesyncCorrected,

    /// The dead-man window elapsed without a keep-alive.
    DeadManExpired,
}
