//! Switch service — the hexagonal core.
//!
//! [`SwitchService`] owns the power switch, the dead-man timer, and the
//! status reporter, and reconciles their three independently-timed inputs
//! (network commands, physical switches, elapsed time) into one consistent
//! state machine. All I/O flows through port traits injected at call
//! sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  PacketTransport ──▶ ┌───────────────────────────────┐ ──▶ EventSink
//!                      │         SwitchService          │
//!       PinChannel ◀──│  PowerSwitch · ShutdownTimer   │──▶ PacketTransport
//!                      └───────────────────────────────┘     (status out)
//! ```
//!
//! Everything runs on the single cooperative loop: once per inbound packet
//! during dispatch, once per tick during reconciliation. Nothing here
//! blocks and nothing needs locking.

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::packet::{Command, Packet};
use crate::power::{PowerSwitch, SwitchState};
use crate::report::StatusReporter;
use crate::timer::ShutdownTimer;

use super::events::{AppEvent, Trigger};
use super::ports::{EventSink, PacketTransport, PinChannel};

// ───────────────────────────────────────────────────────────────
// SwitchService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct SwitchService<P: PinChannel> {
    switch: PowerSwitch<P>,
    timer: ShutdownTimer,
    reporter: StatusReporter,
    tick_count: u64,
}

impl<P: PinChannel> SwitchService<P> {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch the output — call [`start`](Self::start) next.
    pub fn new(switch: PowerSwitch<P>, config: &SystemConfig) -> Self {
        Self {
            switch,
            timer: ShutdownTimer::new(config.shutdown_delay_or_default()),
            reporter: StatusReporter::new(config.node_id, config.coordinator_id),
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Force the safe Off default and arm the dead-man timer.
    /// The relay state across a reset is unknown, so it is never trusted.
    pub fn start(&mut self, now_ms: u32, sink: &mut impl EventSink) {
        self.switch.hard_power_off();
        self.timer.reset(now_ms);
        sink.emit(&AppEvent::Started);
        info!("switch service started, output forced off");
    }

    // ── Command dispatch (per inbound packet) ─────────────────

    /// Interpret one received packet.
    ///
    /// ENABLE is honored regardless of mode; PING only in auto mode, where
    /// it both extends the dead-man window and recovers a powered-off or
    /// stalled-shutdown node. Unrecognized kinds are ignored so one bad
    /// packet can never stall the loop.
    pub fn handle_packet(&mut self, packet: &Packet, now_ms: u32, sink: &mut impl EventSink) {
        match packet.command {
            Command::Enable => {
                if packet.flag() {
                    if !self.switch.output_state() {
                        self.switch.power_on();
                        self.timer.reset(now_ms);
                        sink.emit(&AppEvent::SwitchedOn(Trigger::Command));
                    }
                } else if self.switch.output_state() {
                    // The timer is left running; only power-on triggers reset it.
                    let newly_requested = !self.switch.shutdown_requested();
                    if self.switch.secure_power_off() {
                        sink.emit(&AppEvent::SwitchedOff);
                    } else if newly_requested {
                        sink.emit(&AppEvent::ShutdownStarted(Trigger::Command));
                    }
                }
            }
            Command::Ping => {
                if self.switch.is_auto_mode() {
                    self.timer.reset(now_ms);
                    if !self.switch.output_state() || self.switch.shutdown_requested() {
                        self.switch.power_on();
                        sink.emit(&AppEvent::SwitchedOn(Trigger::Ping));
                    }
                }
            }
            Command::Config => {
                // Reserved for remote reconfiguration; nothing to act on yet.
            }
            Command::Data => {
                debug!("inbound DATA ignored (status reports are outbound only)");
            }
        }
    }

    // ── Per-tick reconciliation ───────────────────────────────

    /// Run one reconciliation pass, in priority order:
    ///
    /// 1. progress a pending graceful shutdown,
    /// 2. otherwise correct a logical/physical desync (auto mode only),
    /// 3. enforce the lock-power-on override,
    /// 4. otherwise start a graceful shutdown on dead-man expiry.
    ///
    /// Rule 1 runs before rule 2 so a pending shutdown — during which the
    /// load legitimately stops drawing — is never mistaken for a desync.
    pub fn tick(&mut self, now_ms: u32, sink: &mut impl EventSink) {
        self.tick_count += 1;

        if self.switch.shutdown_requested() {
            if self.switch.secure_power_off() {
                sink.emit(&AppEvent::SwitchedOff);
            }
        } else if !self.switch.is_lock_power_on()
            && self.switch.output_state()
            && !self.switch.is_really_power_on()
        {
            // Lock mode trusts the logical state unconditionally.
            warn!("output flagged on but no load current measured, correcting");
            self.switch.hard_power_off();
            sink.emit(&AppEvent::DesyncCorrected);
        }

        if self.switch.is_lock_power_on() {
            if !self.switch.output_state() || self.switch.shutdown_requested() {
                self.switch.power_on();
                self.timer.reset(now_ms);
                sink.emit(&AppEvent::SwitchedOn(Trigger::LockSwitch));
            }
        } else if self.switch.is_auto_mode()
            && self.switch.output_state()
            && !self.switch.shutdown_requested()
            && self.timer.is_outdated(now_ms)
        {
            warn!("dead-man window elapsed with no keep-alive");
            sink.emit(&AppEvent::DeadManExpired);
            if self.switch.secure_power_off() {
                sink.emit(&AppEvent::SwitchedOff);
            } else {
                sink.emit(&AppEvent::ShutdownStarted(Trigger::DeadMan));
            }
        }
    }

    // ── Status reporting ──────────────────────────────────────

    /// Enqueue the per-tick status packet. Best effort.
    pub fn report_status(&self, transport: &mut impl PacketTransport) {
        self.reporter.report(self.switch.output_state(), transport);
    }

    // ── Queries / reconfiguration ─────────────────────────────

    /// Current derived switch state.
    pub fn state(&self) -> SwitchState {
        self.switch.state()
    }

    /// Logical output flag.
    pub fn output_state(&self) -> bool {
        self.switch.output_state()
    }

    /// A graceful shutdown is pending.
    pub fn shutdown_requested(&self) -> bool {
        self.switch.shutdown_requested()
    }

    /// Total reconciliation ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Runtime reconfiguration of the dead-man delay (baseline untouched).
    pub fn set_shutdown_delay(&mut self, delay_ms: u32) {
        self.timer.set_delay(delay_ms);
    }

    /// Adopt the identifier assigned by the coordinator.
    pub fn set_node_id(&mut self, node_id: u8) {
        self.reporter.set_node_id(node_id);
    }
}
