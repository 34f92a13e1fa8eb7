//! Power switch safety state machine.
//!
//! Owns the five pin channels of the relay output and decides when the
//! downstream device may actually be de-energized:
//!
//! ```text
//!        power_on()                secure_power_off()
//!  Off ────────────▶ On ─────────────────────────────▶ ShuttingDown
//!   ▲                │                                     │
//!   │ hard_power_off │                current below threshold
//!   └────────────────┴─────────────────────────────────────┘
//! ```
//!
//! A graceful shutdown asserts the shutdown-signal line toward the device
//! and then polls the current sensor; the relay is only opened once the
//! measured load drops below the configured threshold. The poll never
//! blocks — a pending shutdown is simply re-driven on a later tick.
//!
//! `hard_power_off` bypasses the current check. It is reserved for the
//! forced safe default at startup and for desync correction, not for
//! routine shutdown.

use log::{debug, info};

use crate::app::ports::PinChannel;
use crate::config::CurrentSenseConfig;

// ---------------------------------------------------------------------------
// Current sensing
// ---------------------------------------------------------------------------

/// Convert an averaged raw ADC reading to load current in milliamps.
///
/// The hall sensor idles at half the supply voltage; the magnitude of the
/// deviation, divided by the transfer ratio, is the load current in either
/// direction (millivolts over volts-per-amp yields milliamps).
pub fn load_current_ma(raw: u16, cal: &CurrentSenseConfig) -> f32 {
    let measured_mv = cal.supply_mv * f32::from(raw) / f32::from(cal.adc_full_scale);
    let offset_mv = (cal.supply_mv / 2.0 - measured_mv).abs();
    offset_mv / cal.volts_per_amp
}

/// Strict threshold check: current at/above the limit counts as a live load.
pub fn load_present(current_ma: f32, cal: &CurrentSenseConfig) -> bool {
    current_ma >= cal.threshold_ma
}

// ---------------------------------------------------------------------------
// Switch state
// ---------------------------------------------------------------------------

/// Logical state of the power output, derived from the two flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    /// Output de-energized.
    Off,
    /// Output energized.
    On,
    /// Output still energized, graceful shutdown pending current fall.
    ShuttingDown,
}

// ---------------------------------------------------------------------------
// PowerSwitch
// ---------------------------------------------------------------------------

/// The safety state machine over five owned pin channels.
///
/// The power-off command line is inverted relay logic: driving it high cuts
/// the output, driving it low energizes it. The shutdown line is listened
/// to by the downstream device and asks it to halt cleanly.
pub struct PowerSwitch<P: PinChannel> {
    /// Digital out. High = relay open (output cut), low = output energized.
    power_off_cmd: P,
    /// Digital out. High = request downstream OS shutdown.
    shutdown_cmd: P,
    /// Analog in. Hall sensor on the output rail.
    current_sense: P,
    /// Digital in. High = physical "lock power on" override asserted.
    lock_switch: P,
    /// Digital in. High = auto mode (remote commands + dead-man timeout).
    auto_switch: P,

    cal: CurrentSenseConfig,

    /// Output considered powered.
    output_state: bool,
    /// A graceful shutdown sequence is in progress.
    shutdown_requested: bool,
}

impl<P: PinChannel> PowerSwitch<P> {
    /// Bind the switch to its five channels. Both flags start false; the
    /// application forces [`hard_power_off`](Self::hard_power_off) at
    /// startup so the physical lines match.
    pub fn new(
        power_off_cmd: P,
        shutdown_cmd: P,
        current_sense: P,
        lock_switch: P,
        auto_switch: P,
        cal: CurrentSenseConfig,
    ) -> Self {
        Self {
            power_off_cmd,
            shutdown_cmd,
            current_sense,
            lock_switch,
            auto_switch,
            cal,
            output_state: false,
            shutdown_requested: false,
        }
    }

    // ── Transitions ───────────────────────────────────────────

    /// Energize the output. Idempotent; also cancels a pending graceful
    /// shutdown by releasing the shutdown line.
    pub fn power_on(&mut self) {
        info!("power on");
        self.power_off_cmd.set(false);
        self.shutdown_cmd.set(false);
        self.shutdown_requested = false;
        self.output_state = true;
    }

    /// Cut the output immediately, without the current-draw check.
    pub fn hard_power_off(&mut self) {
        info!("hard power off");
        self.power_off_cmd.set(true);
        self.shutdown_cmd.set(false);
        self.shutdown_requested = false;
        self.output_state = false;
    }

    /// Drive one step of the graceful shutdown sequence.
    ///
    /// Asserts the shutdown line, then measures load current; if the load
    /// has stopped drawing, completes the Off transition and returns `true`.
    /// Otherwise returns `false` with the shutdown left pending — callers
    /// re-invoke on a later tick. Never blocks.
    pub fn secure_power_off(&mut self) -> bool {
        self.shutdown_cmd.set(true);
        if !self.shutdown_requested {
            info!("secure power off: shutdown requested, waiting for current to fall");
        }
        self.shutdown_requested = true;

        if self.is_really_power_on() {
            return false;
        }

        self.power_off_cmd.set(true);
        self.shutdown_cmd.set(false);
        self.shutdown_requested = false;
        self.output_state = false;
        info!("secure power off: load released, output de-energized");
        true
    }

    // ── Queries ───────────────────────────────────────────────

    /// Measure whether the output is physically drawing current,
    /// independent of the logical state. Used to detect desync.
    pub fn is_really_power_on(&mut self) -> bool {
        let raw = self.current_sense.read(self.cal.samples);
        let current_ma = load_current_ma(raw, &self.cal);
        debug!("current sense: raw={} -> {:.1} mA", raw, current_ma);
        load_present(current_ma, &self.cal)
    }

    /// True while the physical "lock power on" switch is asserted.
    /// Takes precedence over auto mode.
    pub fn is_lock_power_on(&mut self) -> bool {
        self.lock_switch.read(1) == 1
    }

    /// True while the physical auto-mode switch is asserted.
    /// With neither switch asserted the current state is simply held.
    pub fn is_auto_mode(&mut self) -> bool {
        self.auto_switch.read(1) == 1
    }

    /// Logical output flag: the device is considered powered.
    pub fn output_state(&self) -> bool {
        self.output_state
    }

    /// A graceful shutdown sequence is in progress.
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested
    }

    /// Derived three-state view of the two flags.
    pub fn state(&self) -> SwitchState {
        match (self.output_state, self.shutdown_requested) {
            (true, true) => SwitchState::ShuttingDown,
            (true, false) => SwitchState::On,
            (false, _) => SwitchState::Off,
        }
    }
}
