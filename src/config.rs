//! System configuration parameters
//!
//! All tunable parameters for the time-switch node.
//! Values can be overridden via NVS (non-volatile storage).

use serde::{Deserialize, Serialize};

/// Fallback shutdown delay when the persisted value is zero/unset.
pub const DEFAULT_SHUTDOWN_DELAY_MS: u32 = 30_000;

/// Calibration for the ACS712-style hall current sensor on the output rail.
///
/// The sensor idles at half the supply voltage and swings by a fixed number
/// of volts per ampere of load current, in either direction. All values are
/// injected rather than compiled in so tests can feed simulated readings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CurrentSenseConfig {
    /// Supply / ADC reference voltage (millivolts).
    pub supply_mv: f32,
    /// Full-scale raw ADC reading (1023 for the 10-bit converter).
    pub adc_full_scale: u16,
    /// Sensor transfer ratio (volts per ampere).
    pub volts_per_amp: f32,
    /// Load current at/above which the output counts as really powered (mA).
    pub threshold_ma: f32,
    /// Oversampling count for one current measurement.
    pub samples: u16,
}

impl Default for CurrentSenseConfig {
    fn default() -> Self {
        Self {
            supply_mv: 5000.0,
            adc_full_scale: 1023,
            volts_per_amp: 0.185, // ACS712-05B
            threshold_ma: 100.0,
            samples: 10,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Power supervision ---
    /// Dead-man shutdown delay (milliseconds). 0 means "unset" and resolves
    /// to [`DEFAULT_SHUTDOWN_DELAY_MS`] at startup.
    pub shutdown_delay_ms: u32,
    /// Current sensor calibration for the secure power-off check.
    pub current_sense: CurrentSenseConfig,

    // --- Protocol ---
    /// This node's identifier on the radio network.
    pub node_id: u8,
    /// Identifier of the network coordinator that receives status reports.
    pub coordinator_id: u8,

    // --- Timing ---
    /// Main loop idle delay (milliseconds).
    pub loop_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            shutdown_delay_ms: DEFAULT_SHUTDOWN_DELAY_MS,
            current_sense: CurrentSenseConfig::default(),

            node_id: 0, // unassigned until identifier negotiation completes
            coordinator_id: 1,

            loop_interval_ms: 100,
        }
    }
}

impl SystemConfig {
    /// The effective dead-man delay: a persisted 0 is treated as unset.
    pub fn shutdown_delay_or_default(&self) -> u32 {
        if self.shutdown_delay_ms == 0 {
            DEFAULT_SHUTDOWN_DELAY_MS
        } else {
            self.shutdown_delay_ms
        }
    }
}
