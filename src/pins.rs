//! GPIO / peripheral pin assignments for the time-switch node board.
//!
//! Single source of truth — every adapter references this module rather
//! than hard-coding pin numbers. Change a pin here and it propagates
//! everywhere.

// ---------------------------------------------------------------------------
// Relay output control
// ---------------------------------------------------------------------------

/// Digital output: HIGH opens the relay (output cut), LOW energizes it.
/// Inverted so a dead MCU fails with the output off.
pub const POWER_OFF_CMD_GPIO: i32 = 4;

/// Digital output: HIGH asks the downstream computer to shut down cleanly.
/// The computer listens on this line and halts its OS when asserted.
pub const SHUTDOWN_CMD_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Current sensing (ACS712 hall sensor on the output rail)
// ---------------------------------------------------------------------------

/// Analog input: sensor output, idling at half supply voltage.
pub const CURRENT_SENSE_ADC_GPIO: i32 = 6;

/// ADC1 channel wired to [`CURRENT_SENSE_ADC_GPIO`].
pub const CURRENT_SENSE_ADC_CHANNEL: u32 = 5;

// ---------------------------------------------------------------------------
// Physical override switches
// ---------------------------------------------------------------------------

/// Digital input: HIGH = output locked on, commands and timeouts ignored.
pub const LOCK_SWITCH_GPIO: i32 = 7;

/// Digital input: HIGH = auto mode (remote commands + dead-man timeout).
/// With both switches low the current output state is simply held.
pub const AUTO_MODE_GPIO: i32 = 8;

// ---------------------------------------------------------------------------
// Radio (nRF24-class transceiver on SPI2)
// ---------------------------------------------------------------------------

pub const RADIO_CE_GPIO: i32 = 9;
pub const RADIO_CSN_GPIO: i32 = 10;
pub const RADIO_SCLK_GPIO: i32 = 12;
pub const RADIO_MOSI_GPIO: i32 = 11;
pub const RADIO_MISO_GPIO: i32 = 13;
