//! Fuzz target: the command dispatcher and tick reconciliation.
//!
//! Interprets arbitrary bytes as a sequence of inbound packets, time jumps
//! and switch/sensor changes, and drives a full service through them.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - A pending graceful shutdown always implies the output is flagged on
//!
//! cargo fuzz run fuzz_dispatch

#![no_main]

use libfuzzer_sys::fuzz_target;
use timeswitch::adapters::gpio::SimChannel;
use timeswitch::app::events::AppEvent;
use timeswitch::app::ports::EventSink;
use timeswitch::app::service::SwitchService;
use timeswitch::config::{CurrentSenseConfig, SystemConfig};
use timeswitch::packet::{Command, PAYLOAD_LEN, Packet};
use timeswitch::power::PowerSwitch;

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let current = SimChannel::new(500);
    let lock = SimChannel::new(0);
    let auto = SimChannel::new(1);
    let cal = CurrentSenseConfig {
        supply_mv: 5000.0,
        adc_full_scale: 1000,
        ..CurrentSenseConfig::default()
    };
    let switch = PowerSwitch::new(
        SimChannel::new(0),
        SimChannel::new(0),
        current.clone(),
        lock.clone(),
        auto.clone(),
        cal,
    );
    let mut service = SwitchService::new(switch, &SystemConfig::default());
    let mut sink = NullSink;
    service.start(0, &mut sink);

    let mut now: u32 = 0;

    // Each 8-byte chunk drives one step: opcode, command byte, payload,
    // switch positions, time advance.
    for chunk in data.chunks(8) {
        if chunk.len() < 8 {
            break;
        }

        lock.set_raw(u16::from(chunk[5] & 1));
        auto.set_raw(u16::from(chunk[6] & 1));
        current.set_raw(u16::from(chunk[7]) * 4);

        match chunk[0] % 2 {
            0 => {
                // Undecodable command bytes are dropped at the framing layer.
                if let Some(command) = Command::from_u8(chunk[1]) {
                    let mut payload = [0u8; PAYLOAD_LEN];
                    payload.copy_from_slice(&chunk[1..1 + PAYLOAD_LEN]);
                    let packet = Packet {
                        source: chunk[2],
                        command,
                        target: chunk[3],
                        payload,
                    };
                    service.handle_packet(&packet, now, &mut sink);
                }
            }
            _ => {
                now = now.wrapping_add(u32::from(chunk[1]) * 500);
                service.tick(now, &mut sink);
            }
        }

        assert!(
            !service.shutdown_requested() || service.output_state(),
            "pending shutdown with output already off"
        );
    }
});
