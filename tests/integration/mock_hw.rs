//! Mock adapters and a test rig for integration tests.
//!
//! The rig wires a [`SwitchService`] to simulated pin channels so tests can
//! drive switch positions and current readings, inject packets, and assert
//! on the emitted events and driven output lines.

use std::collections::VecDeque;

use timeswitch::adapters::gpio::SimChannel;
use timeswitch::app::events::AppEvent;
use timeswitch::app::ports::{EventSink, PacketTransport};
use timeswitch::app::service::SwitchService;
use timeswitch::config::{CurrentSenseConfig, SystemConfig};
use timeswitch::packet::{Command, Packet};
use timeswitch::power::PowerSwitch;

// ── Simulated sensor readings ─────────────────────────────────
//
// The rig calibrates the ADC to 5 mV per count with the sensor idling at
// raw 500, so offsets convert exactly: offset_counts * 5 / 0.185 mA.

/// Sensor midpoint, no load current.
pub const RAW_IDLE: u16 = 500;
/// 150 mV offset ≈ 811 mA — a machine running at full draw.
pub const RAW_LOADED: u16 = 470;
/// 50 mV offset ≈ 270 mA — a machine winding down but still drawing.
pub const RAW_LIGHT_LOAD: u16 = 490;

// ── Mock transport ────────────────────────────────────────────

/// In-memory transport recording everything sent and feeding scripted
/// inbound packets.
pub struct MemTransport {
    pub inbound: VecDeque<Packet>,
    pub sent: Vec<Packet>,
}

#[allow(dead_code)]
impl MemTransport {
    pub fn new() -> Self {
        Self {
            inbound: VecDeque::new(),
            sent: Vec::new(),
        }
    }

    pub fn last_sent(&self) -> Option<&Packet> {
        self.sent.last()
    }
}

impl PacketTransport for MemTransport {
    fn enqueue_outbound(&mut self, packet: Packet) {
        self.sent.push(packet);
    }

    fn next_inbound(&mut self) -> Option<Packet> {
        self.inbound.pop_front()
    }
}

// ── Recording event sink ──────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }

    pub fn count(&self, event: &AppEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── Test rig ──────────────────────────────────────────────────

/// A started service plus handles to every simulated line.
pub struct Rig {
    pub service: SwitchService<SimChannel>,
    pub power_off_line: SimChannel,
    pub shutdown_line: SimChannel,
    pub current: SimChannel,
    pub lock: SimChannel,
    pub auto: SimChannel,
    pub sink: RecordingSink,
    pub transport: MemTransport,
}

#[allow(dead_code)]
impl Rig {
    /// Build and start a service at t=0 with the given switch positions.
    pub fn new(auto: bool, lock: bool) -> Self {
        Self::with_config(auto, lock, SystemConfig::default())
    }

    pub fn with_config(auto: bool, lock: bool, mut config: SystemConfig) -> Self {
        config.current_sense = CurrentSenseConfig {
            supply_mv: 5000.0,
            adc_full_scale: 1000,
            ..CurrentSenseConfig::default()
        };

        let power_off_line = SimChannel::new(0);
        let shutdown_line = SimChannel::new(0);
        let current = SimChannel::new(RAW_IDLE);
        let lock_line = SimChannel::new(u16::from(lock));
        let auto_line = SimChannel::new(u16::from(auto));

        let switch = PowerSwitch::new(
            power_off_line.clone(),
            shutdown_line.clone(),
            current.clone(),
            lock_line.clone(),
            auto_line.clone(),
            config.current_sense,
        );

        let mut service = SwitchService::new(switch, &config);
        let mut sink = RecordingSink::new();
        service.start(0, &mut sink);
        sink.clear();

        Self {
            service,
            power_off_line,
            shutdown_line,
            current,
            lock: lock_line,
            auto: auto_line,
            sink,
            transport: MemTransport::new(),
        }
    }

    pub fn send_enable(&mut self, on: bool, now_ms: u32) {
        let pkt = Packet::with_flag(1, Command::Enable, 0, on);
        self.service.handle_packet(&pkt, now_ms, &mut self.sink);
    }

    pub fn send_ping(&mut self, now_ms: u32) {
        let pkt = Packet::with_flag(1, Command::Ping, 0, false);
        self.service.handle_packet(&pkt, now_ms, &mut self.sink);
    }

    pub fn tick(&mut self, now_ms: u32) {
        self.service.tick(now_ms, &mut self.sink);
    }

    /// True when the relay is physically energized (power-off line low).
    pub fn relay_energized(&self) -> bool {
        self.power_off_line.raw() == 0
    }
}
