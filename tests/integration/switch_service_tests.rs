//! End-to-end scenarios for the switch service against mock adapters.
//!
//! Every test drives the service the way the control loop does: inject
//! packets, advance time, call `tick`, and assert on driven lines, emitted
//! events and outbound status packets.

use timeswitch::app::events::{AppEvent, Trigger};
use timeswitch::config::{DEFAULT_SHUTDOWN_DELAY_MS, SystemConfig};
use timeswitch::packet::{Command, Packet};
use timeswitch::power::SwitchState;

use crate::mock_hw::{RAW_IDLE, RAW_LIGHT_LOAD, RAW_LOADED, Rig};

// ── Command dispatch ──────────────────────────────────────────

#[test]
fn enable_on_energizes_immediately() {
    let mut rig = Rig::new(true, false);

    rig.send_enable(true, 100);

    assert!(rig.relay_energized());
    assert_eq!(rig.service.state(), SwitchState::On);
    assert!(rig.sink.contains(&AppEvent::SwitchedOn(Trigger::Command)));
}

#[test]
fn enable_off_waits_for_current_to_fall() {
    let mut rig = Rig::new(true, false);
    rig.send_enable(true, 100);
    rig.current.set_raw(RAW_LIGHT_LOAD); // still drawing ~270 mA

    rig.send_enable(false, 200);

    assert_eq!(rig.service.state(), SwitchState::ShuttingDown);
    assert!(rig.relay_energized(), "relay must stay closed under load");
    assert_eq!(rig.shutdown_line.raw(), 1, "shutdown request asserted");
    assert!(
        rig.sink
            .contains(&AppEvent::ShutdownStarted(Trigger::Command))
    );

    // Load releases; the next tick completes the transition.
    rig.current.set_raw(RAW_IDLE);
    rig.tick(300);

    assert_eq!(rig.service.state(), SwitchState::Off);
    assert!(!rig.relay_energized());
    assert_eq!(rig.shutdown_line.raw(), 0);
    assert!(rig.sink.contains(&AppEvent::SwitchedOff));
}

#[test]
fn enable_off_while_already_off_is_inert() {
    let mut rig = Rig::new(true, false);
    rig.send_enable(false, 100);

    assert_eq!(rig.service.state(), SwitchState::Off);
    assert!(rig.sink.events.is_empty());
}

#[test]
fn shutdown_started_is_reported_once() {
    let mut rig = Rig::new(true, false);
    rig.send_enable(true, 100);
    rig.current.set_raw(RAW_LOADED);

    rig.send_enable(false, 200);
    rig.send_enable(false, 300); // repeated command while pending
    rig.tick(400);

    assert_eq!(
        rig.sink.count(&AppEvent::ShutdownStarted(Trigger::Command)),
        1
    );
    assert_eq!(rig.service.state(), SwitchState::ShuttingDown);
}

#[test]
fn unknown_command_bytes_never_reach_dispatch() {
    // 0x00 and anything past DATA are not part of the protocol.
    assert!(Command::from_u8(0x00).is_none());
    assert!(Command::from_u8(0x05).is_none());
    assert!(Command::from_u8(0xFF).is_none());
}

#[test]
fn config_and_inbound_data_are_ignored() {
    let mut rig = Rig::new(true, false);
    for cmd in [Command::Config, Command::Data] {
        let pkt = Packet::with_flag(1, cmd, 0, true);
        rig.service.handle_packet(&pkt, 100, &mut rig.sink);
    }
    assert_eq!(rig.service.state(), SwitchState::Off);
    assert!(rig.sink.events.is_empty());
}

// ── Keep-alive / dead-man interplay ───────────────────────────

#[test]
fn ping_extends_the_dead_man_window() {
    let mut rig = Rig::new(true, false);
    rig.send_enable(true, 0);
    rig.current.set_raw(RAW_LOADED);

    // Keep-alive just before expiry pushes the window out.
    rig.send_ping(29_000);
    rig.tick(35_000);
    assert_eq!(rig.service.state(), SwitchState::On);

    // No further keep-alive: the window elapses relative to the ping.
    rig.tick(29_000 + DEFAULT_SHUTDOWN_DELAY_MS);
    assert!(rig.sink.contains(&AppEvent::DeadManExpired));
    assert_eq!(rig.service.state(), SwitchState::ShuttingDown);
}

#[test]
fn ping_recovers_a_powered_off_node_in_auto_mode() {
    let mut rig = Rig::new(true, false);
    assert_eq!(rig.service.state(), SwitchState::Off);

    rig.send_ping(500);

    assert_eq!(rig.service.state(), SwitchState::On);
    assert!(rig.sink.contains(&AppEvent::SwitchedOn(Trigger::Ping)));
}

#[test]
fn ping_outside_auto_mode_does_nothing() {
    let mut rig = Rig::new(false, false);

    rig.send_ping(500);

    assert_eq!(rig.service.state(), SwitchState::Off);
    assert!(rig.sink.events.is_empty());
}

#[test]
fn dead_man_expiry_runs_the_full_graceful_shutdown() {
    let mut rig = Rig::new(true, false);
    rig.send_enable(true, 0);
    rig.current.set_raw(RAW_LOADED);
    rig.sink.clear();

    // First tick past the window: shutdown starts but the output stays
    // energized while the machine is still drawing.
    rig.tick(DEFAULT_SHUTDOWN_DELAY_MS + 1);
    assert!(rig.sink.contains(&AppEvent::DeadManExpired));
    assert!(rig.sink.contains(&AppEvent::ShutdownStarted(Trigger::DeadMan)));
    assert_eq!(rig.service.state(), SwitchState::ShuttingDown);
    assert!(rig.relay_energized());

    // The machine halts and stops drawing; the next tick opens the relay.
    rig.current.set_raw(RAW_IDLE);
    rig.tick(DEFAULT_SHUTDOWN_DELAY_MS + 101);
    assert_eq!(rig.service.state(), SwitchState::Off);
    assert!(!rig.relay_energized());
    assert!(rig.sink.contains(&AppEvent::SwitchedOff));
}

#[test]
fn dead_man_is_inert_when_output_is_off() {
    let mut rig = Rig::new(true, false);

    rig.tick(DEFAULT_SHUTDOWN_DELAY_MS * 2);

    assert_eq!(rig.service.state(), SwitchState::Off);
    assert!(rig.sink.events.is_empty());
}

#[test]
fn stored_zero_delay_falls_back_to_default() {
    let mut config = SystemConfig::default();
    config.shutdown_delay_ms = 0;
    let mut rig = Rig::with_config(true, false, config);
    rig.send_enable(true, 0);
    rig.current.set_raw(RAW_LOADED);

    rig.tick(DEFAULT_SHUTDOWN_DELAY_MS - 1);
    assert_eq!(rig.service.state(), SwitchState::On);

    rig.tick(DEFAULT_SHUTDOWN_DELAY_MS);
    assert_eq!(rig.service.state(), SwitchState::ShuttingDown);
}

// ── Physical override switches ────────────────────────────────

#[test]
fn lock_switch_forces_on_within_one_tick() {
    let mut rig = Rig::new(false, true);

    rig.tick(100);

    assert_eq!(rig.service.state(), SwitchState::On);
    assert!(rig.relay_energized());
    assert!(rig.sink.contains(&AppEvent::SwitchedOn(Trigger::LockSwitch)));
}

#[test]
fn lock_switch_overrides_a_pending_shutdown() {
    let mut rig = Rig::new(true, false);
    rig.send_enable(true, 0);
    rig.current.set_raw(RAW_LOADED);
    rig.send_enable(false, 100);
    assert_eq!(rig.service.state(), SwitchState::ShuttingDown);

    // Operator throws the lock switch mid-shutdown.
    rig.lock.set_raw(1);
    rig.tick(200);

    assert_eq!(rig.service.state(), SwitchState::On);
    assert_eq!(rig.shutdown_line.raw(), 0, "shutdown request withdrawn");
}

#[test]
fn lock_switch_defeats_the_dead_man_timer() {
    let mut rig = Rig::new(false, true);
    rig.tick(0);
    rig.current.set_raw(RAW_LOADED);
    rig.sink.clear();

    rig.tick(DEFAULT_SHUTDOWN_DELAY_MS * 3);

    assert_eq!(rig.service.state(), SwitchState::On);
    assert!(!rig.sink.contains(&AppEvent::DeadManExpired));
}

#[test]
fn neither_switch_holds_the_current_state() {
    let mut rig = Rig::new(false, false);
    rig.send_enable(true, 0);
    rig.current.set_raw(RAW_LOADED);
    rig.sink.clear();

    // Way past the dead-man window, but auto mode is off: state is held.
    rig.tick(DEFAULT_SHUTDOWN_DELAY_MS * 2);

    assert_eq!(rig.service.state(), SwitchState::On);
    assert!(rig.sink.events.is_empty());
}

// ── Desync correction ─────────────────────────────────────────

#[test]
fn silent_load_while_flagged_on_is_corrected() {
    let mut rig = Rig::new(true, false);
    rig.send_enable(true, 0);
    rig.current.set_raw(RAW_LOADED);
    rig.tick(100);
    assert_eq!(rig.service.state(), SwitchState::On);
    rig.sink.clear();

    // The machine vanished (unplugged, dead supply): no current although
    // the logical state says on.
    rig.current.set_raw(RAW_IDLE);
    rig.tick(200);

    assert_eq!(rig.service.state(), SwitchState::Off);
    assert!(!rig.relay_energized());
    assert!(rig.sink.contains(&AppEvent::DesyncCorrected));
}

#[test]
fn desync_correction_defers_to_the_lock_switch() {
    let mut rig = Rig::new(false, true);
    rig.tick(0);
    rig.sink.clear();

    // No current drawn, but lock mode trusts the logical state.
    rig.current.set_raw(RAW_IDLE);
    rig.tick(100);

    assert_eq!(rig.service.state(), SwitchState::On);
    assert!(!rig.sink.contains(&AppEvent::DesyncCorrected));
}

#[test]
fn pending_shutdown_is_not_mistaken_for_desync() {
    let mut rig = Rig::new(true, false);
    rig.send_enable(true, 0);
    rig.current.set_raw(RAW_LOADED);
    rig.send_enable(false, 100);
    rig.sink.clear();

    // Current falls to idle during the graceful shutdown; this must finish
    // the shutdown, not trip the desync path.
    rig.current.set_raw(RAW_IDLE);
    rig.tick(200);

    assert!(rig.sink.contains(&AppEvent::SwitchedOff));
    assert!(!rig.sink.contains(&AppEvent::DesyncCorrected));
}

// ── Status reporting ──────────────────────────────────────────

#[test]
fn status_packet_mirrors_the_output_state() {
    let mut rig = Rig::new(true, false);

    rig.service.report_status(&mut rig.transport);
    rig.send_enable(true, 100);
    rig.service.report_status(&mut rig.transport);

    assert_eq!(rig.transport.sent.len(), 2);
    assert_eq!(rig.transport.sent[0].command, Command::Data);
    assert_eq!(rig.transport.sent[0].payload[0], 0);
    assert_eq!(rig.transport.sent[1].payload[0], 1);
}

#[test]
fn status_packet_is_addressed_to_the_coordinator() {
    let mut config = SystemConfig::default();
    config.node_id = 7;
    config.coordinator_id = 2;
    let mut rig = Rig::with_config(true, false, config);

    rig.service.report_status(&mut rig.transport);

    let pkt = rig.transport.last_sent().unwrap();
    assert_eq!(pkt.source, 7);
    assert_eq!(pkt.target, 2);
}
