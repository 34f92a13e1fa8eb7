//! TimeSwitch Node Firmware — Main Entry Point
//!
//! Hexagonal architecture on a single cooperative loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  GpioChannel      LogEventSink   NvsAdapter   Esp32Time  │
//! │  (PinChannel)     (EventSink)    (ConfigPort) (clock)    │
//! │  QueuedTransport                                         │
//! │  (PacketTransport)                                       │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ─────────────────   │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │            SwitchService (pure logic)              │  │
//! │  │  PowerSwitch · ShutdownTimer · StatusReporter      │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use timeswitch::adapters::gpio::GpioChannel;
use timeswitch::adapters::log_sink::LogEventSink;
use timeswitch::adapters::nvs::NvsAdapter;
use timeswitch::adapters::radio::QueuedTransport;
use timeswitch::adapters::time::Esp32TimeAdapter;
use timeswitch::app::ports::{ConfigPort, PacketTransport};
use timeswitch::app::service::SwitchService;
use timeswitch::config::SystemConfig;
use timeswitch::pins;
use timeswitch::power::PowerSwitch;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    info!("TimeSwitch node v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let nvs = match NvsAdapter::new() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!("NVS init failed ({e}), running with defaults and no persistence");
            None
        }
    };
    let config = match nvs.as_ref().map(|n| n.load()) {
        Some(Ok(cfg)) => {
            info!("Config loaded from NVS");
            cfg
        }
        Some(Err(e)) => {
            warn!("NVS config load failed ({e}), using defaults");
            SystemConfig::default()
        }
        None => SystemConfig::default(),
    };

    // ── 3. Construct adapters ─────────────────────────────────
    let time_adapter = Esp32TimeAdapter::new();

    let switch = PowerSwitch::new(
        GpioChannel::digital_output(pins::POWER_OFF_CMD_GPIO),
        GpioChannel::digital_output(pins::SHUTDOWN_CMD_GPIO),
        GpioChannel::analog_input(
            pins::CURRENT_SENSE_ADC_GPIO,
            pins::CURRENT_SENSE_ADC_CHANNEL,
        ),
        GpioChannel::digital_input(pins::LOCK_SWITCH_GPIO),
        GpioChannel::digital_input(pins::AUTO_MODE_GPIO),
        config.current_sense,
    );

    let mut log_sink = LogEventSink;

    // The radio driver task feeds the inbound side of this transport and
    // drains the outbound side; the control loop only sees decoded packets.
    let mut transport = QueuedTransport::new();

    // ── 4. Construct and start the service ────────────────────
    let mut service = SwitchService::new(switch, &config);
    service.start(time_adapter.uptime_ms(), &mut log_sink);

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        let now_ms = time_adapter.uptime_ms();

        // Dispatch every packet the radio decoded since the last tick.
        while let Some(packet) = transport.next_inbound() {
            service.handle_packet(&packet, now_ms, &mut log_sink);
        }

        // Reconcile switches, shutdown progress and the dead-man timer.
        service.tick(now_ms, &mut log_sink);

        // Tell the coordinator where the output stands.
        service.report_status(&mut transport);

        idle_delay(config.loop_interval_ms);
    }
}

#[cfg(target_os = "espidf")]
fn idle_delay(ms: u32) {
    esp_idf_hal::delay::FreeRtos::delay_ms(ms);
}

// Simulate the FreeRTOS tick delay via sleep on non-espidf targets.
#[cfg(not(target_os = "espidf"))]
fn idle_delay(ms: u32) {
    std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
}
