//! Event sink that writes application events to the serial log.

use log::info;

use crate::app::events::{AppEvent, Trigger};
use crate::app::ports::EventSink;

pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => info!("event: started"),
            AppEvent::SwitchedOn(trigger) => {
                info!("event: switched on ({})", trigger_name(trigger));
            }
            AppEvent::ShutdownStarted(trigger) => {
                info!("event: graceful shutdown started ({})", trigger_name(trigger));
            }
            AppEvent::SwitchedOff => info!("event: switched off"),
            AppEvent::DesyncCorrected => info!("event: output desync corrected"),
            AppEvent::DeadManExpired => info!("event: dead-man window expired"),
        }
    }
}

fn trigger_name(trigger: &Trigger) -> &'static str {
    match trigger {
        Trigger::Command => "remote command",
        Trigger::Ping => "keep-alive ping",
        Trigger::LockSwitch => "lock switch",
        Trigger::DeadMan => "dead-man timeout",
    }
}
