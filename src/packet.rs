//! Command packet contract shared with the radio transport.
//!
//! The transport collaborator owns framing, retries and acknowledgment;
//! this module only defines the decoded shape the dispatcher consumes and
//! the status reporter produces. Of the whole packet, the core reads only
//! `command` and `payload[0]` (a 0/1 boolean) and writes `payload[0]` for
//! its outbound status.

use serde::{Deserialize, Serialize};

/// Enumerated command kinds carried in a packet.
/// Must stay in sync with the coordinator's command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Command {
    /// Switch the output on (payload\[0\]=1) or off (payload\[0\]=0).
    Enable = 0x01,
    /// Keep-alive from the coordinator; extends the dead-man window.
    Ping = 0x02,
    /// Reconfiguration request. Reserved, currently a no-op.
    Config = 0x03,
    /// Data report. Outbound only for this node (status payload).
    Data = 0x04,
}

impl Command {
    /// Decode a raw command byte. Unknown values yield `None` so the
    /// dispatcher can drop them without stalling the loop.
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0x01 => Some(Self::Enable),
            0x02 => Some(Self::Ping),
            0x03 => Some(Self::Config),
            0x04 => Some(Self::Data),
            _ => None,
        }
    }
}

/// Fixed payload size; byte 0 carries the boolean for ENABLE/DATA.
pub const PAYLOAD_LEN: usize = 4;

/// A decoded command packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    /// Identifier of the sending node.
    pub source: u8,
    /// What the packet asks for or reports.
    pub command: Command,
    /// Identifier of the addressed node.
    pub target: u8,
    /// Command-specific bytes; only byte 0 is defined for this node.
    pub payload: [u8; PAYLOAD_LEN],
}

impl Packet {
    /// Build a packet with `payload[0]` set to a 0/1 flag.
    pub fn with_flag(source: u8, command: Command, target: u8, flag: bool) -> Self {
        let mut payload = [0u8; PAYLOAD_LEN];
        payload[0] = u8::from(flag);
        Self {
            source,
            command,
            target,
            payload,
        }
    }

    /// `payload[0]` interpreted as a boolean (1 = true, anything else false).
    pub fn flag(&self) -> bool {
        self.payload[0] == 1
    }
}
