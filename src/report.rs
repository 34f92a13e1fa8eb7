//! Outbound status reporting.
//!
//! Once per tick, after reconciliation, the node tells the coordinator
//! whether its output is on. Best effort: no acknowledgment and no retry
//! here — delivery guarantees belong to the transport collaborator.

use log::debug;

use crate::app::ports::PacketTransport;
use crate::packet::{Command, Packet};

/// Builds and enqueues the per-tick status packet.
pub struct StatusReporter {
    node_id: u8,
    coordinator_id: u8,
}

impl StatusReporter {
    pub fn new(node_id: u8, coordinator_id: u8) -> Self {
        Self {
            node_id,
            coordinator_id,
        }
    }

    /// Update the source identifier once negotiation assigns one.
    pub fn set_node_id(&mut self, node_id: u8) {
        self.node_id = node_id;
    }

    pub fn node_id(&self) -> u8 {
        self.node_id
    }

    /// Queue one DATA packet carrying the output state as payload byte 0.
    pub fn report(&self, output_on: bool, transport: &mut impl PacketTransport) {
        let packet = Packet::with_flag(self.node_id, Command::Data, self.coordinator_id, output_on);
        debug!("status report: output_on={}", output_on);
        transport.enqueue_outbound(packet);
    }
}
