//! Radio-facing packet queues.
//!
//! [`QueuedTransport`] implements [`PacketTransport`] over two bounded
//! heapless deques. The radio driver task sits on the other side: it pushes
//! decoded inbound packets with [`push_inbound`](QueuedTransport::push_inbound)
//! and drains outbound ones with [`take_outbound`](QueuedTransport::take_outbound).
//! Both directions drop on overflow rather than block — the control loop's
//! 100 ms cadence must never stall on the radio.

use heapless::Deque;
use log::warn;

use crate::app::ports::PacketTransport;
use crate::packet::Packet;

/// Queue depth per direction. At one status packet per 100 ms tick this is
/// 1.6 s of radio outage before reports start dropping.
pub const QUEUE_DEPTH: usize = 16;

/// Bounded, drop-on-overflow packet queues between the control loop and
/// the radio driver.
pub struct QueuedTransport {
    inbound: Deque<Packet, QUEUE_DEPTH>,
    outbound: Deque<Packet, QUEUE_DEPTH>,
}

impl QueuedTransport {
    pub fn new() -> Self {
        Self {
            inbound: Deque::new(),
            outbound: Deque::new(),
        }
    }

    /// Called by the radio side with each decoded received packet.
    pub fn push_inbound(&mut self, packet: Packet) {
        if self.inbound.push_back(packet).is_err() {
            warn!("inbound queue full, dropping packet");
        }
    }

    /// Called by the radio side to fetch the next packet to transmit.
    pub fn take_outbound(&mut self) -> Option<Packet> {
        self.outbound.pop_front()
    }

    pub fn outbound_len(&self) -> usize {
        self.outbound.len()
    }
}

impl Default for QueuedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketTransport for QueuedTransport {
    fn enqueue_outbound(&mut self, packet: Packet) {
        if self.outbound.push_back(packet).is_err() {
            warn!("outbound queue full, dropping status packet");
        }
    }

    fn next_inbound(&mut self) -> Option<Packet> {
        self.inbound.pop_front()
    }
}

/// Transport that discards everything. Useful when bringing a board up
/// before the radio is wired.
pub struct NullTransport;

impl PacketTransport for NullTransport {
    fn enqueue_outbound(&mut self, _packet: Packet) {}

    fn next_inbound(&mut self) -> Option<Packet> {
        None
    }
}
