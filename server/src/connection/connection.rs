use std::collections::{HashMap, HashSet};

use ghostwire_shared::{
    sequence_greater_than, ConnectionKey, GhostHandle, ObjectKey, PacketIndex,
};

use super::sent_packet::SentPacket;

/// Server-side bookkeeping of one remote end: its explicit scope, the
/// objects currently ghosted to it and the packets still awaiting an
/// acknowledgement.
pub struct Connection {
    key: ConnectionKey,
    scope: HashSet<ObjectKey>,
    ghosted: HashSet<ObjectKey>,
    next_packet_index: PacketIndex,
    sent_packets: HashMap<PacketIndex, SentPacket>,
}

impl Connection {
    pub fn new(key: ConnectionKey) -> Self {
        Self {
            key,
            scope: HashSet::new(),
            ghosted: HashSet::new(),
            next_packet_index: 0,
            sent_packets: HashMap::new(),
        }
    }

    pub fn key(&self) -> ConnectionKey {
        self.key
    }

    // Scope

    pub fn scope_has(&self, object: &ObjectKey) -> bool {
        self.scope.contains(object)
    }

    pub(crate) fn scope_set(&mut self, object: &ObjectKey, in_scope: bool) {
        if in_scope {
            self.scope.insert(*object);
        } else {
            self.scope.remove(object);
        }
    }

    pub(crate) fn scope_clear(&mut self) {
        self.scope.clear();
    }

    pub(crate) fn scope_forget(&mut self, object: &ObjectKey) {
        self.scope.remove(object);
        self.ghosted.remove(object);
    }

    pub fn is_ghosted(&self, object: &ObjectKey) -> bool {
        self.ghosted.contains(object)
    }

    pub(crate) fn ghosted(&self) -> impl Iterator<Item = &ObjectKey> {
        self.ghosted.iter()
    }

    pub(crate) fn set_ghosted(&mut self, object: &ObjectKey, ghosted: bool) {
        if ghosted {
            self.ghosted.insert(*object);
        } else {
            self.ghosted.remove(object);
        }
    }

    // Packets

    pub(crate) fn next_packet_index(&mut self) -> PacketIndex {
        let output = self.next_packet_index;
        self.next_packet_index = self.next_packet_index.wrapping_add(1);
        output
    }

    pub(crate) fn record_packet(&mut self, packet_index: PacketIndex, packet: SentPacket) {
        if !packet.is_empty() {
            self.sent_packets.insert(packet_index, packet);
        }
    }

    pub(crate) fn take_packet(&mut self, packet_index: &PacketIndex) -> Option<SentPacket> {
        self.sent_packets.remove(packet_index)
    }

    /// Removes from `mask` every bit that a packet sent after
    /// `dropped_index` carried for `handle` again.
    pub(crate) fn resent_since(
        &self,
        dropped_index: PacketIndex,
        handle: &GhostHandle,
        mut mask: u32,
    ) -> u32 {
        for (packet_index, packet) in &self.sent_packets {
            if sequence_greater_than(*packet_index, dropped_index) {
                mask &= !packet.update_mask(handle);
            }
        }
        mask
    }

    pub fn packets_in_flight(&self) -> usize {
        self.sent_packets.len()
    }
}
