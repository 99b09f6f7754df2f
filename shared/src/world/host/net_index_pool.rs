use std::collections::VecDeque;

use crate::types::NetIndex;

/// Recycling pool of per-connection ghost indices.
///
/// Indices are only recycled once the remote side has acknowledged the kill,
/// so there is no reuse timeout.
pub struct NetIndexPool {
    recycled: VecDeque<NetIndex>,
    next_new: u32,
    capacity: u32,
}

impl NetIndexPool {
    pub fn new(index_bits: u8) -> Self {
        let index_bits = u32::from(index_bits.clamp(1, 16));
        Self {
            recycled: VecDeque::new(),
            next_new: 0,
            capacity: 1 << index_bits,
        }
    }

    pub fn generate(&mut self) -> Option<NetIndex> {
        if let Some(index) = self.recycled.pop_front() {
            return Some(index);
        }
        if self.next_new >= self.capacity {
            return None;
        }
        let output = self.next_new as NetIndex;
        self.next_new += 1;
        Some(output)
    }

    pub fn recycle(&mut self, index: NetIndex) {
        self.recycled.push_back(index);
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn in_use(&self) -> u32 {
        self.next_new - self.recycled.len() as u32
    }
}
