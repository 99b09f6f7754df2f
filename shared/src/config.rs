use crate::MTU_SIZE_BITS;

/// Ghosting parameters both ends must share.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GhostConfig {
    /// Width of a per-connection ghost index, 12 bits allows 4096 ghosts
    pub ghost_index_bits: u8,
    /// Budget of a single ghost packet
    pub packet_bits: u32,
}

impl Default for GhostConfig {
    fn default() -> Self {
        Self {
            ghost_index_bits: 12,
            packet_bits: MTU_SIZE_BITS,
        }
    }
}

impl GhostConfig {
    /// Largest index a ghost on one connection can take.
    pub fn max_net_index(&self) -> u32 {
        (1_u32 << self.ghost_index_bits.clamp(1, 16)) - 1
    }
}
