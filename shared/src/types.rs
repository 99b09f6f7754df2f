use std::fmt;

/// Sequence number of an outgoing ghost packet, wraps around
pub type PacketIndex = u16;
/// Per-connection ghost id, bounded by `GhostConfig::ghost_index_bits`
pub type NetIndex = u16;
/// Registration order of a replicated type or datablock type in the `Protocol`
pub type KindId = u16;
/// Identifies one datablock instance, shared by every connection
pub type DataBlockId = u32;

/// Identity of a replicated object inside a `HostWorld`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey(u64);

impl ObjectKey {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// Identity of one connection (the remote end of a `NetConnection`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionKey(u64);

impl ConnectionKey {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "connection#{}", self.0)
    }
}

/// Hands out increasing keys, never reusing one.
pub(crate) struct KeyGenerator {
    next: u64,
}

impl KeyGenerator {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn generate(&mut self) -> u64 {
        let output = self.next;
        self.next += 1;
        output
    }
}
