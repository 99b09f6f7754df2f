use ghostwire_shared::{KindId, NetIndex};

/// What a ghost packet did to the client's ghost pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientEvent {
    GhostCreated { net_index: NetIndex, kind: KindId },
    GhostUpdated { net_index: NetIndex },
    GhostKilled { net_index: NetIndex },
}

impl ClientEvent {
    pub fn net_index(&self) -> NetIndex {
        match self {
            Self::GhostCreated { net_index, .. }
            | Self::GhostUpdated { net_index }
            | Self::GhostKilled { net_index } => *net_index,
        }
    }
}
