use crate::{
    chunker::ChunkHandle,
    types::{ConnectionKey, NetIndex, ObjectKey},
};

pub type GhostHandle = ChunkHandle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GhostStatus {
    /// The next write for this ghost carries a create header
    NotYetGhosted,
    /// A create is in flight, updates wait until it is acknowledged
    Ghosting,
    /// The remote side knows the ghost, only updates are owed
    Ghosted,
    /// Detached from its object, a kill still has to be written
    KillPending,
    /// A kill is in flight, waiting for the packet to be acknowledged
    Killing,
}

/// Replication record of one object on one connection.
#[derive(Debug)]
pub struct GhostInfo {
    pub(crate) update_mask: u32,
    pub(crate) connection: ConnectionKey,
    pub(crate) object: Option<ObjectKey>,
    pub(crate) net_index: NetIndex,
    pub(crate) status: GhostStatus,
    pub(crate) update_skips: u32,
    pub(crate) priority: f32,
    pub(crate) array_index: usize,
}

impl GhostInfo {
    pub(crate) fn new(connection: ConnectionKey, object: ObjectKey, net_index: NetIndex) -> Self {
        Self {
            update_mask: 0,
            connection,
            object: Some(object),
            net_index,
            status: GhostStatus::NotYetGhosted,
            update_skips: 0,
            priority: 0.0,
            array_index: 0,
        }
    }

    /// Bits still owed to this connection, zero means caught up.
    pub fn update_mask(&self) -> u32 {
        self.update_mask
    }

    pub fn connection(&self) -> ConnectionKey {
        self.connection
    }

    /// The ghosted object, `None` once the ghost is being killed.
    pub fn object(&self) -> Option<ObjectKey> {
        self.object
    }

    pub fn net_index(&self) -> NetIndex {
        self.net_index
    }

    pub fn status(&self) -> GhostStatus {
        self.status
    }

    pub fn update_skips(&self) -> u32 {
        self.update_skips
    }

    pub fn priority(&self) -> f32 {
        self.priority
    }

    /// Whether the packet writer may emit something for this ghost now.
    pub fn is_writable(&self) -> bool {
        matches!(
            self.status,
            GhostStatus::NotYetGhosted | GhostStatus::Ghosted | GhostStatus::KillPending
        )
    }

    pub fn is_killing(&self) -> bool {
        matches!(self.status, GhostStatus::KillPending | GhostStatus::Killing)
    }
}
