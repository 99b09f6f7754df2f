use thiserror::Error;

use crate::types::{ConnectionKey, ObjectKey};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GhostError {
    #[error("Ghost index space of {capacity} indices is exhausted on {connection}")]
    GhostLimitReached {
        connection: ConnectionKey,
        capacity: u32,
    },
    #[error("{connection} is not registered with the replication state")]
    UnknownConnection { connection: ConnectionKey },
    #[error("{object} is not registered with the replication state")]
    UnknownObject { object: ObjectKey },
    #[error("{object} is not ghostable and cannot be scoped to a connection")]
    NotGhostable { object: ObjectKey },
    #[error("{object} is already ghosted to {connection}")]
    AlreadyGhosted {
        object: ObjectKey,
        connection: ConnectionKey,
    },
    #[error("{object} is not ghosted to {connection}")]
    NotGhosted {
        object: ObjectKey,
        connection: ConnectionKey,
    },
}
