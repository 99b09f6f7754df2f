use thiserror::Error;

use ghostwire_shared::{ConnectionKey, DataBlockError, GhostError, ObjectKey};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServerError {
    #[error("{connection} is not connected")]
    UnknownConnection { connection: ConnectionKey },
    #[error("{object} does not exist on the server")]
    UnknownObject { object: ObjectKey },
    #[error("Replicated type `{name}` was not registered with the Protocol")]
    UnregisteredObject { name: &'static str },
    #[error("Datablock type `{name}` was not registered with the Protocol")]
    UnregisteredDataBlock { name: &'static str },
    #[error(transparent)]
    Ghost(#[from] GhostError),
    #[error(transparent)]
    DataBlock(#[from] DataBlockError),
}
