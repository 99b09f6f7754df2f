use thiserror::Error;

use ghostwire_shared::{KindId, NetIndex, SerdeErr};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Malformed packet: {0}")]
    Serde(#[from] SerdeErr),
    #[error("Update for ghost {net_index}, which was never created")]
    UnknownGhost { net_index: NetIndex },
    #[error("No replicated type registered for kind {kind}")]
    UnknownObjectKind { kind: KindId },
    #[error("No datablock type registered for kind {kind}")]
    UnknownDataBlockKind { kind: KindId },
}
