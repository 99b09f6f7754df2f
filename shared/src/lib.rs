//! # Ghostwire Shared
//! Replication core shared between ghostwire-server & ghostwire-client:
//! dirty-mask propagation, ghost bookkeeping and the replicated object
//! types with their flag-guarded update encodings.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
mod flagged_fields;

mod chunker;
mod config;
mod math;
mod net_object;
mod objects;
mod protocol;
mod types;
mod world;
mod wrapping_number;

pub use ghostwire_serde::{
    bits_for_range, BitCounter, BitReader, BitWrite, BitWriter, OwnedBitReader, Serde, SerdeErr,
    StreamWriter, MAX_LONG_STRING_LENGTH, MTU_SIZE_BITS, MTU_SIZE_BYTES,
};

pub use chunker::{ChunkHandle, Chunker, ChunkerError, SyncChunker, DEFAULT_CHUNK_CELLS};
pub use config::GhostConfig;
pub use math::{
    AffineTransform, Box3, Edge, NetField, Plane, Polyhedron, PolyhedronParseError,
    LONG_STRING_FIELD_LENGTH,
};
pub use net_object::{
    MaskLayout, MaskLayoutError, MaskMutator, NetFlags, NetObject, NetObjectError, MASK_CAPACITY,
};
pub use objects::{
    GameBase, PhysicalZone, SceneObject, Trigger, TriggerData, WaterBlock, WaterObject, WaterWave,
};
pub use protocol::Protocol;
pub use types::{ConnectionKey, DataBlockId, KindId, NetIndex, ObjectKey, PacketIndex};
pub use world::{
    host::{
        DirtyList, DirtyListIter, GhostArray, GhostError, GhostHandle, GhostInfo, GhostStatus,
        HostWorld, NetIndexPool, ReplicationState, KILL_PRIORITY,
    },
    object::{
        datablock::{
            DataBlock, DataBlockError, DATA_BLOCK_ID_BITS, DATA_BLOCK_ID_FIRST, DATA_BLOCK_ID_LAST,
        },
        kinds::{DataBlockKinds, Kinds, ObjectKinds},
        replicate::Replicate,
    },
};
pub use wrapping_number::{sequence_greater_than, sequence_less_than};
