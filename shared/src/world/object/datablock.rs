use std::any::Any;

use thiserror::Error;

use crate::{types::DataBlockId, BitReader, BitWrite, SerdeErr};

/// First id handed to a datablock
pub const DATA_BLOCK_ID_FIRST: DataBlockId = 3;
/// Number of bits needed for an id relative to `DATA_BLOCK_ID_FIRST`
pub const DATA_BLOCK_ID_BITS: u32 = 10;
pub const DATA_BLOCK_ID_LAST: DataBlockId = DATA_BLOCK_ID_FIRST + (1 << DATA_BLOCK_ID_BITS) - 1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataBlockError {
    #[error("Datablock id {id} is outside [{first}, {last}]")]
    IdOutOfRange {
        id: DataBlockId,
        first: DataBlockId,
        last: DataBlockId,
    },
    #[error("Datablock id {id} is already in use")]
    IdInUse { id: DataBlockId },
}

impl DataBlockError {
    pub fn check_id(id: DataBlockId) -> Result<(), DataBlockError> {
        if !(DATA_BLOCK_ID_FIRST..=DATA_BLOCK_ID_LAST).contains(&id) {
            return Err(DataBlockError::IdOutOfRange {
                id,
                first: DATA_BLOCK_ID_FIRST,
                last: DATA_BLOCK_ID_LAST,
            });
        }
        Ok(())
    }
}

/// Immutable configuration shared by many objects, sent once at preload.
///
/// Unlike `Replicate` there are no flags: every field is written in declared
/// order, every time.
pub trait DataBlock: Any {
    fn name(&self) -> &'static str;

    fn pack_data(&self, writer: &mut dyn BitWrite);

    fn unpack_data(&mut self, reader: &mut BitReader) -> Result<(), SerdeErr>;

    fn to_any(&self) -> &dyn Any;

    fn to_any_mut(&mut self) -> &mut dyn Any;

    /// Blank instance, filled in by `unpack_data`.
    fn new_empty() -> Self
    where
        Self: Sized;
}
