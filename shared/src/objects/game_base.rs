use crate::{
    net_object::{MaskLayout, NetObject},
    objects::SceneObject,
    types::{ConnectionKey, DataBlockId},
    world::object::datablock::{DataBlockError, DATA_BLOCK_ID_FIRST, DATA_BLOCK_ID_LAST},
    BitReader, BitWrite, SerdeErr,
};

/// Scene object that may reference a datablock for its shared configuration.
#[derive(Debug)]
pub struct GameBase {
    pub scene: SceneObject,
    data_block: Option<DataBlockId>,
}

impl GameBase {
    pub const DATA_BLOCK_MASK: u32 = SceneObject::MASK_LAYOUT.bit(0);
    pub const MASK_LAYOUT: MaskLayout = SceneObject::MASK_LAYOUT.claim(1);

    pub fn new(net: NetObject) -> Self {
        Self {
            scene: SceneObject::new(net),
            data_block: None,
        }
    }

    pub fn net_object(&self) -> &NetObject {
        &self.scene.net
    }

    pub fn data_block(&self) -> Option<DataBlockId> {
        self.data_block
    }

    pub fn set_data_block(&mut self, data_block: Option<DataBlockId>) -> Result<(), DataBlockError> {
        if let Some(id) = data_block {
            DataBlockError::check_id(id)?;
        }
        self.data_block = data_block;
        self.scene.net.set_mask_bits(Self::DATA_BLOCK_MASK);
        Ok(())
    }

    pub fn pack_update(
        &self,
        connection: &ConnectionKey,
        mask: u32,
        writer: &mut dyn BitWrite,
    ) -> u32 {
        let retained = self.scene.pack_update(connection, mask, writer);

        if writer.write_flag(mask & Self::DATA_BLOCK_MASK != 0) {
            if let Some(id) = self.data_block {
                writer.write_flag(true);
                writer.write_ranged_u32(id, DATA_BLOCK_ID_FIRST, DATA_BLOCK_ID_LAST);
            } else {
                writer.write_flag(false);
            }
        }

        retained
    }

    pub fn unpack_update(
        &mut self,
        connection: &ConnectionKey,
        reader: &mut BitReader,
    ) -> Result<(), SerdeErr> {
        self.scene.unpack_update(connection, reader)?;

        if reader.read_flag()? {
            self.data_block = if reader.read_flag()? {
                Some(reader.read_ranged_u32(DATA_BLOCK_ID_FIRST, DATA_BLOCK_ID_LAST)?)
            } else {
                None
            };
        }
        Ok(())
    }
}
