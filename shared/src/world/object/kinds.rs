use std::{any::TypeId, collections::HashMap};

use crate::{
    types::KindId,
    world::object::{datablock::DataBlock, replicate::Replicate},
    BitReader, BitWrite, SerdeErr,
};

type ObjectBuilder = fn() -> Box<dyn Replicate>;
type DataBlockBuilder = fn() -> Box<dyn DataBlock>;

fn build_ghost<T: Replicate>() -> Box<dyn Replicate> {
    Box::new(T::new_ghost())
}

fn build_datablock<T: DataBlock>() -> Box<dyn DataBlock> {
    Box::new(T::new_empty())
}

/// Registration table mapping a Rust type to the id written on the wire
/// and a builder for remote instances.
pub struct Kinds<B> {
    kind_map: HashMap<TypeId, (KindId, &'static str)>,
    builders: Vec<(&'static str, B)>,
}

impl<B> Default for Kinds<B> {
    fn default() -> Self {
        Self {
            kind_map: HashMap::new(),
            builders: Vec::new(),
        }
    }
}

impl<B> Kinds<B> {
    fn add(&mut self, type_id: TypeId, name: &'static str, builder: B) {
        if self.kind_map.contains_key(&type_id) {
            return;
        }
        let kind = self.builders.len() as KindId;
        self.kind_map.insert(type_id, (kind, name));
        self.builders.push((name, builder));
    }

    pub fn kind_of(&self, type_id: &TypeId) -> Option<KindId> {
        self.kind_map.get(type_id).map(|(kind, _)| *kind)
    }

    pub fn name_of(&self, kind: KindId) -> Option<&'static str> {
        self.builders.get(usize::from(kind)).map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    pub fn write_kind(&self, writer: &mut dyn BitWrite, kind: KindId) {
        writer.write_ranged_u32(u32::from(kind), 0, self.max_kind());
    }

    pub fn read_kind(&self, reader: &mut BitReader) -> Result<KindId, SerdeErr> {
        let kind = reader.read_ranged_u32(0, self.max_kind())?;
        if kind as usize >= self.builders.len() {
            return Err(SerdeErr::UnknownIndex {
                kind: "kind",
                index: kind,
            });
        }
        Ok(kind as KindId)
    }

    fn max_kind(&self) -> u32 {
        (self.builders.len() as u32).saturating_sub(1)
    }
}

pub type ObjectKinds = Kinds<ObjectBuilder>;
pub type DataBlockKinds = Kinds<DataBlockBuilder>;

impl Kinds<ObjectBuilder> {
    pub fn add_object<T: Replicate>(&mut self) {
        self.add(
            TypeId::of::<T>(),
            std::any::type_name::<T>(),
            build_ghost::<T>,
        );
    }

    pub fn kind_of_object(&self, object: &dyn Replicate) -> Option<KindId> {
        self.kind_of(&object.to_any().type_id())
    }

    pub fn build(&self, kind: KindId) -> Option<Box<dyn Replicate>> {
        self.builders
            .get(usize::from(kind))
            .map(|(_, builder)| builder())
    }
}

impl Kinds<DataBlockBuilder> {
    pub fn add_datablock<T: DataBlock>(&mut self) {
        self.add(
            TypeId::of::<T>(),
            std::any::type_name::<T>(),
            build_datablock::<T>,
        );
    }

    pub fn kind_of_datablock(&self, datablock: &dyn DataBlock) -> Option<KindId> {
        self.kind_of(&datablock.to_any().type_id())
    }

    pub fn build(&self, kind: KindId) -> Option<Box<dyn DataBlock>> {
        self.builders
            .get(usize::from(kind))
            .map(|(_, builder)| builder())
    }
}
