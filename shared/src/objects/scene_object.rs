use glam::Vec3;

use crate::{
    math::{AffineTransform, Box3},
    net_object::{MaskLayout, NetObject},
    types::ConnectionKey,
    BitReader, BitWrite, SerdeErr,
};

/// Object with a place in the world: transform, scale and bounds.
///
/// Claims no mask bits of its own; each subtype decides which of its bits
/// carry the transform.
#[derive(Debug)]
pub struct SceneObject {
    pub net: NetObject,
    pub(crate) transform: AffineTransform,
    pub(crate) scale: Vec3,
    pub(crate) obj_box: Box3,
    world_box: Box3,
}

impl SceneObject {
    pub const MASK_LAYOUT: MaskLayout = NetObject::MASK_LAYOUT;

    pub fn new(net: NetObject) -> Self {
        let mut output = Self {
            net,
            transform: AffineTransform::IDENTITY,
            scale: Vec3::ONE,
            obj_box: Box3::UNIT,
            world_box: Box3::UNIT,
        };
        output.reset_world_box();
        output
    }

    pub fn transform(&self) -> &AffineTransform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: AffineTransform) {
        self.transform = transform;
        self.reset_world_box();
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.reset_world_box();
    }

    pub fn obj_box(&self) -> &Box3 {
        &self.obj_box
    }

    pub fn set_obj_box(&mut self, obj_box: Box3) {
        self.obj_box = obj_box;
        self.reset_world_box();
    }

    pub fn world_box(&self) -> &Box3 {
        &self.world_box
    }

    /// Recomputes the world box from the object box, scale and transform.
    pub fn reset_world_box(&mut self) {
        self.world_box = self.obj_box.to_world(&self.transform, self.scale);
    }

    pub fn pack_update(
        &self,
        connection: &ConnectionKey,
        mask: u32,
        writer: &mut dyn BitWrite,
    ) -> u32 {
        self.net.pack_update(connection, mask, writer)
    }

    pub fn unpack_update(
        &mut self,
        connection: &ConnectionKey,
        reader: &mut BitReader,
    ) -> Result<(), SerdeErr> {
        self.net.unpack_update(connection, reader)
    }
}
