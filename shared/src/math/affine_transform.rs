use glam::{Mat4, Quat, Vec3};

use crate::{math::NetField, BitReader, BitWrite, SerdeErr};

/// Position plus unit rotation: a rigid transform without the shear and
/// scale a full matrix could carry, which keeps it to 7 floats on the wire.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.position
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

impl NetField for AffineTransform {
    fn write_field(&self, writer: &mut dyn BitWrite) {
        self.position.write_field(writer);
        self.rotation.write_field(writer);
    }

    fn read_field(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let position = Vec3::read_field(reader)?;
        let rotation = Quat::read_field(reader)?;
        Ok(Self { position, rotation })
    }
}
