use std::any::Any;

use glam::Vec3;

use crate::{
    math::{AffineTransform, NetField, Polyhedron},
    net_object::{MaskLayout, NetObject},
    objects::SceneObject,
    types::ConnectionKey,
    world::object::replicate::Replicate,
    BitReader, BitWrite, Serde, SerdeErr,
};

/// Volume that modifies the motion of objects inside it.
///
/// Everything but the active flag only travels with the initial update; a
/// configuration change re-sends that whole block.
#[derive(Debug)]
pub struct PhysicalZone {
    scene: SceneObject,
    polyhedron: Polyhedron,
    velocity_mod: f32,
    gravity_mod: f32,
    applied_force: Vec3,
    active: bool,
}

impl PhysicalZone {
    pub const ACTIVE_MASK: u32 = SceneObject::MASK_LAYOUT.bit(0);
    pub const MASK_LAYOUT: MaskLayout = SceneObject::MASK_LAYOUT.claim(1);

    pub fn new() -> Self {
        Self::with_net_object(NetObject::ghostable())
    }

    fn with_net_object(net: NetObject) -> Self {
        let mut output = Self {
            scene: SceneObject::new(net),
            polyhedron: Polyhedron::default(),
            velocity_mod: 1.0,
            gravity_mod: 1.0,
            applied_force: Vec3::ZERO,
            active: true,
        };
        output.rebuild_obj_box();
        output
    }

    pub fn scene(&self) -> &SceneObject {
        &self.scene
    }

    pub fn set_transform(&mut self, transform: AffineTransform) {
        self.scene.set_transform(transform);
        self.scene.net.set_mask_bits(NetObject::INITIAL_UPDATE_MASK);
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scene.set_scale(scale);
        self.scene.net.set_mask_bits(NetObject::INITIAL_UPDATE_MASK);
    }

    pub fn polyhedron(&self) -> &Polyhedron {
        &self.polyhedron
    }

    pub fn set_polyhedron(&mut self, polyhedron: Polyhedron) {
        self.polyhedron = polyhedron;
        self.rebuild_obj_box();
        self.scene.net.set_mask_bits(NetObject::INITIAL_UPDATE_MASK);
    }

    pub fn velocity_mod(&self) -> f32 {
        self.velocity_mod
    }

    pub fn gravity_mod(&self) -> f32 {
        self.gravity_mod
    }

    pub fn applied_force(&self) -> Vec3 {
        self.applied_force
    }

    pub fn set_modifiers(&mut self, velocity_mod: f32, gravity_mod: f32, applied_force: Vec3) {
        self.velocity_mod = velocity_mod;
        self.gravity_mod = gravity_mod;
        self.applied_force = applied_force;
        self.scene.net.set_mask_bits(NetObject::INITIAL_UPDATE_MASK);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.scene.net.set_mask_bits(Self::ACTIVE_MASK);
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.scene.net.set_mask_bits(Self::ACTIVE_MASK);
    }

    fn rebuild_obj_box(&mut self) {
        self.scene.set_obj_box(self.polyhedron.bounds());
    }
}

impl Default for PhysicalZone {
    fn default() -> Self {
        Self::new()
    }
}

impl Replicate for PhysicalZone {
    fn name(&self) -> &'static str {
        "PhysicalZone"
    }

    fn net_object(&self) -> &NetObject {
        &self.scene.net
    }

    fn net_object_mut(&mut self) -> &mut NetObject {
        &mut self.scene.net
    }

    fn pack_update(&self, connection: &ConnectionKey, mask: u32, writer: &mut dyn BitWrite) -> u32 {
        let retained = self.scene.pack_update(connection, mask, writer);

        if writer.write_flag(mask & NetObject::INITIAL_UPDATE_MASK != 0) {
            self.scene.transform.write_field(writer);
            self.scene.scale.write_field(writer);
            self.polyhedron.write_field(writer);
            self.velocity_mod.ser(writer);
            self.gravity_mod.ser(writer);
            self.applied_force.write_field(writer);
        }
        writer.write_flag(self.active);

        retained
    }

    fn unpack_update(
        &mut self,
        connection: &ConnectionKey,
        reader: &mut BitReader,
    ) -> Result<(), SerdeErr> {
        self.scene.unpack_update(connection, reader)?;

        if reader.read_flag()? {
            let transform = AffineTransform::read_field(reader)?;
            let scale = Vec3::read_field(reader)?;
            self.polyhedron = Polyhedron::read_field(reader)?;
            self.velocity_mod = f32::de(reader)?;
            self.gravity_mod = f32::de(reader)?;
            self.applied_force = Vec3::read_field(reader)?;

            self.scene.set_transform(transform);
            self.scene.set_scale(scale);
            self.rebuild_obj_box();
        }
        self.active = reader.read_flag()?;

        Ok(())
    }

    fn to_any(&self) -> &dyn Any {
        self
    }

    fn to_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn new_ghost() -> Self {
        Self::with_net_object(NetObject::ghost())
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};

    use super::PhysicalZone;
    use crate::{
        math::AffineTransform, net_object::NetObject, types::ConnectionKey,
        world::object::replicate::Replicate, BitReader, BitWriter,
    };

    #[test]
    fn active_mask_is_second_bit() {
        assert_eq!(PhysicalZone::ACTIVE_MASK, 1 << 1);
    }

    #[test]
    fn later_updates_only_carry_the_active_flag() {
        let connection = ConnectionKey::new(0);
        let mut zone = PhysicalZone::new();
        zone.deactivate();

        let mut writer = BitWriter::new();
        zone.pack_update(&connection, PhysicalZone::ACTIVE_MASK, &mut writer);
        assert_eq!(writer.bits_written(), 2);

        let buffer = writer.to_bytes();
        let mut reader = BitReader::new(&buffer);
        let mut ghost = PhysicalZone::new_ghost();
        ghost.unpack_update(&connection, &mut reader).unwrap();
        assert!(!ghost.is_active());
        assert_eq!(ghost.velocity_mod(), 1.0);
    }

    #[test]
    fn initial_update_carries_everything() {
        let connection = ConnectionKey::new(0);
        let mut zone = PhysicalZone::new();
        zone.set_transform(AffineTransform::new(
            Vec3::new(0.0, 20.0, 1.0),
            Quat::from_rotation_x(0.25),
        ));
        zone.set_scale(Vec3::new(2.0, 2.0, 1.0));
        zone.set_polyhedron("-1 1 0  2 0 0  0 -2 0  0 0 3".parse().unwrap());
        zone.set_modifiers(0.5, -1.0, Vec3::new(0.0, 0.0, 40.0));

        let mut writer = BitWriter::new();
        zone.pack_update(&connection, NetObject::INITIAL_UPDATE_MASK, &mut writer);
        let buffer = writer.to_bytes();
        let mut reader = BitReader::new(&buffer);

        let mut ghost = PhysicalZone::new_ghost();
        ghost.unpack_update(&connection, &mut reader).unwrap();

        assert_eq!(ghost.polyhedron(), zone.polyhedron());
        assert_eq!(ghost.scene().obj_box(), zone.scene().obj_box());
        assert_eq!(ghost.scene().world_box(), zone.scene().world_box());
        assert_eq!(ghost.gravity_mod(), -1.0);
        assert_eq!(ghost.applied_force(), Vec3::new(0.0, 0.0, 40.0));
        assert!(ghost.is_active());
    }
}
