use std::any::Any;

use crate::{
    math::{AffineTransform, Polyhedron, LONG_STRING_FIELD_LENGTH},
    net_object::{MaskLayout, NetObject},
    objects::GameBase,
    types::ConnectionKey,
    world::object::replicate::Replicate,
    BitReader, BitWrite, SerdeErr,
};

/// Volume that runs console commands as objects enter, leave or stay inside.
#[derive(Debug)]
pub struct Trigger {
    base: GameBase,
    polyhedron: Polyhedron,
    enter_command: String,
    leave_command: String,
    tick_command: String,
}

impl Trigger {
    pub const TRANSFORM_MASK: u32 = GameBase::MASK_LAYOUT.bit(0);
    pub const POLY_MASK: u32 = GameBase::MASK_LAYOUT.bit(1);
    pub const ENTER_CMD_MASK: u32 = GameBase::MASK_LAYOUT.bit(2);
    pub const LEAVE_CMD_MASK: u32 = GameBase::MASK_LAYOUT.bit(3);
    pub const TICK_CMD_MASK: u32 = GameBase::MASK_LAYOUT.bit(4);
    pub const MASK_LAYOUT: MaskLayout = GameBase::MASK_LAYOUT.claim(5);

    pub fn new() -> Self {
        Self::with_net_object(NetObject::ghostable())
    }

    fn with_net_object(net: NetObject) -> Self {
        let mut output = Self {
            base: GameBase::new(net),
            polyhedron: Polyhedron::default(),
            enter_command: String::new(),
            leave_command: String::new(),
            tick_command: String::new(),
        };
        output.rebuild_obj_box();
        output
    }

    pub fn game_base(&self) -> &GameBase {
        &self.base
    }

    pub fn game_base_mut(&mut self) -> &mut GameBase {
        &mut self.base
    }

    pub fn transform(&self) -> &AffineTransform {
        self.base.scene.transform()
    }

    pub fn set_transform(&mut self, transform: AffineTransform) {
        self.base.scene.set_transform(transform);
        self.base.scene.net.set_mask_bits(Self::TRANSFORM_MASK);
    }

    pub fn polyhedron(&self) -> &Polyhedron {
        &self.polyhedron
    }

    pub fn set_polyhedron(&mut self, polyhedron: Polyhedron) {
        self.polyhedron = polyhedron;
        self.rebuild_obj_box();
        self.base.scene.net.set_mask_bits(Self::POLY_MASK);
    }

    pub fn enter_command(&self) -> &str {
        &self.enter_command
    }

    pub fn set_enter_command(&mut self, command: &str) {
        self.enter_command = truncate_command(command);
        self.base.scene.net.set_mask_bits(Self::ENTER_CMD_MASK);
    }

    pub fn leave_command(&self) -> &str {
        &self.leave_command
    }

    pub fn set_leave_command(&mut self, command: &str) {
        self.leave_command = truncate_command(command);
        self.base.scene.net.set_mask_bits(Self::LEAVE_CMD_MASK);
    }

    pub fn tick_command(&self) -> &str {
        &self.tick_command
    }

    pub fn set_tick_command(&mut self, command: &str) {
        self.tick_command = truncate_command(command);
        self.base.scene.net.set_mask_bits(Self::TICK_CMD_MASK);
    }

    /// Whether a world-space point lies inside the trigger volume.
    pub fn contains_point(&self, point: glam::Vec3) -> bool {
        let transform = self.base.scene.transform();
        let local = transform.rotation.inverse() * (point - transform.position);
        self.polyhedron.contains(local / self.base.scene.scale())
    }

    fn rebuild_obj_box(&mut self) {
        self.base.scene.set_obj_box(self.polyhedron.bounds());
    }
}

impl Default for Trigger {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate_command(command: &str) -> String {
    let mut length = command.len().min(LONG_STRING_FIELD_LENGTH as usize);
    while !command.is_char_boundary(length) {
        length -= 1;
    }
    command[..length].to_string()
}

flagged_fields! {
    impl Trigger {
        Self::TRANSFORM_MASK => [base.scene.transform],
        Self::POLY_MASK => [polyhedron],
        Self::ENTER_CMD_MASK => [enter_command],
        Self::LEAVE_CMD_MASK => [leave_command],
        Self::TICK_CMD_MASK => [tick_command],
    }
}

impl Replicate for Trigger {
    fn name(&self) -> &'static str {
        "Trigger"
    }

    fn net_object(&self) -> &NetObject {
        &self.base.scene.net
    }

    fn net_object_mut(&mut self) -> &mut NetObject {
        &mut self.base.scene.net
    }

    fn pack_update(&self, connection: &ConnectionKey, mask: u32, writer: &mut dyn BitWrite) -> u32 {
        let retained = self.base.pack_update(connection, mask, writer);
        retained | self.pack_fields(mask, writer)
    }

    fn unpack_update(
        &mut self,
        connection: &ConnectionKey,
        reader: &mut BitReader,
    ) -> Result<(), SerdeErr> {
        self.base.unpack_update(connection, reader)?;

        let received = self.unpack_fields(reader)?;
        if received & Self::TRANSFORM_MASK != 0 {
            self.base.scene.reset_world_box();
        }
        if received & Self::POLY_MASK != 0 {
            self.rebuild_obj_box();
        }
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
