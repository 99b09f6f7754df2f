use std::any::Any;

use glam::{Vec2, Vec3, Vec4};

use crate::{
    math::{AffineTransform, NetField},
    net_object::{MaskLayout, NetObject},
    objects::SceneObject,
    types::ConnectionKey,
    world::object::replicate::Replicate,
    BitReader, BitWrite, SerdeErr,
};

/// One of the three layered surface waves.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WaterWave {
    pub direction: Vec2,
    pub speed: f32,
    pub magnitude: f32,
}

impl NetField for WaterWave {
    fn write_field(&self, writer: &mut dyn BitWrite) {
        self.direction.write_field(writer);
        self.speed.write_field(writer);
        self.magnitude.write_field(writer);
    }

    fn read_field(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            direction: Vec2::read_field(reader)?,
            speed: f32::read_field(reader)?,
            magnitude: f32::read_field(reader)?,
        })
    }
}

/// Shared state of every body of water.
#[derive(Debug)]
pub struct WaterObject {
    pub scene: SceneObject,
    pub density: f32,
    pub viscosity: f32,
    pub liquid_type: String,
    pub fresnel_bias: f32,
    pub fresnel_power: f32,
    pub base_color: Vec4,
    pub waves: [WaterWave; 3],
    pub surface_material: String,
    pub underwater_material: String,
    pub ripple_texture: String,
    pub foam_texture: String,
    pub cubemap: String,
    pub sound_ambience: String,
}

impl WaterObject {
    pub const UPDATE_MASK: u32 = SceneObject::MASK_LAYOUT.bit(0);
    pub const WAVE_MASK: u32 = SceneObject::MASK_LAYOUT.bit(1);
    pub const MATERIAL_MASK: u32 = SceneObject::MASK_LAYOUT.bit(2);
    pub const TEXTURE_MASK: u32 = SceneObject::MASK_LAYOUT.bit(3);
    pub const SOUND_MASK: u32 = SceneObject::MASK_LAYOUT.bit(4);
    pub const MASK_LAYOUT: MaskLayout = SceneObject::MASK_LAYOUT.claim(5);

    pub fn new(net: NetObject) -> Self {
        Self {
            scene: SceneObject::new(net),
            density: 1.0,
            viscosity: 1.0,
            liquid_type: "Water".to_string(),
            fresnel_bias: 0.3,
            fresnel_power: 6.0,
            base_color: Vec4::new(0.2, 0.4, 0.6, 1.0),
            waves: [WaterWave::default(); 3],
            surface_material: String::new(),
            underwater_material: String::new(),
            ripple_texture: String::new(),
            foam_texture: String::new(),
            cubemap: String::new(),
            sound_ambience: String::new(),
        }
    }

    /// Flags the groups touched by direct field edits.
    pub fn mark_dirty(&self, mask: u32) {
        self.scene.net.set_mask_bits(mask);
    }

    pub fn set_wave(&mut self, index: usize, wave: WaterWave) {
        if let Some(slot) = self.waves.get_mut(index) {
            *slot = wave;
            self.scene.net.set_mask_bits(Self::WAVE_MASK);
        }
    }

    pub fn set_sound_ambience(&mut self, sound: &str) {
        self.sound_ambience = sound.to_string();
        self.scene.net.set_mask_bits(Self::SOUND_MASK);
    }

    /// Packs the water groups, leaving `reserve` bits free for the fields a
    /// derived body of water writes after them.
    pub fn pack_update(
        &self,
        connection: &ConnectionKey,
        mask: u32,
        writer: &mut dyn BitWrite,
        reserve: u32,
    ) -> u32 {
        let retained = self.scene.pack_update(connection, mask, writer);
        retained | self.pack_fields_reserving(mask, writer, reserve)
    }

    pub fn unpack_update(
        &mut self,
        connection: &ConnectionKey,
        reader: &mut BitReader,
    ) -> Result<(), SerdeErr> {
        self.scene.unpack_update(connection, reader)?;
        self.unpack_fields(reader)?;
        Ok(())
    }
}

flagged_fields! {
    impl WaterObject {
        Self::UPDATE_MASK => [
            density,
            viscosity,
            liquid_type,
            fresnel_bias,
            fresnel_power,
            base_color,
        ],
        Self::WAVE_MASK => [waves],
        Self::MATERIAL_MASK => [surface_material, underwater_material],
        Self::TEXTURE_MASK => [ripple_texture, foam_texture, cubemap],
        Self::SOUND_MASK => [sound_ambience],
    }
}

/// Box-shaped body of water.
#[derive(Debug)]
pub struct WaterBlock {
    water: WaterObject,
    grid_element_size: f32,
}

impl WaterBlock {
    pub const MASK_LAYOUT: MaskLayout = WaterObject::MASK_LAYOUT;

    pub fn new() -> Self {
        Self::with_net_object(NetObject::ghostable())
    }

    fn with_net_object(net: NetObject) -> Self {
        Self {
            water: WaterObject::new(net),
            grid_element_size: 5.0,
        }
    }

    pub fn water(&self) -> &WaterObject {
        &self.water
    }

    pub fn water_mut(&mut self) -> &mut WaterObject {
        &mut self.water
    }

    pub fn set_transform(&mut self, transform: AffineTransform) {
        self.water.scene.set_transform(transform);
        self.water.mark_dirty(WaterObject::UPDATE_MASK);
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.water.scene.set_scale(scale);
        self.water.mark_dirty(WaterObject::UPDATE_MASK);
    }

    pub fn grid_element_size(&self) -> f32 {
        self.grid_element_size
    }

    pub fn set_grid_element_size(&mut self, size: f32) {
        self.grid_element_size = size;
        self.water.mark_dirty(WaterObject::UPDATE_MASK);
    }
}

impl Default for WaterBlock {
    fn default() -> Self {
        Self::new()
    }
}

flagged_fields! {
    impl WaterBlock {
        WaterObject::UPDATE_MASK => [
            water.scene.transform,
            water.scene.scale,
            grid_element_size,
        ],
    }
}

impl Replicate for WaterBlock {
    fn name(&self) -> &'static str {
        "WaterBlock"
    }

    fn net_object(&self) -> &NetObject {
        &self.water.scene.net
    }

    fn net_object_mut(&mut self) -> &mut NetObject {
        &mut self.water.scene.net
    }

    fn pack_update(&self, connection: &ConnectionKey, mask: u32, writer: &mut dyn BitWrite) -> u32 {
        let own_bits = self.fields_bits(mask);
        let retained = self.water.pack_update(connection, mask, writer, own_bits);
        retained | self.pack_fields(mask, writer)
    }

    fn unpack_update(
        &mut self,
        connection: &ConnectionKey,
        reader: &mut BitReader,
    ) -> Result<(), SerdeErr> {
        self.water.unpack_update(connection, reader)?;
        if self.unpack_fields(reader)? != 0 {
            self.water.scene.reset_world_box();
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
