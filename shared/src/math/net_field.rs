use glam::{Quat, Vec2, Vec3, Vec4};

use crate::{BitReader, BitWrite, SerdeErr, Serde, MAX_LONG_STRING_LENGTH};

/// Longest string a `String` field carries
pub const LONG_STRING_FIELD_LENGTH: u32 = MAX_LONG_STRING_LENGTH;

/// Wire codec of a value used inside a field group.
pub trait NetField: Sized {
    fn write_field(&self, writer: &mut dyn BitWrite);

    fn read_field(reader: &mut BitReader) -> Result<Self, SerdeErr>;
}

macro_rules! impl_net_field_for_serde {
    ($($impl_type:ty),*) => {
        $(
            impl NetField for $impl_type {
                fn write_field(&self, writer: &mut dyn BitWrite) {
                    self.ser(writer);
                }

                fn read_field(reader: &mut BitReader) -> Result<Self, SerdeErr> {
                    <$impl_type as Serde>::de(reader)
                }
            }
        )*
    };
}

impl_net_field_for_serde!(bool, u8, u32, i32, f32);

impl NetField for String {
    fn write_field(&self, writer: &mut dyn BitWrite) {
        writer.write_long_string(LONG_STRING_FIELD_LENGTH, self);
    }

    fn read_field(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        reader.read_long_string(LONG_STRING_FIELD_LENGTH)
    }
}

impl NetField for Vec2 {
    fn write_field(&self, writer: &mut dyn BitWrite) {
        self.x.ser(writer);
        self.y.ser(writer);
    }

    fn read_field(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Vec2::new(f32::de(reader)?, f32::de(reader)?))
    }
}

impl NetField for Vec3 {
    fn write_field(&self, writer: &mut dyn BitWrite) {
        self.x.ser(writer);
        self.y.ser(writer);
        self.z.ser(writer);
    }

    fn read_field(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let x = f32::de(reader)?;
        let y = f32::de(reader)?;
        let z = f32::de(reader)?;
        Ok(Vec3::new(x, y, z))
    }
}

impl NetField for Vec4 {
    fn write_field(&self, writer: &mut dyn BitWrite) {
        for component in self.to_array() {
            component.ser(writer);
        }
    }

    fn read_field(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let mut components = [0.0_f32; 4];
        for component in components.iter_mut() {
            *component = f32::de(reader)?;
        }
        Ok(Vec4::from_array(components))
    }
}

impl NetField for Quat {
    fn write_field(&self, writer: &mut dyn BitWrite) {
        for component in self.to_array() {
            component.ser(writer);
        }
    }

    fn read_field(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let mut components = [0.0_f32; 4];
        for component in components.iter_mut() {
            *component = f32::de(reader)?;
        }
        Ok(Quat::from_array(components))
    }
}

impl<T: NetField + Default + Copy, const N: usize> NetField for [T; N] {
    fn write_field(&self, writer: &mut dyn BitWrite) {
        for item in self {
            item.write_field(writer);
        }
    }

    fn read_field(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let mut output = [T::default(); N];
        for item in output.iter_mut() {
            *item = T::read_field(reader)?;
        }
        Ok(output)
    }
}

/// Writes a `u32` element count followed by every element.
pub(crate) fn write_list<T: NetField>(writer: &mut dyn BitWrite, items: &[T]) {
    (items.len() as u32).ser(writer);
    for item in items {
        item.write_field(writer);
    }
}

pub(crate) fn read_list<T: NetField>(reader: &mut BitReader) -> Result<Vec<T>, SerdeErr> {
    let count = u32::de(reader)?;
    // a corrupt count must not turn into a huge allocation
    let mut output = Vec::with_capacity((count as usize).min(reader.bits_remaining() as usize));
    for _ in 0..count {
        output.push(T::read_field(reader)?);
    }
    Ok(output)
}
