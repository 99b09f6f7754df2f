use crate::{bit_reader::BitReader, bit_writer::BitWrite, error::SerdeErr, serde::Serde};

macro_rules! impl_serde_for_bytes {
    ($impl_type:ty) => {
        impl Serde for $impl_type {
            fn ser(&self, writer: &mut dyn BitWrite) {
                for byte in self.to_le_bytes() {
                    writer.write_byte(byte);
                }
            }

            fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
                let mut bytes = [0_u8; std::mem::size_of::<$impl_type>()];
                for byte in bytes.iter_mut() {
                    *byte = reader.read_byte()?;
                }
                Ok(<$impl_type>::from_le_bytes(bytes))
            }

            fn bit_length(&self) -> u32 {
                (std::mem::size_of::<$impl_type>() as u32) * 8
            }
        }
    };
}

impl_serde_for_bytes!(u8);
impl_serde_for_bytes!(u16);
impl_serde_for_bytes!(u32);
impl_serde_for_bytes!(u64);
impl_serde_for_bytes!(i8);
impl_serde_for_bytes!(i16);
impl_serde_for_bytes!(i32);
impl_serde_for_bytes!(i64);

macro_rules! impl_serde_for_float {
    ($impl_type:ty, $bits:ty) => {
        impl Serde for $impl_type {
            fn ser(&self, writer: &mut dyn BitWrite) {
                self.to_bits().ser(writer);
            }

            fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
                Ok(<$impl_type>::from_bits(<$bits>::de(reader)?))
            }

            fn bit_length(&self) -> u32 {
                self.to_bits().bit_length()
            }
        }
    };
}

impl_serde_for_float!(f32, u32);
impl_serde_for_float!(f64, u64);
