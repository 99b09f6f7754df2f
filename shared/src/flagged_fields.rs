/// Generates a symmetric pair of field-group codecs from one list.
///
/// ```ignore
/// flagged_fields! {
///     impl Trigger {
///         Self::TRANSFORM_MASK => [base.scene.transform],
///         Self::ENTER_CMD_MASK => [enter_command],
///     }
/// }
/// ```
///
/// expands to `pack_fields(&self, mask, writer) -> u32`, which writes one flag
/// per group followed by the group's fields when its mask bit is requested, and
/// `unpack_fields(&mut self, reader) -> Result<u32, SerdeErr>`, which reads the
/// same sequence back and returns the mask of the groups that were present.
/// Both directions come from the same list, so they cannot drift apart.
///
/// A requested group that does not fit in `writer.bits_free()` is written as
/// absent and its mask bit is returned as retained. Room is always left for
/// the flags of the groups after it, and for `reserve` more bits when packing
/// through `pack_fields_reserving`.
#[macro_export]
macro_rules! flagged_fields {
    (
        impl $target:ty {
            $( $mask:expr => [ $( $($field:ident).+ ),* $(,)? ] ),* $(,)?
        }
    ) => {
        impl $target {
            #[allow(dead_code)]
            fn pack_fields(&self, mask: u32, writer: &mut dyn $crate::BitWrite) -> u32 {
                self.pack_fields_reserving(mask, writer, 0)
            }

            #[allow(dead_code)]
            fn pack_fields_reserving(
                &self,
                mask: u32,
                writer: &mut dyn $crate::BitWrite,
                reserve: u32,
            ) -> u32 {
                let mut retained: u32 = 0;
                let mut later_flags = [$($mask),*].len() as u32;
                $(
                    later_flags -= 1;
                    let requested = mask & ($mask) != 0;
                    let fits = requested && {
                        let mut counter = $crate::BitCounter::new(0, 0, u32::MAX);
                        $(
                            $crate::NetField::write_field(&self.$($field).+, &mut counter);
                        )*
                        let needed = 1 + counter.bits_needed() + later_flags + reserve;
                        needed <= writer.bits_free()
                    };
                    if requested && !fits {
                        retained |= $mask;
                    }
                    if writer.write_flag(fits) {
                        $(
                            $crate::NetField::write_field(&self.$($field).+, writer);
                        )*
                    }
                )*
                retained
            }

            /// Bits `pack_fields` takes for `mask` when every requested group fits.
            #[allow(dead_code)]
            fn fields_bits(&self, mask: u32) -> u32 {
                let mut counter = $crate::BitCounter::new(0, 0, u32::MAX);
                $(
                    if $crate::BitWrite::write_flag(&mut counter, mask & ($mask) != 0) {
                        $(
                            $crate::NetField::write_field(&self.$($field).+, &mut counter);
                        )*
                    }
                )*
                counter.bits_needed()
            }

            #[allow(dead_code)]
            fn unpack_fields(
                &mut self,
                reader: &mut $crate::BitReader,
            ) -> Result<u32, $crate::SerdeErr> {
                let mut received: u32 = 0;
                $(
                    if reader.read_flag()? {
                        $(
                            self.$($field).+ = $crate::NetField::read_field(reader)?;
                        )*
                        received |= $mask;
                    }
                )*
                Ok(received)
            }
        }
    };
}
