//! # Ghostwire Serde
//! Bit-granular reading & writing used by every replicated type's
//! `pack_update`/`unpack_update` pair.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod bit_counter;
mod bit_reader;
mod bit_writer;
mod constants;
mod error;
mod impls;
mod ranged;
mod serde;
mod stream_writer;

pub use bit_counter::BitCounter;
pub use bit_reader::{BitReader, OwnedBitReader};
pub use bit_writer::{BitWrite, BitWriter};
pub use constants::{MAX_LONG_STRING_LENGTH, MTU_SIZE_BITS, MTU_SIZE_BYTES};
pub use error::SerdeErr;
pub use ranged::bits_for_range;
pub use serde::Serde;
pub use stream_writer::StreamWriter;
