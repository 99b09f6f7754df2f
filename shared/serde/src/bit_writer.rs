use crate::{
    bits_for_range, constants::MTU_SIZE_BITS, BitCounter, OwnedBitReader,
};

// BitWrite
pub trait BitWrite {
    fn write_bit(&mut self, bit: bool);
    fn write_byte(&mut self, byte: u8);
    fn write_bits(&mut self, bits: u32);
    fn is_counter(&self) -> bool;
    /// Bits that can still be written before the writer's capacity is hit
    fn bits_free(&self) -> u32;

    /// Writes a single bit and hands the value back, so a field group can be
    /// written as `if writer.write_flag(mask & GROUP != 0) { .. }`
    fn write_flag(&mut self, flag: bool) -> bool {
        self.write_bit(flag);
        flag
    }

    /// Writes `value - min` using only as many bits as `max - min` requires.
    ///
    /// # Panics
    ///
    /// Panics if `value` lies outside of `[min, max]`.
    fn write_ranged_u32(&mut self, value: u32, min: u32, max: u32) {
        if min > max || value < min || value > max {
            panic!(
                "Ranged value {} must be within [{}, {}]",
                value, min, max
            );
        }
        let mut offset = value - min;
        for _ in 0..bits_for_range(max - min) {
            self.write_bit(offset & 1 != 0);
            offset >>= 1;
        }
    }

    /// Writes a length-capped string: a ranged length in `[0, max_length]`
    /// followed by raw bytes. Longer input is cut at the last char boundary
    /// that fits.
    fn write_long_string(&mut self, max_length: u32, value: &str) {
        let mut length = value.len().min(max_length as usize);
        while !value.is_char_boundary(length) {
            length -= 1;
        }
        self.write_ranged_u32(length as u32, 0, max_length);
        for byte in &value.as_bytes()[..length] {
            self.write_byte(*byte);
        }
    }
}

// BitWriter
pub struct BitWriter {
    scratch: u8,
    scratch_index: u8,
    buffer: Vec<u8>,
    current_bits: u32,
    max_bits: u32,
}

impl BitWriter {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self::with_capacity(MTU_SIZE_BITS)
    }

    pub fn with_capacity(bit_capacity: u32) -> Self {
        Self {
            scratch: 0,
            scratch_index: 0,
            buffer: Vec::with_capacity(bit_capacity.div_ceil(8) as usize),
            current_bits: 0,
            max_bits: bit_capacity,
        }
    }

    fn flush(&mut self) {
        if self.scratch_index > 0 {
            self.buffer
                .push((self.scratch << (8 - self.scratch_index)).reverse_bits());
            self.scratch_index = 0;
            self.scratch = 0;
        }
    }

    pub fn to_bytes(mut self) -> Vec<u8> {
        self.flush();
        self.buffer
    }

    pub fn to_owned_reader(self) -> OwnedBitReader {
        let bytes = self.to_bytes();
        OwnedBitReader::new(&bytes)
    }

    pub fn counter(&self) -> BitCounter {
        BitCounter::new(self.current_bits, self.current_bits, self.max_bits)
    }

    pub fn reserve_bits(&mut self, bits: u32) {
        self.max_bits -= bits;
    }

    pub fn release_bits(&mut self, bits: u32) {
        self.max_bits += bits;
    }

    pub fn bits_written(&self) -> u32 {
        self.current_bits
    }
}

impl BitWrite for BitWriter {
    fn write_bit(&mut self, bit: bool) {
        if self.current_bits >= self.max_bits {
            panic!("Write overflow!");
        }
        self.scratch <<= 1;

        if bit {
            self.scratch |= 1;
        }

        self.scratch_index += 1;
        self.current_bits += 1;

        if self.scratch_index >= 8 {
            self.buffer.push(self.scratch.reverse_bits());
            self.scratch_index = 0;
            self.scratch = 0;
        }
    }

    fn write_byte(&mut self, byte: u8) {
        let mut temp = byte;
        for _ in 0..8 {
            self.write_bit(temp & 1 != 0);
            temp >>= 1;
        }
    }

    fn write_bits(&mut self, _: u32) {
        panic!("This method should not be called for BitWriter!");
    }

    fn is_counter(&self) -> bool {
        false
    }

    fn bits_free(&self) -> u32 {
        self.max_bits - self.current_bits
    }
}
