use crate::{bits_for_range, SerdeErr};

// BitReader
pub struct BitReader<'b> {
    state: BitReaderState,
    buffer: &'b [u8],
}

impl<'b> BitReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            state: BitReaderState::default(),
            buffer,
        }
    }

    pub fn to_owned(&self) -> OwnedBitReader {
        OwnedBitReader {
            state: self.state,
            buffer: self.buffer.into(),
        }
    }

    /// Total bits consumed so far
    pub fn bits_read(&self) -> u32 {
        self.state.bits_read
    }

    /// Bits left before the end of the underlying buffer, including the
    /// padding of the final byte
    pub fn bits_remaining(&self) -> u32 {
        (self.buffer.len() * 8) as u32 - self.state.bits_read
    }

    pub fn read_bit(&mut self) -> Result<bool, SerdeErr> {
        if self.state.scratch_index == 0 {
            if self.state.buffer_index == self.buffer.len() {
                return Err(SerdeErr::EndOfStream);
            }

            self.state.scratch = self.buffer[self.state.buffer_index];

            self.state.buffer_index += 1;
            self.state.scratch_index += 8;
        }

        let value = self.state.scratch & 1;

        self.state.scratch >>= 1;
        self.state.scratch_index -= 1;
        self.state.bits_read += 1;

        Ok(value != 0)
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let mut output = 0;
        for _ in 0..7 {
            if self.read_bit()? {
                output |= 128;
            }
            output >>= 1;
        }
        if self.read_bit()? {
            output |= 128;
        }
        Ok(output)
    }

    pub fn read_flag(&mut self) -> Result<bool, SerdeErr> {
        self.read_bit()
    }

    pub fn read_ranged_u32(&mut self, min: u32, max: u32) -> Result<u32, SerdeErr> {
        let mut offset: u32 = 0;
        for bit_index in 0..bits_for_range(max - min) {
            if self.read_bit()? {
                offset |= 1 << bit_index;
            }
        }
        // a span that is not a power of two can still decode past `max`
        match min.checked_add(offset) {
            Some(value) if value <= max => Ok(value),
            _ => Err(SerdeErr::OutOfRange {
                value: offset,
                min,
                max,
            }),
        }
    }

    pub fn read_long_string(&mut self, max_length: u32) -> Result<String, SerdeErr> {
        let length = self.read_ranged_u32(0, max_length)?;
        let mut bytes: Vec<u8> = Vec::with_capacity(length as usize);
        for _ in 0..length {
            bytes.push(self.read_byte()?);
        }
        String::from_utf8(bytes).map_err(|_| SerdeErr::InvalidUtf8)
    }
}

// OwnedBitReader
pub struct OwnedBitReader {
    state: BitReaderState,
    buffer: Box<[u8]>,
}

impl OwnedBitReader {
    pub fn new(buffer: &[u8]) -> Self {
        Self {
            state: BitReaderState::default(),
            buffer: buffer.into(),
        }
    }

    pub fn borrow(&self) -> BitReader<'_> {
        BitReader {
            state: self.state,
            buffer: &self.buffer,
        }
    }
}

// BitReaderState
#[derive(Copy, Clone, Default)]
struct BitReaderState {
    scratch: u8,
    scratch_index: u8,
    buffer_index: usize,
    bits_read: u32,
}

#[cfg(test)]
mod tests {
    use crate::{BitReader, BitWrite, BitWriter, SerdeErr};

    #[test]
    fn reading_past_end_is_an_error() {
        let mut writer = BitWriter::new();
        writer.write_byte(7);
        let buffer = writer.to_bytes();

        let mut reader = BitReader::new(&buffer);
        assert_eq!(reader.read_byte(), Ok(7));
        assert_eq!(reader.read_bit(), Err(SerdeErr::EndOfStream));
    }

    #[test]
    fn ranged_value_above_max_is_an_error() {
        // 3 bits of ones = offset 7, but [0, 4] only allows up to 4
        let mut writer = BitWriter::new();
        writer.write_bit(true);
        writer.write_bit(true);
        writer.write_bit(true);
        let buffer = writer.to_bytes();

        let mut reader = BitReader::new(&buffer);
        assert_eq!(
            reader.read_ranged_u32(0, 4),
            Err(SerdeErr::OutOfRange {
                value: 7,
                min: 0,
                max: 4
            })
        );
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let mut writer = BitWriter::new();
        writer.write_ranged_u32(2, 0, 15);
        writer.write_byte(0xC3);
        writer.write_byte(0x28);
        let buffer = writer.to_bytes();

        let mut reader = BitReader::new(&buffer);
        assert_eq!(reader.read_long_string(15), Err(SerdeErr::InvalidUtf8));
    }

    #[test]
    fn bits_read_tracks_position() {
        let mut writer = BitWriter::new();
        writer.write_bit(true);
        writer.write_byte(200);
        let buffer = writer.to_bytes();

        let mut reader = BitReader::new(&buffer);
        reader.read_bit().unwrap();
        reader.read_byte().unwrap();
        assert_eq!(reader.bits_read(), 9);
        assert_eq!(reader.bits_remaining(), 7);
    }

    #[test]
    fn owned_reader_starts_at_the_beginning() {
        let mut writer = BitWriter::new();
        writer.write_byte(42);
        let owned = writer.to_owned_reader();

        let mut reader = owned.borrow();
        assert_eq!(reader.read_byte(), Ok(42));
    }
}
