/// Largest payload a single bounded packet may carry
pub const MTU_SIZE_BYTES: usize = 1430;
pub const MTU_SIZE_BITS: u32 = (MTU_SIZE_BYTES * 8) as u32;

/// Longest string accepted by `write_long_string` callers that use the
/// engine's 1024-byte command buffers
pub const MAX_LONG_STRING_LENGTH: u32 = 1023;
