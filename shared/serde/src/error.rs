use thiserror::Error;

/// Errors that can occur while reading from a bit stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The reader ran past the end of its buffer
    #[error("Attempted to read past the end of the bit stream")]
    EndOfStream,

    /// A ranged value decoded outside of its declared bounds
    #[error("Ranged value {value} is outside of the range [{min}, {max}]")]
    OutOfRange { value: u32, min: u32, max: u32 },

    /// A string's bytes were not valid UTF-8
    #[error("String bytes are not valid UTF-8")]
    InvalidUtf8,

    /// A registry index read from the stream is not known locally
    #[error("Unknown {kind} index {index} in bit stream")]
    UnknownIndex { kind: &'static str, index: u32 },
}

