use core::fmt;

/// Error type for input operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// Transport I/O error.
    Io,
    /// Token is not valid text for the requested type (strict reads only).
    Parse,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "transport read failed"),
            Self::Parse => write!(f, "invalid token"),
        }
    }
}

/// Blocking byte source, usually the receive half of a UART.
///
/// This trait abstracts the transport so the tokenizer can run over a
/// hardware UART, a USB CDC endpoint, or an in-memory buffer in tests.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait ByteSource {
    /// Number of bytes that can be read without blocking.
    ///
    /// Must not block. Returning `1` for "at least one" is fine.
    fn available(&mut self) -> Result<usize, InputError>;

    /// Consume one byte.
    ///
    /// Only called after [`available`](Self::available) reported a non-zero
    /// count.
    fn read_byte(&mut self) -> Result<u8, InputError>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    #[inline]
    fn available(&mut self) -> Result<usize, InputError> {
        (**self).available()
    }

    #[inline]
    fn read_byte(&mut self) -> Result<u8, InputError> {
        (**self).read_byte()
    }
}
