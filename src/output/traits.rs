use core::fmt;

/// Error type for output operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// Transport I/O error.
    Io,
    /// A value did not fit its scratch buffer.
    Format,
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "transport write failed"),
            Self::Format => write!(f, "formatting overflow"),
        }
    }
}

/// Byte sink, usually the transmit half of a UART.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait ByteSink {
    /// Push all of `bytes` to the transport.
    ///
    /// May block until the bytes are accepted. No backpressure signal is
    /// consulted beyond that.
    fn write(&mut self, bytes: &[u8]) -> Result<(), OutputError>;
}

impl<W: ByteSink + ?Sized> ByteSink for &mut W {
    #[inline]
    fn write(&mut self, bytes: &[u8]) -> Result<(), OutputError> {
        (**self).write(bytes)
    }
}
