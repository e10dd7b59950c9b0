//! Output stream and its manipulator state machine.

use core::fmt;

use super::print::Print;
use super::traits::{ByteSink, OutputError};
use crate::locale::Locales;

/// Line terminator written by [`OStream::endl`].
pub const ENDL: &str = "\r\n";

/// Precision of a fresh stream.
pub const DEFAULT_PRECISION: u8 = 6;

/// Largest accepted precision. Larger requests are clamped.
pub const MAX_PRECISION: u8 = 19;

/// Fraction digits used in [`FloatMode::DefaultFloat`].
pub const DEFAULT_FLOAT_DIGITS: usize = 2;

/// How real numbers are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FloatMode {
    /// Two fraction digits, never grouped.
    #[default]
    DefaultFloat,
    /// The stream precision, grouped when grouping is on.
    Fixed,
}

/// Stream formatting state, changed only by writing a [`Manipulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FormatState {
    precision: u8,
    mode: FloatMode,
    show_grouping: bool,
}

impl FormatState {
    #[inline]
    #[must_use]
    pub const fn precision(&self) -> u8 {
        self.precision
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> FloatMode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub const fn show_grouping(&self) -> bool {
        self.show_grouping
    }

    /// Apply one transition.
    pub fn apply(&mut self, manipulator: Manipulator) {
        match manipulator {
            Manipulator::Precision(n) => self.precision = n.min(MAX_PRECISION),
            Manipulator::Fixed => self.mode = FloatMode::Fixed,
            Manipulator::DefaultFloat => self.mode = FloatMode::DefaultFloat,
            Manipulator::ShowGrouping => self.show_grouping = true,
            Manipulator::NoShowGrouping => self.show_grouping = false,
        }
    }
}

impl Default for FormatState {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            mode: FloatMode::DefaultFloat,
            show_grouping: false,
        }
    }
}

/// A value that changes stream state instead of producing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Manipulator {
    /// Fraction digits for [`FloatMode::Fixed`], clamped to [`MAX_PRECISION`].
    Precision(u8),
    Fixed,
    DefaultFloat,
    /// Insert thousands separators into integers and fixed reals.
    ShowGrouping,
    NoShowGrouping,
}

/// Precision manipulator, clamped to `0..=19`.
#[inline]
#[must_use]
pub const fn setprecision(n: u8) -> Manipulator {
    if n > MAX_PRECISION {
        Manipulator::Precision(MAX_PRECISION)
    } else {
        Manipulator::Precision(n)
    }
}

impl Print for Manipulator {
    fn print<W: ByteSink>(&self, out: &mut OStream<'_, W>) -> Result<(), OutputError> {
        out.state.apply(*self);
        Ok(())
    }
}

/// Writes typed values to a [`ByteSink`].
///
/// # Example
///
/// ```
/// use uart_iostream::locale::Locales;
/// use uart_iostream::output::{setprecision, ByteSink, Manipulator, OStream, OutputError};
///
/// struct Buffer(heapless::Vec<u8, 64>);
///
/// impl ByteSink for Buffer {
///     fn write(&mut self, bytes: &[u8]) -> Result<(), OutputError> {
///         self.0.extend_from_slice(bytes).map_err(|_| OutputError::Io)
///     }
/// }
///
/// let locales = Locales::new();
/// let mut cout = OStream::new(Buffer(heapless::Vec::new()), &locales);
/// cout.write(Manipulator::Fixed)?
///     .write(setprecision(2))?
///     .write(1.23456)?
///     .write(" ")?
///     .write(Manipulator::ShowGrouping)?
///     .write(1234567)?;
/// assert_eq!(cout.sink().0.as_slice(), b"1.23 1,234,567");
/// # Ok::<(), OutputError>(())
/// ```
pub struct OStream<'l, W> {
    sink: W,
    locales: &'l Locales,
    state: FormatState,
}

impl<'l, W: ByteSink> OStream<'l, W> {
    pub fn new(sink: W, locales: &'l Locales) -> Self {
        Self {
            sink,
            locales,
            state: FormatState::default(),
        }
    }

    /// Write one value, chainable.
    pub fn write<V: Print>(&mut self, value: V) -> Result<&mut Self, OutputError> {
        value.print(self)?;
        Ok(self)
    }

    /// Raw bytes, unchanged.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self, OutputError> {
        self.sink.write(bytes)?;
        Ok(self)
    }

    /// Write [`ENDL`].
    pub fn endl(&mut self) -> Result<&mut Self, OutputError> {
        self.write_bytes(ENDL.as_bytes())
    }

    #[inline]
    pub fn state(&self) -> FormatState {
        self.state
    }

    #[inline]
    pub fn locales(&self) -> &'l Locales {
        self.locales
    }

    #[inline]
    pub fn sink(&self) -> &W {
        &self.sink
    }

    #[inline]
    pub fn sink_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Consume the stream and return the transport.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: ByteSink> fmt::Write for OStream<'_, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.sink.write(s.as_bytes()).map_err(|_| fmt::Error)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use core::fmt::Write;

    use super::*;
    use crate::testutil::MockSink;

    #[test]
    fn test_default_state() {
        let state = FormatState::default();
        assert_eq!(state.precision(), 6);
        assert_eq!(state.mode(), FloatMode::DefaultFloat);
        assert!(!state.show_grouping());
    }

    #[test]
    fn test_manipulators_change_state_only() {
        let locales = Locales::new();
        let mut cout = OStream::new(MockSink::default(), &locales);
        cout.write(Manipulator::Fixed)
            .unwrap()
            .write(setprecision(3))
            .unwrap()
            .write(Manipulator::ShowGrouping)
            .unwrap();

        let state = cout.state();
        assert_eq!(state.precision(), 3);
        assert_eq!(state.mode(), FloatMode::Fixed);
        assert!(state.show_grouping());
        assert!(cout.sink().bytes.is_empty());

        cout.write(Manipulator::DefaultFloat)
            .unwrap()
            .write(Manipulator::NoShowGrouping)
            .unwrap();
        assert_eq!(cout.state().mode(), FloatMode::DefaultFloat);
        assert!(!cout.state().show_grouping());
    }

    #[test]
    fn test_precision_is_clamped() {
        assert_eq!(setprecision(25), Manipulator::Precision(19));
        assert_eq!(setprecision(0), Manipulator::Precision(0));

        let mut state = FormatState::default();
        state.apply(Manipulator::Precision(200));
        assert_eq!(state.precision(), MAX_PRECISION);
    }

    #[test]
    fn test_endl_and_fmt_write() {
        let locales = Locales::new();
        let mut cout = OStream::new(MockSink::default(), &locales);
        write!(cout, "x={}", 5).unwrap();
        cout.endl().unwrap();
        assert_eq!(cout.into_inner().text(), "x=5\r\n");
    }

    #[test]
    fn test_sink_error_propagates() {
        let locales = Locales::new();
        let mut cout = OStream::new(MockSink::failing(), &locales);
        assert_eq!(cout.write("hi").err(), Some(OutputError::Io));
    }
}
