//! Paired input and output streams over one transport.

use core::fmt;

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::input::{ByteSource, IStream, InputError, Scan};
use crate::locale::Locales;
use crate::output::{ByteSink, OStream, OutputError, Print};

/// An input and an output stream sharing one [`Locales`] context.
///
/// This is the `cin`/`cout` pair of a serial terminal: both halves see
/// the same locale selection, and each keeps its own state (token buffer
/// on the input side, manipulator state on the output side).
///
/// # Example
///
/// ```ignore
/// let locales = Locales::new();
/// let mut console = Console::new(rx, tx, Delay, &locales);
/// let mut age = 0u32;
/// console.prompt("Age? ", &mut age)?;
/// console.output_mut().write("Next year you will be ")?.write(age + 1)?.endl()?;
/// ```
pub struct Console<'l, S, W, D> {
    input: IStream<'l, S, D>,
    output: OStream<'l, W>,
}

impl<'l, S, W, D> Console<'l, S, W, D>
where
    S: ByteSource,
    W: ByteSink,
    D: DelayNs,
{
    /// Create a console from the two transport halves.
    pub fn new(source: S, sink: W, delay: D, locales: &'l Locales) -> Self {
        Self {
            input: IStream::new(source, delay, locales),
            output: OStream::new(sink, locales),
        }
    }

    /// Write `text`, then block until a value has been read.
    pub fn prompt<V: Scan>(&mut self, text: &str, value: &mut V) -> Result<(), ConsoleError> {
        self.output.write(text)?;
        self.input.read(value)?;
        Ok(())
    }

    /// Write `value` followed by a line break.
    pub fn println<V: Print>(&mut self, value: V) -> Result<(), ConsoleError> {
        self.output.write(value)?.endl()?;
        Ok(())
    }

    #[inline]
    pub fn locales(&self) -> &'l Locales {
        self.input.locales()
    }

    /// Get a reference to the input stream.
    pub fn input(&self) -> &IStream<'l, S, D> {
        &self.input
    }

    /// Get a mutable reference to the input stream.
    pub fn input_mut(&mut self) -> &mut IStream<'l, S, D> {
        &mut self.input
    }

    /// Get a reference to the output stream.
    pub fn output(&self) -> &OStream<'l, W> {
        &self.output
    }

    /// Get a mutable reference to the output stream.
    pub fn output_mut(&mut self) -> &mut OStream<'l, W> {
        &mut self.output
    }

    /// Decompose the console into its input and output streams.
    pub fn into_parts(self) -> (IStream<'l, S, D>, OStream<'l, W>) {
        (self.input, self.output)
    }
}

/// Error type for console operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConsoleError {
    /// Error from the input stream.
    Input(InputError),
    /// Error from the output stream.
    Output(OutputError),
}

impl From<InputError> for ConsoleError {
    fn from(e: InputError) -> Self {
        debug!("console input error: {}", e);
        Self::Input(e)
    }
}

impl From<OutputError> for ConsoleError {
    fn from(e: OutputError) -> Self {
        debug!("console output error: {}", e);
        Self::Output(e)
    }
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(e) => write!(f, "input: {}", e),
            Self::Output(e) => write!(f, "output: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use heapless::String;

    use super::*;
    use crate::locale::Category;
    use crate::output::{setprecision, Manipulator};
    use crate::testutil::{CountingDelay, MockSink, MockSource};

    #[test]
    fn test_prompt_writes_then_reads() {
        let locales = Locales::new();
        let mut console = Console::new(
            MockSource::new(b"Ana 31\n"),
            MockSink::default(),
            CountingDelay::default(),
            &locales,
        );

        let mut name: String<16> = String::new();
        let mut age = 0u32;
        console.prompt("Name? ", &mut name).unwrap();
        console.prompt("Age? ", &mut age).unwrap();
        console.println(age).unwrap();

        assert_eq!(name.as_str(), "Ana");
        let (_, cout) = console.into_parts();
        assert_eq!(cout.into_inner().text(), "Name? Age? 31\r\n");
    }

    #[test]
    fn test_halves_share_locale_selection() {
        let locales = Locales::new();
        let mut console = Console::new(
            MockSource::new(b"2,5\n"),
            MockSink::default(),
            CountingDelay::default(),
            &locales,
        );

        console.locales().select(Category::NUMERIC, "en_150.UTF-8").unwrap();
        let mut value = 0.0f64;
        console.input_mut().read(&mut value).unwrap();
        console
            .output_mut()
            .write(Manipulator::Fixed)
            .unwrap()
            .write(setprecision(1))
            .unwrap()
            .write(value * 2.0)
            .unwrap();

        assert_eq!(console.output().sink().text(), "5,0");
    }

    #[test]
    fn test_prompt_reports_input_error() {
        let locales = Locales::new();
        let mut console = Console::new(
            MockSource::new(b""),
            MockSink::default(),
            CountingDelay::default(),
            &locales,
        );
        let mut value = 0i32;
        assert_eq!(
            console.prompt("> ", &mut value),
            Err(ConsoleError::Input(InputError::Io))
        );
        assert_eq!(console.output().sink().text(), "> ");
    }
}
