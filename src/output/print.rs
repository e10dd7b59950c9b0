//! Per-type output rules.
//!
//! Text is passed through untouched. Integers share one routine over the
//! unsigned magnitude, reals share one routine parameterized by scratch
//! capacity, time values go through the active time pattern.

use core::fmt::{self, Write};

use heapless::String;

use super::fmt::{
    group_digits, localize, write_decimal, write_grouped_real, ScratchBuf, MAX_DECIMAL_DIGITS,
};
use super::ostream::{FloatMode, OStream, DEFAULT_FLOAT_DIGITS};
use super::traits::{ByteSink, OutputError};
use crate::time::{format_time, DateTime, UnixTime};
use crate::utf8::Utf8Char;

/// Scratch capacity for formatted time values. Longer output is cut.
pub const TIME_BUFFER_SIZE: usize = 80;

// "-" + 39 integer digits + "." + 19 fraction digits
const F32_BUFFER_SIZE: usize = 61;
// "-" + 309 integer digits + "." + 19 fraction digits
const F64_BUFFER_SIZE: usize = 331;

/// A value that can be written to an [`OStream`].
pub trait Print {
    fn print<W: ByteSink>(&self, out: &mut OStream<'_, W>) -> Result<(), OutputError>;
}

impl<T: Print + ?Sized> Print for &T {
    #[inline]
    fn print<W: ByteSink>(&self, out: &mut OStream<'_, W>) -> Result<(), OutputError> {
        (**self).print(out)
    }
}

impl Print for str {
    fn print<W: ByteSink>(&self, out: &mut OStream<'_, W>) -> Result<(), OutputError> {
        out.sink_mut().write(self.as_bytes())
    }
}

impl Print for [u8] {
    fn print<W: ByteSink>(&self, out: &mut OStream<'_, W>) -> Result<(), OutputError> {
        out.sink_mut().write(self)
    }
}

impl<const N: usize> Print for [u8; N] {
    fn print<W: ByteSink>(&self, out: &mut OStream<'_, W>) -> Result<(), OutputError> {
        out.sink_mut().write(self)
    }
}

impl<const N: usize> Print for String<N> {
    fn print<W: ByteSink>(&self, out: &mut OStream<'_, W>) -> Result<(), OutputError> {
        out.sink_mut().write(self.as_bytes())
    }
}

impl Print for char {
    fn print<W: ByteSink>(&self, out: &mut OStream<'_, W>) -> Result<(), OutputError> {
        let mut buf = [0u8; 4];
        out.sink_mut().write(self.encode_utf8(&mut buf).as_bytes())
    }
}

impl Print for Utf8Char {
    /// Writes exactly `len()` bytes.
    fn print<W: ByteSink>(&self, out: &mut OStream<'_, W>) -> Result<(), OutputError> {
        out.sink_mut().write(self.as_bytes())
    }
}

fn print_integer<W: ByteSink>(
    out: &mut OStream<'_, W>,
    negative: bool,
    magnitude: u64,
) -> Result<(), OutputError> {
    let mut buf = [0u8; MAX_DECIMAL_DIGITS];
    let digits = write_decimal(&mut buf, magnitude);
    let grouping = out.state().show_grouping();
    let thousands = out.locales().numeric().thousands_separator;

    let sink = out.sink_mut();
    if negative {
        sink.write(b"-")?;
    }
    if grouping {
        group_digits(sink, digits, thousands)
    } else {
        sink.write(digits)
    }
}

macro_rules! impl_print_signed {
    ($($t:ty),* $(,)?) => {
        $(
            impl Print for $t {
                fn print<W: ByteSink>(&self, out: &mut OStream<'_, W>) -> Result<(), OutputError> {
                    print_integer(out, *self < 0, self.unsigned_abs() as u64)
                }
            }
        )*
    };
}

macro_rules! impl_print_unsigned {
    ($($t:ty),* $(,)?) => {
        $(
            impl Print for $t {
                fn print<W: ByteSink>(&self, out: &mut OStream<'_, W>) -> Result<(), OutputError> {
                    print_integer(out, false, *self as u64)
                }
            }
        )*
    };
}

impl_print_signed!(i8, i16, i32, i64, isize);
impl_print_unsigned!(u8, u16, u32, u64, usize);

/// Format a real number through an `N`-byte scratch buffer.
///
/// `N` must hold the longest rendering of the type at
/// [`MAX_PRECISION`](super::MAX_PRECISION) fraction digits; an overflow is
/// reported as [`OutputError::Format`] rather than written truncated.
fn print_real<const N: usize, W, V>(out: &mut OStream<'_, W>, value: V) -> Result<(), OutputError>
where
    W: ByteSink,
    V: fmt::Display,
{
    let state = out.state();
    let numeric = out.locales().numeric();
    let (digits, grouped) = match state.mode() {
        FloatMode::Fixed => (usize::from(state.precision()), state.show_grouping()),
        FloatMode::DefaultFloat => (DEFAULT_FLOAT_DIGITS, false),
    };

    let mut text = ScratchBuf::<N>::new();
    write!(text, "{:.*}", digits, value).map_err(|_| OutputError::Format)?;
    if text.overflowed() {
        return Err(OutputError::Format);
    }

    if grouped {
        write_grouped_real(
            out.sink_mut(),
            text.as_bytes(),
            numeric.decimal_separator,
            numeric.thousands_separator,
        )
    } else {
        localize(
            text.as_mut_bytes(),
            numeric.decimal_separator,
            numeric.thousands_separator,
        );
        out.sink_mut().write(text.as_bytes())
    }
}

impl Print for f32 {
    fn print<W: ByteSink>(&self, out: &mut OStream<'_, W>) -> Result<(), OutputError> {
        print_real::<F32_BUFFER_SIZE, _, _>(out, *self)
    }
}

impl Print for f64 {
    fn print<W: ByteSink>(&self, out: &mut OStream<'_, W>) -> Result<(), OutputError> {
        print_real::<F64_BUFFER_SIZE, _, _>(out, *self)
    }
}

#[cfg(feature = "fixed")]
mod fixed_point {
    use fixed::types::extra::{LeEqU16, LeEqU32, LeEqU64, LeEqU8};
    use fixed::{FixedI16, FixedI32, FixedI64, FixedI8, FixedU16, FixedU32, FixedU64, FixedU8};

    use super::*;

    // "-" + 20 integer digits + "." + 19 fraction digits, rounded up
    const FIXED_BUFFER_SIZE: usize = 48;

    macro_rules! impl_print_fixed {
        ($($fixed:ident: $bound:ident),* $(,)?) => {
            $(
                impl<Frac: $bound> Print for $fixed<Frac> {
                    fn print<W: ByteSink>(&self, out: &mut OStream<'_, W>) -> Result<(), OutputError> {
                        print_real::<FIXED_BUFFER_SIZE, _, _>(out, *self)
                    }
                }
            )*
        };
    }

    impl_print_fixed!(
        FixedI8: LeEqU8,
        FixedU8: LeEqU8,
        FixedI16: LeEqU16,
        FixedU16: LeEqU16,
        FixedI32: LeEqU32,
        FixedU32: LeEqU32,
        FixedI64: LeEqU64,
        FixedU64: LeEqU64,
    );
}

impl Print for DateTime {
    /// Uses the active time locale's pattern; output is cut at
    /// [`TIME_BUFFER_SIZE`] bytes.
    fn print<W: ByteSink>(&self, out: &mut OStream<'_, W>) -> Result<(), OutputError> {
        let mut text = ScratchBuf::<TIME_BUFFER_SIZE>::new();
        format_time(&mut text, out.locales().time().time_format, self)
            .map_err(|_| OutputError::Format)?;
        out.sink_mut().write(text.as_bytes())
    }
}

impl Print for UnixTime {
    fn print<W: ByteSink>(&self, out: &mut OStream<'_, W>) -> Result<(), OutputError> {
        DateTime::from(*self).print(out)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::string::String as StdString;

    use super::*;
    use crate::locale::{Category, Locale, Locales};
    use crate::output::{setprecision, Manipulator};
    use crate::testutil::MockSink;

    fn render<V: Print>(locales: &Locales, setup: &[Manipulator], value: V) -> StdString {
        let mut cout = OStream::new(MockSink::default(), locales);
        for m in setup {
            cout.write(*m).unwrap();
        }
        cout.write(value).unwrap();
        cout.into_inner().text()
    }

    fn en_150() -> Locales {
        let locales = Locales::new();
        locales.select(Category::ALL, "en_150.UTF-8").unwrap();
        locales
    }

    const GROUPED: &[Manipulator] = &[Manipulator::ShowGrouping];

    #[test]
    fn test_text_passthrough() {
        let locales = Locales::new();
        assert_eq!(render(&locales, GROUPED, "1234.5"), "1234.5");
        assert_eq!(render(&locales, &[], 'ž'), "ž");
        assert_eq!(render(&locales, &[], b"raw"), "raw");
        let text: String<8> = String::try_from("héllo").unwrap();
        assert_eq!(render(&locales, &[], &text), "héllo");
    }

    #[test]
    fn test_utf8_char_writes_exact_length() {
        let locales = Locales::new();
        let euro = Utf8Char::from('€');
        assert_eq!(render(&locales, &[], euro), "€");

        let mut cout = OStream::new(MockSink::default(), &locales);
        cout.write(Utf8Char::from_bytes(&[0x80, 0x41])).unwrap();
        assert_eq!(cout.into_inner().bytes, [0x80]);
    }

    #[test]
    fn test_integers_plain() {
        let locales = Locales::new();
        assert_eq!(render(&locales, &[], 0u8), "0");
        assert_eq!(render(&locales, &[], -42i32), "-42");
        assert_eq!(render(&locales, &[], 1234567u32), "1234567");
        assert_eq!(render(&locales, &[], i64::MIN), "-9223372036854775808");
        assert_eq!(render(&locales, &[], u64::MAX), "18446744073709551615");
        assert_eq!(render(&locales, &[], i8::MIN), "-128");
    }

    #[test]
    fn test_integers_grouped() {
        let locales = Locales::new();
        assert_eq!(render(&locales, GROUPED, 1234567), "1,234,567");
        assert_eq!(render(&locales, GROUPED, 999u16), "999");
        assert_eq!(render(&locales, GROUPED, 0i64), "0");
        assert_eq!(render(&locales, GROUPED, -123456i32), "-123,456");
        assert_eq!(
            render(&locales, GROUPED, i64::MIN),
            "-9,223,372,036,854,775,808"
        );
        assert_eq!(render(&en_150(), GROUPED, 1234567), "1.234.567");
    }

    #[test]
    fn test_default_float_uses_two_digits() {
        let locales = Locales::new();
        assert_eq!(render(&locales, &[], 2.5f64), "2.50");
        assert_eq!(render(&locales, &[setprecision(5)], 1234.5678f32), "1234.57");
        assert_eq!(render(&locales, GROUPED, 1234.5678f64), "1234.57");
        assert_eq!(render(&en_150(), &[], 1234.5678f64), "1234,57");
    }

    #[test]
    fn test_fixed_precision_digits() {
        let locales = Locales::new();
        let fixed = |p| [Manipulator::Fixed, setprecision(p)];
        assert_eq!(render(&locales, &fixed(2), 1.006f64), "1.01");
        assert_eq!(render(&locales, &fixed(4), 0.5f32), "0.5000");
        assert_eq!(render(&locales, &fixed(0), 41.9f64), "42");
        assert_eq!(render(&en_150(), &fixed(1), 1234.5f64), "1234,5");
    }

    #[test]
    fn test_fixed_grouped() {
        let setup = [Manipulator::Fixed, setprecision(3), Manipulator::ShowGrouping];
        let locales = Locales::new();
        assert_eq!(render(&locales, &setup, 1234567.891f64), "1,234,567.891");
        assert_eq!(render(&locales, &setup, -1234.5f64), "-1,234.500");
        assert_eq!(render(&en_150(), &setup, 1234567.891f64), "1.234.567,891");

        let setup = [Manipulator::Fixed, setprecision(0), Manipulator::ShowGrouping];
        assert_eq!(render(&locales, &setup, 1234.7f64), "1,235");
    }

    #[test]
    fn test_extreme_reals_fit() {
        let locales = Locales::new();
        let setup = [Manipulator::Fixed, setprecision(19), Manipulator::ShowGrouping];

        let text = render(&locales, &setup, f64::MIN);
        assert!(text.starts_with("-179,769,313"));
        assert_eq!(text.split('.').nth(1).map(str::len), Some(19));

        let text = render(&locales, &setup[..2], f32::MIN);
        assert_eq!(text.len(), 1 + 39 + 1 + 19);
    }

    #[test]
    fn test_time_uses_active_pattern() {
        let time = DateTime::new(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(render(&Locales::new(), &[], time), "2024/03/09 02:05:07 PM");
        assert_eq!(render(&en_150(), &[], time), "09/03/2024 14:05:07");
        assert_eq!(
            render(&Locales::new(), &[], UnixTime(0)),
            "1970/01/01 12:00:00 AM"
        );
    }

    #[test]
    fn test_time_output_is_bounded() {
        static VERBOSE: Locale = Locale::new(
            "verbose",
            b'.',
            b',',
            concat!(
                "0123456789", "0123456789", "0123456789", "0123456789", "0123456789",
                "0123456789", "0123456789", "0123456789", "0123456789", " %Y"
            ),
        );

        let locales = Locales::new();
        locales.register(&VERBOSE).unwrap();
        locales.select(Category::TIME, "verbose").unwrap();
        let text = render(&locales, &[], UnixTime(0));
        assert_eq!(text.len(), TIME_BUFFER_SIZE);
        assert!(text.starts_with("0123456789"));
    }

    #[cfg(feature = "fixed")]
    #[test]
    fn test_fixed_point_numbers() {
        use fixed::types::{I16F16, U8F8};

        let locales = Locales::new();
        let setup = [Manipulator::Fixed, setprecision(2), Manipulator::ShowGrouping];
        assert_eq!(
            render(&locales, &setup, I16F16::from_num(-1234.5)),
            "-1,234.50"
        );
        assert_eq!(render(&en_150(), &[], U8F8::from_num(2.25)), "2,25");
    }
}
