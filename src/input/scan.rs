//! Per-type token rules and text-to-value conversion.
//!
//! Conversion is lenient in the C library sense: integers take an optional
//! sign followed by the longest run of digits, reals the longest prefix
//! that looks like a decimal number. Anything unparseable becomes zero.
//! Out-of-range integers saturate at the target's bounds.

use heapless::{String, Vec};

use crate::utf8::Utf8Char;

/// How the tokenizer decides which bytes belong to a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TokenRule {
    /// Exactly one byte, whatever it is.
    Byte,
    /// One complete UTF-8 sequence, length taken from the lead byte.
    CodePoint,
    /// Printable bytes up to `'9'`, excluding the decimal separator.
    Integer,
    /// Any printable byte.
    Real,
    /// Any printable byte.
    Text,
}

impl TokenRule {
    /// Check if `byte` extends the current token.
    ///
    /// `decimal` is the active numeric decimal separator. Only meaningful
    /// for the delimiter-based rules; the fixed-length rules accept every
    /// byte.
    #[inline]
    #[must_use]
    pub const fn accepts(self, byte: u8, decimal: u8) -> bool {
        match self {
            Self::Byte | Self::CodePoint => true,
            Self::Integer => byte > b' ' && byte <= b'9' && byte != decimal,
            Self::Real | Self::Text => byte > b' ',
        }
    }

    /// Numeric tokens get separator normalization before conversion.
    #[inline]
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Real)
    }
}

/// A value that can be read from an [`IStream`](super::IStream).
pub trait Scan {
    /// Tokenizer rule for this type.
    const RULE: TokenRule;

    /// Replace `self` with the value of `token`.
    ///
    /// Numeric tokens arrive normalized: `.` as decimal point and no
    /// thousands separators.
    fn store(&mut self, token: &[u8]);
}

impl Scan for u8 {
    const RULE: TokenRule = TokenRule::Byte;

    fn store(&mut self, token: &[u8]) {
        *self = token.first().copied().unwrap_or(0);
    }
}

impl Scan for char {
    const RULE: TokenRule = TokenRule::CodePoint;

    fn store(&mut self, token: &[u8]) {
        *self = Utf8Char::from_bytes(token)
            .to_char()
            .unwrap_or(char::REPLACEMENT_CHARACTER);
    }
}

impl Scan for Utf8Char {
    const RULE: TokenRule = TokenRule::CodePoint;

    fn store(&mut self, token: &[u8]) {
        *self = Utf8Char::from_bytes(token);
    }
}

/// `atol`: optional sign, then digits until the first non-digit.
pub(crate) fn parse_integer(token: &[u8]) -> i128 {
    let (negative, digits) = match token.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, token),
    };

    let magnitude = digits
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0i128, |acc, b| {
            acc.saturating_mul(10).saturating_add(i128::from(b - b'0'))
        });

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

macro_rules! impl_scan_integer {
    ($($t:ty),* $(,)?) => {
        $(
            impl Scan for $t {
                const RULE: TokenRule = TokenRule::Integer;

                fn store(&mut self, token: &[u8]) {
                    let value = parse_integer(token).clamp(<$t>::MIN as i128, <$t>::MAX as i128);
                    *self = value as $t;
                }
            }
        )*
    };
}

impl_scan_integer!(i16, u16, i32, u32, i64, u64, isize, usize);

fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Longest prefix of `token` shaped like `[+-]digits[.digits][e[+-]digits]`.
///
/// Empty if the mantissa has no digits.
pub(crate) fn real_prefix(token: &[u8]) -> &str {
    let mut end = usize::from(matches!(token.first(), Some(b'+' | b'-')));

    let int_digits = digit_run(&token[end..]);
    end += int_digits;

    if token.get(end) == Some(&b'.') {
        let frac_digits = digit_run(&token[end + 1..]);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if end == 0 || !token[..end].iter().any(u8::is_ascii_digit) {
        return "";
    }

    if matches!(token.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(token.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digit_run(&token[exp..]);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    core::str::from_utf8(&token[..end]).unwrap_or("")
}

impl Scan for f32 {
    const RULE: TokenRule = TokenRule::Real;

    fn store(&mut self, token: &[u8]) {
        *self = real_prefix(token).parse().unwrap_or(0.0);
    }
}

impl Scan for f64 {
    const RULE: TokenRule = TokenRule::Real;

    fn store(&mut self, token: &[u8]) {
        *self = real_prefix(token).parse().unwrap_or(0.0);
    }
}

/// Longest prefix of `token` that is valid UTF-8 and fits in `cap` bytes.
pub(crate) fn text_prefix(token: &[u8], cap: usize) -> &str {
    let valid = match core::str::from_utf8(token) {
        Ok(text) => text,
        Err(e) => core::str::from_utf8(&token[..e.valid_up_to()]).unwrap_or(""),
    };
    let mut end = valid.len().min(cap);
    while !valid.is_char_boundary(end) {
        end -= 1;
    }
    &valid[..end]
}

impl<const N: usize> Scan for String<N> {
    const RULE: TokenRule = TokenRule::Text;

    /// Truncates to capacity on a character boundary.
    fn store(&mut self, token: &[u8]) {
        self.clear();
        // Cannot fail: prefix fits in N
        let _ = self.push_str(text_prefix(token, N));
    }
}

impl<const N: usize> Scan for Vec<u8, N> {
    const RULE: TokenRule = TokenRule::Text;

    fn store(&mut self, token: &[u8]) {
        self.clear();
        let _ = self.extend_from_slice(&token[..token.len().min(N)]);
    }
}
