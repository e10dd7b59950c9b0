//! No-std number formatting helpers.
//!
//! Digits are produced into fixed stack buffers and pushed to a
//! [`ByteSink`] in runs, so no output path needs more memory than its
//! scratch buffer.

use core::fmt;

use super::traits::{ByteSink, OutputError};

/// Longest decimal rendering of a `u64` ("18446744073709551615").
pub(crate) const MAX_DECIMAL_DIGITS: usize = 20;

/// Owned fixed-size format buffer.
///
/// Implements [`fmt::Write`]; text that does not fit is cut at a character
/// boundary and the buffer remembers that it overflowed.
pub struct ScratchBuf<const N: usize> {
    buf: [u8; N],
    len: usize,
    overflowed: bool,
}

impl<const N: usize> ScratchBuf<N> {
    pub const fn new() -> Self {
        Self {
            buf: [0u8; N],
            len: 0,
            overflowed: false,
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    #[inline]
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.buf[..self.len]
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        // Only ever filled through fmt::Write, cut on char boundaries
        core::str::from_utf8(self.as_bytes()).unwrap_or("")
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if any write was truncated.
    #[inline]
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
        self.overflowed = false;
    }
}

impl<const N: usize> Default for ScratchBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Write for ScratchBuf<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut n = s.len().min(N - self.len);
        if n < s.len() {
            self.overflowed = true;
            while !s.is_char_boundary(n) {
                n -= 1;
            }
        }
        self.buf[self.len..self.len + n].copy_from_slice(&s.as_bytes()[..n]);
        self.len += n;
        Ok(())
    }
}

/// Render `value` in decimal, filling `buf` from the end.
///
/// Returns the digit slice.
pub(crate) fn write_decimal(buf: &mut [u8; MAX_DECIMAL_DIGITS], value: u64) -> &[u8] {
    let mut pos = buf.len();
    let mut n = value;
    loop {
        pos -= 1;
        buf[pos] = b'0' + (n % 10) as u8;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    &buf[pos..]
}

/// Write `digits` in runs of three counted from the right, joined by `separator`.
pub(crate) fn group_digits<W: ByteSink>(
    out: &mut W,
    digits: &[u8],
    separator: u8,
) -> Result<(), OutputError> {
    let head = match digits.len() % 3 {
        0 => digits.len().min(3),
        r => r,
    };
    let (first, rest) = digits.split_at(head);
    out.write(first)?;
    for run in rest.chunks(3) {
        out.write(&[separator])?;
        out.write(run)?;
    }
    Ok(())
}

/// Swap `.` and `,` for the locale's decimal and thousands separators.
pub(crate) fn localize(text: &mut [u8], decimal: u8, thousands: u8) {
    for byte in text.iter_mut() {
        match *byte {
            b'.' => *byte = decimal,
            b',' => *byte = thousands,
            _ => {}
        }
    }
}

/// Write a formatted real number with its integer part grouped.
///
/// `text` is plain `[-]digits[.digits]` output. The sign is kept in front
/// of the first run, the fraction is copied verbatim after `decimal`.
pub(crate) fn write_grouped_real<W: ByteSink>(
    out: &mut W,
    text: &[u8],
    decimal: u8,
    thousands: u8,
) -> Result<(), OutputError> {
    let (sign, unsigned) = match text.split_first() {
        Some((b'-', rest)) => (&text[..1], rest),
        _ => (&text[..0], text),
    };
    out.write(sign)?;

    match unsigned.iter().position(|&b| b == b'.') {
        Some(dot) => {
            group_digits(out, &unsigned[..dot], thousands)?;
            out.write(&[decimal])?;
            out.write(&unsigned[dot + 1..])
        }
        None => group_digits(out, unsigned, thousands),
    }
}
