//! UTF-8 code-point access over borrowed byte buffers.
//!
//! A code point is copied out of (or written back into) a caller-owned
//! buffer one sequence at a time. Nothing here allocates or validates whole
//! strings; the lead byte alone decides how many bytes belong to a sequence:
//!
//! | Lead byte  | Length |
//! |------------|--------|
//! | `0xxxxxxx` | 1      |
//! | `110xxxxx` | 2      |
//! | `1110xxxx` | 3      |
//! | `11110xxx` | 4      |
//! | anything else | 1 (malformed, consumed as a single byte) |
//!
//! # Example
//!
//! ```
//! use uart_iostream::utf8::Utf8Cursor;
//!
//! let text = "aé".as_bytes();
//! let mut cursor = Utf8Cursor::new(text);
//! assert_eq!(cursor.next().unwrap().as_bytes(), b"a");
//! assert_eq!(cursor.next().unwrap().as_bytes(), "é".as_bytes());
//! assert!(cursor.is_at_end());
//! ```

use core::cmp::Ordering;
use core::fmt;

/// Longest UTF-8 sequence in bytes.
pub const MAX_SEQUENCE_LEN: usize = 4;

/// Byte length of the sequence introduced by `lead`.
///
/// Continuation bytes and invalid leads report 1 so a cursor always makes
/// progress and never reads past the end of the buffer.
#[inline]
#[must_use]
pub const fn sequence_len(lead: u8) -> usize {
    if lead & 0x80 == 0 {
        1
    } else if lead & 0xE0 == 0xC0 {
        2
    } else if lead & 0xF0 == 0xE0 {
        3
    } else if lead & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

/// Error type for strict in-place writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Utf8Error {
    /// Replacement and existing sequence have different byte lengths.
    LengthMismatch,
    /// Position is at or past the end of the buffer.
    OutOfBounds,
}

impl fmt::Display for Utf8Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch => write!(f, "utf-8 sequence length mismatch"),
            Self::OutOfBounds => write!(f, "position out of bounds"),
        }
    }
}

/// One multi-byte character held in a fixed 5-byte holder
/// (up to 4 data bytes followed by a zero terminator).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Utf8Char {
    bytes: [u8; MAX_SEQUENCE_LEN + 1],
    len: u8,
}

impl Utf8Char {
    /// Copy the sequence starting at `bytes[0]`.
    ///
    /// At most `sequence_len(bytes[0])` bytes are taken, fewer if `bytes`
    /// ends early. An empty slice gives an empty character.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut ch = Self::default();
        if let Some(&lead) = bytes.first() {
            let len = sequence_len(lead).min(bytes.len());
            ch.bytes[..len].copy_from_slice(&bytes[..len]);
            ch.len = len as u8;
        }
        ch
    }

    /// Number of encoded bytes (0 for an empty character).
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The encoded bytes, without the terminator.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    /// The character as `&str`, if the bytes form valid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(self.as_bytes()).ok()
    }

    /// Decode the Unicode scalar value, if the bytes form valid UTF-8.
    #[must_use]
    pub fn to_char(&self) -> Option<char> {
        self.as_str().and_then(|s| s.chars().next())
    }
}

impl From<char> for Utf8Char {
    fn from(c: char) -> Self {
        let mut ch = Self::default();
        let len = c.encode_utf8(&mut ch.bytes[..MAX_SEQUENCE_LEN]).len();
        ch.len = len as u8;
        ch
    }
}

impl fmt::Debug for Utf8Char {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_char() {
            Some(c) => write!(f, "Utf8Char({:?})", c),
            None => write!(f, "Utf8Char({:02X?})", self.as_bytes()),
        }
    }
}

impl fmt::Display for Utf8Char {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("\u{FFFD}"))
    }
}

/// Copy out the code point starting at `pos`.
///
/// Returns the character and the number of bytes it occupies, or `None`
/// when `pos` is at or past the end of `buf`.
#[must_use]
pub fn decode_at(buf: &[u8], pos: usize) -> Option<(Utf8Char, usize)> {
    let rest = buf.get(pos..).filter(|rest| !rest.is_empty())?;
    let ch = Utf8Char::from_bytes(rest);
    Some((ch, ch.len()))
}

/// Overwrite the code point at `pos` in place.
///
/// The number of bytes written is taken from the **existing** lead byte,
/// not from `ch`, so the replacement must have the same encoded length or
/// the following sequence is corrupted. Writing never passes the end of
/// `buf`. Returns the number of bytes written (0 if `pos` is out of range).
/// Use [`try_encode_at`] to have the length checked.
pub fn encode_at(buf: &mut [u8], pos: usize, ch: &Utf8Char) -> usize {
    let Some(&lead) = buf.get(pos) else {
        return 0;
    };
    let len = sequence_len(lead).min(buf.len() - pos);
    buf[pos..pos + len].copy_from_slice(&ch.bytes[..len]);
    len
}

/// Overwrite the code point at `pos` only if `ch` has the same encoded length.
pub fn try_encode_at(buf: &mut [u8], pos: usize, ch: &Utf8Char) -> Result<usize, Utf8Error> {
    let lead = *buf.get(pos).ok_or(Utf8Error::OutOfBounds)?;
    let len = sequence_len(lead);
    if len != ch.len() {
        return Err(Utf8Error::LengthMismatch);
    }
    if pos + len > buf.len() {
        return Err(Utf8Error::OutOfBounds);
    }
    Ok(encode_at(buf, pos, ch))
}

/// Forward-only cursor over the code points of a borrowed buffer.
///
/// Cursors order by byte position, which makes `cursor < end` usable for
/// range termination. Comparing cursors over different buffers is
/// meaningless.
#[derive(Clone, Copy, Debug)]
pub struct Utf8Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Utf8Cursor<'a> {
    /// Cursor at the start of `buf`.
    #[must_use]
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Cursor at byte `pos`, which should be a sequence boundary.
    /// Positions past the end are clamped to the end.
    #[must_use]
    pub fn at(buf: &'a [u8], pos: usize) -> Self {
        Self {
            buf,
            pos: pos.min(buf.len()),
        }
    }

    /// Cursor positioned at the end of `buf`.
    #[must_use]
    pub fn end(buf: &'a [u8]) -> Self {
        Self::at(buf, buf.len())
    }

    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// The code point under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<Utf8Char> {
        decode_at(self.buf, self.pos).map(|(ch, _)| ch)
    }

    /// Step over the code point under the cursor.
    pub fn advance(&mut self) -> &mut Self {
        if let Some(&lead) = self.buf.get(self.pos) {
            self.pos = (self.pos + sequence_len(lead)).min(self.buf.len());
        }
        self
    }
}

impl PartialEq for Utf8Cursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl Eq for Utf8Cursor<'_> {}

impl PartialOrd for Utf8Cursor<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Utf8Cursor<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pos.cmp(&other.pos)
    }
}

impl Iterator for Utf8Cursor<'_> {
    type Item = Utf8Char;

    fn next(&mut self) -> Option<Self::Item> {
        let ch = self.current()?;
        self.advance();
        Some(ch)
    }
}
