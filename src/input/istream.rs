//! Blocking, locale-aware input stream.

use core::str::FromStr;

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use log::trace;

use super::scan::{text_prefix, Scan, TokenRule};
use super::traits::{ByteSource, InputError};
use crate::locale::Locales;
use crate::utf8;

/// Usable bytes in the token buffer.
pub const TOKEN_CAPACITY: usize = 63;

/// Delay between two `available()` polls while waiting for input.
pub const POLL_INTERVAL_MS: u32 = 10;

/// Reads typed values from a [`ByteSource`].
///
/// Every read blocks until its token is complete: a terminating byte
/// arrived or [`TOKEN_CAPACITY`] bytes were collected. There is no timeout.
///
/// # Example
///
/// ```ignore
/// let locales = Locales::new();
/// let mut cin = IStream::new(uart_rx, delay, &locales);
/// let mut count = 0u32;
/// let mut ratio = 0.0f64;
/// cin.read(&mut count)?.read(&mut ratio)?;
/// ```
pub struct IStream<'l, S, D> {
    source: S,
    delay: D,
    locales: &'l Locales,
    token: Vec<u8, TOKEN_CAPACITY>,
}

impl<'l, S, D> IStream<'l, S, D>
where
    S: ByteSource,
    D: DelayNs,
{
    pub fn new(source: S, delay: D, locales: &'l Locales) -> Self {
        Self {
            source,
            delay,
            locales,
            token: Vec::new(),
        }
    }

    /// Read one value, chainable.
    ///
    /// Numeric tokens are normalized with the numeric locale active at the
    /// end of the read before conversion.
    pub fn read<V: Scan>(&mut self, value: &mut V) -> Result<&mut Self, InputError> {
        self.fill(V::RULE)?;
        value.store(&self.token);
        Ok(self)
    }

    /// Read a text token into a caller-provided byte buffer.
    ///
    /// Returns the number of bytes stored. Tokens longer than `dest` are
    /// truncated.
    pub fn read_text(&mut self, dest: &mut [u8]) -> Result<usize, InputError> {
        self.fill(TokenRule::Text)?;
        let len = self.token.len().min(dest.len());
        if len < self.token.len() {
            trace!("text token truncated to {} bytes", len);
        }
        dest[..len].copy_from_slice(&self.token[..len]);
        Ok(len)
    }

    /// Read a text token and build any type constructible from `&str`.
    ///
    /// Invalid UTF-8 is cut at the first bad sequence.
    pub fn read_from_str<T>(&mut self) -> Result<T, InputError>
    where
        T: for<'t> From<&'t str>,
    {
        self.fill(TokenRule::Text)?;
        Ok(T::from(text_prefix(&self.token, TOKEN_CAPACITY)))
    }

    /// Read a text token and parse it strictly.
    ///
    /// Unlike [`read`](Self::read), malformed text is an error instead of
    /// zero. Separators are normalized with the active numeric locale
    /// first, so `"1.234,5"` parses as `1234.5` under `en_150.UTF-8`.
    pub fn read_strict<T: FromStr>(&mut self) -> Result<T, InputError> {
        self.fill(TokenRule::Real)?;
        core::str::from_utf8(&self.token)
            .ok()
            .and_then(|text| text.parse().ok())
            .ok_or(InputError::Parse)
    }

    /// Bytes of the most recent token, after normalization.
    #[inline]
    pub fn token(&self) -> &[u8] {
        &self.token
    }

    #[inline]
    pub fn locales(&self) -> &'l Locales {
        self.locales
    }

    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[inline]
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consume the stream and return the transport and delay.
    pub fn into_parts(self) -> (S, D) {
        (self.source, self.delay)
    }

    /// Collect the next token according to `rule`.
    fn fill(&mut self, rule: TokenRule) -> Result<(), InputError> {
        self.token.clear();

        match rule {
            TokenRule::Byte => {
                let byte = self.next_byte()?;
                let _ = self.token.push(byte);
            }
            TokenRule::CodePoint => {
                let lead = self.next_byte()?;
                let _ = self.token.push(lead);
                for _ in 1..utf8::sequence_len(lead) {
                    let byte = self.next_byte()?;
                    let _ = self.token.push(byte);
                }
            }
            TokenRule::Integer | TokenRule::Real | TokenRule::Text => {
                self.collect(rule)?;
                if rule.is_numeric() {
                    self.normalize();
                }
            }
        }
        Ok(())
    }

    /// Accumulate until a terminator (consumed, not stored) or a full buffer.
    fn collect(&mut self, rule: TokenRule) -> Result<(), InputError> {
        while !self.token.is_full() {
            let byte = self.next_byte()?;
            // Looked up per byte so a selection change applies immediately
            let decimal = self.locales.numeric().decimal_separator;
            if !rule.accepts(byte, decimal) {
                return Ok(());
            }
            let _ = self.token.push(byte);
        }
        trace!("token truncated at {} bytes", TOKEN_CAPACITY);
        Ok(())
    }

    /// Rewrite the decimal separator to `.` and drop thousands separators.
    fn normalize(&mut self) {
        let numeric = self.locales.numeric();
        let (decimal, thousands) = (numeric.decimal_separator, numeric.thousands_separator);

        self.token.retain_mut(|byte| {
            if *byte == decimal {
                *byte = b'.';
                true
            } else {
                *byte != thousands
            }
        });
    }

    /// Block, polling every [`POLL_INTERVAL_MS`], until a byte arrives.
    fn next_byte(&mut self) -> Result<u8, InputError> {
        while self.source.available()? == 0 {
            self.delay.delay_ms(POLL_INTERVAL_MS);
        }
        self.source.read_byte()
    }
}
