//! Locale-aware `cin`/`cout` style text I/O for serial consoles.
//!
//! This crate reads and writes numbers, strings and UTF-8 characters over a
//! single blocking byte stream, typically a UART, without any heap
//! allocation. Every scratch area is a fixed-size buffer owned by a stream
//! or living on the stack.
//!
//! # Overview
//!
//! - [`input::IStream`] collects bytes into a 63-byte token buffer until a
//!   type-specific terminator arrives, then converts the token. Numeric
//!   tokens honor the active decimal and thousands separators.
//! - [`output::OStream`] formats values with a small manipulator state
//!   machine (precision, fixed or default float, digit grouping).
//! - [`locale::Locales`] holds the registered [`locale::Locale`]
//!   descriptors and the active selection for collation, character type,
//!   numeric and time conventions.
//! - [`utf8`] decodes, encodes and iterates code points in place.
//! - [`console::Console`] pairs one input and one output stream.
//!
//! # Transports
//!
//! Streams are generic over [`input::ByteSource`] and [`output::ByteSink`].
//! With the `embedded-io` feature, [`io::IoTransport`] adapts any
//! `embedded_io` reader or writer.
//!
//! # Example
//!
//! ```ignore
//! let locales = Locales::new();
//! locales.select(Category::NUMERIC, "en_150.UTF-8")?;
//!
//! let mut cout = OStream::new(uart_tx, &locales);
//! cout.write(Manipulator::Fixed)?
//!     .write(setprecision(2))?
//!     .write(Manipulator::ShowGrouping)?
//!     .write(1234567.891)?   // "1.234.567,89"
//!     .endl()?;
//! ```
//!
//! # Features
//!
//! - **`std`**: Link the standard library (host builds).
//! - **`defmt`**: Derive `defmt::Format` on public types.
//! - **`embedded-io`**: [`io::IoTransport`] adapter.
//! - **`fixed`**: Print fixed-point numbers from the `fixed` crate.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod console;
pub mod input;
#[cfg(feature = "embedded-io")]
pub mod io;
pub mod locale;
pub mod output;
pub mod time;
pub mod utf8;

pub use console::{Console, ConsoleError};
pub use input::{ByteSource, IStream, InputError, Scan, POLL_INTERVAL_MS, TOKEN_CAPACITY};
pub use locale::{Category, Locale, LocaleError, Locales};
pub use output::{setprecision, ByteSink, Manipulator, OStream, OutputError, Print, ENDL};
pub use time::{DateTime, UnixTime};
pub use utf8::{Utf8Char, Utf8Cursor};
