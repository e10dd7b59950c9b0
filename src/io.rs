//! Adapter for `embedded-io` transports.
//!
//! Wraps any type implementing [`embedded_io::Read`] + [`embedded_io::ReadReady`]
//! as a [`ByteSource`], and any [`embedded_io::Write`] as a [`ByteSink`].
//! Transport errors are logged by kind and collapsed into `Io`.

use embedded_io::{Error as _, Read, ReadExactError, ReadReady, Write};
use log::debug;

use crate::input::{ByteSource, InputError};
use crate::output::{ByteSink, OutputError};

/// A blocking `embedded-io` transport, usable as either side of a console.
pub struct IoTransport<T> {
    inner: T,
}

impl<T> IoTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    #[inline]
    pub fn inner(&self) -> &T {
        &self.inner
    }

    #[inline]
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + ReadReady> ByteSource for IoTransport<T> {
    fn available(&mut self) -> Result<usize, InputError> {
        match self.inner.read_ready() {
            Ok(ready) => Ok(usize::from(ready)),
            Err(e) => {
                debug!("read_ready failed: {:?}", e.kind());
                Err(InputError::Io)
            }
        }
    }

    fn read_byte(&mut self) -> Result<u8, InputError> {
        let mut byte = [0u8; 1];
        match self.inner.read_exact(&mut byte) {
            Ok(()) => Ok(byte[0]),
            Err(ReadExactError::UnexpectedEof) => {
                debug!("transport closed");
                Err(InputError::Io)
            }
            Err(ReadExactError::Other(e)) => {
                debug!("read failed: {:?}", e.kind());
                Err(InputError::Io)
            }
        }
    }
}

impl<T: Write> ByteSink for IoTransport<T> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), OutputError> {
        self.inner.write_all(bytes).map_err(|e| {
            debug!("write failed: {:?}", e.kind());
            OutputError::Io
        })
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::collections::VecDeque;
    use std::vec::Vec;

    use embedded_io::{ErrorKind, ErrorType};

    use super::*;
    use crate::input::IStream;
    use crate::locale::Locales;
    use crate::output::OStream;
    use crate::testutil::CountingDelay;

    /// In-memory serial port: `rx` is drained by reads, writes land in `tx`.
    #[derive(Default)]
    struct FakePort {
        rx: VecDeque<u8>,
        tx: Vec<u8>,
        broken: bool,
    }

    impl ErrorType for FakePort {
        type Error = ErrorKind;
    }

    impl Read for FakePort {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            if self.broken {
                return Err(ErrorKind::Other);
            }
            let mut n = 0;
            while n < buf.len() {
                match self.rx.pop_front() {
                    Some(b) => buf[n] = b,
                    None => break,
                }
                n += 1;
            }
            Ok(n)
        }
    }

    impl ReadReady for FakePort {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.rx.is_empty())
        }
    }

    impl Write for FakePort {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            if self.broken {
                return Err(ErrorKind::Other);
            }
            self.tx.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn test_reads_through_istream() {
        let port = FakePort {
            rx: b"21 7.5\n".iter().copied().collect(),
            ..Default::default()
        };
        let locales = Locales::new();
        let mut cin = IStream::new(IoTransport::new(port), CountingDelay::default(), &locales);
        let (mut count, mut ratio) = (0i32, 0.0f32);
        cin.read(&mut count).unwrap().read(&mut ratio).unwrap();
        assert_eq!((count, ratio), (21, 7.5));
    }

    #[test]
    fn test_writes_through_ostream() {
        let locales = Locales::new();
        let mut cout = OStream::new(IoTransport::new(FakePort::default()), &locales);
        cout.write("n=").unwrap().write(42u32).unwrap().endl().unwrap();
        assert_eq!(cout.into_inner().into_inner().tx, b"n=42\r\n");
    }

    #[test]
    fn test_errors_collapse_to_io() {
        let mut transport = IoTransport::new(FakePort {
            broken: true,
            ..Default::default()
        });
        assert_eq!(ByteSink::write(&mut transport, b"x"), Err(OutputError::Io));

        transport.inner_mut().broken = false;
        assert_eq!(transport.available(), Ok(0));
        // Empty port reports end of file
        assert_eq!(transport.read_byte(), Err(InputError::Io));
    }
}
