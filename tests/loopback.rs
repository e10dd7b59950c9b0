//! End-to-end console behavior over an in-memory serial line.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use heapless::String;
use uart_iostream::input::TOKEN_CAPACITY;
use uart_iostream::locale::EN_150_UTF8;
use uart_iostream::{
    setprecision, ByteSink, ByteSource, Category, Console, IStream, InputError, Locale,
    LocaleError, Locales, Manipulator, OStream, OutputError, UnixTime, Utf8Cursor,
};

/// Both ends of a null-modem cable: what the device writes can be read back.
#[derive(Clone, Default)]
struct Line(Rc<RefCell<VecDeque<u8>>>);

impl Line {
    fn feed(&self, bytes: &[u8]) {
        self.0.borrow_mut().extend(bytes.iter().copied());
    }

    fn drain(&self) -> std::string::String {
        let bytes: Vec<u8> = self.0.borrow_mut().drain(..).collect();
        std::string::String::from_utf8(bytes).unwrap()
    }
}

impl ByteSource for Line {
    fn available(&mut self) -> Result<usize, InputError> {
        match self.0.borrow().len() {
            0 => Err(InputError::Io),
            n => Ok(n),
        }
    }

    fn read_byte(&mut self) -> Result<u8, InputError> {
        self.0.borrow_mut().pop_front().ok_or(InputError::Io)
    }
}

impl ByteSink for Line {
    fn write(&mut self, bytes: &[u8]) -> Result<(), OutputError> {
        self.feed(bytes);
        Ok(())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

#[test]
fn test_grouped_integer_per_locale() {
    let locales = Locales::new();
    let line = Line::default();
    let mut cout = OStream::new(line.clone(), &locales);

    cout.write(Manipulator::ShowGrouping)
        .unwrap()
        .write(1234567)
        .unwrap();
    assert_eq!(line.drain(), "1,234,567");

    locales
        .select(Category::NUMERIC, "en_150.UTF-8")
        .unwrap();
    cout.write(1234567).unwrap();
    assert_eq!(line.drain(), "1.234.567");
}

#[test]
#[allow(clippy::approx_constant)]
fn test_fixed_precision_two() {
    let locales = Locales::new();
    let line = Line::default();
    let mut cout = OStream::new(line.clone(), &locales);
    cout.write(Manipulator::Fixed)
        .unwrap()
        .write(setprecision(2))
        .unwrap()
        .write(3.14159)
        .unwrap();
    assert_eq!(line.drain(), "3.14");
}

#[test]
fn test_decimal_comma_round_trip() {
    let locales = Locales::new();
    locales.select(Category::ALL, "en_150.UTF-8").unwrap();
    let line = Line::default();
    let mut console = Console::new(line.clone(), line.clone(), NoDelay, &locales);

    console
        .output_mut()
        .write(Manipulator::Fixed)
        .unwrap()
        .write(setprecision(2))
        .unwrap()
        .write(12.5)
        .unwrap()
        .endl()
        .unwrap();

    let mut value = 0.0f64;
    console.input_mut().read(&mut value).unwrap();
    assert_eq!(value, 12.5);
}

#[test]
fn test_typed_line_read() {
    let locales = Locales::new();
    let line = Line::default();
    line.feed("42 -7 2.5 žaba\r\n".as_bytes());
    let mut cin = IStream::new(line.clone(), NoDelay, &locales);

    let (mut a, mut b, mut c) = (0u16, 0i64, 0.0f32);
    let mut word: String<16> = String::new();
    cin.read(&mut a)
        .unwrap()
        .read(&mut b)
        .unwrap()
        .read(&mut c)
        .unwrap()
        .read(&mut word)
        .unwrap();

    assert_eq!((a, b, c), (42, -7, 2.5));
    assert_eq!(word.as_str(), "žaba");
    // '\r' ended the word, '\n' is still pending
    assert_eq!(line.drain(), "\n");
}

#[test]
fn test_overlong_token_is_bounded() {
    let locales = Locales::new();
    let line = Line::default();
    line.feed(&[b'x'; 100]);
    line.feed(b" ");
    let mut cin = IStream::new(line.clone(), NoDelay, &locales);

    let mut word: String<128> = String::new();
    cin.read(&mut word).unwrap();
    assert_eq!(word.len(), TOKEN_CAPACITY);
    assert!(word.bytes().all(|b| b == b'x'));

    let mut rest: String<128> = String::new();
    cin.read(&mut rest).unwrap();
    assert_eq!(rest.len(), 100 - TOKEN_CAPACITY);
}

#[test]
fn test_overlong_number_uses_first_digits() {
    let locales = Locales::new();
    let line = Line::default();
    line.feed(&[b'1'; 70]);
    line.feed(b"\n");
    let mut cin = IStream::new(line, NoDelay, &locales);

    let mut value = 0u64;
    cin.read(&mut value).unwrap();
    // 63 ones saturate a u64
    assert_eq!(value, u64::MAX);
    assert_eq!(cin.token().len(), TOKEN_CAPACITY);
}

#[test]
fn test_duplicate_registration_keeps_count() {
    static FR_FR: Locale = Locale::new("fr_FR.UTF-8", b',', b' ', "%d/%m/%Y %H:%M");

    let locales = Locales::new();
    let before = locales.len();
    assert_eq!(locales.register(&FR_FR), Ok(()));
    assert_eq!(locales.register(&FR_FR), Err(LocaleError::Duplicate));
    assert_eq!(locales.register(&EN_150_UTF8), Err(LocaleError::Duplicate));
    assert_eq!(locales.len(), before + 1);

    let line = Line::default();
    locales.select(Category::NUMERIC, "fr_FR.UTF-8").unwrap();
    OStream::new(line.clone(), &locales)
        .write(Manipulator::ShowGrouping)
        .unwrap()
        .write(-9876543i32)
        .unwrap();
    assert_eq!(line.drain(), "-9 876 543");
}

#[test]
fn test_time_follows_time_category() {
    let locales = Locales::new();
    let line = Line::default();
    let mut cout = OStream::new(line.clone(), &locales);

    // 2024-01-01 13:30:00 UTC
    let noon_ish = UnixTime(1_704_115_800);
    cout.write(noon_ish).unwrap();
    assert_eq!(line.drain(), "2024/01/01 01:30:00 PM");

    locales.select(Category::TIME, "en_150.UTF-8").unwrap();
    cout.write(noon_ish).unwrap();
    assert_eq!(line.drain(), "01/01/2024 13:30:00");
}

#[test]
fn test_utf8_iteration_ends_at_buffer_end() {
    let text = "aé".as_bytes();
    let mut cursor = Utf8Cursor::new(text);
    let points: Vec<_> = cursor.by_ref().collect();
    assert_eq!(points.len(), 2);
    assert_eq!(cursor, Utf8Cursor::end(text));
}
