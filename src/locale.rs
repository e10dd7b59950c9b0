//! Locale descriptors, category masks, and the locale registry.
//!
//! A [`Locale`] is a plain capability struct: separator bytes, a time
//! pattern, and function pointers for case mapping and collation. The
//! [`Locales`] registry links descriptors in insertion order behind the
//! permanent [`ASCII`] default and holds the active descriptor for each of
//! the collation, character-type, numeric and time categories.
//!
//! Streams borrow a `Locales` value, so a selection change is seen by every
//! stream sharing it, including one in the middle of a read.
//!
//! # Example
//!
//! ```
//! use uart_iostream::locale::{Category, Locales};
//!
//! let locales = Locales::new();
//! assert_eq!(locales.numeric().name, "ASCII");
//!
//! locales.select(Category::NUMERIC, "en_150.UTF-8").unwrap();
//! assert_eq!(locales.numeric().decimal_separator, b',');
//! assert_eq!(locales.time().name, "ASCII");
//! ```

use core::cell::{Cell, RefCell};
use core::cmp::Ordering;
use core::fmt;
use core::ops::{BitOr, BitOrAssign};

use heapless::{String, Vec};
use log::debug;

use crate::utf8::{self, Utf8Char};

/// Maximum number of descriptors in a registry, the default included.
pub const MAX_LOCALES: usize = 8;

/// In-place case mapping over UTF-8 bytes.
///
/// Implementations must keep every sequence at its original byte length.
pub type CaseRule = fn(&mut [u8]);

/// String comparison rule.
pub type CollateRule = fn(&[u8], &[u8]) -> Ordering;

/// One regional convention.
#[derive(Clone, Copy)]
pub struct Locale {
    /// Unique identifier, e.g. `"en_150.UTF-8"`.
    pub name: &'static str,
    pub decimal_separator: u8,
    pub thousands_separator: u8,
    /// strftime-style pattern used for time values.
    pub time_format: &'static str,
    pub to_upper: CaseRule,
    pub to_lower: CaseRule,
    pub collate: CollateRule,
}

impl fmt::Debug for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locale")
            .field("name", &self.name)
            .field("decimal_separator", &(self.decimal_separator as char))
            .field("thousands_separator", &(self.thousands_separator as char))
            .field("time_format", &self.time_format)
            .finish_non_exhaustive()
    }
}

impl Locale {
    /// Descriptor with ASCII case mapping and bytewise collation.
    ///
    /// Override the rules with struct update syntax:
    ///
    /// ```
    /// use uart_iostream::locale::Locale;
    ///
    /// static DE_CH: Locale = Locale::new("de_CH.UTF-8", b'.', b'\'', "%d.%m.%Y %H:%M");
    /// assert_eq!(DE_CH.thousands_separator, b'\'');
    /// ```
    #[must_use]
    pub const fn new(
        name: &'static str,
        decimal_separator: u8,
        thousands_separator: u8,
        time_format: &'static str,
    ) -> Self {
        Self {
            name,
            decimal_separator,
            thousands_separator,
            time_format,
            to_upper: ascii_upper,
            to_lower: ascii_lower,
            collate: byte_collate,
        }
    }
}

impl PartialEq for Locale {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Locale {}

/// The default locale. Always registered first, never removable.
pub static ASCII: Locale = Locale::new("ASCII", b'.', b',', "%Y/%m/%d %r");

/// English as used in Europe: decimal comma, dot grouping.
pub static EN_150_UTF8: Locale = Locale::new("en_150.UTF-8", b',', b'.', "%d/%m/%Y %H:%M:%S");

/// Slovenian. Not registered by default.
///
/// Case mapping covers ASCII and č ć đ š ž; collation follows the Slovenian
/// alphabet (c < č < ć < d < đ, s < š, z < ž).
pub static SL_SI_UTF8: Locale = Locale {
    to_upper: slovenian_upper,
    to_lower: slovenian_lower,
    collate: slovenian_collate,
    ..Locale::new("sl_SI.UTF-8", b',', b'.', "%d.%m.%Y %H:%M:%S")
};

/// ASCII-only upper-casing; multi-byte sequences are untouched.
pub fn ascii_upper(text: &mut [u8]) {
    text.make_ascii_uppercase();
}

pub fn ascii_lower(text: &mut [u8]) {
    text.make_ascii_lowercase();
}

/// Plain byte order.
pub fn byte_collate(a: &[u8], b: &[u8]) -> Ordering {
    a.cmp(b)
}

/// Rewrite every decodable code point through `map`, keeping byte lengths.
fn map_code_points(text: &mut [u8], map: fn(char) -> char) {
    let mut pos = 0;
    while let Some((ch, len)) = utf8::decode_at(text, pos) {
        if let Some(c) = ch.to_char() {
            let mapped = map(c);
            if mapped != c {
                // Pairs with a different encoded length are left alone
                let _ = utf8::try_encode_at(text, pos, &Utf8Char::from(mapped));
            }
        }
        pos += len;
    }
}

fn slovenian_upper(text: &mut [u8]) {
    map_code_points(text, |c| match c {
        'č' => 'Č',
        'ć' => 'Ć',
        'đ' => 'Đ',
        'š' => 'Š',
        'ž' => 'Ž',
        _ => c.to_ascii_uppercase(),
    });
}

fn slovenian_lower(text: &mut [u8]) {
    map_code_points(text, |c| match c {
        'Č' => 'č',
        'Ć' => 'ć',
        'Đ' => 'đ',
        'Š' => 'š',
        'Ž' => 'ž',
        _ => c.to_ascii_lowercase(),
    });
}

/// Primary collation weight: letters with a caron or stroke sort right
/// after their base letter, case is ignored.
fn slovenian_weight(c: char) -> u32 {
    let (base, offset) = match c {
        'č' | 'Č' => ('c', 1),
        'ć' | 'Ć' => ('c', 2),
        'đ' | 'Đ' => ('d', 1),
        'š' | 'Š' => ('s', 1),
        'ž' | 'Ž' => ('z', 1),
        _ => (c.to_ascii_lowercase(), 0),
    };
    (base as u32) * 4 + offset
}

fn slovenian_weights(text: &[u8]) -> impl Iterator<Item = u32> + '_ {
    utf8::Utf8Cursor::new(text).map(|ch| match ch.to_char() {
        Some(c) => slovenian_weight(c),
        None => ch.as_bytes().first().map_or(0, |&b| u32::from(b) * 4),
    })
}

fn slovenian_collate(a: &[u8], b: &[u8]) -> Ordering {
    slovenian_weights(a)
        .cmp(slovenian_weights(b))
        .then_with(|| a.cmp(b))
}

/// Locale category mask.
///
/// Categories combine with `|`. Monetary and messages are accepted by
/// [`Locales::select`] but have no active selection.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Category(pub u8);

impl Category {
    /// String comparison and sorting.
    pub const COLLATE: Self = Self(1 << 0);
    /// Character classification and case conversion.
    pub const CTYPE: Self = Self(1 << 1);
    /// Monetary formatting (unsupported).
    pub const MONETARY: Self = Self(1 << 2);
    /// Decimal and thousands separators.
    pub const NUMERIC: Self = Self(1 << 3);
    /// Date and time patterns.
    pub const TIME: Self = Self(1 << 4);
    /// Message catalogs (unsupported).
    pub const MESSAGES: Self = Self(1 << 5);
    pub const ALL: Self = Self(0b0011_1111);

    /// Check if every bit of `other` is set.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Category) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl BitOr for Category {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Category {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Error type for registry operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LocaleError {
    /// A descriptor with this name is already registered.
    Duplicate,
    /// No registered descriptor has this name.
    NotFound,
    /// Descriptor names must not be empty.
    InvalidName,
    /// The registry holds [`MAX_LOCALES`] descriptors already.
    RegistryFull,
}

impl fmt::Display for LocaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate => write!(f, "locale already registered"),
            Self::NotFound => write!(f, "locale not found"),
            Self::InvalidName => write!(f, "invalid locale name"),
            Self::RegistryFull => write!(f, "locale registry full"),
        }
    }
}

/// Locale registry plus the active selection per category.
///
/// Shared by reference between streams through interior mutability.
/// Not `Sync`; concurrent use must be serialized by the owner.
pub struct Locales {
    entries: RefCell<Vec<&'static Locale, MAX_LOCALES>>,
    collation: Cell<&'static Locale>,
    ctype: Cell<&'static Locale>,
    numeric: Cell<&'static Locale>,
    time: Cell<&'static Locale>,
}

impl Locales {
    /// Registry with the builtin `ASCII` and `en_150.UTF-8` descriptors,
    /// `ASCII` active everywhere.
    #[must_use]
    pub fn new() -> Self {
        let locales = Self::ascii_only();
        // Cannot fail: second entry of an empty registry
        let _ = locales.register(&EN_150_UTF8);
        locales
    }

    /// Registry holding only the `ASCII` default.
    #[must_use]
    pub fn ascii_only() -> Self {
        let mut entries = Vec::new();
        let _ = entries.push(&ASCII);
        Self {
            entries: RefCell::new(entries),
            collation: Cell::new(&ASCII),
            ctype: Cell::new(&ASCII),
            numeric: Cell::new(&ASCII),
            time: Cell::new(&ASCII),
        }
    }

    /// Append a descriptor to the catalog.
    ///
    /// Fails without touching the registry if the name is empty, already
    /// present (the `ASCII` default included) or the catalog is full.
    pub fn register(&self, locale: &'static Locale) -> Result<(), LocaleError> {
        if locale.name.is_empty() {
            return Err(LocaleError::InvalidName);
        }

        let mut entries = self.entries.borrow_mut();
        if entries.iter().any(|entry| entry.name == locale.name) {
            debug!("locale {} already registered", locale.name);
            return Err(LocaleError::Duplicate);
        }

        entries.push(locale).map_err(|_| {
            debug!("locale registry full, dropping {}", locale.name);
            LocaleError::RegistryFull
        })
    }

    /// Make `name` the active descriptor for every category in `category`.
    ///
    /// On failure no selection changes. Monetary and messages bits are
    /// accepted and ignored.
    pub fn select(&self, category: Category, name: &str) -> Result<&'static Locale, LocaleError> {
        let Some(locale) = self.find(name) else {
            debug!("setlocale: unknown locale {}", name);
            return Err(LocaleError::NotFound);
        };

        if category.contains(Category::COLLATE) {
            self.collation.set(locale);
        }
        if category.contains(Category::CTYPE) {
            self.ctype.set(locale);
        }
        if category.contains(Category::NUMERIC) {
            self.numeric.set(locale);
        }
        if category.contains(Category::TIME) {
            self.time.set(locale);
        }
        Ok(locale)
    }

    /// Registered descriptor with this name, searched in link order.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&'static Locale> {
        self.entries
            .borrow()
            .iter()
            .copied()
            .find(|entry| entry.name == name)
    }

    /// Active descriptor for a single category.
    ///
    /// Returns `None` for monetary, messages, and masks naming more than
    /// one category.
    #[must_use]
    pub fn active(&self, category: Category) -> Option<&'static Locale> {
        match category {
            Category::COLLATE => Some(self.collation()),
            Category::CTYPE => Some(self.ctype()),
            Category::NUMERIC => Some(self.numeric()),
            Category::TIME => Some(self.time()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn collation(&self) -> &'static Locale {
        self.collation.get()
    }

    #[inline]
    #[must_use]
    pub fn ctype(&self) -> &'static Locale {
        self.ctype.get()
    }

    #[inline]
    #[must_use]
    pub fn numeric(&self) -> &'static Locale {
        self.numeric.get()
    }

    #[inline]
    #[must_use]
    pub fn time(&self) -> &'static Locale {
        self.time.get()
    }

    /// Number of registered descriptors, the default included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Always `false`: the default descriptor is permanent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Compare two strings with the active collation rule.
    #[must_use]
    pub fn strcoll(&self, a: &str, b: &str) -> Ordering {
        (self.collation().collate)(a.as_bytes(), b.as_bytes())
    }

    /// Upper-case `text` in place with the active character-type rule.
    pub fn to_upper(&self, text: &mut [u8]) {
        (self.ctype().to_upper)(text);
    }

    /// Lower-case `text` in place with the active character-type rule.
    pub fn to_lower(&self, text: &mut [u8]) {
        (self.ctype().to_lower)(text);
    }

    /// [`to_upper`](Self::to_upper) for a `heapless::String`.
    ///
    /// Left unchanged if the rule produced invalid UTF-8.
    pub fn to_upper_str<const N: usize>(&self, text: &mut String<N>) {
        map_string(text, self.ctype().to_upper);
    }

    /// [`to_lower`](Self::to_lower) for a `heapless::String`.
    pub fn to_lower_str<const N: usize>(&self, text: &mut String<N>) {
        map_string(text, self.ctype().to_lower);
    }
}

impl Default for Locales {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Locales {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locales")
            .field("registered", &self.len())
            .field("collation", &self.collation().name)
            .field("ctype", &self.ctype().name)
            .field("numeric", &self.numeric().name)
            .field("time", &self.time().name)
            .finish()
    }
}

fn map_string<const N: usize>(text: &mut String<N>, rule: CaseRule) {
    let mut bytes: Vec<u8, N> = Vec::new();
    if bytes.extend_from_slice(text.as_bytes()).is_err() {
        return;
    }
    rule(&mut bytes);
    if let Ok(mapped) = String::from_utf8(bytes) {
        *text = mapped;
    }
}
