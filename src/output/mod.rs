mod fmt;
mod ostream;
mod print;
mod traits;

pub use fmt::ScratchBuf;
pub use ostream::{
    setprecision, FloatMode, FormatState, Manipulator, OStream, DEFAULT_FLOAT_DIGITS,
    DEFAULT_PRECISION, ENDL, MAX_PRECISION,
};
pub use print::{Print, TIME_BUFFER_SIZE};
pub use traits::{ByteSink, OutputError};
