mod istream;
mod scan;
mod traits;

pub use istream::{IStream, POLL_INTERVAL_MS, TOKEN_CAPACITY};
pub use scan::{Scan, TokenRule};
pub use traits::{ByteSource, InputError};
