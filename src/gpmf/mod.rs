//! GPMF record parsing and value decoding.

pub mod fourcc;
pub mod header;
pub mod stream;
#[allow(clippy::module_inception)]
pub mod gpmf;
pub mod timestamp;
pub mod value;

pub use fourcc::FourCC;
pub use header::{Header, Type};
pub use stream::{Stream, StreamType};
pub use gpmf::Gpmf;
pub use timestamp::TimeRange;
