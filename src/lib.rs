//! Extract GPS tracks from GoPro GPMF metadata.
//!
//! GPMF payloads are parsed into a tree of `Stream`s. The GPS record in each payload
//! (`GPS5`, or `GPRI` for Karma drones) is decoded, timed from the payload's `GPSU`
//! datetime and the payload's time span, and concatenated into a single track.
//!
//! ```rs
//! use gpmf_gps::create_gps_data;
//! use std::path::Path;
//!
//! fn main() {
//!     let points = create_gps_data(Path::new("GOPRO_VIDEO.MP4"));
//!     println!("{} points", points.len());
//! }
//! ```
//!
//! Payloads demuxed elsewhere can be passed via `MemorySource`,
//! or any other implementation of `PayloadSource`.

pub mod gpmf;
mod errors;
mod content_types;
#[cfg(feature = "mp4")]
mod constants;
mod options;
mod source;
mod track;
#[cfg(feature = "mp4")]
mod gopro;
#[cfg(test)]
mod fixtures;

pub use gpmf::{
    Gpmf,
    FourCC,
    Header,
    Stream,
    StreamType,
    TimeRange,
    Type,
};
pub use content_types::{Bounds, Gps, GpsData, GpsSamples, GpsTag};
pub use content_types::gps::find_gps;
pub use errors::GpmfError;
pub use options::{Options, TimeReference, ErrorPolicy, DEFAULT_MAX_DEPTH};
pub use source::{Payload, PayloadSource, MemorySource};
pub use track::{build_track, count_samples, Track, PayloadWarning};
#[cfg(feature = "mp4")]
pub use track::create_gps_data;
#[cfg(feature = "mp4")]
pub use gopro::GoProFile;
