//! GPS track assembly.
//!
//! Each payload in a `PayloadSource` is parsed on its own, and its GPS samples
//! spread evenly over the payload's time span, starting at the payload's
//! `GPSU` datetime. Payloads are concatenated in source order.
//!
//! ```rs
//! use gpmf_gps::{build_track, GoProFile, Options};
//! use std::path::Path;
//!
//! fn main() -> Result<(), gpmf_gps::GpmfError> {
//!     let mut gopro = GoProFile::open(Path::new("GOPRO_VIDEO.MP4"))?;
//!     let track = build_track(&mut gopro, &Options::default())?;
//!     for warning in track.warnings.iter() {
//!         eprintln!("{warning}");
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt;

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    content_types::gps::find_gps,
    ErrorPolicy,
    Gps,
    GpsSamples,
    Gpmf,
    GpmfError,
    Options,
    Payload,
    PayloadSource,
    TimeRange,
};

/// Payload failure that did not abort track assembly.
#[derive(Debug)]
pub struct PayloadWarning {
    /// Payload index in source.
    pub index: u32,
    pub error: GpmfError,
}

impl fmt::Display for PayloadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Payload {}: {}", self.index, self.error)
    }
}

/// Assembled GPS track.
#[derive(Debug, Default)]
pub struct Track {
    /// GPS points in payload, then sample order.
    pub points: Gps,
    /// Skipped payloads and unparseable timestamps.
    pub warnings: Vec<PayloadWarning>,
}

impl Track {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Sums the number of GPS samples (`GPS5`, else `GPRI`)
/// over all payloads without decoding them.
/// Failing payloads count as zero under `ErrorPolicy::Skip`
/// and are returned as warnings.
pub fn count_samples<S: PayloadSource + ?Sized>(
    source: &mut S,
    options: &Options
) -> Result<(u32, Vec<PayloadWarning>), GpmfError> {
    let mut total: u32 = 0;
    let mut warnings: Vec<PayloadWarning> = Vec::new();

    for index in 0..source.payload_count() {
        let counted = source.payload_bytes(index)
            .and_then(|bytes| {
                let gpmf = Gpmf::from_slice(&bytes)?;
                Ok(find_gps(&gpmf, options.max_depth)
                    .map(|(_, stream)| stream.repeat())
                    .unwrap_or(0))
            });

        match counted {
            Ok(n) => total += n,
            Err(error) => match options.policy {
                ErrorPolicy::Abort => return Err(error),
                ErrorPolicy::Skip => warnings.push(PayloadWarning { index, error }),
            }
        }
    }

    Ok((total, warnings))
}

/// Parses a single payload and extracts its GPS samples.
fn extract_payload(
    payload: Result<Payload, GpmfError>,
    options: &Options,
) -> Result<(GpsSamples, TimeRange), GpmfError> {
    let payload = payload?;
    let gpmf = Gpmf::from_slice(&payload.bytes)?;
    let samples = GpsSamples::from_gpmf(&gpmf, options)?;
    Ok((samples, payload.range))
}

/// Builds a single, ordered GPS track from all payloads in `source`.
///
/// Sample `i` of `N` in a payload spanning `[time_in, time_out]` is timed
/// `GPSU + i * (time_out - time_in) / N`, with `GPSU` set to `0.0` if absent.
///
/// With `ErrorPolicy::Skip` failing payloads are left out and listed in
/// `Track::warnings`, with `ErrorPolicy::Abort` the first failure is returned.
/// A source with zero duration returns an empty track.
///
/// Payloads are processed in chunks of one per `rayon` thread
/// (one at a time if `Options::parallel` is unset),
/// so only a chunk's worth of payload data is held in memory.
pub fn build_track<S: PayloadSource + ?Sized>(
    source: &mut S,
    options: &Options
) -> Result<Track, GpmfError> {
    let mut track = Track::default();

    let duration = source.duration();
    if duration <= 0.0 {
        log::debug!("Source has no metadata (duration {duration}s)");
        return Ok(track)
    }

    let count = source.payload_count();
    let chunk_size = match options.parallel {
        true => rayon::current_num_threads().max(1),
        false => 1,
    };

    for first in (0..count).step_by(chunk_size) {
        let last = count.min(first.saturating_add(chunk_size as u32));

        // 1. Read payloads serially
        let payloads = (first..last)
            .map(|index| source.payload(index))
            .collect::<Vec<_>>();

        // 2. Parse each payload, order is preserved
        let extracted = match options.parallel {
            true => payloads.into_par_iter()
                .map(|p| extract_payload(p, options))
                .collect::<Vec<_>>(),
            false => payloads.into_iter()
                .map(|p| extract_payload(p, options))
                .collect::<Vec<_>>(),
        };

        // 3. Time and concatenate
        for (index, result) in (first..last).zip(extracted) {
            match result {
                Ok((mut samples, range)) => {
                    if let Some(error) = samples.timestamp_error.take() {
                        log::warn!("Payload {index}: {error}");
                        track.warnings.push(PayloadWarning { index, error });
                    }
                    track.points.extend(samples.to_points(&range));
                },
                Err(error) => match options.policy {
                    ErrorPolicy::Abort => return Err(error),
                    ErrorPolicy::Skip => {
                        log::warn!("Skipping payload {index}: {error}");
                        track.warnings.push(PayloadWarning { index, error });
                    }
                }
            }
        }
    }

    log::debug!("Assembled {} GPS points from {count} payloads", track.len());

    Ok(track)
}

/// Returns all GPS points in a GoPro MP4 with default options.
/// Returns an empty list if the file can not be opened
/// or contains no GPMF track.
#[cfg(feature = "mp4")]
pub fn create_gps_data(path: &std::path::Path) -> Vec<crate::GpsData> {
    let mut gopro = match crate::GoProFile::open(path) {
        Ok(g) => g,
        Err(err) => {
            log::error!("{err}");
            return Vec::new()
        }
    };

    match build_track(&mut gopro, &Options::default()) {
        Ok(track) => track.points.into_inner(),
        Err(err) => {
            log::error!("{err}");
            Vec::new()
        }
    }
}
