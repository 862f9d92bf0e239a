//! GoPro "file", representing an original, unedited MP4 clip
//! as a source of GPMF payloads.
//!
//! MP4 parsing is left to the `mp4` crate. The GPMF track is located via its
//! `hdlr` atom, and payload time spans derived from its `stts` atom.

use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::{Path, PathBuf}
};

use mp4::{Mp4Reader, Mp4Track};

use crate::{
    constants::{GOPRO_METADATA_HANDLER, MP4_METADATA_HANDLER_TYPE},
    GpmfError,
    PayloadSource,
    TimeRange,
};

/// Original, unedited GoPro MP4-file (`.MP4` or `.LRV`).
pub struct GoProFile {
    /// Path to MP4.
    pub path: PathBuf,
    mp4: Mp4Reader<BufReader<File>>,
    /// Track ID for `GoPro MET`.
    track_id: u32,
    /// Time span for each GPMF payload (MP4 sample).
    ranges: Vec<TimeRange>,
    /// Duration of `GoPro MET` in seconds.
    duration: f64,
}

impl std::fmt::Debug for GoProFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoProFile")
            .field("path", &self.path)
            .field("track_id", &self.track_id)
            .field("payloads", &self.ranges.len())
            .field("duration", &self.duration)
            .finish()
    }
}

impl GoProFile {
    /// Opens MP4 and locates the GPMF track.
    /// Raises `SourceUnavailable` if the file can not be read as MP4,
    /// or has no GPMF track.
    pub fn open(path: &Path) -> Result<Self, GpmfError> {
        let unavailable = |reason: String| GpmfError::SourceUnavailable(
            format!("{}: {reason}", path.display())
        );

        let file = File::open(path)
            .map_err(|err| unavailable(err.to_string()))?;
        let size = file.metadata()
            .map_err(|err| unavailable(err.to_string()))?
            .len();
        let mp4 = Mp4Reader::read_header(BufReader::new(file), size)
            .map_err(|err| unavailable(err.to_string()))?;

        let track = Self::metadata_track(&mp4)
            .ok_or_else(|| unavailable(format!("no '{GOPRO_METADATA_HANDLER}' track")))?;

        let track_id = track.track_id();
        let timescale = track.timescale();
        if timescale == 0 {
            return Err(unavailable(format!("track {track_id} has timescale 0")))
        }

        let (ranges, duration) = Self::time_ranges(track, timescale);

        log::debug!("{}: GPMF track {track_id}, {} payloads, {duration:.3}s",
            path.display(),
            ranges.len()
        );

        Ok(Self {
            path: path.to_owned(),
            mp4,
            track_id,
            ranges,
            duration,
        })
    }

    /// Track with handler name `GoPro MET`,
    /// else first track with handler type `meta`.
    fn metadata_track<R: Read + Seek>(mp4: &Mp4Reader<R>) -> Option<&Mp4Track> {
        let mut tracks = mp4.tracks().values().collect::<Vec<_>>();
        tracks.sort_by_key(|t| t.track_id());

        tracks.iter()
            .find(|t| t.trak.mdia.hdlr.name.contains(GOPRO_METADATA_HANDLER))
            .or_else(|| tracks.iter()
                .find(|t| &t.trak.mdia.hdlr.handler_type.value == MP4_METADATA_HANDLER_TYPE))
            .copied()
    }

    /// Time span for each sample from sample durations (`stts`),
    /// and total duration, in seconds.
    fn time_ranges(track: &Mp4Track, timescale: u32) -> (Vec<TimeRange>, f64) {
        let timescale = timescale as f64;
        let mut ranges: Vec<TimeRange> = Vec::new();
        let mut time: u64 = 0;

        for entry in track.trak.mdia.minf.stbl.stts.entries.iter() {
            for _ in 0..entry.sample_count {
                let time_in = time;
                time += entry.sample_delta as u64;
                ranges.push(TimeRange::new(
                    time_in as f64 / timescale,
                    time as f64 / timescale
                ));
            }
        }

        (ranges, time as f64 / timescale)
    }
}

impl PayloadSource for GoProFile {
    fn duration(&self) -> f64 {
        self.duration
    }

    fn payload_count(&self) -> u32 {
        self.ranges.len() as u32
    }

    fn payload_bytes(&mut self, index: u32) -> Result<Vec<u8>, GpmfError> {
        let unavailable = |reason: String| GpmfError::PayloadUnavailable { index, reason };

        // MP4 sample IDs start at 1
        self.mp4.read_sample(self.track_id, index + 1)
            .map_err(|err| unavailable(err.to_string()))?
            .map(|sample| sample.bytes.to_vec())
            .ok_or_else(|| unavailable(format!("no sample {} in track {}", index + 1, self.track_id)))
    }

    fn payload_time_range(&mut self, index: u32) -> Result<TimeRange, GpmfError> {
        self.ranges.get(index as usize)
            .copied()
            .ok_or_else(|| GpmfError::PayloadUnavailable {
                index,
                reason: format!("only {} payloads", self.ranges.len())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file() {
        let result = GoProFile::open(Path::new("does/not/exist/GH010001.MP4"));
        assert!(matches!(result, Err(GpmfError::SourceUnavailable(_))));
    }

    #[test]
    fn not_an_mp4() {
        let path = std::env::temp_dir().join(format!("gpmf-gps-{}.mp4", std::process::id()));
        std::fs::write(&path, b"definitely not an mp4 file").unwrap();
        let result = GoProFile::open(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(GpmfError::SourceUnavailable(_))));
    }
}
