//! GoPro core GPMF struct and methods.
//!
//! Input is a single GPMF payload, e.g. one sample of the `GoPro MET`
//! track in an MP4 file, or a raw GPMF byte slice.
//! Values borrow the input buffer and are only decoded on request.
//!
//! ```rs
//! use gpmf_gps::{Gpmf, FourCC};
//!
//! fn main() -> Result<(), gpmf_gps::GpmfError> {
//!     let payload: Vec<u8> = std::fs::read("PAYLOAD.gpmf")?;
//!     let gpmf = Gpmf::from_slice(&payload)?;
//!     let gps5 = gpmf.find(&FourCC::GPS5, 4);
//!     Ok(())
//! }
//! ```

use std::collections::HashSet;

use super::stream::{find_all_in, find_in};
use super::{FourCC, Stream};
use crate::GpmfError;

/// Parsed GPMF payload, i.e. a record tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gpmf<'a> {
    /// Top-level records, usually one `DEVC` per device.
    pub streams: Vec<Stream<'a>>,
}

impl<'a> Gpmf<'a> {
    /// GPMF from byte slice.
    pub fn from_slice(slice: &'a [u8]) -> Result<Self, GpmfError> {
        Ok(Self {
            streams: Stream::new(slice, 0)?
        })
    }

    /// Returns number of top-level `Streams`.
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stream<'a>> {
        self.streams.iter()
    }

    /// Returns first DEVC stream
    pub fn first(&self) -> Option<&Stream<'a>> {
        self.streams.first()
    }

    /// Returns last DEVC stream
    pub fn last(&self) -> Option<&Stream<'a>> {
        self.streams.last()
    }

    /// Find first stream with specified FourCC, depth first.
    /// `max_depth` is the number of nesting levels to descend into,
    /// `0` only inspects top-level records.
    ///
    /// Searches do not share state, so the same tree
    /// can be searched for one FourCC, then another.
    pub fn find(&self, fourcc: &FourCC, max_depth: usize) -> Option<&Stream<'a>> {
        find_in(&self.streams, fourcc, max_depth)
    }

    /// Find all streams with specified FourCC, depth first.
    pub fn find_all(&self, fourcc: &FourCC, max_depth: usize) -> Vec<&Stream<'a>> {
        let mut found = Vec::new();
        find_all_in(&self.streams, fourcc, max_depth, &mut found);
        found
    }

    /// Returns all unique free text stream descriptions, i.e. `STNM` data.
    /// The hierarchy is `DEVC` -> `STRM` -> `STNM`.
    pub fn types(&self) -> Vec<String> {
        let unique: HashSet<String> = self.find_all(&FourCC::STRM, 1)
            .iter()
            .filter_map(|s| s.name())
            .collect();
        let mut types = unique.into_iter().collect::<Vec<_>>();
        types.sort();
        types
    }

    /// Device names (`DVNM`). The Karma drone logs two devices,
    /// the drone itself and the attached camera.
    pub fn device_name(&self) -> Vec<String> {
        let names_set: HashSet<String> = self.find_all(&FourCC::DVNM, 1)
            .iter()
            .filter_map(|s| s.to_string_lossy())
            .collect();

        let mut names = Vec::from_iter(names_set);
        names.sort();

        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{devc, leaf, payload_gps5, strm};

    #[test]
    fn search_then_search_again() {
        let data = payload_gps5(&[[1, 2, 3, 4, 5]], Some(b"190815123045.123"));
        let gpmf = Gpmf::from_slice(&data).unwrap();

        assert!(gpmf.find(&FourCC::GPSU, 4).is_some());
        assert!(gpmf.find(&FourCC::GPS5, 4).is_some());
        assert!(gpmf.find(&FourCC::GPSU, 4).is_some());
        assert!(gpmf.find(&FourCC::GPRI, 4).is_none());
        // DEVC is top-level
        assert!(gpmf.find(&FourCC::DEVC, 0).is_some());
        assert!(gpmf.find(&FourCC::GPS5, 0).is_none());
    }

    #[test]
    fn names() {
        let data = [
            devc(&[
                leaf(b"DVNM", b'c', 1, b"Hero7 Black"),
                strm(&[leaf(b"STNM", b'c', 1, b"GPS (Lat., Long., Alt., 2D speed, 3D speed)")]),
                strm(&[leaf(b"STNM", b'c', 1, b"Accelerometer")]),
            ]),
            devc(&[leaf(b"DVNM", b'c', 1, b"GoPro Karma v1.0")]),
        ].concat();
        let gpmf = Gpmf::from_slice(&data).unwrap();

        assert_eq!(gpmf.len(), 2);
        assert_eq!(gpmf.device_name(), vec!["GoPro Karma v1.0", "Hero7 Black"]);
        assert_eq!(gpmf.types(), vec![
            "Accelerometer",
            "GPS (Lat., Long., Alt., 2D speed, 3D speed)"
        ]);
    }

    #[test]
    fn empty_payload() {
        let gpmf = Gpmf::from_slice(&[]).unwrap();
        assert!(gpmf.is_empty());
        assert!(gpmf.find(&FourCC::GPS5, 4).is_none());
    }
}
