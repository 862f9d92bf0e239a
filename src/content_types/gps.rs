//! GPS samples from a single GPMF payload,
//! and points in an assembled GPS track.

use std::fmt;

use crate::{
    gpmf::value::{decode, decode_scaled, parse_gpsu},
    FourCC,
    Gpmf,
    GpmfError,
    Options,
    Stream,
    TimeRange,
};

#[allow(clippy::module_inception)]
pub mod gps;

/// GPS record variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpsTag {
    /// `GPS5`, Hero5 - Hero10.
    Gps5,
    /// `GPRI`, GoPro Karma.
    Gpri,
}

impl GpsTag {
    /// Search order.
    pub const ALL: [GpsTag; 2] = [GpsTag::Gps5, GpsTag::Gpri];

    pub fn fourcc(&self) -> FourCC {
        match self {
            Self::Gps5 => FourCC::GPS5,
            Self::Gpri => FourCC::GPRI,
        }
    }
}

/// Point in an assembled GPS track.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GpsData {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
    /// Elevation.
    pub ele: f64,
    /// Unix time in seconds.
    pub time: f64,
}

impl fmt::Display for GpsData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "\
            lat:  {}
            lon:  {}
            ele:  {}
            time: {}",
            self.lat,
            self.lon,
            self.ele,
            self.time,
        )
    }
}

/// Returns the first GPS record in `gpmf`, `GPS5` before `GPRI`.
pub fn find_gps<'s, 'a>(gpmf: &'s Gpmf<'a>, max_depth: usize) -> Option<(GpsTag, &'s Stream<'a>)> {
    GpsTag::ALL.iter()
        .find_map(|tag| gpmf.find(&tag.fourcc(), max_depth).map(|s| (*tag, s)))
}

/// GPS samples extracted from a single payload.
#[derive(Debug, Default)]
pub struct GpsSamples {
    /// GPS record found, if any.
    pub tag: Option<GpsTag>,
    /// Unix time from `GPSU`.
    pub base_time: Option<f64>,
    /// Latitude, longitude, elevation.
    /// Further elements, e.g. speed, are dropped.
    pub samples: Vec<(f64, f64, f64)>,
    /// Set if `GPSU` exists but could not be parsed.
    pub timestamp_error: Option<GpmfError>,
}

impl GpsSamples {
    /// Extracts GPS samples from a parsed payload.
    /// A payload without GPS is not an error,
    /// and returns no samples.
    /// `GPSU` is interpreted according to `Options::time_reference`.
    pub fn from_gpmf(gpmf: &Gpmf, options: &Options) -> Result<Self, GpmfError> {
        let mut gps = Self::default();

        // OPTIONAL, datetime for the sample cluster
        if let Some(raw) = gpmf.find(&FourCC::GPSU, options.max_depth).and_then(|s| s.raw()) {
            match parse_gpsu(raw, &options.time_reference) {
                Ok(t) => gps.base_time = Some(t),
                Err(err) => {
                    log::debug!("{err}");
                    gps.timestamp_error = Some(err);
                }
            }
        }

        let (tag, stream) = match find_gps(gpmf, options.max_depth) {
            Some(found) => found,
            None => return Ok(gps)
        };
        gps.tag = Some(tag);

        let samples = stream.repeat();
        let elements = stream.elements_per_sample() as usize;

        let values = match options.apply_scale {
            true => decode_scaled(stream, samples)?,
            false => decode(stream, samples)?,
        };

        let element = |i: usize, j: usize| match j < elements {
            true => values.get(i * elements + j).copied().unwrap_or_default(),
            false => 0.0
        };

        gps.samples = (0..samples as usize)
            .map(|i| (element(i, 0), element(i, 1), element(i, 2)))
            .collect();

        Ok(gps)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Spreads samples evenly over `range`, starting at `base_time`,
    /// or at `0.0` if no `GPSU` was logged.
    pub fn to_points(&self, range: &TimeRange) -> Vec<GpsData> {
        let base = self.base_time.unwrap_or(0.0);
        let increment = range.increment(self.samples.len());

        self.samples.iter()
            .enumerate()
            .map(|(i, (lat, lon, ele))| GpsData {
                lat: *lat,
                lon: *lon,
                ele: *ele,
                time: base + increment * i as f64,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{devc, gps5_sample, gps_strm, leaf, payload_gps5, payload_no_gps, strm};
    use crate::TimeReference;
    use time::macros::datetime;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn no_gps_no_samples() {
        let data = payload_no_gps();
        let gpmf = Gpmf::from_slice(&data).unwrap();
        let gps = GpsSamples::from_gpmf(&gpmf, &Options::default()).unwrap();

        assert!(gps.is_empty());
        assert_eq!(gps.tag, None);
        assert_eq!(gps.base_time, None);
    }

    #[test]
    fn gps5_scaled() {
        let data = payload_gps5(
            &[gps5_sample(59.8586, 17.6389, 25.5), gps5_sample(59.8587, 17.6390, 26.0)],
            Some(b"190815123045.500")
        );
        let gpmf = Gpmf::from_slice(&data).unwrap();
        let options = Options::default().with_time_reference(TimeReference::Utc);
        let gps = GpsSamples::from_gpmf(&gpmf, &options).unwrap();

        assert_eq!(gps.tag, Some(GpsTag::Gps5));
        assert_eq!(gps.len(), 2);
        assert!(approx(gps.samples[0].0, 59.8586));
        assert!(approx(gps.samples[0].1, 17.6389));
        assert!(approx(gps.samples[0].2, 25.5));
        assert!(approx(gps.samples[1].2, 26.0));

        let expected = datetime!(2019-08-15 12:30:45).assume_utc().unix_timestamp() as f64 + 0.5;
        assert!(approx(gps.base_time.unwrap(), expected));
    }

    #[test]
    fn unscaled() {
        let data = payload_gps5(&[gps5_sample(59.8586, 17.6389, 25.5)], None);
        let gpmf = Gpmf::from_slice(&data).unwrap();
        let options = Options::default().with_scale(false);
        let gps = GpsSamples::from_gpmf(&gpmf, &options).unwrap();

        assert_eq!(gps.samples[0], (598_586_000.0, 176_389_000.0, 25_500.0));
    }

    #[test]
    fn gpri_fallback() {
        let data = devc(&[gps_strm(b"GPRI", &[gps5_sample(1.0, 2.0, 3.0)], None)]);
        let gpmf = Gpmf::from_slice(&data).unwrap();
        let gps = GpsSamples::from_gpmf(&gpmf, &Options::default()).unwrap();

        assert_eq!(gps.tag, Some(GpsTag::Gpri));
        assert_eq!(gps.len(), 1);
        assert!(approx(gps.samples[0].1, 2.0));
    }

    #[test]
    fn bad_timestamp_keeps_samples() {
        let data = payload_gps5(&[gps5_sample(1.0, 2.0, 3.0)], Some(b"not a timestamp!"));
        let gpmf = Gpmf::from_slice(&data).unwrap();
        let gps = GpsSamples::from_gpmf(&gpmf, &Options::default()).unwrap();

        assert_eq!(gps.len(), 1);
        assert_eq!(gps.base_time, None);
        assert!(matches!(gps.timestamp_error, Some(GpmfError::TimestampUnparseable(_))));
    }

    #[test]
    fn fewer_than_three_elements() {
        let data = devc(&[strm(&[
            leaf(b"GPS5", b'l', 8, &[0, 0, 0, 10, 0, 0, 0, 20]),
        ])]);
        let gpmf = Gpmf::from_slice(&data).unwrap();
        let gps = GpsSamples::from_gpmf(&gpmf, &Options::default()).unwrap();
        assert_eq!(gps.samples, vec![(10.0, 20.0, 0.0)]);
    }

    #[test]
    fn non_numeric_gps_fails() {
        let data = devc(&[strm(&[leaf(b"GPS5", b'c', 1, b"abcd")])]);
        let gpmf = Gpmf::from_slice(&data).unwrap();
        assert!(matches!(
            GpsSamples::from_gpmf(&gpmf, &Options::default()),
            Err(GpmfError::TypeUnsupported{..})
        ));
    }

    #[test]
    fn interpolation() {
        let gps = GpsSamples {
            base_time: Some(100.0),
            samples: vec![(0.0, 0.0, 0.0); 4],
            ..Default::default()
        };
        let times: Vec<f64> = gps.to_points(&TimeRange::new(10.0, 12.0))
            .iter()
            .map(|p| p.time)
            .collect();
        assert_eq!(times, vec![100.0, 100.5, 101.0, 101.5]);

        let no_base = GpsSamples {
            samples: vec![(0.0, 0.0, 0.0); 2],
            ..Default::default()
        };
        let times: Vec<f64> = no_base.to_points(&TimeRange::new(0.0, 1.0))
            .iter()
            .map(|p| p.time)
            .collect();
        assert_eq!(times, vec![0.0, 0.5]);
    }
}
