use geojson::{Feature, FeatureCollection, Geometry, Value};

use super::GpsData;

/// Latitude and longitude extent of a track, in degrees.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Assembled GPS track, ordered by payload, then sample.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Gps(pub Vec<GpsData>);

impl Gps {
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &GpsData> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&GpsData> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&GpsData> {
        self.0.last()
    }

    pub fn extend(&mut self, points: impl IntoIterator<Item = GpsData>) {
        self.0.extend(points)
    }

    pub fn into_inner(self) -> Vec<GpsData> {
        self.0
    }

    /// Concatenates `tracks` in order,
    /// e.g. the chapters of a single recording.
    pub fn combine(tracks: Vec<Gps>) -> Self {
        let mut combined = Self::with_capacity(tracks.iter().map(|t| t.len()).sum());
        for track in tracks {
            combined.extend(track)
        }
        combined
    }

    /// Latitude and longitude extent.
    /// Returns `None` for an empty track.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.first()?;
        let init = Bounds {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lon: first.lon,
            max_lon: first.lon,
        };

        Some(self.iter().fold(init, |b, p| Bounds {
            min_lat: b.min_lat.min(p.lat),
            max_lat: b.max_lat.max(p.lat),
            min_lon: b.min_lon.min(p.lon),
            max_lon: b.max_lon.max(p.lon),
        }))
    }

    /// Returns center of GPS points cluster.
    /// Longitude is averaged via its sine and cosine,
    /// `time` is that of the first point.
    pub fn center(&self) -> Option<GpsData> {
        let first = self.first()?;
        let n = self.len() as f64;

        let (mut lat, mut lon_sin, mut lon_cos, mut ele) = (0.0, 0.0, 0.0, 0.0);
        for p in self.iter() {
            lat += p.lat;
            lon_sin += p.lon.to_radians().sin();
            lon_cos += p.lon.to_radians().cos();
            ele += p.ele;
        }

        Some(GpsData {
            lat: lat / n,
            lon: f64::atan2(lon_sin / n, lon_cos / n).to_degrees(),
            ele: ele / n,
            time: first.time,
        })
    }

    /// Linear thinning to `max_points`, evenly spaced points are dropped.
    /// Returns a copy if the track already has `max_points` or fewer.
    pub fn reduce(&self, max_points: usize) -> Self {
        let len = self.len();
        if len <= max_points {
            return self.to_owned()
        }

        let drop = len - max_points;
        // Point n (from 1) is dropped each time n * drop / len reaches the next integer
        let points = self.iter()
            .enumerate()
            .filter(|(i, _)| (i + 1) * drop / len == i * drop / len)
            .map(|(_, p)| *p)
            .collect();

        Self(points)
    }

    /// Index of the point closest to `lat`, `lon`,
    /// by squared difference in degrees.
    /// The first point wins on equal distance.
    pub fn closest(&self, lat: f64, lon: f64) -> Option<usize> {
        self.iter()
            .map(|p| (p.lat - lat).powi(2) + (p.lon - lon).powi(2))
            .enumerate()
            .fold(None, |closest: Option<(usize, f64)>, (i, d)| match closest {
                Some((_, min)) if min <= d => closest,
                _ => Some((i, d)),
            })
            .map(|(i, _)| i)
    }

    /// Track as a GeoJSON line string,
    /// positions as `[longitude, latitude, elevation]`.
    pub fn to_linestring(&self) -> Geometry {
        Geometry::new(Value::LineString(
            self.iter()
                .map(|p| vec![p.lon, p.lat, p.ele])
                .collect()
        ))
    }
}

impl IntoIterator for Gps {
    type Item = GpsData;
    type IntoIter = std::vec::IntoIter<GpsData>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<&GpsData> for Feature {
    /// GeoJSON point with Unix time as property `time`.
    fn from(point: &GpsData) -> Self {
        let mut feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![point.lon, point.lat, point.ele]))),
            id: None,
            properties: None,
            foreign_members: None,
        };
        feature.set_property("time", point.time);
        feature
    }
}

impl From<&Gps> for FeatureCollection {
    /// One point feature per GPS point.
    fn from(gps: &Gps) -> Self {
        FeatureCollection {
            bbox: None,
            features: gps.iter().map(Feature::from).collect(),
            foreign_members: None,
        }
    }
}
