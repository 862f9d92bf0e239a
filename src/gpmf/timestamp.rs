//! Convenience structure for dealing with payload time spans.

/// Time span, in seconds from video start, covered by a single GPMF payload.
/// Derived from MP4 timing for the `GoPro MET` track.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct TimeRange {
    /// Payload start.
    pub time_in: f64,
    /// Payload end, i.e. start of next payload.
    pub time_out: f64,
}

impl From<(f64, f64)> for TimeRange {
    fn from(value: (f64, f64)) -> Self {
        Self {
            time_in: value.0,
            time_out: value.1,
        }
    }
}

impl TimeRange {
    pub fn new(time_in: f64, time_out: f64) -> Self {
        Self { time_in, time_out }
    }

    /// 'Sample' duration for the payload,
    /// i.e. time until next payload is logged.
    pub fn duration(&self) -> f64 {
        self.time_out - self.time_in
    }

    /// Time between samples when `samples` are evenly
    /// spread over the payload. `0.0` if there are no samples.
    pub fn increment(&self, samples: usize) -> f64 {
        match samples {
            0 => 0.0,
            n => self.duration() / n as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment() {
        let range = TimeRange::from((10.0, 12.0));
        assert_eq!(range.duration(), 2.0);
        assert_eq!(range.increment(4), 0.5);
        assert_eq!(range.increment(0), 0.0);
    }
}
