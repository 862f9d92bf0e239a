//! Payload sources, i.e. whatever demuxes GPMF payloads
//! and their time spans from a container.
//!
//! Opening a source is done via the implementor's constructor,
//! closing it by dropping it.

use crate::{GpmfError, TimeRange};

/// A single GPMF payload with its time span.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    pub bytes: Vec<u8>,
    pub range: TimeRange,
}

impl Payload {
    pub fn new(bytes: Vec<u8>, range: impl Into<TimeRange>) -> Self {
        Self { bytes, range: range.into() }
    }
}

/// Provides GPMF payloads in playback order.
pub trait PayloadSource {
    /// Total duration of the metadata track in seconds.
    fn duration(&self) -> f64;

    /// Number of payloads.
    fn payload_count(&self) -> u32;

    /// Raw GPMF bytes for payload at `index`.
    fn payload_bytes(&mut self, index: u32) -> Result<Vec<u8>, GpmfError>;

    /// Time span for payload at `index`.
    fn payload_time_range(&mut self, index: u32) -> Result<TimeRange, GpmfError>;

    /// Bytes and time span for payload at `index`.
    fn payload(&mut self, index: u32) -> Result<Payload, GpmfError> {
        Ok(Payload {
            bytes: self.payload_bytes(index)?,
            range: self.payload_time_range(index)?,
        })
    }
}

/// Payloads already in memory,
/// e.g. demuxed by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySource(pub Vec<Payload>);

impl MemorySource {
    pub fn new(payloads: Vec<Payload>) -> Self {
        Self(payloads)
    }

    pub fn push(&mut self, payload: Payload) {
        self.0.push(payload)
    }

    fn get(&self, index: u32) -> Result<&Payload, GpmfError> {
        self.0.get(index as usize)
            .ok_or_else(|| GpmfError::PayloadUnavailable {
                index,
                reason: format!("only {} payloads", self.0.len())
            })
    }
}

impl PayloadSource for MemorySource {
    /// End of last payload.
    fn duration(&self) -> f64 {
        self.0.last()
            .map(|p| p.range.time_out)
            .unwrap_or_default()
    }

    fn payload_count(&self) -> u32 {
        self.0.len() as u32
    }

    fn payload_bytes(&mut self, index: u32) -> Result<Vec<u8>, GpmfError> {
        self.get(index).map(|p| p.bytes.to_owned())
    }

    fn payload_time_range(&mut self, index: u32) -> Result<TimeRange, GpmfError> {
        self.get(index).map(|p| p.range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source() {
        let mut source = MemorySource::new(vec![
            Payload::new(vec![1, 2], (0.0, 1.0)),
            Payload::new(vec![3], (1.0, 2.5)),
        ]);

        assert_eq!(source.payload_count(), 2);
        assert_eq!(source.duration(), 2.5);
        assert_eq!(source.payload(1).unwrap(), Payload::new(vec![3], (1.0, 2.5)));
        assert!(matches!(
            source.payload_bytes(2),
            Err(GpmfError::PayloadUnavailable{index: 2, ..})
        ));
        assert_eq!(MemorySource::default().duration(), 0.0);
    }
}
