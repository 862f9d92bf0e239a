//! Processed GPMF content. GPS only.

pub mod gps;

pub use gps::{GpsData, GpsSamples, GpsTag, gps::{Bounds, Gps}};
