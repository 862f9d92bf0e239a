//! GoPro MP4 clips as GPMF payload sources.

pub mod file;

pub use file::GoProFile;
