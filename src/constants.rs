/// hdlr atom handler name for the GPMF track
pub const GOPRO_METADATA_HANDLER: &str = "GoPro MET";
/// hdlr atom handler type for timed metadata tracks
pub const MP4_METADATA_HANDLER_TYPE: &[u8; 4] = b"meta";
