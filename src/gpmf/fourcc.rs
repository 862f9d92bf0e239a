//! GPMF Four CC, i.e. general stream identifier.
//! Only structural FourCC and those relevant for GPS are named,
//! the rest are kept as `FourCC::Other(String)`.
//! `FourCC::Invalid` is there to check for zero padding at the end of payloads,
//! which will otherwise erronously be parsed as valid GPMF FourCC.

use std::fmt;

/// FourCC enum. Descriptions lifted from official GPMF documentation (<https://github.com/gopro/gpmf-parser>)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum FourCC {
    // FOURCC RESERVED FOR GPMF STRUCTURE
    /// unique device source for metadata
    DEVC,
    /// device/track ID
    DVID,
    /// device name
    /// Display name of the device like "Karma 1.0".
    DVNM,
    /// Nested signal stream of metadata/telemetry
    STRM,
    /// Stream name
    /// Display name for a stream like "GPS RAW".
    STNM,
    /// Comments for any stream
    RMRK,
    /// Scaling factor (divisor)
    /// Sensor data often needs to be scaled to be presented with the correct units. SCAL is a divisor.
    SCAL,
    /// Standard Units (like SI)
    SIUN,
    /// Display units
    UNIT,
    /// Typedefs for complex structures. For complex structure TYPE is used to describe the data packed within each sample.
    TYPE,
    /// Total Samples delivered
    TSMP,
    /// Time offset
    TIMO,
    /// Empty payload count
    EMPT,

    // GPS
    /// latitude, longitude, altitude (WGS 84), 2D ground speed, and 3D speed.
    /// Hero5 - Hero10.
    GPS5,
    /// GPS RAW, same leading layout as `GPS5`. GoPro Karma.
    GPRI,
    /// UTC time and data from GPS, `yymmddhhmmss.sss`.
    GPSU,
    /// GPS Fix. 0 - no lock, 2 or 3 - 2D or 3D Lock.
    GPSF,
    /// GPS Precision - Dilution of Precision (DOP x100).
    GPSP,
    /// GPS altitude system.
    GPSA,

    /// Zero padding.
    #[default]
    Invalid,

    Other(String),
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FourCC {
    /// FourCC from the first four bytes of a record header.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::from_slice(&bytes)
    }

    pub fn from_slice(slice: &[u8]) -> Self {
        match slice {
            // GPMF structural FourCC
            b"DEVC" => FourCC::DEVC,
            b"DVID" => FourCC::DVID,
            b"DVNM" => FourCC::DVNM,
            b"STRM" => FourCC::STRM,
            b"STNM" => FourCC::STNM,
            b"RMRK" => FourCC::RMRK,
            b"SCAL" => FourCC::SCAL,
            b"SIUN" => FourCC::SIUN,
            b"UNIT" => FourCC::UNIT,
            b"TYPE" => FourCC::TYPE,
            b"TSMP" => FourCC::TSMP,
            b"TIMO" => FourCC::TIMO,
            b"EMPT" => FourCC::EMPT,

            b"GPS5" => FourCC::GPS5,
            b"GPRI" => FourCC::GPRI,
            b"GPSU" => FourCC::GPSU,
            b"GPSF" => FourCC::GPSF,
            b"GPSP" => FourCC::GPSP,
            b"GPSA" => FourCC::GPSA,

            // Payloads are zero padded,
            // used as check for breaking parse loop
            b"\0\0\0\0" => FourCC::Invalid,

            // Undocumented FourCC
            _ => FourCC::Other(String::from_utf8_lossy(slice).to_string()),
        }
    }

    pub fn from_str(fourcc: &str) -> Self {
        Self::from_slice(fourcc.as_bytes())
    }

    pub fn to_str(&self) -> &str {
        match self {
            FourCC::DEVC => "DEVC",
            FourCC::DVID => "DVID",
            FourCC::DVNM => "DVNM",
            FourCC::STRM => "STRM",
            FourCC::STNM => "STNM",
            FourCC::RMRK => "RMRK",
            FourCC::SCAL => "SCAL",
            FourCC::SIUN => "SIUN",
            FourCC::UNIT => "UNIT",
            FourCC::TYPE => "TYPE",
            FourCC::TSMP => "TSMP",
            FourCC::TIMO => "TIMO",
            FourCC::EMPT => "EMPT",

            FourCC::GPS5 => "GPS5",
            FourCC::GPRI => "GPRI",
            FourCC::GPSU => "GPSU",
            FourCC::GPSF => "GPSF",
            FourCC::GPSP => "GPSP",
            FourCC::GPSA => "GPSA",

            FourCC::Invalid => "INVALID",
            FourCC::Other(s) => s.as_str(),
        }
    }

    /// Returns `true` for zero padding.
    pub fn is_invalid(&self) -> bool {
        self == &FourCC::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_undocumented() {
        assert_eq!(FourCC::from_bytes(*b"GPS5"), FourCC::GPS5);
        assert_eq!(FourCC::from_str("GPRI"), FourCC::GPRI);
        assert_eq!(FourCC::from_bytes(*b"ACCL"), FourCC::Other("ACCL".to_owned()));
        assert_eq!(FourCC::from_str("GPS9"), FourCC::Other("GPS9".to_owned()));
        assert_eq!(FourCC::from_bytes(*b"ACCL").to_str(), "ACCL");
        assert!(FourCC::from_bytes([0; 4]).is_invalid());
    }
}
