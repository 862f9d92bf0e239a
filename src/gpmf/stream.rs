//! GPMF record ("stream"), either a container for further records,
//! or a leaf borrowing its raw values from the payload buffer.
//!
//! Leaf values are not decoded while parsing, see `gpmf::value`.

use crate::{FourCC, GpmfError};

use super::{Header, Type};

/// Nesting levels accepted while parsing.
/// Real GPMF payloads use three (`DEVC` -> `STRM` -> data).
pub const MAX_NESTING: usize = 16;

/// Record content.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamType<'a> {
    /// Child records.
    Nested(Vec<Stream<'a>>),
    /// Raw, undecoded values, excluding padding.
    Values(&'a [u8]),
}

/// A single GPMF record.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream<'a> {
    pub header: Header,
    pub streams: StreamType<'a>,
    /// Element types for a single sample.
    /// Empty for nested records.
    pub(crate) types: Vec<Type>,
    /// Nearest preceding `SCAL` sibling, if any.
    pub(crate) scale: Option<Box<Stream<'a>>>,
}

impl<'a> Stream<'a> {
    /// Parses all records in `data`. `depth` is the current nesting level.
    /// Trailing zero padding is accepted.
    pub fn new(data: &'a [u8], depth: usize) -> Result<Vec<Self>, GpmfError> {
        let mut streams: Vec<Self> = Vec::new();
        let mut offset = 0;

        // Sticky for following siblings
        let mut typedef: Option<Vec<Type>> = None;
        let mut scale: Option<Box<Stream<'a>>> = None;

        while offset < data.len() {
            let remaining = &data[offset..];

            if remaining.len() < Header::SIZE {
                if remaining.iter().all(|b| *b == 0) {
                    break
                }
                return Err(GpmfError::malformed(offset, format!("{} trailing bytes, expected header", remaining.len())))
            }

            let header = Header::new(remaining)?;

            if header.fourcc.is_invalid() {
                break
            }

            let kind = header.value_type()
                .ok_or_else(|| GpmfError::malformed(
                    offset,
                    format!("'{}' has unknown type 0x{:02x}", header.fourcc, header.kind)
                ))?;

            let start = offset + Header::SIZE;
            let end = start + header.data_len();
            if end > data.len() {
                return Err(GpmfError::malformed(
                    offset,
                    format!("'{}' declares {} bytes, only {} available",
                        header.fourcc,
                        header.data_len(),
                        data.len() - start)
                ))
            }
            let raw = &data[start..end];

            let mut stream = match kind {
                Type::Nested => {
                    if depth >= MAX_NESTING {
                        return Err(GpmfError::malformed(offset, format!("nesting exceeds {MAX_NESTING} levels")))
                    }
                    let children = Self::new(raw, depth + 1)
                        .map_err(|err| match err {
                            // make offset relative to this container
                            GpmfError::MalformedRecord{offset: o, reason} => GpmfError::MalformedRecord{
                                offset: start + o,
                                reason
                            },
                            e => e
                        })?;
                    Self {
                        header: header.to_owned(),
                        streams: StreamType::Nested(children),
                        types: Vec::new(),
                        scale: None,
                    }
                },
                Type::Complex => {
                    let types = match (&typedef, header.data_len()) {
                        (Some(t), _) => t.to_owned(),
                        (None, 0) => Vec::new(),
                        (None, _) => return Err(GpmfError::malformed(
                            offset,
                            format!("complex type '{}' without preceding TYPE", header.fourcc)
                        ))
                    };
                    let width: usize = types.iter().filter_map(|t| t.width()).sum();
                    if header.size != 0 && width != header.size as usize {
                        return Err(GpmfError::malformed(
                            offset,
                            format!("TYPE describes {width} bytes, '{}' has sample size {}", header.fourcc, header.size)
                        ))
                    }
                    Self {
                        header: header.to_owned(),
                        streams: StreamType::Values(raw),
                        types,
                        scale: None,
                    }
                },
                simple => {
                    // simple types always have a width
                    let width = simple.width().unwrap_or(1);
                    if header.size as usize % width != 0 {
                        return Err(GpmfError::malformed(
                            offset,
                            format!("'{}' sample size {} is not a multiple of '{}' ({width} bytes)",
                                header.fourcc,
                                header.size,
                                simple.to_char())
                        ))
                    }
                    Self {
                        header: header.to_owned(),
                        streams: StreamType::Values(raw),
                        types: vec![simple; header.size as usize / width],
                        scale: None,
                    }
                }
            };

            match &stream.header.fourcc {
                FourCC::TYPE => {
                    let types = Type::parse_typedef(raw)
                        .map_err(|reason| GpmfError::malformed(offset, reason))?;
                    typedef = Some(types);
                },
                FourCC::SCAL => scale = Some(Box::new(stream.to_owned())),
                _ => if !stream.is_nested() {
                    stream.scale = scale.to_owned()
                }
            }

            streams.push(stream);

            offset = (start + header.padded_len()).min(data.len());
        }

        Ok(streams)
    }

    pub fn fourcc(&self) -> &FourCC {
        &self.header.fourcc
    }

    /// Value type. Always known for parsed records.
    pub fn value_type(&self) -> Type {
        self.header.value_type().unwrap_or(Type::Nested)
    }

    /// Number of samples.
    pub fn repeat(&self) -> u32 {
        self.header.repeat as u32
    }

    /// Number of elements in a single sample,
    /// e.g. 5 for `GPS5`. Nested records count as 1.
    pub fn elements_per_sample(&self) -> u32 {
        match self.streams {
            StreamType::Nested(_) => 1,
            StreamType::Values(_) => self.types.len() as u32,
        }
    }

    /// Element types for a single sample.
    pub fn types(&self) -> &[Type] {
        &self.types
    }

    /// `SCAL` record applying to this record.
    pub fn scale(&self) -> Option<&Stream<'a>> {
        self.scale.as_deref()
    }

    pub fn is_nested(&self) -> bool {
        matches!(self.streams, StreamType::Nested(_))
    }

    /// Raw values for leaf records.
    pub fn raw(&self) -> Option<&'a [u8]> {
        match self.streams {
            StreamType::Values(raw) => Some(raw),
            StreamType::Nested(_) => None,
        }
    }

    /// Child records for containers.
    pub fn children(&self) -> &[Stream<'a>] {
        match &self.streams {
            StreamType::Nested(s) => s,
            StreamType::Values(_) => &[],
        }
    }

    /// Depth first search among child records,
    /// first match wins. `max_depth` is the number of additional
    /// levels to descend into, `0` only checks direct children.
    pub fn find(&self, fourcc: &FourCC, max_depth: usize) -> Option<&Stream<'a>> {
        find_in(self.children(), fourcc, max_depth)
    }

    /// Returns all matches among child records, depth first.
    pub fn find_all(&self, fourcc: &FourCC, max_depth: usize) -> Vec<&Stream<'a>> {
        let mut found = Vec::new();
        find_all_in(self.children(), fourcc, max_depth, &mut found);
        found
    }

    /// Raw values as a string, with trailing zero padding removed.
    /// `None` for nested records.
    pub fn to_string_lossy(&self) -> Option<String> {
        self.raw()
            .map(|raw| String::from_utf8_lossy(raw)
                .trim_end_matches('\0')
                .to_owned())
    }

    /// Stream name (`STNM`), e.g. "GPS (Lat., Long., Alt., 2D speed, 3D speed)".
    pub fn name(&self) -> Option<String> {
        self.find(&FourCC::STNM, 0)
            .and_then(|s| s.to_string_lossy())
    }
}

pub(crate) fn find_in<'s, 'a>(
    streams: &'s [Stream<'a>],
    fourcc: &FourCC,
    max_depth: usize
) -> Option<&'s Stream<'a>> {
    for stream in streams.iter() {
        if stream.fourcc() == fourcc {
            return Some(stream)
        }
        if max_depth > 0 {
            if let StreamType::Nested(children) = &stream.streams {
                if let Some(s) = find_in(children, fourcc, max_depth - 1) {
                    return Some(s)
                }
            }
        }
    }

    None
}

pub(crate) fn find_all_in<'s, 'a>(
    streams: &'s [Stream<'a>],
    fourcc: &FourCC,
    max_depth: usize,
    found: &mut Vec<&'s Stream<'a>>
) {
    for stream in streams.iter() {
        if stream.fourcc() == fourcc {
            found.push(stream)
        }
        if max_depth > 0 {
            if let StreamType::Nested(children) = &stream.streams {
                find_all_in(children, fourcc, max_depth - 1, found)
            }
        }
    }
}
