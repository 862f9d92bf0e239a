//! Synthetic GPMF payloads for tests.

/// Leaf record. `repeat` is derived from `data.len() / size`.
pub(crate) fn leaf(fourcc: &[u8; 4], kind: u8, size: u8, data: &[u8]) -> Vec<u8> {
    let repeat = match size {
        0 => 0,
        s => (data.len() / s as usize) as u16
    };
    record(fourcc, kind, size, repeat, data)
}

/// Container record with the concatenated `children`.
pub(crate) fn nested(fourcc: &[u8; 4], children: &[Vec<u8>]) -> Vec<u8> {
    let data = children.concat();
    record(fourcc, 0, 1, data.len() as u16, &data)
}

pub(crate) fn devc(children: &[Vec<u8>]) -> Vec<u8> {
    nested(b"DEVC", children)
}

pub(crate) fn strm(children: &[Vec<u8>]) -> Vec<u8> {
    nested(b"STRM", children)
}

fn record(fourcc: &[u8; 4], kind: u8, size: u8, repeat: u16, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + data.len() + 3);
    out.extend_from_slice(fourcc);
    out.push(kind);
    out.push(size);
    out.extend_from_slice(&repeat.to_be_bytes());
    out.extend_from_slice(data);
    while out.len() % 4 != 0 {
        out.push(0);
    }
    out
}

/// Scale divisors used by `gps_strm`, as logged by Hero5 - Hero10.
pub(crate) const GPS5_SCALE: [i32; 5] = [10_000_000, 10_000_000, 1000, 1000, 100];

/// GPS `STRM` with optional `GPSU`, then `SCAL` and a GPS record
/// with tag `fourcc` containing raw (unscaled) `samples`.
pub(crate) fn gps_strm(fourcc: &[u8; 4], samples: &[[i32; 5]], gpsu: Option<&[u8; 16]>) -> Vec<u8> {
    let mut children = vec![
        leaf(b"STNM", b'c', 1, b"GPS (Lat., Long., Alt., 2D speed, 3D speed)"),
    ];
    if let Some(u) = gpsu {
        children.push(leaf(b"GPSU", b'U', 16, u));
    }
    let scal: Vec<u8> = GPS5_SCALE.iter().flat_map(|v| v.to_be_bytes()).collect();
    children.push(leaf(b"SCAL", b'l', 4, &scal));

    let raw: Vec<u8> = samples.iter()
        .flatten()
        .flat_map(|v| v.to_be_bytes())
        .collect();
    children.push(record(fourcc, b'l', 20, samples.len() as u16, &raw));

    strm(&children)
}

/// Single `DEVC` payload with a `GPS5` stream.
pub(crate) fn payload_gps5(samples: &[[i32; 5]], gpsu: Option<&[u8; 16]>) -> Vec<u8> {
    devc(&[
        leaf(b"DVNM", b'c', 1, b"Hero7 Black"),
        gps_strm(b"GPS5", samples, gpsu),
    ])
}

/// Single `DEVC` payload without GPS, accelerometer only.
pub(crate) fn payload_no_gps() -> Vec<u8> {
    devc(&[
        leaf(b"DVNM", b'c', 1, b"Hero7 Black"),
        strm(&[
            leaf(b"STNM", b'c', 1, b"Accelerometer"),
            leaf(b"SCAL", b's', 2, &418_i16.to_be_bytes()),
            leaf(b"ACCL", b's', 6, &[0, 1, 0, 2, 0, 3, 0, 4, 0, 5, 0, 6]),
        ]),
    ])
}

/// Raw GPS5 sample from degrees and metres.
pub(crate) fn gps5_sample(lat: f64, lon: f64, ele: f64) -> [i32; 5] {
    [
        (lat * GPS5_SCALE[0] as f64).round() as i32,
        (lon * GPS5_SCALE[1] as f64).round() as i32,
        (ele * GPS5_SCALE[2] as f64).round() as i32,
        1234,
        1300,
    ]
}

/// POSIX `TZ` rule for US Eastern time, no zoneinfo lookup needed.
pub(crate) const TZ_NEW_YORK: &str = "EST5EDT,M3.2.0,M11.1.0";
