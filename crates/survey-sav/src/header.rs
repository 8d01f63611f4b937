//! File header record (the first 176 bytes).
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 4 | `$FL2` magic |
//! | 4 | 60 | product name |
//! | 64 | 4 | layout code (2 or 3, used to detect byte order) |
//! | 68 | 4 | nominal case size in 8-byte slots |
//! | 72 | 4 | compression (0 none, 1 bytecode, 2 zlib) |
//! | 76 | 4 | weight variable index |
//! | 80 | 4 | case count (-1 when unknown) |
//! | 84 | 8 | compression bias |
//! | 92 | 9 | creation date `dd mmm yy` |
//! | 101 | 8 | creation time `hh:mm:ss` |
//! | 109 | 64 | file label |
//! | 173 | 3 | padding |

use chrono::NaiveDateTime;

use crate::cursor::{ByteCursor, decode_text};
use crate::error::{Result, SavError};
use crate::types::{Compression, Endian, SavHeader};

/// Header length in bytes.
pub const HEADER_LEN: usize = 176;

/// Magic for uncompressed and bytecode-compressed files.
pub const MAGIC_FL2: &[u8; 4] = b"$FL2";

/// Magic for zlib-compressed files.
pub const MAGIC_FL3: &[u8; 4] = b"$FL3";

const PRODUCT_LEN: usize = 60;
const DATE_LEN: usize = 9;
const TIME_LEN: usize = 8;
const LABEL_LEN: usize = 64;
const DATETIME_FORMAT: &str = "%d %b %y %H:%M:%S";

/// Parsed header plus the fields only the reader needs.
#[derive(Debug, Clone)]
pub struct ParsedHeader {
    pub header: SavHeader,
    /// Declared slots per case; may be -1 in files from some writers.
    pub nominal_case_size: i32,
}

/// Detect byte order from the layout code at offset 64.
pub fn detect_endian(data: &[u8]) -> Result<Endian> {
    let bytes: [u8; 4] = data
        .get(64..68)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(SavError::UnexpectedEof { offset: 64 })?;
    for endian in [Endian::Little, Endian::Big] {
        if matches!(endian.i32_from(bytes), 2 | 3) {
            return Ok(endian);
        }
    }
    Err(SavError::invalid_format("unrecognised layout code"))
}

/// Parse the file header.
pub fn parse_header(data: &[u8]) -> Result<ParsedHeader> {
    if data.len() < HEADER_LEN {
        return Err(SavError::invalid_format("file too small"));
    }
    let magic = &data[0..4];
    if magic == MAGIC_FL3 {
        return Err(SavError::UnsupportedCompression { code: 2 });
    }
    if magic != MAGIC_FL2 {
        return Err(SavError::invalid_format("missing $FL2 signature"));
    }
    let endian = detect_endian(data)?;
    let mut cursor = ByteCursor::new(data, 4, endian);
    let product = decode_text(cursor.read_bytes(PRODUCT_LEN)?);
    let _layout_code = cursor.read_i32()?;
    let nominal_case_size = cursor.read_i32()?;
    let compression = match cursor.read_i32()? {
        0 => Compression::None,
        1 => Compression::Bytecode,
        code => return Err(SavError::UnsupportedCompression { code }),
    };
    let weight_index = cursor.read_i32()?;
    let case_count = usize::try_from(cursor.read_i32()?).ok();
    let bias = cursor.read_f64()?;
    let date = decode_text(cursor.read_bytes(DATE_LEN)?);
    let time = decode_text(cursor.read_bytes(TIME_LEN)?);
    let label = decode_text(cursor.read_bytes(LABEL_LEN)?);

    Ok(ParsedHeader {
        header: SavHeader {
            product,
            endian,
            compression,
            weight_index,
            case_count,
            bias,
            created: parse_created(&date, &time),
            file_label: if label.is_empty() { None } else { Some(label) },
        },
        nominal_case_size,
    })
}

/// Parse the creation timestamp; unreadable stamps are dropped.
pub fn parse_created(date: &str, time: &str) -> Option<NaiveDateTime> {
    let text = format!("{} {}", date.trim(), time.trim());
    NaiveDateTime::parse_from_str(&text, DATETIME_FORMAT).ok()
}

/// Build the 176-byte header.
pub fn build_header(
    header: &SavHeader,
    nominal_case_size: i32,
    created: NaiveDateTime,
) -> Vec<u8> {
    let endian = header.endian;
    let mut out = Vec::with_capacity(HEADER_LEN);
    out.extend_from_slice(MAGIC_FL2);
    out.extend_from_slice(&pad_text(&header.product, PRODUCT_LEN));
    out.extend_from_slice(&endian.i32_to(2));
    out.extend_from_slice(&endian.i32_to(nominal_case_size));
    out.extend_from_slice(&endian.i32_to(header.compression.code()));
    out.extend_from_slice(&endian.i32_to(header.weight_index));
    let case_count = header
        .case_count
        .and_then(|count| i32::try_from(count).ok())
        .unwrap_or(-1);
    out.extend_from_slice(&endian.i32_to(case_count));
    out.extend_from_slice(&endian.f64_to(header.bias));
    out.extend_from_slice(&pad_text(
        &created.format("%d %b %y").to_string(),
        DATE_LEN,
    ));
    out.extend_from_slice(&pad_text(
        &created.format("%H:%M:%S").to_string(),
        TIME_LEN,
    ));
    out.extend_from_slice(&pad_text(
        header.file_label.as_deref().unwrap_or(""),
        LABEL_LEN,
    ));
    out.extend_from_slice(&[0u8; 3]);
    out
}

/// Space-pad (or truncate at a char boundary) to exactly `len` bytes.
pub fn pad_text(text: &str, len: usize) -> Vec<u8> {
    let mut end = text.len().min(len);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let mut bytes = text.as_bytes()[..end].to_vec();
    bytes.resize(len, b' ');
    bytes
}
