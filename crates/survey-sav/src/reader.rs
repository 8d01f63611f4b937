//! SAV file reader.
//!
//! Reads uncompressed and bytecode-compressed SPSS system files.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::bytecode::BytecodeDecoder;
use crate::cursor::ByteCursor;
use crate::dictionary::{Dictionary, parse_dictionary};
use crate::error::{Result, SavError};
use crate::header::parse_header;
use crate::types::{
    Compression, Endian, SYSMIS, SavDataset, SavReaderOptions, SavType, SavValue, SavVariable,
};

/// SAV file reader.
pub struct SavReader<R: Read> {
    reader: BufReader<R>,
    options: SavReaderOptions,
}

impl<R: Read> SavReader<R> {
    /// Create a new SAV reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            options: SavReaderOptions::default(),
        }
    }

    /// Create a new SAV reader with options.
    pub fn with_options(reader: R, options: SavReaderOptions) -> Self {
        Self {
            reader: BufReader::new(reader),
            options,
        }
    }

    /// Read the entire file into memory and parse it.
    pub fn read_dataset(mut self) -> Result<SavDataset> {
        let mut data = Vec::new();
        self.reader.read_to_end(&mut data)?;
        parse_sav_data(&data, &self.options)
    }
}

impl SavReader<File> {
    /// Open a SAV file for reading.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_options(path, SavReaderOptions::default())
    }

    /// Open a SAV file with options.
    pub fn open_with_options(path: &Path, options: SavReaderOptions) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SavError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                SavError::Io(e)
            }
        })?;
        Ok(Self::with_options(file, options))
    }
}

/// Read a SAV file from a path.
pub fn read_sav(path: &Path) -> Result<SavDataset> {
    SavReader::open(path)?.read_dataset()
}

/// Read a SAV file with options.
pub fn read_sav_with_options(path: &Path, options: SavReaderOptions) -> Result<SavDataset> {
    SavReader::open_with_options(path, options)?.read_dataset()
}

/// Source of 8-byte case slots.
enum SlotSource<'a> {
    Raw(ByteCursor<'a>),
    Bytecode(BytecodeDecoder<'a>),
}

impl SlotSource<'_> {
    fn next_slot(&mut self, endian: Endian) -> Result<Option<[u8; 8]>> {
        match self {
            Self::Raw(cursor) => {
                if cursor.is_at_end() {
                    return Ok(None);
                }
                if cursor.remaining() < 8 {
                    return Err(SavError::TrailingBytes);
                }
                cursor.read_raw8().map(Some)
            }
            Self::Bytecode(decoder) => decoder.next_slot(endian),
        }
    }

    fn position(&self) -> usize {
        match self {
            Self::Raw(cursor) => cursor.position(),
            Self::Bytecode(decoder) => decoder.position(),
        }
    }
}

/// Parse SAV data from bytes.
fn parse_sav_data(data: &[u8], options: &SavReaderOptions) -> Result<SavDataset> {
    let parsed = parse_header(data)?;
    let header = parsed.header;
    let endian = header.endian;
    let Dictionary {
        variables,
        documents,
        encoding,
        slot_count,
        data_offset,
    } = parse_dictionary(data, endian)?;

    let declared: usize = variables.iter().map(|var| var.var_type.slot_count()).sum();
    if declared != slot_count {
        return Err(SavError::invalid_format(format!(
            "variables span {declared} slots but the dictionary declares {slot_count}"
        )));
    }

    let cursor = ByteCursor::new(data, data_offset, endian);
    let mut source = match header.compression {
        Compression::None => SlotSource::Raw(cursor),
        Compression::Bytecode => SlotSource::Bytecode(BytecodeDecoder::new(cursor, header.bias)),
    };

    // A case occupies at least one byte, compressed or not.
    let mut rows = Vec::with_capacity(
        header
            .case_count
            .unwrap_or(0)
            .min(data.len().saturating_sub(data_offset)),
    );
    let mut slots = Vec::with_capacity(slot_count);
    while slot_count > 0 && header.case_count.is_none_or(|limit| rows.len() < limit) {
        slots.clear();
        for idx in 0..slot_count {
            match source.next_slot(endian)? {
                Some(slot) => slots.push(slot),
                None if idx == 0 => break,
                None => {
                    return Err(SavError::UnexpectedEof {
                        offset: source.position(),
                    });
                }
            }
        }
        if slots.is_empty() {
            break;
        }
        rows.push(decode_case(&slots, &variables, endian, options));
    }

    Ok(SavDataset {
        header,
        variables,
        documents,
        encoding,
        rows,
    })
}

fn decode_case(
    slots: &[[u8; 8]],
    variables: &[SavVariable],
    endian: Endian,
    options: &SavReaderOptions,
) -> Vec<SavValue> {
    let mut row = Vec::with_capacity(variables.len());
    let mut slot = 0usize;
    for variable in variables {
        let width = variable.var_type.slot_count();
        let value = match variable.var_type {
            SavType::Numeric => {
                let value = endian.f64_from(slots[slot]);
                let missing = value == SYSMIS
                    || value.is_nan()
                    || (options.apply_user_missing && variable.missing.contains(value));
                SavValue::Numeric((!missing).then_some(value))
            }
            SavType::String(len) => {
                let bytes: Vec<u8> = slots[slot..slot + width]
                    .iter()
                    .flatten()
                    .copied()
                    .take(usize::from(len))
                    .collect();
                let text = String::from_utf8_lossy(&bytes);
                let text = if options.trim_strings {
                    text.trim_end_matches([' ', '\0'])
                } else {
                    &text
                };
                SavValue::String(text.to_string())
            }
        };
        row.push(value);
        slot += width;
    }
    row
}
