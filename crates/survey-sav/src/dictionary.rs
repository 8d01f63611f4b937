//! Dictionary records: variables, value labels, documents and extensions.
//!
//! The dictionary follows the header and ends with a type 999 record. Each
//! variable occupies one 8-byte slot per case, strings wider than 8 bytes
//! add one continuation record (type -1) per extra slot. Value-label
//! records (type 3) are always followed by a type 4 record listing the
//! 1-based slot indices of the variables they apply to.

use std::collections::{HashMap, HashSet};

use crate::cursor::{ByteCursor, decode_text};
use crate::error::{Result, SavError};
use crate::header::{HEADER_LEN, pad_text};
use crate::types::{
    Endian, LabelValue, MissingValues, SYSMIS, SavDataset, SavFormat, SavType, SavVariable,
    ValueLabel,
};

pub const RECORD_VARIABLE: i32 = 2;
pub const RECORD_VALUE_LABELS: i32 = 3;
pub const RECORD_VALUE_LABEL_VARS: i32 = 4;
pub const RECORD_DOCUMENT: i32 = 6;
pub const RECORD_EXTENSION: i32 = 7;
pub const RECORD_TERMINATOR: i32 = 999;

pub const SUBTYPE_INTEGER_INFO: i32 = 3;
pub const SUBTYPE_FLOAT_INFO: i32 = 4;
pub const SUBTYPE_LONG_NAMES: i32 = 13;
pub const SUBTYPE_ENCODING: i32 = 20;

const DOCUMENT_LINE_LEN: usize = 80;
const MAX_VALUE_LABEL_LEN: usize = 120;
const MAX_VARIABLE_LABEL_LEN: usize = 255;
const SHORT_NAME_LEN: usize = 8;
/// Largest value below `SYSMIS`, used as LOWEST in missing ranges.
const LOWEST: f64 = f64::from_bits(0xffef_ffff_ffff_fffe);

/// Dictionary contents needed to decode case data.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    pub variables: Vec<SavVariable>,
    pub documents: Vec<String>,
    pub encoding: Option<String>,
    /// 8-byte slots per case.
    pub slot_count: usize,
    /// Offset of the first byte of case data.
    pub data_offset: usize,
}

/// Parse every dictionary record following the header.
pub fn parse_dictionary(data: &[u8], endian: Endian) -> Result<Dictionary> {
    let mut cursor = ByteCursor::new(data, HEADER_LEN, endian);
    let mut variables: Vec<SavVariable> = Vec::new();
    // Slot index → owning variable; continuation slots own nothing.
    let mut slot_owner: Vec<Option<usize>> = Vec::new();
    let mut documents = Vec::new();
    let mut encoding = None;
    let mut long_names: HashMap<String, String> = HashMap::new();

    loop {
        let offset = cursor.position();
        let record_type = cursor.read_i32()?;
        match record_type {
            RECORD_VARIABLE => {
                parse_variable_record(&mut cursor, endian, &mut variables, &mut slot_owner)?;
            }
            RECORD_VALUE_LABELS => {
                parse_value_labels(&mut cursor, endian, &mut variables, &slot_owner)?;
            }
            RECORD_DOCUMENT => {
                let lines = cursor.read_count("document line count")?;
                for _ in 0..lines {
                    documents.push(decode_text(cursor.read_bytes(DOCUMENT_LINE_LEN)?));
                }
            }
            RECORD_EXTENSION => {
                let subtype = cursor.read_i32()?;
                let size = cursor.read_count("extension element size")?;
                let count = cursor.read_count("extension element count")?;
                let total = size
                    .checked_mul(count)
                    .ok_or_else(|| SavError::invalid_format("extension record too large"))?;
                let body = cursor.read_bytes(total)?;
                match subtype {
                    SUBTYPE_LONG_NAMES => long_names.extend(parse_long_names(body)),
                    SUBTYPE_ENCODING => encoding = Some(decode_text(body)),
                    _ => {}
                }
            }
            RECORD_TERMINATOR => {
                let _filler = cursor.read_i32()?;
                break;
            }
            other => {
                return Err(SavError::UnknownRecordType {
                    record_type: other,
                    offset,
                });
            }
        }
    }

    for variable in &mut variables {
        if let Some(long) = long_names.get(&variable.short_name.to_ascii_uppercase()) {
            variable.name = long.clone();
        }
    }

    Ok(Dictionary {
        variables,
        documents,
        encoding,
        slot_count: slot_owner.len(),
        data_offset: cursor.position(),
    })
}

fn parse_variable_record(
    cursor: &mut ByteCursor<'_>,
    endian: Endian,
    variables: &mut Vec<SavVariable>,
    slot_owner: &mut Vec<Option<usize>>,
) -> Result<()> {
    let offset = cursor.position();
    let type_code = cursor.read_i32()?;
    let has_label = cursor.read_i32()?;
    let missing_code = cursor.read_i32()?;
    let print = cursor.read_i32()?;
    let write = cursor.read_i32()?;
    let short_name = decode_text(cursor.read_bytes(SHORT_NAME_LEN)?);

    let label = if has_label == 1 {
        let len = cursor.read_count("variable label length")?;
        let padded = len.div_ceil(4) * 4;
        let bytes = cursor.read_bytes(padded)?;
        Some(decode_text(&bytes[..len]))
    } else {
        None
    };

    let missing_len = missing_code.unsigned_abs() as usize;
    if missing_len > 3 {
        return Err(SavError::invalid_format(format!(
            "invalid missing value count {missing_code} at offset {offset}"
        )));
    }
    let mut missing_raw = Vec::with_capacity(missing_len);
    for _ in 0..missing_len {
        missing_raw.push(cursor.read_raw8()?);
    }

    if type_code == -1 {
        if slot_owner.is_empty() {
            return Err(SavError::invalid_format(
                "continuation record without a preceding string variable",
            ));
        }
        slot_owner.push(None);
        return Ok(());
    }

    let var_type = match type_code {
        0 => SavType::Numeric,
        1..=255 => SavType::String(type_code as u16),
        other => {
            return Err(SavError::invalid_format(format!(
                "invalid variable type {other} at offset {offset}"
            )));
        }
    };

    let missing = decode_missing(var_type, missing_code, &missing_raw, endian, offset)?;

    slot_owner.push(Some(variables.len()));
    variables.push(SavVariable {
        name: short_name.clone(),
        short_name,
        label,
        var_type,
        print_format: SavFormat::from_packed(print),
        write_format: SavFormat::from_packed(write),
        missing,
        value_labels: Vec::new(),
    });
    Ok(())
}

fn decode_missing(
    var_type: SavType,
    code: i32,
    raw: &[[u8; 8]],
    endian: Endian,
    offset: usize,
) -> Result<MissingValues> {
    if raw.is_empty() {
        return Ok(MissingValues::None);
    }
    if !var_type.is_numeric() {
        if code < 0 {
            return Err(SavError::invalid_format(format!(
                "string variable with missing range at offset {offset}"
            )));
        }
        return Ok(MissingValues::Strings(
            raw.iter().map(|bytes| decode_text(bytes)).collect(),
        ));
    }
    let values: Vec<f64> = raw.iter().map(|bytes| endian.f64_from(*bytes)).collect();
    Ok(match code {
        -2 => MissingValues::Range {
            low: values[0],
            high: values[1],
        },
        -3 => MissingValues::RangeAndValue {
            low: values[0],
            high: values[1],
            value: values[2],
        },
        _ => MissingValues::Discrete(values),
    })
}

fn parse_value_labels(
    cursor: &mut ByteCursor<'_>,
    endian: Endian,
    variables: &mut [SavVariable],
    slot_owner: &[Option<usize>],
) -> Result<()> {
    let count = cursor.read_count("value label count")?;
    // Each entry takes at least 16 bytes; the declared count is not trusted.
    let mut entries = Vec::with_capacity(count.min(cursor.remaining() / 16));
    for _ in 0..count {
        let value = cursor.read_raw8()?;
        let len = usize::from(cursor.read_u8()?);
        let label = decode_text(cursor.read_bytes(len)?);
        let used = 1 + len;
        cursor.skip(used.div_ceil(8) * 8 - used)?;
        entries.push((value, label));
    }

    let record_type = cursor.read_i32()?;
    if record_type != RECORD_VALUE_LABEL_VARS {
        return Err(SavError::invalid_format(format!(
            "value label record followed by record type {record_type}"
        )));
    }
    let var_count = cursor.read_count("value label variable count")?;
    for _ in 0..var_count {
        let index = cursor.read_i32()?;
        let owner = index
            .checked_sub(1)
            .and_then(|slot| usize::try_from(slot).ok())
            .and_then(|slot| slot_owner.get(slot).copied().flatten())
            .ok_or(SavError::InvalidVariableIndex { index })?;
        let variable = &mut variables[owner];
        for (raw, label) in &entries {
            let value = if variable.is_numeric() {
                LabelValue::Numeric(endian.f64_from(*raw))
            } else {
                LabelValue::String(decode_text(raw))
            };
            variable.value_labels.push(ValueLabel {
                value,
                label: label.clone(),
            });
        }
    }
    Ok(())
}

/// Parse `SHORT=LongName` pairs separated by tabs.
fn parse_long_names(body: &[u8]) -> Vec<(String, String)> {
    String::from_utf8_lossy(body)
        .split('\t')
        .filter_map(|pair| {
            let (short, long) = pair.split_once('=')?;
            let short = short.trim();
            let long = long.trim_end_matches(['\0', ' ']);
            if short.is_empty() || long.is_empty() {
                return None;
            }
            Some((short.to_ascii_uppercase(), long.to_string()))
        })
        .collect()
}

/// Assign unique 8-byte short names derived from the variable names.
pub fn assign_short_names(variables: &[SavVariable]) -> Result<Vec<String>> {
    let mut seen_names = HashSet::new();
    let mut used = HashSet::new();
    let mut names = Vec::with_capacity(variables.len());
    for (idx, variable) in variables.iter().enumerate() {
        if variable.name.trim().is_empty() {
            return Err(SavError::invalid_variable_name(variable.name.clone()));
        }
        if !seen_names.insert(variable.name.to_ascii_uppercase()) {
            return Err(SavError::duplicate_variable(variable.name.clone()));
        }
        let base: String = variable
            .name
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
            .take(SHORT_NAME_LEN)
            .collect::<String>()
            .to_ascii_uppercase();
        let base = match base.chars().next() {
            Some(first) if first.is_ascii_alphabetic() => base,
            _ => format!("V{}", idx + 1),
        };
        let mut candidate = base.clone();
        let mut counter = 1usize;
        while used.contains(&candidate) {
            let suffix = counter.to_string();
            let keep = SHORT_NAME_LEN.saturating_sub(suffix.len()).min(base.len());
            candidate = format!("{}{suffix}", &base[..keep]);
            counter += 1;
        }
        used.insert(candidate.clone());
        names.push(candidate);
    }
    Ok(names)
}

/// Serialize the dictionary (everything between header and case data).
pub fn build_dictionary(
    dataset: &SavDataset,
    short_names: &[String],
    endian: Endian,
    encoding: &str,
) -> Vec<u8> {
    let mut out = Vec::new();
    let put_i32 = |out: &mut Vec<u8>, value: i32| out.extend_from_slice(&endian.i32_to(value));

    // Variable records
    let mut first_slot = Vec::with_capacity(dataset.variables.len());
    let mut slot = 0usize;
    for (variable, short_name) in dataset.variables.iter().zip(short_names) {
        first_slot.push(slot);
        slot += variable.var_type.slot_count();

        put_i32(&mut out, RECORD_VARIABLE);
        put_i32(&mut out, variable.var_type.type_code());
        put_i32(&mut out, i32::from(variable.label.is_some()));
        put_i32(&mut out, variable.missing.record_code());
        put_i32(&mut out, variable.print_format.packed());
        put_i32(&mut out, variable.write_format.packed());
        out.extend_from_slice(&pad_text(short_name, SHORT_NAME_LEN));
        if let Some(label) = &variable.label {
            let bytes = pad_text(label, label.len().min(MAX_VARIABLE_LABEL_LEN));
            put_i32(&mut out, bytes.len() as i32);
            out.extend_from_slice(&bytes);
            out.resize(out.len() + (bytes.len().div_ceil(4) * 4 - bytes.len()), b' ');
        }
        match &variable.missing {
            MissingValues::None => {}
            MissingValues::Discrete(values) => {
                for value in values {
                    out.extend_from_slice(&endian.f64_to(*value));
                }
            }
            MissingValues::Range { low, high } => {
                out.extend_from_slice(&endian.f64_to(*low));
                out.extend_from_slice(&endian.f64_to(*high));
            }
            MissingValues::RangeAndValue { low, high, value } => {
                out.extend_from_slice(&endian.f64_to(*low));
                out.extend_from_slice(&endian.f64_to(*high));
                out.extend_from_slice(&endian.f64_to(*value));
            }
            MissingValues::Strings(values) => {
                for value in values {
                    out.extend_from_slice(&pad_text(value, 8));
                }
            }
        }
        for _ in 1..variable.var_type.slot_count() {
            put_i32(&mut out, RECORD_VARIABLE);
            put_i32(&mut out, -1);
            put_i32(&mut out, 0);
            put_i32(&mut out, 0);
            put_i32(&mut out, 0);
            put_i32(&mut out, 0);
            out.extend_from_slice(&[b' '; SHORT_NAME_LEN]);
        }
    }

    // Value labels, one record pair per variable
    for (variable, slot) in dataset.variables.iter().zip(&first_slot) {
        if variable.value_labels.is_empty() {
            continue;
        }
        put_i32(&mut out, RECORD_VALUE_LABELS);
        put_i32(&mut out, variable.value_labels.len() as i32);
        for entry in &variable.value_labels {
            match &entry.value {
                LabelValue::Numeric(value) => out.extend_from_slice(&endian.f64_to(*value)),
                LabelValue::String(value) => out.extend_from_slice(&pad_text(value, 8)),
            }
            let label = pad_text(&entry.label, entry.label.len().min(MAX_VALUE_LABEL_LEN));
            out.push(label.len() as u8);
            out.extend_from_slice(&label);
            let used = 1 + label.len();
            out.resize(out.len() + (used.div_ceil(8) * 8 - used), b' ');
        }
        put_i32(&mut out, RECORD_VALUE_LABEL_VARS);
        put_i32(&mut out, 1);
        put_i32(&mut out, (*slot + 1) as i32);
    }

    if !dataset.documents.is_empty() {
        put_i32(&mut out, RECORD_DOCUMENT);
        put_i32(&mut out, dataset.documents.len() as i32);
        for line in &dataset.documents {
            out.extend_from_slice(&pad_text(line, DOCUMENT_LINE_LEN));
        }
    }

    // Machine integer info: version 1.0.0, unknown machine, IEEE floats,
    // compression code, byte order, UTF-8 code page.
    let byte_order = match endian {
        Endian::Big => 1,
        Endian::Little => 2,
    };
    let integer_info = [1, 0, 0, -1, 1, 1, byte_order, 65001];
    put_extension_header(&mut out, endian, SUBTYPE_INTEGER_INFO, 4, integer_info.len());
    for value in integer_info {
        put_i32(&mut out, value);
    }

    put_extension_header(&mut out, endian, SUBTYPE_FLOAT_INFO, 8, 3);
    for value in [SYSMIS, f64::MAX, LOWEST] {
        out.extend_from_slice(&endian.f64_to(value));
    }

    let long_names = dataset
        .variables
        .iter()
        .zip(short_names)
        .map(|(variable, short)| format!("{short}={}", variable.name))
        .collect::<Vec<_>>()
        .join("\t");
    put_extension_header(&mut out, endian, SUBTYPE_LONG_NAMES, 1, long_names.len());
    out.extend_from_slice(long_names.as_bytes());

    put_extension_header(&mut out, endian, SUBTYPE_ENCODING, 1, encoding.len());
    out.extend_from_slice(encoding.as_bytes());

    put_i32(&mut out, RECORD_TERMINATOR);
    put_i32(&mut out, 0);
    out
}

fn put_extension_header(out: &mut Vec<u8>, endian: Endian, subtype: i32, size: i32, count: usize) {
    out.extend_from_slice(&endian.i32_to(RECORD_EXTENSION));
    out.extend_from_slice(&endian.i32_to(subtype));
    out.extend_from_slice(&endian.i32_to(size));
    out.extend_from_slice(&endian.i32_to(count as i32));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_names_map_short_to_long() {
        let pairs = parse_long_names(b"Q45PT1=Q45pt1\tCOUNTRY=Country_Name");
        assert_eq!(
            pairs,
            vec![
                ("Q45PT1".to_string(), "Q45pt1".to_string()),
                ("COUNTRY".to_string(), "Country_Name".to_string()),
            ]
        );
    }

    #[test]
    fn short_names_are_unique_and_bounded() {
        let variables = vec![
            SavVariable::numeric("household_income"),
            SavVariable::numeric("household_size"),
            SavVariable::numeric("9lives"),
        ];
        let names = assign_short_names(&variables).unwrap();
        assert_eq!(names[0], "HOUSEHOL");
        assert_eq!(names[1], "HOUSEHO1");
        assert_eq!(names[2], "V3");
        assert!(names.iter().all(|name| name.len() <= 8));
    }

    #[test]
    fn duplicate_variable_names_fail() {
        let variables = vec![SavVariable::numeric("Q1"), SavVariable::numeric("q1")];
        assert!(matches!(
            assign_short_names(&variables),
            Err(SavError::DuplicateVariable { .. })
        ));
    }
}
