//! SAV file writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Local;

use crate::bytecode::{BytecodeEncoder, EncodedSlot};
use crate::dictionary::{assign_short_names, build_dictionary};
use crate::error::{Result, SavError};
use crate::header::{build_header, pad_text};
use crate::types::{
    Compression, SYSMIS, SavDataset, SavHeader, SavType, SavValue, SavWriterOptions,
};

/// SAV file writer.
pub struct SavWriter<W: Write> {
    writer: BufWriter<W>,
    options: SavWriterOptions,
}

impl<W: Write> SavWriter<W> {
    /// Create a new SAV writer.
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, SavWriterOptions::default())
    }

    /// Create a new SAV writer with options.
    pub fn with_options(writer: W, options: SavWriterOptions) -> Self {
        Self {
            writer: BufWriter::new(writer),
            options,
        }
    }

    /// Write a dataset.
    pub fn write_dataset(mut self, dataset: &SavDataset) -> Result<()> {
        validate_dataset(dataset)?;
        let short_names = assign_short_names(&dataset.variables)?;
        let endian = self.options.endian;
        let slot_count: usize = dataset
            .variables
            .iter()
            .map(|var| var.var_type.slot_count())
            .sum();

        let header = SavHeader {
            product: self.options.product.clone(),
            endian,
            compression: self.options.compression,
            weight_index: 0,
            case_count: Some(dataset.num_rows()),
            bias: 100.0,
            created: None,
            file_label: dataset.header.file_label.clone(),
        };
        let created = self
            .options
            .created
            .unwrap_or_else(|| Local::now().naive_local());
        let nominal = i32::try_from(slot_count)
            .map_err(|_| SavError::invalid_format("too many variables"))?;

        self.writer
            .write_all(&build_header(&header, nominal, created))?;
        self.writer.write_all(&build_dictionary(
            dataset,
            &short_names,
            endian,
            &self.options.encoding,
        ))?;
        self.write_cases(dataset, &header)?;
        self.writer.flush()?;
        Ok(())
    }

    fn write_cases(&mut self, dataset: &SavDataset, header: &SavHeader) -> Result<()> {
        let endian = header.endian;
        match header.compression {
            Compression::None => {
                for row in &dataset.rows {
                    for slot in case_slots(dataset, row) {
                        let bytes = match slot {
                            EncodedSlot::Numeric(value) => endian.f64_to(value.unwrap_or(SYSMIS)),
                            EncodedSlot::Text(bytes) => bytes,
                        };
                        self.writer.write_all(&bytes)?;
                    }
                }
            }
            Compression::Bytecode => {
                let mut encoder = BytecodeEncoder::new(header.bias, endian);
                for row in &dataset.rows {
                    for slot in case_slots(dataset, row) {
                        encoder.push(slot);
                    }
                }
                self.writer.write_all(&encoder.finish())?;
            }
        }
        Ok(())
    }
}

impl SavWriter<File> {
    /// Create a SAV file for writing.
    pub fn create(path: &Path) -> Result<Self> {
        Self::create_with_options(path, SavWriterOptions::default())
    }

    /// Create a SAV file with options.
    pub fn create_with_options(path: &Path, options: SavWriterOptions) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::with_options(file, options))
    }
}

/// Write a dataset to a SAV file.
pub fn write_sav(path: &Path, dataset: &SavDataset) -> Result<()> {
    SavWriter::create(path)?.write_dataset(dataset)
}

/// Write a dataset to a SAV file with options.
pub fn write_sav_with_options(
    path: &Path,
    dataset: &SavDataset,
    options: SavWriterOptions,
) -> Result<()> {
    SavWriter::create_with_options(path, options)?.write_dataset(dataset)
}

/// Check row shapes and value kinds before any bytes are written.
fn validate_dataset(dataset: &SavDataset) -> Result<()> {
    let expected = dataset.variables.len();
    for variable in &dataset.variables {
        if !(-3..=3).contains(&variable.missing.record_code()) {
            return Err(SavError::invalid_format(format!(
                "variable {} declares more than three missing values",
                variable.name
            )));
        }
        if let SavType::String(width) = variable.var_type
            && !(1..=255).contains(&width)
        {
            return Err(SavError::invalid_format(format!(
                "string variable {} has unsupported width {width}",
                variable.name
            )));
        }
    }
    for (row_idx, row) in dataset.rows.iter().enumerate() {
        if row.len() != expected {
            return Err(SavError::RowLengthMismatch {
                row: row_idx,
                expected,
                actual: row.len(),
            });
        }
        for (value, variable) in row.iter().zip(&dataset.variables) {
            let matches = matches!(
                (value, variable.var_type),
                (SavValue::Numeric(_), SavType::Numeric) | (SavValue::String(_), SavType::String(_))
            );
            if !matches {
                return Err(SavError::ValueTypeMismatch {
                    row: row_idx,
                    name: variable.name.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Split one validated row into 8-byte slots.
fn case_slots(dataset: &SavDataset, row: &[SavValue]) -> Vec<EncodedSlot> {
    let mut slots = Vec::new();
    for (value, variable) in row.iter().zip(&dataset.variables) {
        match (value, variable.var_type) {
            (SavValue::Numeric(value), _) => slots.push(EncodedSlot::Numeric(*value)),
            (SavValue::String(text), SavType::String(width)) => {
                let mut bytes = pad_text(text, usize::from(width));
                bytes.resize(variable.var_type.slot_count() * 8, b' ');
                for chunk in bytes.chunks_exact(8) {
                    let mut slot = [b' '; 8];
                    slot.copy_from_slice(chunk);
                    slots.push(EncodedSlot::Text(slot));
                }
            }
            (SavValue::String(_), SavType::Numeric) => {
                slots.push(EncodedSlot::Numeric(None));
            }
        }
    }
    slots
}
