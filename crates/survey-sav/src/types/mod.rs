//! Core types for SAV datasets.

mod options;
mod value;
mod variable;

pub use options::{SavReaderOptions, SavWriterOptions};
pub use value::{LabelValue, SYSMIS, SavValue, ValueLabel};
pub use variable::{MissingValues, SavFormat, SavType, SavVariable};

use chrono::NaiveDateTime;

/// Byte order of the numeric fields in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    #[default]
    Little,
    Big,
}

impl Endian {
    pub fn i32_from(self, bytes: [u8; 4]) -> i32 {
        match self {
            Self::Little => i32::from_le_bytes(bytes),
            Self::Big => i32::from_be_bytes(bytes),
        }
    }

    pub fn f64_from(self, bytes: [u8; 8]) -> f64 {
        match self {
            Self::Little => f64::from_le_bytes(bytes),
            Self::Big => f64::from_be_bytes(bytes),
        }
    }

    pub fn i32_to(self, value: i32) -> [u8; 4] {
        match self {
            Self::Little => value.to_le_bytes(),
            Self::Big => value.to_be_bytes(),
        }
    }

    pub fn f64_to(self, value: f64) -> [u8; 8] {
        match self {
            Self::Little => value.to_le_bytes(),
            Self::Big => value.to_be_bytes(),
        }
    }
}

/// Case data compression scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Raw 8-byte slots.
    None,
    /// SPSS bytecode compression (the format default).
    #[default]
    Bytecode,
}

impl Compression {
    pub fn code(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Bytecode => 1,
        }
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Bytecode => write!(f, "bytecode"),
        }
    }
}

/// File header fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SavHeader {
    /// Product identification string (`@(#) SPSS DATA FILE ...`).
    pub product: String,
    pub endian: Endian,
    pub compression: Compression,
    /// 1-based dictionary index of the weight variable, 0 when unweighted.
    pub weight_index: i32,
    /// Declared case count; `None` when the writer left it as -1.
    pub case_count: Option<usize>,
    /// Compression bias, 100 in practice.
    pub bias: f64,
    pub created: Option<NaiveDateTime>,
    pub file_label: Option<String>,
}

impl Default for SavHeader {
    fn default() -> Self {
        Self {
            product: String::new(),
            endian: Endian::Little,
            compression: Compression::Bytecode,
            weight_index: 0,
            case_count: None,
            bias: 100.0,
            created: None,
            file_label: None,
        }
    }
}

/// A SAV dataset: dictionary plus case data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SavDataset {
    pub header: SavHeader,
    pub variables: Vec<SavVariable>,
    /// Lines of the document record, if any.
    pub documents: Vec<String>,
    /// Character encoding declared by the file (extension subtype 20).
    pub encoding: Option<String>,
    pub rows: Vec<Vec<SavValue>>,
}

impl SavDataset {
    /// Create an empty dataset with the given variables.
    pub fn with_variables(variables: Vec<SavVariable>) -> Self {
        Self {
            variables,
            ..Self::default()
        }
    }

    /// Set the file label.
    #[must_use]
    pub fn with_file_label(mut self, label: impl Into<String>) -> Self {
        self.header.file_label = Some(label.into());
        self
    }

    pub fn add_row(&mut self, row: Vec<SavValue>) {
        self.rows.push(row);
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn variable_by_name(&self, name: &str) -> Option<&SavVariable> {
        self.variables
            .iter()
            .find(|var| var.name.eq_ignore_ascii_case(name))
    }

    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.variables
            .iter()
            .position(|var| var.name.eq_ignore_ascii_case(name))
    }

    /// Values of one column in row order.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = Option<&SavValue>> {
        self.rows.iter().map(move |row| row.get(index))
    }
}
