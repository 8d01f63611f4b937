//! Variable (dictionary) definitions.

use super::value::{LabelValue, ValueLabel};

/// Variable storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavType {
    Numeric,
    /// String of the given byte width (1..=255).
    String(u16),
}

impl SavType {
    /// Number of 8-byte slots one value occupies in a case.
    pub fn slot_count(self) -> usize {
        match self {
            Self::Numeric => 1,
            Self::String(width) => usize::from(width).div_ceil(8),
        }
    }

    /// The type code stored in the variable record.
    pub fn type_code(self) -> i32 {
        match self {
            Self::Numeric => 0,
            Self::String(width) => i32::from(width),
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Numeric)
    }
}

impl std::fmt::Display for SavType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::String(width) => write!(f, "string({width})"),
        }
    }
}

/// Print/write format, packed as `type << 16 | width << 8 | decimals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavFormat {
    pub format_type: u8,
    pub width: u8,
    pub decimals: u8,
}

impl SavFormat {
    /// `A` format type code.
    pub const TYPE_A: u8 = 1;
    /// `F` format type code.
    pub const TYPE_F: u8 = 5;

    pub fn from_packed(value: i32) -> Self {
        let value = value as u32;
        Self {
            format_type: ((value >> 16) & 0xff) as u8,
            width: ((value >> 8) & 0xff) as u8,
            decimals: (value & 0xff) as u8,
        }
    }

    pub fn packed(self) -> i32 {
        (i32::from(self.format_type) << 16) | (i32::from(self.width) << 8) | i32::from(self.decimals)
    }

    /// Default format for a variable type: `F8.2` or `A<width>`.
    pub fn default_for(var_type: SavType) -> Self {
        match var_type {
            SavType::Numeric => Self {
                format_type: Self::TYPE_F,
                width: 8,
                decimals: 2,
            },
            SavType::String(width) => Self {
                format_type: Self::TYPE_A,
                width: width.min(255) as u8,
                decimals: 0,
            },
        }
    }
}

/// User-missing value declaration.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MissingValues {
    #[default]
    None,
    /// Up to three discrete numeric values.
    Discrete(Vec<f64>),
    /// Inclusive numeric range.
    Range { low: f64, high: f64 },
    /// Inclusive range plus one discrete value.
    RangeAndValue { low: f64, high: f64, value: f64 },
    /// Up to three discrete string values (8 bytes each).
    Strings(Vec<String>),
}

impl MissingValues {
    /// Whether a numeric value is declared user-missing.
    pub fn contains(&self, value: f64) -> bool {
        match self {
            Self::None | Self::Strings(_) => false,
            Self::Discrete(values) => values.contains(&value),
            Self::Range { low, high } => (*low..=*high).contains(&value),
            Self::RangeAndValue {
                low,
                high,
                value: discrete,
            } => (*low..=*high).contains(&value) || *discrete == value,
        }
    }

    /// The `n_missing_values` code written to the variable record.
    pub fn record_code(&self) -> i32 {
        match self {
            Self::None => 0,
            Self::Discrete(values) => values.len() as i32,
            Self::Strings(values) => values.len() as i32,
            Self::Range { .. } => -2,
            Self::RangeAndValue { .. } => -3,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// A variable as described by the dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct SavVariable {
    /// Full variable name (long name when the file has one).
    pub name: String,
    /// The 8-byte short name stored in the variable record.
    pub short_name: String,
    pub label: Option<String>,
    pub var_type: SavType,
    pub print_format: SavFormat,
    pub write_format: SavFormat,
    pub missing: MissingValues,
    pub value_labels: Vec<ValueLabel>,
}

impl SavVariable {
    fn new(name: impl Into<String>, var_type: SavType) -> Self {
        let name = name.into();
        let format = SavFormat::default_for(var_type);
        Self {
            short_name: name.to_ascii_uppercase(),
            name,
            label: None,
            var_type,
            print_format: format,
            write_format: format,
            missing: MissingValues::None,
            value_labels: Vec::new(),
        }
    }

    /// Create a numeric variable.
    pub fn numeric(name: impl Into<String>) -> Self {
        Self::new(name, SavType::Numeric)
    }

    /// Create a string variable of `width` bytes.
    pub fn string(name: impl Into<String>, width: u16) -> Self {
        Self::new(name, SavType::String(width.clamp(1, 255)))
    }

    /// Set the variable label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add a numeric value label.
    #[must_use]
    pub fn with_value_label(mut self, value: f64, label: impl Into<String>) -> Self {
        self.value_labels.push(ValueLabel::numeric(value, label));
        self
    }

    /// Declare user-missing values.
    #[must_use]
    pub fn with_missing(mut self, missing: MissingValues) -> Self {
        self.missing = missing;
        self
    }

    /// Label attached to a numeric value, if any.
    pub fn value_label(&self, value: f64) -> Option<&str> {
        self.value_labels.iter().find_map(|entry| match entry.value {
            LabelValue::Numeric(candidate) if candidate == value => Some(entry.label.as_str()),
            _ => None,
        })
    }

    pub fn is_numeric(&self) -> bool {
        self.var_type.is_numeric()
    }
}
