//! Cell values and value labels.

/// The system-missing value (`-DBL_MAX`).
pub const SYSMIS: f64 = -f64::MAX;

/// A single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum SavValue {
    /// Numeric value; `None` is system-missing (or user-missing when applied).
    Numeric(Option<f64>),
    /// String value, trailing padding removed unless disabled.
    String(String),
}

impl SavValue {
    pub fn numeric(value: f64) -> Self {
        Self::Numeric(Some(value))
    }

    pub fn missing() -> Self {
        Self::Numeric(None)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Numeric(value) => *value,
            Self::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            Self::Numeric(_) => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Numeric(None))
    }
}

/// The value side of a value label.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelValue {
    Numeric(f64),
    String(String),
}

/// One entry of a variable's value-label set.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueLabel {
    pub value: LabelValue,
    pub label: String,
}

impl ValueLabel {
    pub fn numeric(value: f64, label: impl Into<String>) -> Self {
        Self {
            value: LabelValue::Numeric(value),
            label: label.into(),
        }
    }

    pub fn string(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: LabelValue::String(value.into()),
            label: label.into(),
        }
    }
}
