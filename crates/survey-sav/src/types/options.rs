//! Reader and writer options.

use chrono::NaiveDateTime;

use super::{Compression, Endian};

/// Options for reading SAV files.
#[derive(Debug, Clone)]
pub struct SavReaderOptions {
    /// Trim trailing spaces from string values (default: true).
    pub trim_strings: bool,
    /// Turn declared user-missing numeric values into missing cells
    /// (default: false, codes stay visible for recoding).
    pub apply_user_missing: bool,
}

impl Default for SavReaderOptions {
    fn default() -> Self {
        Self {
            trim_strings: true,
            apply_user_missing: false,
        }
    }
}

impl SavReaderOptions {
    /// Create reader options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert user-missing values to missing cells.
    #[must_use]
    pub fn apply_user_missing(mut self) -> Self {
        self.apply_user_missing = true;
        self
    }
}

/// Options for writing SAV files.
#[derive(Debug, Clone)]
pub struct SavWriterOptions {
    pub compression: Compression,
    pub endian: Endian,
    /// Product string written to the header.
    pub product: String,
    /// Creation timestamp; current local time when `None`.
    pub created: Option<NaiveDateTime>,
    /// Encoding name recorded in extension subtype 20.
    pub encoding: String,
}

impl Default for SavWriterOptions {
    fn default() -> Self {
        Self {
            compression: Compression::Bytecode,
            endian: Endian::Little,
            product: format!(
                "@(#) SPSS DATA FILE survey-sav {}",
                env!("CARGO_PKG_VERSION")
            ),
            created: None,
            encoding: "UTF-8".to_string(),
        }
    }
}

impl SavWriterOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    #[must_use]
    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    #[must_use]
    pub fn with_created(mut self, created: NaiveDateTime) -> Self {
        self.created = Some(created);
        self
    }
}
