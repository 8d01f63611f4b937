//! SPSS system file (`.sav`) reader and writer.
//!
//! Survey microdata is commonly distributed as SPSS system files. This crate
//! reads and writes the `$FL2` flavour of the format, uncompressed or with
//! bytecode compression, in either byte order.
//!
//! # Features
//!
//! - Numeric and string variables, including strings wider than 8 bytes
//! - Variable labels, value labels and user-missing declarations
//! - Long variable names (extension subtype 13) and declared encoding
//! - Optional Polars DataFrame integration (with `polars` feature)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use survey_sav::{SavDataset, SavValue, SavVariable, read_sav, write_sav};
//!
//! let mut ds = SavDataset::with_variables(vec![
//!     SavVariable::numeric("COUNTRY").with_value_label(2.0, "Angola"),
//!     SavVariable::numeric("Q45PT1").with_label("Most important problem"),
//! ]);
//! ds.add_row(vec![SavValue::numeric(2.0), SavValue::numeric(3.0)]);
//! write_sav(Path::new("r9.sav"), &ds).unwrap();
//!
//! let dataset = read_sav(Path::new("r9.sav")).unwrap();
//! println!("{} cases", dataset.num_rows());
//! ```
//!
//! # Missing Values
//!
//! System-missing numeric cells read as `SavValue::Numeric(None)`. Declared
//! user-missing codes stay visible unless
//! [`SavReaderOptions::apply_user_missing`] is set.

mod bytecode;
mod cursor;
mod dictionary;
mod error;
pub mod header;
mod reader;
mod types;
mod writer;

#[cfg(feature = "polars")]
mod polars_ext;

pub use error::{Result, SavError};

pub use types::{
    Compression, Endian, LabelValue, MissingValues, SYSMIS, SavDataset, SavFormat, SavHeader,
    SavReaderOptions, SavType, SavValue, SavVariable, SavWriterOptions, ValueLabel,
};

pub use reader::{SavReader, read_sav, read_sav_with_options};

pub use writer::{SavWriter, write_sav, write_sav_with_options};

#[cfg(feature = "polars")]
pub use polars_ext::{SavMetadata, dataset_to_dataframe, read_sav_to_dataframe, read_sav_with_metadata};
