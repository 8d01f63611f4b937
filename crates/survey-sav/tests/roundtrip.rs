//! Integration tests for SAV read/write roundtrips.

use std::io::Cursor;

use chrono::NaiveDate;
use proptest::prelude::*;
use survey_sav::{
    Compression, Endian, LabelValue, MissingValues, SavDataset, SavError, SavReader,
    SavReaderOptions, SavValue, SavVariable, SavWriter, SavWriterOptions, read_sav, write_sav,
};
use tempfile::tempdir;

fn roundtrip_with(dataset: &SavDataset, options: SavWriterOptions) -> SavDataset {
    let mut buffer = Vec::new();
    SavWriter::with_options(Cursor::new(&mut buffer), options)
        .write_dataset(dataset)
        .unwrap();
    SavReader::new(Cursor::new(&buffer)).read_dataset().unwrap()
}

fn survey_fixture() -> SavDataset {
    let mut dataset = SavDataset::with_variables(vec![
        SavVariable::numeric("COUNTRY")
            .with_label("Country")
            .with_value_label(2.0, "Angola")
            .with_value_label(3.0, "Benin"),
        SavVariable::numeric("Q45pt1")
            .with_label("Most important problem - 1st response")
            .with_value_label(3.0, "Unemployment")
            .with_value_label(9999.0, "Don't know"),
        SavVariable::string("RESPNO", 12),
        SavVariable::string("REGION_NAME", 30),
    ])
    .with_file_label("Round 9 merged");

    dataset.add_row(vec![
        SavValue::numeric(2.0),
        SavValue::numeric(3.0),
        SavValue::string("ANG0001"),
        SavValue::string("Luanda"),
    ]);
    dataset.add_row(vec![
        SavValue::numeric(2.0),
        SavValue::numeric(9999.0),
        SavValue::string("ANG0002"),
        SavValue::string("Cuanza Norte, interior district"),
    ]);
    dataset.add_row(vec![
        SavValue::numeric(3.0),
        SavValue::missing(),
        SavValue::string("BEN0001"),
        SavValue::string(""),
    ]);
    dataset
}

#[test]
fn bytecode_roundtrip_keeps_values_and_labels() {
    let dataset = survey_fixture();
    let read_back = roundtrip_with(&dataset, SavWriterOptions::default());

    assert_eq!(read_back.header.compression, Compression::Bytecode);
    assert_eq!(read_back.header.file_label.as_deref(), Some("Round 9 merged"));
    assert_eq!(read_back.num_variables(), 4);
    assert_eq!(read_back.num_rows(), 3);
    assert_eq!(read_back.encoding.as_deref(), Some("UTF-8"));

    let problem = read_back.variable_by_name("Q45PT1").unwrap();
    assert_eq!(problem.name, "Q45pt1");
    assert_eq!(
        problem.label.as_deref(),
        Some("Most important problem - 1st response")
    );
    assert_eq!(problem.value_label(9999.0), Some("Don't know"));

    assert_eq!(read_back.rows[1][1], SavValue::numeric(9999.0));
    assert_eq!(read_back.rows[2][1], SavValue::missing());
    // 30 bytes wide, so the value is cut to the declared width.
    assert_eq!(
        read_back.rows[1][3],
        SavValue::string("Cuanza Norte, interior distric")
    );
    assert_eq!(read_back.rows[2][3], SavValue::string(""));
}

#[test]
fn uncompressed_big_endian_roundtrip() {
    let dataset = survey_fixture();
    let options = SavWriterOptions::default()
        .with_compression(Compression::None)
        .with_endian(Endian::Big);
    let read_back = roundtrip_with(&dataset, options);

    assert_eq!(read_back.header.endian, Endian::Big);
    assert_eq!(read_back.header.compression, Compression::None);
    assert_eq!(read_back.rows, {
        let mut expected = dataset.rows.clone();
        expected[1][3] = SavValue::string("Cuanza Norte, interior distric");
        expected
    });
}

#[test]
fn creation_stamp_is_written_to_the_header() {
    let created = NaiveDate::from_ymd_opt(2023, 11, 20)
        .unwrap()
        .and_hms_opt(14, 5, 9)
        .unwrap();
    let read_back = roundtrip_with(
        &survey_fixture(),
        SavWriterOptions::default().with_created(created),
    );
    assert_eq!(read_back.header.created, Some(created));
}

#[test]
fn user_missing_values_are_kept_unless_requested() {
    let mut dataset = SavDataset::with_variables(vec![
        SavVariable::numeric("Q45PT2").with_missing(MissingValues::Discrete(vec![-1.0, 9998.0])),
    ]);
    dataset.add_row(vec![SavValue::numeric(-1.0)]);
    dataset.add_row(vec![SavValue::numeric(5.0)]);

    let mut buffer = Vec::new();
    SavWriter::new(Cursor::new(&mut buffer))
        .write_dataset(&dataset)
        .unwrap();

    let plain = SavReader::new(Cursor::new(&buffer)).read_dataset().unwrap();
    assert_eq!(plain.rows[0][0], SavValue::numeric(-1.0));
    assert_eq!(
        plain.variables[0].missing,
        MissingValues::Discrete(vec![-1.0, 9998.0])
    );

    let applied = SavReader::with_options(
        Cursor::new(&buffer),
        SavReaderOptions::new().apply_user_missing(),
    )
    .read_dataset()
    .unwrap();
    assert_eq!(applied.rows[0][0], SavValue::missing());
    assert_eq!(applied.rows[1][0], SavValue::numeric(5.0));
}

#[test]
fn string_value_labels_roundtrip() {
    let mut variable = SavVariable::string("ISO", 3);
    variable.value_labels.push(survey_sav::ValueLabel::string("AGO", "Angola"));
    let mut dataset = SavDataset::with_variables(vec![variable]);
    dataset.add_row(vec![SavValue::string("AGO")]);

    let read_back = roundtrip_with(&dataset, SavWriterOptions::default());
    let labels = &read_back.variables[0].value_labels;
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].value, LabelValue::String("AGO".to_string()));
    assert_eq!(labels[0].label, "Angola");
}

#[test]
fn unicode_labels_survive() {
    let mut dataset = SavDataset::with_variables(vec![
        SavVariable::numeric("COUNTRY")
            .with_value_label(9.0, "Côte d'Ivoire")
            .with_value_label(29.0, "São Tomé and Príncipe"),
    ]);
    dataset.add_row(vec![SavValue::numeric(29.0)]);
    let read_back = roundtrip_with(&dataset, SavWriterOptions::default());
    let country = &read_back.variables[0];
    assert_eq!(country.value_label(9.0), Some("Côte d'Ivoire"));
    assert_eq!(country.value_label(29.0), Some("São Tomé and Príncipe"));
}

#[test]
fn empty_dataset_roundtrip() {
    let dataset = SavDataset::with_variables(vec![SavVariable::numeric("Q1")]);
    let read_back = roundtrip_with(&dataset, SavWriterOptions::default());
    assert_eq!(read_back.num_variables(), 1);
    assert_eq!(read_back.num_rows(), 0);
}

#[test]
fn file_roundtrip_and_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("r9.sav");
    write_sav(&path, &survey_fixture()).unwrap();
    let read_back = read_sav(&path).unwrap();
    assert_eq!(read_back.num_rows(), 3);

    let missing = dir.path().join("absent.sav");
    assert!(matches!(
        read_sav(&missing),
        Err(SavError::FileNotFound { .. })
    ));
}

#[test]
fn truncated_data_is_reported() {
    let mut buffer = Vec::new();
    SavWriter::with_options(
        Cursor::new(&mut buffer),
        SavWriterOptions::default().with_compression(Compression::None),
    )
    .write_dataset(&survey_fixture())
    .unwrap();
    buffer.truncate(buffer.len() - 4);
    let err = SavReader::new(Cursor::new(&buffer))
        .read_dataset()
        .unwrap_err();
    assert!(matches!(
        err,
        SavError::TrailingBytes | SavError::UnexpectedEof { .. }
    ));
}

fn fixture_bytes() -> Vec<u8> {
    let mut buffer = Vec::new();
    SavWriter::new(Cursor::new(&mut buffer))
        .write_dataset(&survey_fixture())
        .unwrap();
    buffer
}

fn patch_i32(buffer: &mut [u8], offset: usize, value: i32) {
    buffer[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn read_i32_at(buffer: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes(buffer[offset..offset + 4].try_into().unwrap())
}

/// Offset of the label count of the COUNTRY value-label record.
fn country_label_count_offset(buffer: &[u8]) -> usize {
    let angola = buffer
        .windows(6)
        .position(|window| window == b"Angola")
        .unwrap();
    // count (4) | value (8) | length (1) | "Angola"
    let offset = angola - 13;
    assert_eq!(read_i32_at(buffer, offset), 2);
    offset
}

#[test]
fn oversized_case_count_reads_available_cases() {
    let mut buffer = fixture_bytes();
    assert_eq!(read_i32_at(&buffer, 80), 3);
    patch_i32(&mut buffer, 80, i32::MAX);

    let dataset = SavReader::new(Cursor::new(&buffer)).read_dataset().unwrap();
    assert_eq!(dataset.num_rows(), 3);
}

#[test]
fn oversized_value_label_count_is_an_error() {
    let mut buffer = fixture_bytes();
    let offset = country_label_count_offset(&buffer);
    patch_i32(&mut buffer, offset, i32::MAX);

    assert!(SavReader::new(Cursor::new(&buffer)).read_dataset().is_err());
}

#[test]
fn negative_value_label_index_is_rejected() {
    let mut buffer = fixture_bytes();
    // two 16-byte entries, then record type 4 and the variable count
    let index_offset = country_label_count_offset(&buffer) + 4 + 32 + 8;
    assert_eq!(read_i32_at(&buffer, index_offset), 1);
    patch_i32(&mut buffer, index_offset, i32::MIN);

    let err = SavReader::new(Cursor::new(&buffer))
        .read_dataset()
        .unwrap_err();
    assert!(matches!(
        err,
        SavError::InvalidVariableIndex { index: i32::MIN }
    ));
}

proptest! {
    #[test]
    fn numeric_columns_roundtrip(values in prop::collection::vec(
        prop::option::of(prop_oneof![
            (-100i32..=151).prop_map(f64::from),
            -1.0e12f64..1.0e12,
        ]),
        0..64,
    )) {
        let mut dataset = SavDataset::with_variables(vec![SavVariable::numeric("X")]);
        for value in &values {
            dataset.add_row(vec![SavValue::Numeric(*value)]);
        }
        let read_back = roundtrip_with(&dataset, SavWriterOptions::default());
        let got: Vec<Option<f64>> = read_back.rows.iter().map(|row| row[0].as_f64()).collect();
        prop_assert_eq!(got, values);
    }
}
