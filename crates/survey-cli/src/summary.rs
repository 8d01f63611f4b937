use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use survey_model::{Codebook, ColorMap};
use survey_sav::{Endian, SavMetadata, SavVariable};

use crate::types::{ChartStatus, RunResult, VariableSummary};

pub fn print_summary(result: &RunResult) {
    println!("Input: {}", result.input.display());
    println!("Output: {}", result.output_root.display());
    println!(
        "Rows: {}  Partitions: {}",
        result.rows,
        result.partitions.len()
    );
    if result.dry_run {
        println!("Dry run: no charts were written");
    }
    println!("{}", summary_table(result));
    let failures: Vec<_> = result.failures().collect();
    if !failures.is_empty() {
        eprintln!("Failed charts:");
        for chart in failures {
            if let ChartStatus::Failed { message } = &chart.status {
                match &chart.partition {
                    Some(partition) => {
                        eprintln!("- {} in {partition} ({}): {message}", chart.variable, chart.layout);
                    }
                    None => eprintln!("- {} ({}): {message}", chart.variable, chart.layout),
                }
            }
        }
    }
}

pub fn summary_table(result: &RunResult) -> Table {
    let mut table = Table::new();
    let written = if result.dry_run { "Planned" } else { "Written" };
    table.set_header(vec![
        header_cell("Variable"),
        header_cell("Title"),
        header_cell(written),
        header_cell("Skipped"),
        header_cell("Failed"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    let mut totals = VariableSummary::default();
    for summary in &result.variables {
        totals.written += summary.written;
        totals.skipped += summary.skipped;
        totals.failed += summary.failed;
        table.add_row(vec![
            Cell::new(&summary.variable)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&summary.title),
            count_cell(summary.written, Color::Green),
            count_cell(summary.skipped, Color::Yellow),
            count_cell(summary.failed, Color::Red),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("All variables")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        count_cell(totals.written, Color::Green).add_attribute(Attribute::Bold),
        count_cell(totals.skipped, Color::Yellow).add_attribute(Attribute::Bold),
        count_cell(totals.failed, Color::Red).add_attribute(Attribute::Bold),
    ]);
    table
}

/// Plain-text rows of the summary table, totals last.
pub fn summary_rows(result: &RunResult) -> Vec<Vec<String>> {
    let mut rows: Vec<Vec<String>> = result
        .variables
        .iter()
        .map(|summary| {
            vec![
                summary.variable.clone(),
                summary.written.to_string(),
                summary.skipped.to_string(),
                summary.failed.to_string(),
            ]
        })
        .collect();
    let total = |pick: fn(&VariableSummary) -> usize| {
        result.variables.iter().map(pick).sum::<usize>().to_string()
    };
    rows.push(vec![
        "TOTAL".to_string(),
        total(|s| s.written),
        total(|s| s.skipped),
        total(|s| s.failed),
    ]);
    rows
}

/// Codebook entries in code order; `colors` adds a chart color column.
pub fn codebook_table(codebook: &Codebook, colors: Option<&ColorMap>) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("Code"), header_cell("Label")];
    if colors.is_some() {
        header.push(header_cell("Color"));
    }
    table.set_header(header);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (code, label) in codebook.entries() {
        let mut row = vec![Cell::new(code), Cell::new(label)];
        if let Some(colors) = colors {
            row.push(color_cell(colors, label));
        }
        table.add_row(row);
    }
    table
}

/// File-level facts of an inspected `.sav` file.
pub fn header_table(metadata: &SavMetadata, rows: usize) -> Table {
    let header = &metadata.header;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    let created = header
        .created
        .map_or_else(|| "-".to_string(), |stamp| stamp.format("%Y-%m-%d %H:%M:%S").to_string());
    let byte_order = match header.endian {
        Endian::Little => "little-endian",
        Endian::Big => "big-endian",
    };
    let entries = [
        ("Product", header.product.clone()),
        ("Created", created),
        ("Cases", rows.to_string()),
        ("Compression", header.compression.to_string()),
        ("Byte order", byte_order.to_string()),
        (
            "Encoding",
            metadata.encoding.clone().unwrap_or_else(|| "-".to_string()),
        ),
        (
            "File label",
            header.file_label.clone().unwrap_or_else(|| "-".to_string()),
        ),
        ("Variables", metadata.variables.len().to_string()),
    ];
    for (field, value) in entries {
        table.add_row(vec![Cell::new(field).add_attribute(Attribute::Bold), Cell::new(value)]);
    }
    table
}

/// One row per dictionary variable.
pub fn variables_table(variables: &[SavVariable]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Label"),
        header_cell("Type"),
        header_cell("Value labels"),
        header_cell("Missing"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for variable in variables {
        table.add_row(vec![
            Cell::new(&variable.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            variable
                .label
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(variable.var_type),
            count_cell(variable.value_labels.len(), Color::Reset),
            if variable.missing.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(variable.missing.record_code())
            },
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn color_cell(colors: &ColorMap, label: &str) -> Cell {
    match colors.get(label) {
        Some(color) => Cell::new(color.to_hex()).fg(Color::Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        }),
        None => dim_cell(format!("{} (fallback)", colors.fallback().to_hex())),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
