use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use celiver_features::InputMode;
use celiver_predict::ValidationMetrics;

use crate::types::{FeaturesResult, PredictResult, ValidationReport};

pub fn print_predict_summary(result: &PredictResult) {
    print_paths(&result.input, &result.output, result.mode);
    println!("Model: {}", result.model.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Samples"),
        header_cell("Positive"),
        header_cell("Negative"),
        header_cell("Generated"),
        header_cell("Selected"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(result.rows).add_attribute(Attribute::Bold),
        count_cell(result.positives, Color::Red),
        count_cell(result.rows - result.positives, Color::Green),
        Cell::new(result.generated),
        Cell::new(result.selected),
    ]);
    println!("{table}");
    if let Some(report) = &result.validation {
        print_validation(report);
    }
}

pub fn print_features_summary(result: &FeaturesResult) {
    print_paths(&result.input, &result.output, result.mode);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Samples"),
        header_cell("Generated"),
        header_cell("Columns"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(result.rows).add_attribute(Attribute::Bold),
        Cell::new(result.generated),
        Cell::new(result.columns),
    ]);
    println!("{table}");
}

fn print_paths(input: &Path, output: &Path, mode: InputMode) {
    let mode = match mode {
        InputMode::Raw => "raw",
        InputMode::Preprocessed => "preprocessed",
    };
    println!("Input: {} ({mode})", input.display());
    println!("Output: {}", output.display());
}

fn print_validation(report: &ValidationReport) {
    let matrix = &report.matrix;
    let mut counts = Table::new();
    counts.set_header(vec![
        header_cell(&report.label_column),
        header_cell("Predicted 1"),
        header_cell("Predicted 0"),
    ]);
    apply_table_style(&mut counts);
    align_column(&mut counts, 1, CellAlignment::Right);
    align_column(&mut counts, 2, CellAlignment::Right);
    counts.add_row(vec![
        label_cell("Actual 1"),
        count_cell(matrix.true_positive, Color::Green),
        count_cell(matrix.false_negative, Color::Red),
    ]);
    counts.add_row(vec![
        label_cell("Actual 0"),
        count_cell(matrix.false_positive, Color::Red),
        count_cell(matrix.true_negative, Color::Green),
    ]);
    println!();
    println!("Validation:");
    println!("{counts}");
    println!("{}", metrics_table(&report.metrics));
}

fn metrics_table(metrics: &ValidationMetrics) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (label, value) in [
        ("Accuracy", metrics.accuracy),
        ("Sensitivity", metrics.sensitivity),
        ("Specificity", metrics.specificity),
        ("F1", metrics.f1),
        ("MCC", metrics.mcc),
    ] {
        table.add_row(vec![label_cell(label), Cell::new(format!("{value:.4}"))]);
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

fn label_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        Cell::new(count).fg(Color::DarkGrey)
    }
}
