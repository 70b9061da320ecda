use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use emr_model::{CheckResult, ValidationStatus};
use emr_validate::DataValidator;

use crate::types::RunReport;

pub fn print_summary(report: &RunReport) {
    let validator = &report.validator;
    let metadata = validator.metadata();
    println!("Validation: {}", metadata.name);
    println!("File: {}", report.input.display());
    if let Some(system) = &report.system {
        println!("Source system: {system}");
    }
    if let (Some(rows), Some(columns)) = (metadata.total_rows, metadata.total_columns) {
        println!("Dataset: {rows} rows, {columns} columns");
    }
    for path in &report.outputs {
        println!("Wrote: {}", path.display());
    }

    let summary = validator.summary();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Status"),
        header_cell("Checks"),
        header_cell("Passed"),
        header_cell("Failed"),
        header_cell("Warnings"),
        header_cell("Success rate"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        status_cell(validator.status()),
        Cell::new(summary.total),
        Cell::new(summary.passed).fg(Color::Green),
        count_cell(summary.failed, Color::Red),
        count_cell(summary.warnings, Color::Yellow),
        Cell::new(format!("{:.2}%", summary.success_rate)).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_failure_table(validator);
}

fn print_failure_table(validator: &DataValidator) {
    let mut failed = validator.get_failed_validations();
    if failed.is_empty() {
        return;
    }
    // critical failures first, declaration order otherwise
    failed.sort_by_key(|result| !result.critical);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Check"),
        header_cell("Column"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table, failure_constraints());
    align_column(&mut table, 0, CellAlignment::Center);
    for result in failed {
        table.add_row(vec![
            severity_cell(result),
            Cell::new(result.name()),
            result
                .column
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(&result.message),
        ]);
    }
    println!();
    println!("Failed checks:");
    println!("{table}");
}

/// Severity, Check, Column, Message.
fn failure_constraints() -> Vec<ColumnConstraint> {
    vec![
        ColumnConstraint::UpperBoundary(Width::Fixed(9)),
        ColumnConstraint::UpperBoundary(Width::Percentage(30)),
        ColumnConstraint::UpperBoundary(Width::Percentage(20)),
        ColumnConstraint::UpperBoundary(Width::Percentage(55)),
    ]
}

pub fn apply_table_style(table: &mut Table, constraints: Vec<ColumnConstraint>) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if !constraints.is_empty() {
        table.set_constraints(constraints);
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(status: ValidationStatus) -> Cell {
    let color = match status {
        ValidationStatus::Passed => Color::Green,
        ValidationStatus::Warning => Color::Yellow,
        ValidationStatus::Failed => Color::Red,
    };
    Cell::new(status.label()).fg(color).add_attribute(Attribute::Bold)
}

fn severity_cell(result: &CheckResult) -> Cell {
    if result.critical {
        Cell::new("FAIL").fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        Cell::new("WARN").fg(Color::Yellow)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
