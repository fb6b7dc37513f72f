use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};
use dsg_model::{DataLocation, Diagnostic, Severity};
use dsg_validate::CheckStatus;

use dsg_cli::style::{
    align_column, apply_summary_table_style, apply_table_style, count_cell, dim_cell, header_cell,
    optional_cell,
};

use crate::types::{CrossoverResult, FlagResult, InspectResult, StandardizeResult};

/// Most diagnostics shown in the terminal; the JSON file has all of them.
const MAX_DIAGNOSTIC_ROWS: usize = 50;

pub fn print_standardize_summary(result: &StandardizeResult) {
    println!("Dataset: {}", display_or_dash(&result.dataset_id));
    println!("Samples: {}", result.samples);
    match &result.output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (dry run)"),
    }

    let mut columns = Table::new();
    columns.set_header(vec![
        header_cell("Column"),
        header_cell("Data type"),
        header_cell("Unit"),
    ]);
    apply_table_style(&mut columns);
    for column in &result.columns {
        let data_type = if column.ignored {
            dim_cell(&column.data_type)
        } else {
            Cell::new(&column.data_type).fg(Color::Blue)
        };
        columns.add_row(vec![
            Cell::new(&column.header),
            data_type,
            optional_cell(Some(&column.unit)),
        ]);
    }
    println!("{columns}");

    let mut totals = Table::new();
    totals.set_header(vec![
        header_cell("Critical"),
        header_cell("Errors"),
        header_cell("Warnings"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut totals);
    for index in 0..3 {
        align_column(&mut totals, index, CellAlignment::Right);
    }
    totals.add_row(vec![
        count_cell(result.counts.critical, Color::Red),
        count_cell(result.counts.error, Color::Red),
        count_cell(result.counts.warning, Color::Yellow),
        status_cell(result.status),
    ]);
    println!("{totals}");
    print_diagnostics(&result.diagnostics);
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    let mut ordered: Vec<&Diagnostic> = diagnostics.iter().collect();
    ordered.sort_by(|a, b| b.severity.cmp(&a.severity).then(a.row.cmp(&b.row)));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Row"),
        header_cell("Column"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 1, CellAlignment::Right);
    for diagnostic in ordered.iter().take(MAX_DIAGNOSTIC_ROWS) {
        table.add_row(vec![
            severity_cell(diagnostic.severity),
            diagnostic.row.map_or_else(|| dim_cell("-"), Cell::new),
            optional_cell(diagnostic.column_name.as_deref()),
            Cell::new(&diagnostic.general),
        ]);
    }
    println!();
    println!("Diagnostics:");
    println!("{table}");
    if ordered.len() > MAX_DIAGNOSTIC_ROWS {
        println!(
            "... and {} more; use --diagnostics to write them all",
            ordered.len() - MAX_DIAGNOSTIC_ROWS
        );
    }
}

pub fn print_inspect_summary(result: &InspectResult) {
    println!("File: {}", result.path.display());
    println!("Samples: {}", result.samples);
    let dimensions: Vec<String> = result
        .dimensions
        .iter()
        .map(|(name, len)| format!("{name} = {len}"))
        .collect();
    println!("Dimensions: {}", dimensions.join(", "));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Variable"),
        header_cell("Name"),
        header_cell("Value"),
    ]);
    apply_table_style(&mut table);
    for (variable, display_name, value) in &result.metadata {
        table.add_row(vec![
            Cell::new(variable).add_attribute(Attribute::Bold),
            Cell::new(display_name),
            optional_cell(Some(value)),
        ]);
    }
    println!("{table}");
    if !result.not_found.is_empty() {
        println!("Variables not in the file: {}", result.not_found.join(", "));
    }
}

pub fn print_crossover_summary(result: &CrossoverResult) {
    println!(
        "{}: {} datasets checked, {} crossovers",
        result.dataset_id,
        result.checked,
        result.crossovers.len()
    );
    if result.crossovers.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Row"),
        header_cell("Other dataset"),
        header_cell("Other row"),
        header_cell("Distance (km)"),
        header_cell("Longitudes"),
        header_cell("Latitudes"),
    ]);
    apply_summary_table_style(&mut table);
    for index in [1, 3, 4] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for crossover in &result.crossovers {
        table.add_row(vec![
            Cell::new(&crossover.dataset_ids[0]).fg(Color::Blue),
            Cell::new(crossover.row_numbers[0]),
            Cell::new(&crossover.dataset_ids[1]).fg(Color::Blue),
            Cell::new(crossover.row_numbers[1]),
            Cell::new(format!("{:.2}", crossover.min_distance)).add_attribute(Attribute::Bold),
            Cell::new(format!(
                "{:.3} / {:.3}",
                crossover.longitudes[0], crossover.longitudes[1]
            )),
            Cell::new(format!(
                "{:.3} / {:.3}",
                crossover.latitudes[0], crossover.latitudes[1]
            )),
        ]);
    }
    println!("{table}");
}

pub fn print_flag_summary(result: &FlagResult) {
    println!(
        "{} set to '{}' at {} of {} locations",
        result.flag_name,
        result.flag,
        result.requested - result.unmatched.len(),
        result.requested
    );
    if result.unmatched.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Longitude"),
        header_cell("Latitude"),
        header_cell("Time"),
        header_cell("Value"),
    ]);
    apply_table_style(&mut table);
    for location in &result.unmatched {
        table.add_row(location_cells(location));
    }
    println!("Unmatched locations:");
    println!("{table}");
}

fn location_cells(location: &DataLocation) -> Vec<Cell> {
    vec![
        Cell::new(format!("{:.4}", location.longitude)),
        Cell::new(format!("{:.4}", location.latitude)),
        Cell::new(format!("{:.0}", location.time)),
        location
            .data_value
            .map_or_else(|| dim_cell("-"), Cell::new),
    ]
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Critical => Cell::new("CRITICAL")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Error => Cell::new("ERROR").fg(Color::Red),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn status_cell(status: CheckStatus) -> Cell {
    let color = match status {
        CheckStatus::Acceptable => Color::Green,
        CheckStatus::Warnings(_) => Color::Yellow,
        CheckStatus::Errors(_) | CheckStatus::Unacceptable => Color::Red,
    };
    Cell::new(status).fg(color).add_attribute(Attribute::Bold)
}

fn display_or_dash(text: &str) -> &str {
    if text.is_empty() { "-" } else { text }
}
