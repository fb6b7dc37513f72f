//! The `dsg types` listing.

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};
use dsg_standards::TypeRegistry;
use serde::Serialize;

use crate::style::{align_column, apply_table_style, dim_cell, header_cell, optional_cell};

/// One listed data type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeRow {
    pub name: String,
    pub kind: String,
    pub display_name: String,
    pub units: Vec<String>,
    pub category: Option<String>,
    pub critical: bool,
}

pub fn type_rows(registry: &TypeRegistry) -> Vec<TypeRow> {
    registry
        .iter()
        .map(|data_type| TypeRow {
            name: data_type.var_name().to_string(),
            kind: data_type.kind().to_string(),
            display_name: data_type.display_name().to_string(),
            units: data_type
                .units()
                .iter()
                .filter(|unit| !unit.is_empty())
                .cloned()
                .collect(),
            category: data_type.category().map(str::to_string),
            critical: data_type.is_critical(),
        })
        .collect()
}

pub fn types_table(rows: &[TypeRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Kind"),
        header_cell("Display name"),
        header_cell("Units"),
        header_cell("Category"),
        header_cell("Critical"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 5, CellAlignment::Center);
    for row in rows {
        let units = if row.units.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(row.units.join(", "))
        };
        let critical = if row.critical {
            Cell::new("yes").fg(Color::Red).add_attribute(Attribute::Bold)
        } else {
            dim_cell("-")
        };
        table.add_row(vec![
            Cell::new(&row.name).add_attribute(Attribute::Bold),
            Cell::new(&row.kind),
            Cell::new(&row.display_name),
            units,
            optional_cell(row.category.as_deref()),
            critical,
        ]);
    }
    table
}
