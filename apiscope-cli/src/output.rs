use comfy_table::{presets, CellAlignment, ContentArrangement, Table};
use serde::Serialize;

use crate::app::GlobalOptions;

/// Print `data` as JSON (if `--json`) or call `display_fn` for human-readable output.
pub fn print_output<T: Serialize>(
    data: &T,
    opts: &GlobalOptions,
    display_fn: impl FnOnce(&T),
) -> anyhow::Result<()> {
    if opts.json {
        let json = serde_json::to_string_pretty(data)?;
        println!("{json}");
    } else {
        display_fn(data);
    }
    Ok(())
}

/// Column alignment for tabular output.
#[derive(Clone, Copy)]
pub enum Align {
    Left,
    Right,
}

/// Whitespace-aligned table for terminal output, backed by `comfy-table`.
pub struct TabWriter {
    table: Table,
}

impl TabWriter {
    /// Create a table with `(header, alignment)` columns.
    pub fn new(columns: &[(&str, Align)]) -> Self {
        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(columns.iter().map(|(name, _)| *name));

        // Two spaces between columns, none at the edges.
        let last = columns.len().saturating_sub(1);
        for (i, (_, align)) in columns.iter().enumerate() {
            if let Some(col) = table.column_mut(i) {
                col.set_cell_alignment(match align {
                    Align::Left => CellAlignment::Left,
                    Align::Right => CellAlignment::Right,
                });
                col.set_padding((u16::from(i != 0), u16::from(i != last)));
            }
        }

        Self { table }
    }

    /// Add a row. Values are given in column order.
    pub fn row(&mut self, values: Vec<String>) {
        self.table.add_row(values);
    }

    /// Print the table to stdout.
    pub fn print(&self) {
        for line in self.table.to_string().lines() {
            println!("{}", line.trim_end());
        }
    }
}

/// Render a completeness percentage.
pub fn percent(value: u32) -> String {
    format!("{value}%")
}
