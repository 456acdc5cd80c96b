use std::io::Write;

use crate::document::{Align, Table, TableRenderer};
use crate::Result;

/// Minimum width of the first (label) column.
pub const LABEL_WIDTH: usize = 20;

/// Fixed-width text tables with `=` and `-` rules.
pub struct PlainRenderer<W: Write> {
    out: W,
}

impl<W: Write> PlainRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Lays a table out as text lines without writing them anywhere.
pub fn layout_table(table: &Table) -> Vec<String> {
    let widths = column_widths(table);
    let mut lines = Vec::new();

    if !table.title.is_empty() {
        lines.push(String::new());
        lines.push(table.title.clone());
    }
    if table.rule_width > 0 {
        lines.push("=".repeat(table.rule_width));
    }
    if table.show_header {
        let names: Vec<String> = table.columns.iter().map(|c| c.name.clone()).collect();
        lines.push(layout_row(table, &widths, &names));
    }
    if table.rows.is_empty() {
        lines.push("(none)".to_string());
    }
    for row in &table.rows {
        lines.push(layout_row(table, &widths, row));
    }
    if let Some(footer) = &table.footer {
        lines.push("-".repeat(table.rule_width.max(1)));
        lines.push(layout_row(table, &widths, footer));
    }
    lines
}

fn column_widths(table: &Table) -> Vec<usize> {
    let mut widths: Vec<usize> = table
        .columns
        .iter()
        .map(|c| if table.show_header { c.name.chars().count() } else { 0 })
        .collect();
    let cells = table.rows.iter().chain(table.footer.iter());
    for row in cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    if let Some(first) = widths.first_mut() {
        *first = (*first).max(LABEL_WIDTH);
    }
    widths
}

fn layout_row(table: &Table, widths: &[usize], cells: &[String]) -> String {
    let parts: Vec<String> = table
        .columns
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (col, width))| {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            match col.align {
                Align::Left => format!("{:<width$}", cell, width = width),
                Align::Right => format!("{:>width$}", cell, width = width),
            }
        })
        .collect();
    parts.join("  ").trim_end().to_string()
}

impl<W: Write> TableRenderer for PlainRenderer<W> {
    fn text(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{}", line)?;
        Ok(())
    }

    fn table(&mut self, table: &Table) -> Result<()> {
        for line in layout_table(table) {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
