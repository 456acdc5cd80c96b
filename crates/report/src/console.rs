use std::io::Write;

use colored::Colorize;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Modify, Style},
};

use crate::document::{Align, Table, TableRenderer};
use crate::Result;

/// Boxed console tables with optionally colored titles.
pub struct ConsoleRenderer<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn title(&self, title: &str) -> String {
        if self.color {
            title.bold().cyan().to_string()
        } else {
            title.to_string()
        }
    }
}

/// Builds the boxed text for one table, header first and footer last.
pub fn boxed_table(table: &Table) -> String {
    let mut builder = Builder::default();
    builder.push_record(table.columns.iter().map(|c| c.name.clone()));
    for row in &table.rows {
        builder.push_record(row.iter().cloned());
    }
    if let Some(footer) = &table.footer {
        builder.push_record(footer.iter().cloned());
    }

    let mut boxed = builder.build();
    boxed.with(Style::rounded());
    for (i, col) in table.columns.iter().enumerate() {
        let alignment = match col.align {
            Align::Left => Alignment::left(),
            Align::Right => Alignment::right(),
        };
        boxed.with(Modify::new(Columns::single(i)).with(alignment));
    }
    boxed.to_string()
}

impl<W: Write> TableRenderer for ConsoleRenderer<W> {
    fn text(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{}", line)?;
        Ok(())
    }

    fn rule(&mut self, ch: char, width: usize) -> Result<()> {
        // Boxed tables carry their own borders; only the section rule under
        // the scope line is kept, and shortened.
        if ch == '=' {
            writeln!(self.out, "{}", ch.to_string().repeat(width.min(70)))?;
        }
        Ok(())
    }

    fn table(&mut self, table: &Table) -> Result<()> {
        if !table.title.is_empty() {
            writeln!(self.out)?;
            writeln!(self.out, "{}", self.title(&table.title))?;
        }
        if table.rows.is_empty() && table.footer.is_none() {
            writeln!(self.out, "No results.")?;
            return Ok(());
        }
        writeln!(self.out, "{}", boxed_table(table))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
