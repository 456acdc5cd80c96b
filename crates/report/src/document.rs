use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub align: Align,
}

impl Column {
    pub fn left(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            align: Align::Left,
        }
    }

    pub fn right(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            align: Align::Right,
        }
    }
}

/// A titled table of already-formatted cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub title: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    /// `TOTAL` line printed under a rule.
    pub footer: Option<Vec<String>>,
    /// Whether text layouts print the column names. Boxed tables always do.
    pub show_header: bool,
    /// Width of the `=` and `-` rules in text layouts.
    pub rule_width: usize,
}

impl Table {
    pub fn new(title: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            title: title.into(),
            columns,
            rows: Vec::new(),
            footer: None,
            show_header: false,
            rule_width: 70,
        }
    }

    pub fn with_rows(mut self, rows: Vec<Vec<String>>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_footer(mut self, footer: Vec<String>) -> Self {
        self.footer = Some(footer);
        self
    }

    pub fn with_header(mut self) -> Self {
        self.show_header = true;
        self
    }

    pub fn with_rule_width(mut self, width: usize) -> Self {
        self.rule_width = width;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Text(String),
    Rule(char, usize),
    Blank,
    Table(Table),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportDocument {
    pub blocks: Vec<Block>,
}

impl ReportDocument {
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    pub fn table(&self, title: &str) -> Option<&Table> {
        self.tables().find(|t| t.title == title)
    }
}

pub trait TableRenderer {
    fn text(&mut self, line: &str) -> Result<()>;

    fn rule(&mut self, ch: char, width: usize) -> Result<()> {
        self.text(&ch.to_string().repeat(width))
    }

    fn table(&mut self, table: &Table) -> Result<()>;

    /// Called once after the last block.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Feeds every block of `doc` to `renderer`, then finishes it.
pub fn render_document(doc: &ReportDocument, renderer: &mut dyn TableRenderer) -> Result<()> {
    for block in &doc.blocks {
        match block {
            Block::Text(line) => renderer.text(line)?,
            Block::Rule(ch, width) => renderer.rule(*ch, *width)?,
            Block::Blank => renderer.text("")?,
            Block::Table(table) => renderer.table(table)?,
        }
    }
    renderer.finish()
}
