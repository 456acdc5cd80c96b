//! Minimal PDF 1.4 output.
//!
//! The report is laid out with [`PlainRenderer`] and the resulting text lines
//! are set in Courier on landscape Letter pages. Only the objects needed by a
//! viewer are written: catalog, page tree, one font, the pages with their
//! content streams, and an info dictionary.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::document::{Table, TableRenderer};
use crate::plain::PlainRenderer;
use crate::{ReportError, Result};

const PAGE_WIDTH: f32 = 792.0;
const PAGE_HEIGHT: f32 = 612.0;
const MARGIN: f32 = 36.0;
const FONT_SIZE: f32 = 7.0;
const LEADING: f32 = 8.5;

pub fn lines_per_page() -> usize {
    ((PAGE_HEIGHT - 2.0 * MARGIN) / LEADING).floor() as usize
}

/// Collects the report as text and writes it to a PDF file on `finish`.
pub struct PdfRenderer {
    path: PathBuf,
    title: String,
    text: PlainRenderer<Vec<u8>>,
    written: bool,
}

impl PdfRenderer {
    pub fn new(path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            text: PlainRenderer::new(Vec::new()),
            written: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, bytes)
    }
}

impl TableRenderer for PdfRenderer {
    fn text(&mut self, line: &str) -> Result<()> {
        self.text.text(line)
    }

    fn table(&mut self, table: &Table) -> Result<()> {
        self.text.table(table)
    }

    fn finish(&mut self) -> Result<()> {
        if self.written {
            return Ok(());
        }
        let buffer = std::mem::replace(&mut self.text, PlainRenderer::new(Vec::new())).into_inner();
        let text = String::from_utf8_lossy(&buffer);
        let lines: Vec<&str> = text.lines().collect();
        let bytes = build_pdf(&lines, &self.title, &pdf_date());

        self.write_file(&bytes).map_err(|source| ReportError::Pdf {
            path: self.path.clone(),
            source,
        })?;
        self.written = true;
        tracing::debug!(path = %self.path.display(), lines = lines.len(), "wrote PDF report");
        Ok(())
    }
}

fn pdf_date() -> String {
    format!("D:{}", Local::now().format("%Y%m%d%H%M%S"))
}

/// Escapes a line for a PDF literal string. Characters outside printable
/// ASCII are replaced, Courier in WinAnsi has no box-drawing glyphs.
pub fn escape_pdf_text(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for ch in line.chars() {
        match ch {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            '\t' => out.push(' '),
            _ => out.push('?'),
        }
    }
    out
}

fn content_stream(lines: &[&str]) -> String {
    let mut stream = String::new();
    stream.push_str("BT\n");
    stream.push_str(&format!("/F1 {} Tf\n{} TL\n", FONT_SIZE, LEADING));
    stream.push_str(&format!("{} {} Td\n", MARGIN, PAGE_HEIGHT - MARGIN - FONT_SIZE));
    for line in lines {
        stream.push_str(&format!("({}) Tj T*\n", escape_pdf_text(line)));
    }
    stream.push_str("ET\n");
    stream
}

/// Serializes `lines` as a paginated PDF document.
pub fn build_pdf(lines: &[&str], title: &str, created: &str) -> Vec<u8> {
    let per_page = lines_per_page();
    let pages: Vec<&[&str]> = if lines.is_empty() {
        vec![&[][..]]
    } else {
        lines.chunks(per_page).collect()
    };

    // Objects 1..=4 are fixed; each page takes a page object and a content stream.
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| 5 + 2 * i).collect();
    let mut objects: Vec<String> = Vec::new();

    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    let kids: Vec<String> = page_ids.iter().map(|id| format!("{} 0 R", id)).collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages.len()
    ));
    objects.push(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Courier /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );
    objects.push(format!(
        "<< /Title ({}) /Producer (check-allocation) /CreationDate ({}) >>",
        escape_pdf_text(title),
        created
    ));
    for (page, id) in pages.iter().zip(&page_ids) {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            PAGE_WIDTH,
            PAGE_HEIGHT,
            id + 1
        ));
        let stream = content_stream(page);
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}endstream",
            stream.len(),
            stream
        ));
    }

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
    }

    let xref_at = out.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in &offsets {
        xref.push_str(&format!("{:010} 00000 n \n", offset));
    }
    out.extend_from_slice(xref.as_bytes());
    let trailer = format!(
        "trailer\n<< /Size {} /Root 1 0 R /Info 4 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    );
    out.extend_from_slice(trailer.as_bytes());
    out
}
