//! Report rendering for allocation analyses.
//!
//! [`assemble`] lays an [`models::AllocationReport`] out as an ordered
//! [`ReportDocument`] of text lines, rules and tables. A [`TableRenderer`]
//! turns the document into output: fixed-width text ([`PlainRenderer`]),
//! boxed console tables ([`ConsoleRenderer`]) or a PDF file ([`PdfRenderer`]).

pub mod assembler;
pub mod console;
pub mod document;
pub mod format;
pub mod pdf;
pub mod plain;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use assembler::{assemble, display_account, nickname_for};
pub use console::ConsoleRenderer;
pub use document::{render_document, Align, Block, Column, ReportDocument, Table, TableRenderer};
pub use format::{format_amount, format_money, format_percent};
pub use pdf::PdfRenderer;
pub use plain::PlainRenderer;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),

    #[error("failed to write PDF report to {}: {source}", .path.display())]
    Pdf {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
