use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader};
use models::{Cell, RawTable};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

pub const PARSER_NAME: &str = "asset_allocation_export";

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("Spreadsheet not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Cannot open spreadsheet {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("Spreadsheet {} contains no worksheets", .path.display())]
    NoWorksheet { path: PathBuf },

    #[error("Cannot read the first worksheet of {}: {source}", .path.display())]
    Worksheet {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
}

impl ReadError {
    pub fn remediation(&self) -> &'static str {
        match self {
            ReadError::NotFound { .. } => {
                "Download the Asset Allocation export from your brokerage and point \
                 \"excel_filename\" in config.json (or --excel) at it."
            }
            ReadError::Open { .. } | ReadError::Worksheet { .. } => {
                "The file must be an .xls, .xlsx, .xlsm, .xlsb or .ods workbook. \
                 Re-download the export if it was saved in another format."
            }
            ReadError::NoWorksheet { .. } => "Re-download the export; the workbook is empty.",
        }
    }
}

/// Reads the first worksheet of an allocation export.
///
/// Row and column positions are absolute: row 0 of the result is the first row
/// of the sheet even when calamine trimmed leading empty rows.
pub fn read_raw_table<P: AsRef<Path>>(path: P) -> Result<RawTable, ReadError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ReadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let mut workbook = open_workbook_auto(path).map_err(|source| ReadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReadError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(|source| ReadError::Worksheet {
            path: path.to_path_buf(),
            source,
        })?;

    let table = raw_table_from_range(&range);
    tracing::debug!(
        parser = PARSER_NAME,
        path = %path.display(),
        rows = table.rows.len(),
        "read allocation export"
    );
    Ok(table)
}

/// Converts a calamine range into a [`RawTable`], restoring trimmed leading rows and columns.
pub fn raw_table_from_range(range: &Range<Data>) -> RawTable {
    let Some((start_row, start_col)) = range.start() else {
        return RawTable::default();
    };

    let mut rows: Vec<Vec<Cell>> = (0..start_row).map(|_| Vec::new()).collect();
    for row in range.rows() {
        let mut cells: Vec<Cell> = (0..start_col).map(|_| Cell::Empty).collect();
        cells.extend(row.iter().map(cell_from_data));
        rows.push(cells);
    }
    RawTable::new(rows)
}

pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        // NaN and infinities have no decimal form.
        Data::Float(f) => Decimal::from_f64(*f)
            .map(Cell::Number)
            .unwrap_or(Cell::Empty),
        Data::Int(i) => Cell::Number(Decimal::from(*i)),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Text(other.to_string()),
    }
}
