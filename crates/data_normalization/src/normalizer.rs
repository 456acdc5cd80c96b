use std::str::FromStr;

use models::{sum_dollars, Cell, HoldingRecord, HoldingsTable, RawTable};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::classifier::{self, ColumnLayout};

/// Row 0 of an export is a disclaimer; the real header is on the next row.
pub const HEADER_ROW: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("the export contains no rows")]
    EmptyTable,

    #[error("the export has no header row (expected on row {})", HEADER_ROW + 1)]
    MissingHeader,

    #[error("no 'Symbol' column in the header row (found: {})", .found.join(", "))]
    MissingSymbolColumn { found: Vec<String> },
}

/// Trimmed header names; blank header cells become `None`.
pub fn header_names(row: &[Cell]) -> Vec<Option<String>> {
    row.iter().map(Cell::as_text).collect()
}

/// Largest dollar magnitude accepted from a single cell (10^18).
pub fn max_cell_dollars() -> Decimal {
    Decimal::from(1_000_000_000_000_000_000i64)
}

/// Coerces a spreadsheet cell to dollars. Anything that is not a number is zero,
/// and so is a number whose magnitude exceeds [`max_cell_dollars`].
pub fn coerce_decimal(cell: &Cell) -> Decimal {
    let value = match cell {
        Cell::Number(d) => Some(*d),
        Cell::Text(s) => parse_numeric_text(s),
        Cell::Empty | Cell::Bool(_) => None,
    };
    match value {
        Some(d) if d.abs() > max_cell_dollars() => {
            tracing::warn!(value = %d, "cell value out of range, counted as 0");
            Decimal::ZERO
        }
        Some(d) => d,
        None => Decimal::ZERO,
    }
}

fn parse_numeric_text(s: &str) -> Option<Decimal> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    Decimal::from_str(t)
        .or_else(|_| Decimal::from_scientific(t))
        .ok()
}

fn text_at(row: &[Cell], idx: Option<usize>) -> String {
    idx.and_then(|i| row.get(i))
        .and_then(Cell::as_text)
        .unwrap_or_default()
}

fn to_record(row: &[Cell], layout: &ColumnLayout) -> Option<HoldingRecord> {
    let symbol = row.get(layout.symbol).and_then(Cell::as_text)?;

    let allocations = layout
        .asset_columns
        .iter()
        .map(|col| {
            let dollars = sum_dollars(
                col.positions
                    .iter()
                    .map(|&i| row.get(i).map(coerce_decimal).unwrap_or(Decimal::ZERO)),
            );
            (col.name.clone(), dollars)
        })
        .collect();

    Some(HoldingRecord {
        symbol,
        description: text_at(row, layout.description),
        account: text_at(row, layout.account),
        allocations,
    })
}

/// Turns a raw export into holdings.
///
/// Rows without a symbol (footer disclaimers, blank rows) are dropped; every
/// other row is kept in source order.
pub fn normalize(raw: &RawTable) -> Result<HoldingsTable, NormalizeError> {
    let header_row = match raw.rows.get(HEADER_ROW) {
        Some(row) => row,
        None if raw.is_empty() => return Err(NormalizeError::EmptyTable),
        None => return Err(NormalizeError::MissingHeader),
    };

    let headers = header_names(header_row);
    let layout =
        classifier::classify(&headers).ok_or_else(|| NormalizeError::MissingSymbolColumn {
            found: headers.iter().flatten().cloned().collect(),
        })?;

    let mut holdings = Vec::new();
    let mut dropped = 0usize;
    for row in raw.rows.iter().skip(HEADER_ROW + 1) {
        match to_record(row, &layout) {
            Some(record) => holdings.push(record),
            None => dropped += 1,
        }
    }

    tracing::debug!(
        holdings = holdings.len(),
        dropped,
        asset_columns = layout.asset_columns.len(),
        "normalized allocation export"
    );

    Ok(HoldingsTable {
        asset_columns: layout.asset_names(),
        holdings,
    })
}
