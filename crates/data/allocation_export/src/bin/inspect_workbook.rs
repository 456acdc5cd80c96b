use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Reader};
use models::{Cell, SYMBOL_COLUMN};
use std::env;

use allocation_export::raw_table_from_range;

fn main() -> Result<()> {
    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "AssetAllocation.xls".to_string());

    let mut workbook =
        open_workbook_auto(&path).with_context(|| format!("Cannot open {}", path))?;

    let sheet_names = workbook.sheet_names().to_vec();
    println!("Sheets ({}):", sheet_names.len());

    for sheet_name in sheet_names {
        println!("\n== {} ==", sheet_name);

        let range = match workbook.worksheet_range(&sheet_name) {
            Ok(r) => r,
            Err(e) => {
                println!("  (cannot read: {e})");
                continue;
            }
        };

        let (h, w) = range.get_size();
        println!("  size: rows={h}, cols={w}, start={:?}", range.start());

        let table = raw_table_from_range(&range);

        // First 15 non-empty rows, up to 12 columns each.
        let mut printed = 0usize;
        for (r_idx, row) in table.rows.iter().enumerate() {
            if printed >= 15 {
                break;
            }

            if row.iter().take(12).all(Cell::is_blank) {
                continue;
            }

            let mut cells: Vec<String> = row
                .iter()
                .take(12)
                .map(|c| c.as_text().unwrap_or_default())
                .collect();

            while matches!(cells.last(), Some(s) if s.is_empty()) {
                cells.pop();
            }

            println!("  row {:>4}: {}", r_idx + 1, cells.join(" | "));
            printed += 1;
        }

        match table
            .rows
            .iter()
            .position(|row| row.iter().any(is_symbol_header))
        {
            Some(1) => println!("  header row: 2 (expected layout)"),
            Some(idx) => println!(
                "  header row: {} (expected 2; the export layout has drifted)",
                idx + 1
            ),
            None => println!("  header row: (no '{}' column found)", SYMBOL_COLUMN),
        }
    }

    Ok(())
}

fn is_symbol_header(cell: &Cell) -> bool {
    cell.as_text().as_deref() == Some(SYMBOL_COLUMN)
}
