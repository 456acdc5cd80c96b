use std::collections::BTreeMap;

use allocation_engine::strip_account;
use models::{AllocationReport, AllocationSummary, CategoryRollup, RollupCategory};
use rust_decimal::Decimal;

use crate::document::{Block, Column, ReportDocument, Table};
use crate::format::{format_amount, format_money, format_percent};

pub const HOLDINGS_TITLE: &str = "Asset Allocation Summary:";
pub const TOTAL_BY_CLASS_TITLE: &str = "Total Allocation by Asset Class:";
pub const DETAILED_TITLE: &str = "Detailed Allocation Summary:";
pub const MINUS_CASH_TITLE: &str = "Detailed Allocation Minus Cash:";
pub const CASH_BY_SYMBOL_TITLE: &str = "Cash by Account and Symbol:";
pub const CASH_BY_ACCOUNT_TITLE: &str = "Cash by Account:";
pub const ROLLUP_TITLE: &str = "Final Aggregated Table (Stock vs Bonds or CDs):";
pub const INVESTED_TITLE: &str = "Invested vs Not Invested:";
pub const ACCOUNTS_TITLE: &str = "Available Accounts:";

const WIDE_RULE: usize = 120;
const RULE: usize = 70;

/// Nickname configured for `account`, matched as written first and then with
/// the mask stripped on both sides.
pub fn nickname_for<'a>(account: &str, nicknames: &'a BTreeMap<String, String>) -> Option<&'a String> {
    nicknames
        .get(account)
        .or_else(|| nicknames.get(strip_account(account)))
        .or_else(|| {
            nicknames
                .iter()
                .find(|(k, _)| strip_account(k) == strip_account(account))
                .map(|(_, v)| v)
        })
}

/// Account label for display: `Nickname (*1234)` when a nickname is configured
/// for the raw or unmasked id, the raw id otherwise.
pub fn display_account(account: &str, nicknames: &BTreeMap<String, String>) -> String {
    match nickname_for(account, nicknames) {
        Some(name) => format!("{} ({})", name, account),
        None => account.to_string(),
    }
}

/// Lays out every section of `report` in reading order.
pub fn assemble(report: &AllocationReport, nicknames: &BTreeMap<String, String>) -> ReportDocument {
    let mut doc = ReportDocument::default();

    doc.push(Block::Text(scope_line(report.account_filter.as_deref())));
    doc.push(Block::Rule('=', WIDE_RULE));
    doc.push(Block::Blank);

    doc.push(Block::Table(holdings_table(report)));
    doc.push(Block::Table(total_by_class_table(&report.gross)));
    doc.push(Block::Table(summary_table(DETAILED_TITLE, &report.gross)));
    doc.push(Block::Table(summary_table(MINUS_CASH_TITLE, &report.minus_cash)));
    doc.push(Block::Table(cash_by_symbol_table(report, nicknames)));
    doc.push(Block::Table(cash_by_account_table(report, nicknames)));
    doc.push(Block::Table(rollup_table(&report.rollup)));
    doc.push(Block::Table(invested_table(report)));

    doc.push(Block::Blank);
    doc.push(Block::Text(ACCOUNTS_TITLE.to_string()));
    doc.push(Block::Rule('=', RULE));
    doc.push(Block::Text("Use --account option to analyze a specific account:".to_string()));
    doc.push(Block::Text("Example: check-allocation --account \"*1234\"".to_string()));
    doc.push(Block::Rule('=', RULE));
    doc.push(Block::Table(accounts_table(report, nicknames)));

    doc
}

fn scope_line(filter: Option<&[String]>) -> String {
    match filter {
        None => "Analyzing all accounts".to_string(),
        Some([one]) => format!("Analyzing account: {}", one),
        Some(many) => format!("Analyzing accounts: {}", many.join(", ")),
    }
}

fn total_percent(total: Decimal) -> String {
    if total.is_zero() {
        format_percent(Decimal::ZERO)
    } else {
        format_percent(Decimal::ONE_HUNDRED)
    }
}

fn holdings_table(report: &AllocationReport) -> Table {
    let mut columns = vec![Column::left("Symbol"), Column::left("Description")];
    columns.extend(report.asset_columns.iter().map(Column::right));

    let rows = report
        .holdings
        .iter()
        .map(|h| {
            let mut row = vec![h.symbol.clone(), h.description.clone()];
            row.extend(
                report
                    .asset_columns
                    .iter()
                    .map(|c| format_amount(h.allocation(c))),
            );
            row
        })
        .collect();

    Table::new(HOLDINGS_TITLE, columns)
        .with_rows(rows)
        .with_header()
        .with_rule_width(WIDE_RULE)
}

fn total_by_class_table(summary: &AllocationSummary) -> Table {
    let rows = summary
        .lines
        .iter()
        .map(|l| vec![l.asset_class.clone(), format_money(l.dollars)])
        .collect();
    Table::new(
        TOTAL_BY_CLASS_TITLE,
        vec![Column::left("Asset Class"), Column::right("Dollars")],
    )
    .with_rows(rows)
}

fn summary_table(title: &str, summary: &AllocationSummary) -> Table {
    let rows = summary
        .lines
        .iter()
        .map(|l| {
            vec![
                l.asset_class.clone(),
                format_money(l.dollars),
                format_percent(l.percentage),
            ]
        })
        .collect();
    Table::new(
        title,
        vec![
            Column::left("Asset Class"),
            Column::right("Dollars"),
            Column::right("Percentage"),
        ],
    )
    .with_rows(rows)
    .with_footer(vec![
        "TOTAL".to_string(),
        format_money(summary.total),
        total_percent(summary.total),
    ])
}

fn cash_by_symbol_table(report: &AllocationReport, nicknames: &BTreeMap<String, String>) -> Table {
    let positions = &report.cash_by_account_and_symbol;
    let total: Decimal = positions.iter().map(|p| p.dollars).sum();
    let rows = positions
        .iter()
        .map(|p| {
            vec![
                display_account(&p.account, nicknames),
                p.symbol.clone(),
                format_money(p.dollars),
            ]
        })
        .collect();
    let table = Table::new(
        CASH_BY_SYMBOL_TITLE,
        vec![
            Column::left("Account"),
            Column::left("Symbol"),
            Column::right("Dollars"),
        ],
    )
    .with_rows(rows);
    if positions.is_empty() {
        table
    } else {
        table.with_footer(vec!["TOTAL".to_string(), String::new(), format_money(total)])
    }
}

fn cash_by_account_table(report: &AllocationReport, nicknames: &BTreeMap<String, String>) -> Table {
    let accounts = &report.cash_by_account;
    let total: Decimal = accounts.iter().map(|a| a.dollars).sum();
    let rows = accounts
        .iter()
        .map(|a| vec![display_account(&a.account, nicknames), format_money(a.dollars)])
        .collect();
    let table = Table::new(
        CASH_BY_ACCOUNT_TITLE,
        vec![Column::left("Account"), Column::right("Dollars")],
    )
    .with_rows(rows);
    if accounts.is_empty() {
        table
    } else {
        table.with_footer(vec!["TOTAL".to_string(), format_money(total)])
    }
}

fn rollup_table(rollup: &CategoryRollup) -> Table {
    let order = [
        RollupCategory::Stock,
        RollupCategory::BondsOrCds,
        RollupCategory::Other,
    ];
    let rows = order
        .iter()
        .filter_map(|c| rollup.get(*c))
        .map(|c| {
            vec![
                c.category.label().to_string(),
                format_money(c.dollars),
                format_percent(c.percentage),
            ]
        })
        .collect();
    Table::new(
        ROLLUP_TITLE,
        vec![
            Column::left("Category"),
            Column::right("Dollars"),
            Column::right("Percentage"),
        ],
    )
    .with_rows(rows)
    .with_footer(vec![
        "TOTAL".to_string(),
        format_money(rollup.total),
        total_percent(rollup.total),
    ])
}

fn invested_table(report: &AllocationReport) -> Table {
    let split = &report.invested;
    Table::new(
        INVESTED_TITLE,
        vec![
            Column::left("Category"),
            Column::right("Dollars"),
            Column::right("Percentage"),
        ],
    )
    .with_rows(vec![
        vec![
            "Invested".to_string(),
            format_money(split.invested_amount),
            format_percent(split.invested_percentage),
        ],
        vec![
            "Not Invested (Cash)".to_string(),
            format_money(split.cash_amount),
            format_percent(split.cash_percentage),
        ],
    ])
    .with_footer(vec![
        "TOTAL".to_string(),
        format_money(split.total),
        total_percent(split.total),
    ])
}

fn accounts_table(report: &AllocationReport, nicknames: &BTreeMap<String, String>) -> Table {
    let with_nicknames = !nicknames.is_empty();
    let mut columns = vec![Column::left("Account"), Column::right("Holdings")];
    if with_nicknames {
        columns.push(Column::left("Nickname"));
    }

    let rows = report
        .account_holdings
        .iter()
        .map(|a| {
            let mut row = vec![a.account.clone(), format!("{:3} holdings", a.holdings)];
            if with_nicknames {
                row.push(nickname_for(&a.account, nicknames).cloned().unwrap_or_default());
            }
            row
        })
        .collect();

    // The title is printed by the surrounding text blocks.
    Table::new("", columns).with_rows(rows).with_rule_width(0)
}
