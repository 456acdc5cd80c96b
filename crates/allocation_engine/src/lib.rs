pub mod cash;
pub mod filter;
pub mod rollup;
pub mod summary;

use anyhow::Result;
use models::{AccountHoldingsCount, AllocationReport, HoldingRecord, HoldingsTable};
use std::{collections::HashSet, fs, path::Path};

pub use cash::{cash_amount, cash_by_account, cash_by_account_and_symbol};
pub use filter::{filter_holdings, strip_account, AccountFilter};
pub use rollup::{invested_split, rollup};
pub use summary::{percentage, summarize, summarize_minus_cash};

/// Holdings per account over the whole dataset, in order of first appearance.
/// Holdings with a blank account are not listed.
pub fn account_holdings(holdings: &[HoldingRecord]) -> Vec<AccountHoldingsCount> {
    let mut counts: Vec<AccountHoldingsCount> = Vec::new();
    for h in holdings.iter().filter(|h| !h.account.trim().is_empty()) {
        match counts.iter_mut().find(|c| c.account == h.account) {
            Some(c) => c.holdings += 1,
            None => counts.push(AccountHoldingsCount {
                account: h.account.clone(),
                holdings: 1,
            }),
        }
    }
    counts
}

/// Runs every aggregation over a normalized table.
///
/// The account filter narrows all tables except the account listing, which
/// always covers the full dataset.
pub fn analyze(
    table: &HoldingsTable,
    cash_symbols: &HashSet<String>,
    filter: Option<&AccountFilter>,
) -> AllocationReport {
    let columns = &table.asset_columns;
    let retained = filter_holdings(&table.holdings, filter);

    if let Some(f) = filter {
        if retained.is_empty() {
            tracing::warn!(tokens = ?f.tokens(), "account filter matched no holdings");
        }
    }

    let gross = summarize(retained.iter().copied(), columns);
    let minus_cash = summarize_minus_cash(&retained, columns, cash_symbols);
    let cash_total = cash_amount(&retained, columns, cash_symbols);

    tracing::debug!(
        retained = retained.len(),
        total = %gross.total,
        total_minus_cash = %minus_cash.total,
        cash = %cash_total,
        "aggregated allocation"
    );

    AllocationReport {
        account_filter: filter.map(|f| f.tokens().to_vec()),
        asset_columns: columns.clone(),
        cash_by_account_and_symbol: cash_by_account_and_symbol(&retained, columns, cash_symbols),
        cash_by_account: cash_by_account(&retained, columns, cash_symbols),
        rollup: rollup(&minus_cash),
        invested: invested_split(gross.total, cash_total),
        account_holdings: account_holdings(&table.holdings),
        holdings: retained.into_iter().cloned().collect(),
        gross,
        minus_cash,
    }
}

/// Writes the report as pretty JSON, creating the parent directory when needed.
pub fn write_report_json(report: &AllocationReport, out_path: &Path) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(out_path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::RollupCategory;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    const COLUMNS: [&str; 6] = [
        "Domestic Stock",
        "Foreign Stock",
        "Bonds",
        "Short_term",
        "Other",
        "Unknown",
    ];

    fn holding(symbol: &str, account: &str, allocations: &[(&str, Decimal)]) -> HoldingRecord {
        HoldingRecord {
            symbol: symbol.to_string(),
            description: String::new(),
            account: account.to_string(),
            allocations: COLUMNS
                .iter()
                .map(|c| {
                    let v = allocations
                        .iter()
                        .find(|(name, _)| name == c)
                        .map(|(_, v)| *v)
                        .unwrap_or(Decimal::ZERO);
                    (c.to_string(), v)
                })
                .collect(),
        }
    }

    fn table(holdings: Vec<HoldingRecord>) -> HoldingsTable {
        HoldingsTable {
            asset_columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
            holdings,
        }
    }

    fn cash_set(symbols: &[&str]) -> HashSet<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_aapl_spaxx_scenario() {
        let t = table(vec![
            holding("AAPL", "*1", &[("Domestic Stock", dec!(100))]),
            holding("SPAXX", "*1", &[("Short_term", dec!(50))]),
        ]);

        let report = analyze(&t, &cash_set(&["SPAXX"]), None);

        assert_eq!(report.gross.total, dec!(150));
        assert_eq!(report.minus_cash.total, dec!(100));
        assert_eq!(report.invested.cash_amount, dec!(50));
        assert_eq!(report.invested.invested_amount, dec!(100));
        assert_eq!(report.invested.invested_percentage, dec!(66.67));
        assert_eq!(report.invested.cash_percentage, dec!(33.33));
        assert_eq!(report.rollup.get(RollupCategory::Stock).unwrap().dollars, dec!(100));
        assert_eq!(report.rollup.get(RollupCategory::BondsOrCds).unwrap().dollars, Decimal::ZERO);
        assert_eq!(report.rollup.get(RollupCategory::Other).unwrap().dollars, Decimal::ZERO);
        assert_eq!(report.cash_by_account_and_symbol.len(), 1);
        assert_eq!(report.cash_by_account[0].dollars, dec!(50));
    }

    #[test]
    fn test_unmatched_filter_yields_empty_report() {
        let t = table(vec![
            holding("AAPL", "*1", &[("Domestic Stock", dec!(100))]),
            holding("SPAXX", "*1", &[("Short_term", dec!(50))]),
        ]);
        let filter = AccountFilter::new(["*9999"]).unwrap();

        let report = analyze(&t, &cash_set(&["SPAXX"]), Some(&filter));

        assert!(report.holdings.is_empty());
        assert_eq!(report.gross.total, Decimal::ZERO);
        assert!(report.gross.lines.iter().all(|l| l.dollars.is_zero() && l.percentage.is_zero()));
        assert_eq!(report.minus_cash.total, Decimal::ZERO);
        assert!(report.cash_by_account_and_symbol.is_empty());
        assert!(report.cash_by_account.is_empty());
        assert!(report.rollup.categories.iter().all(|c| c.percentage.is_zero()));
        assert_eq!(report.account_filter, Some(vec!["*9999".to_string()]));
        // The account listing ignores the filter.
        assert_eq!(report.account_holdings.len(), 1);
        assert_eq!(report.account_holdings[0].holdings, 2);
    }

    #[test]
    fn test_filter_narrows_everything_but_account_listing() {
        let t = table(vec![
            holding("FXAIX", "*1", &[("Domestic Stock", dec!(100))]),
            holding("AGG", "2", &[("Bonds", dec!(300))]),
            holding("SPAXX", "*2", &[("Short_term", dec!(10))]),
        ]);
        let filter = AccountFilter::new(["*2"]).unwrap();

        let report = analyze(&t, &cash_set(&["SPAXX"]), Some(&filter));

        assert_eq!(report.holdings.len(), 2);
        assert_eq!(report.gross.total, dec!(310));
        assert_eq!(report.minus_cash.total, dec!(300));
        assert_eq!(
            report.account_holdings,
            vec![
                AccountHoldingsCount { account: "*1".to_string(), holdings: 1 },
                AccountHoldingsCount { account: "2".to_string(), holdings: 1 },
                AccountHoldingsCount { account: "*2".to_string(), holdings: 1 },
            ]
        );
    }

    #[test]
    fn test_account_holdings_first_appearance_order() {
        let holdings = vec![
            holding("A", "*2", &[]),
            holding("B", "*1", &[]),
            holding("C", "*2", &[]),
            holding("D", "", &[]),
        ];
        let counts = account_holdings(&holdings);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].account, "*2");
        assert_eq!(counts[0].holdings, 2);
        assert_eq!(counts[1].account, "*1");
    }

    #[test]
    fn test_all_zero_dataset() {
        let t = table(vec![holding("FXAIX", "*1", &[]), holding("SPAXX", "*1", &[])]);
        let report = analyze(&t, &cash_set(&["SPAXX"]), None);

        assert!(report.gross.lines.iter().all(|l| l.percentage.is_zero()));
        assert!(report.minus_cash.lines.iter().all(|l| l.percentage.is_zero()));
        assert!(report.rollup.categories.iter().all(|c| c.percentage.is_zero()));
        assert!(report.invested.invested_percentage.is_zero());
        assert!(report.invested.cash_percentage.is_zero());
    }

    #[test]
    fn test_write_report_json() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("report.json");
        let t = table(vec![holding("FXAIX", "*1", &[("Domestic Stock", dec!(1))])]);
        let report = analyze(&t, &HashSet::new(), None);

        write_report_json(&report, &out).unwrap();

        let back: AllocationReport =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_blank_symbol_rows_are_excluded_everywhere() {
        use models::{Cell, RawTable};

        let text = |s: &str| Cell::Text(s.to_string());
        let raw = RawTable::new(vec![
            vec![text("Data as of 10/16/2026.")],
            vec![
                text("Symbol"),
                text("Description"),
                text("Account"),
                text("Domestic Stock"),
                text("Short_term"),
            ],
            vec![text("FXAIX"), text("FIDELITY 500 INDEX"), text("*1111"), Cell::Number(dec!(100)), Cell::Empty],
            vec![Cell::Empty, text("PENDING ACTIVITY"), text("*2222"), Cell::Number(dec!(40)), Cell::Number(dec!(5))],
            vec![text("  "), text(""), text("*3333"), Cell::Empty, Cell::Number(dec!(7))],
        ]);

        let table = data_normalization::normalize(&raw).unwrap();
        let report = analyze(&table, &cash_set(&["SPAXX"]), None);

        assert_eq!(
            report.account_holdings,
            vec![AccountHoldingsCount { account: "*1111".to_string(), holdings: 1 }]
        );
        assert_eq!(report.holdings.len(), 1);
        assert_eq!(report.gross.total, dec!(100));
        assert_eq!(report.gross.dollars("Short_term"), Decimal::ZERO);
        assert!(report.cash_by_account.is_empty());
    }

    const SYMBOLS: [&str; 4] = ["AAPL", "FXAIX", "SPAXX", "CORE"];
    const ACCOUNTS: [&str; 3] = ["*1", "*2", "3"];

    fn holding_strategy(min_cents: i64) -> impl Strategy<Value = HoldingRecord> {
        (
            prop::sample::select(SYMBOLS.to_vec()),
            prop::sample::select(ACCOUNTS.to_vec()),
            prop::collection::vec(min_cents..10_000_000i64, COLUMNS.len()),
        )
            .prop_map(|(symbol, account, cents)| HoldingRecord {
                symbol: symbol.to_string(),
                description: String::new(),
                account: account.to_string(),
                allocations: COLUMNS
                    .iter()
                    .zip(cents)
                    .map(|(c, v)| (c.to_string(), Decimal::new(v, 2)))
                    .collect(),
            })
    }

    proptest! {
        #[test]
        fn prop_totals_reconcile(
            holdings in prop::collection::vec(holding_strategy(-10_000_000), 0..40),
            use_filter in any::<bool>(),
        ) {
            let t = table(holdings);
            let cash = cash_set(&["SPAXX", "CORE"]);
            let filter = AccountFilter::new(["*2"]);
            let report = analyze(&t, &cash, if use_filter { filter.as_ref() } else { None });

            let columns = &t.asset_columns;
            let expected_total: Decimal = report.holdings.iter().map(|h| h.total_over(columns)).sum();
            let gross_dollars: Decimal = report.gross.lines.iter().map(|l| l.dollars).sum();
            prop_assert_eq!(gross_dollars, report.gross.total);
            prop_assert_eq!(report.gross.total, expected_total);

            let cash_total = report.invested.cash_amount;
            prop_assert_eq!(report.minus_cash.total + cash_total, report.gross.total);
            prop_assert_eq!(report.invested.invested_amount + cash_total, report.gross.total);

            let rolled: Decimal = report.rollup.categories.iter().map(|c| c.dollars).sum();
            prop_assert_eq!(rolled, report.minus_cash.total);

            let by_account: Decimal = report.cash_by_account.iter().map(|c| c.dollars).sum();
            let by_symbol: Decimal = report.cash_by_account_and_symbol.iter().map(|c| c.dollars).sum();
            prop_assert_eq!(by_account, cash_total);
            prop_assert_eq!(by_symbol, cash_total);
        }

        #[test]
        fn prop_analyze_is_idempotent(
            holdings in prop::collection::vec(holding_strategy(-10_000_000), 0..20),
        ) {
            let t = table(holdings);
            let cash = cash_set(&["SPAXX"]);
            prop_assert_eq!(analyze(&t, &cash, None), analyze(&t, &cash, None));
        }

        #[test]
        fn prop_percentages_close_to_hundred(
            holdings in prop::collection::vec(holding_strategy(0), 1..20),
        ) {
            let t = table(holdings);
            let report = analyze(&t, &HashSet::new(), None);
            prop_assume!(!report.gross.total.is_zero());

            let sum: Decimal = report.gross.lines.iter().map(|l| l.percentage).sum();
            // Each class is rounded on its own, at most half a cent of a percent each.
            let slack = dec!(0.005) * Decimal::from(COLUMNS.len());
            prop_assert!((sum - Decimal::ONE_HUNDRED).abs() <= slack);
        }
    }
}
