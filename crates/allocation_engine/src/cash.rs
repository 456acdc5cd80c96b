use std::collections::HashSet;

use models::{add_dollars, sum_dollars, AccountCash, CashPosition, HoldingRecord};
use rust_decimal::Decimal;

use crate::summary::is_cash;

/// Cash dollars grouped by (account, symbol), sorted by account then by dollars descending.
pub fn cash_by_account_and_symbol(
    holdings: &[&HoldingRecord],
    asset_columns: &[String],
    cash_symbols: &HashSet<String>,
) -> Vec<CashPosition> {
    let mut groups: Vec<CashPosition> = Vec::new();
    for h in holdings.iter().filter(|h| is_cash(h, cash_symbols)) {
        let dollars = h.total_over(asset_columns);
        match groups
            .iter_mut()
            .find(|g| g.account == h.account && g.symbol == h.symbol)
        {
            Some(g) => g.dollars = add_dollars(g.dollars, dollars),
            None => groups.push(CashPosition {
                account: h.account.clone(),
                symbol: h.symbol.clone(),
                dollars,
            }),
        }
    }
    groups.sort_by(|a, b| {
        a.account
            .cmp(&b.account)
            .then_with(|| b.dollars.cmp(&a.dollars))
    });
    groups
}

/// Cash dollars per account, largest first. Ties keep first-appearance order.
pub fn cash_by_account(
    holdings: &[&HoldingRecord],
    asset_columns: &[String],
    cash_symbols: &HashSet<String>,
) -> Vec<AccountCash> {
    let mut groups: Vec<AccountCash> = Vec::new();
    for h in holdings.iter().filter(|h| is_cash(h, cash_symbols)) {
        let dollars = h.total_over(asset_columns);
        match groups.iter_mut().find(|g| g.account == h.account) {
            Some(g) => g.dollars = add_dollars(g.dollars, dollars),
            None => groups.push(AccountCash {
                account: h.account.clone(),
                dollars,
            }),
        }
    }
    groups.sort_by(|a, b| b.dollars.cmp(&a.dollars));
    groups
}

/// Total dollars held in cash symbols across every asset column.
pub fn cash_amount(
    holdings: &[&HoldingRecord],
    asset_columns: &[String],
    cash_symbols: &HashSet<String>,
) -> Decimal {
    sum_dollars(
        holdings
            .iter()
            .filter(|h| is_cash(h, cash_symbols))
            .map(|h| h.total_over(asset_columns)),
    )
}
