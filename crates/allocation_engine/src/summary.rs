use std::collections::HashSet;

use models::{add_dollars, sum_dollars, AllocationLine, AllocationSummary, HoldingRecord};
use rust_decimal::{Decimal, RoundingStrategy};

/// Share of `part` in `total` as a percentage rounded half-to-even to 2 places.
/// A zero total yields 0, and so does a ratio too large to represent.
pub fn percentage(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|p| p.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .unwrap_or(Decimal::ZERO)
}

pub fn is_cash(holding: &HoldingRecord, cash_symbols: &HashSet<String>) -> bool {
    cash_symbols.contains(holding.symbol.as_str())
}

/// Dollars per asset class over `holdings`, with each class's share of the total.
pub fn summarize<'a, I>(holdings: I, asset_columns: &[String]) -> AllocationSummary
where
    I: IntoIterator<Item = &'a HoldingRecord>,
{
    let mut dollars = vec![Decimal::ZERO; asset_columns.len()];
    for h in holdings {
        for (slot, class) in dollars.iter_mut().zip(asset_columns) {
            *slot = add_dollars(*slot, h.allocation(class));
        }
    }
    let total = sum_dollars(dollars.iter().copied());

    let lines = asset_columns
        .iter()
        .zip(dollars)
        .map(|(class, d)| AllocationLine {
            asset_class: class.clone(),
            dollars: d,
            percentage: percentage(d, total),
        })
        .collect();

    AllocationSummary { lines, total }
}

/// Same as [`summarize`] restricted to holdings whose symbol is not a cash symbol.
pub fn summarize_minus_cash(
    holdings: &[&HoldingRecord],
    asset_columns: &[String],
    cash_symbols: &HashSet<String>,
) -> AllocationSummary {
    summarize(
        holdings.iter().copied().filter(|h| !is_cash(h, cash_symbols)),
        asset_columns,
    )
}
