use models::{
    add_dollars, sub_dollars, sum_dollars, AggregatedCategory, AllocationSummary, CategoryRollup,
    InvestedSplit, RollupCategory,
};
use rust_decimal::Decimal;

use crate::summary::percentage;

pub const DOMESTIC_STOCK: &str = "Domestic Stock";
pub const FOREIGN_STOCK: &str = "Foreign Stock";
pub const BONDS: &str = "Bonds";
pub const SHORT_TERM: &str = "Short_term";

pub const STOCK_CLASSES: [&str; 2] = [DOMESTIC_STOCK, FOREIGN_STOCK];
pub const BOND_CLASSES: [&str; 2] = [BONDS, SHORT_TERM];

/// Stock / Bonds or CDs / Other rollup of a cash-excluded summary.
///
/// Any asset class outside the four named ones lands in Other, so the three
/// buckets always add up to the summary total.
pub fn rollup(minus_cash: &AllocationSummary) -> CategoryRollup {
    let stock = sum_dollars(STOCK_CLASSES.iter().map(|c| minus_cash.dollars(c)));
    let bonds = sum_dollars(BOND_CLASSES.iter().map(|c| minus_cash.dollars(c)));
    let other = sub_dollars(sub_dollars(minus_cash.total, stock), bonds);
    let total = add_dollars(add_dollars(stock, bonds), other);

    let categories = [
        (RollupCategory::Stock, stock),
        (RollupCategory::BondsOrCds, bonds),
        (RollupCategory::Other, other),
    ]
    .into_iter()
    .map(|(category, dollars)| AggregatedCategory {
        category,
        dollars,
        percentage: percentage(dollars, total),
    })
    .collect();

    CategoryRollup { categories, total }
}

/// Splits the cash-inclusive total into invested and cash dollars.
pub fn invested_split(gross_total: Decimal, cash_amount: Decimal) -> InvestedSplit {
    let invested_amount = sub_dollars(gross_total, cash_amount);
    InvestedSplit {
        invested_amount,
        invested_percentage: percentage(invested_amount, gross_total),
        cash_amount,
        cash_percentage: percentage(cash_amount, gross_total),
        total: gross_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::AllocationLine;
    use rust_decimal_macros::dec;

    fn summary(lines: &[(&str, Decimal)]) -> AllocationSummary {
        let total = sum_dollars(lines.iter().map(|(_, d)| *d));
        AllocationSummary {
            lines: lines
                .iter()
                .map(|(c, d)| AllocationLine {
                    asset_class: c.to_string(),
                    dollars: *d,
                    percentage: percentage(*d, total),
                })
                .collect(),
            total,
        }
    }

    #[test]
    fn test_rollup_buckets() {
        let s = summary(&[
            ("Domestic Stock", dec!(500)),
            ("Foreign Stock", dec!(200)),
            ("Bonds", dec!(150)),
            ("Short_term", dec!(50)),
            ("Other", dec!(60)),
            ("Unknown", dec!(40)),
        ]);

        let r = rollup(&s);

        assert_eq!(r.total, dec!(1000));
        let stock = r.get(RollupCategory::Stock).unwrap();
        assert_eq!(stock.dollars, dec!(700));
        assert_eq!(stock.percentage, dec!(70));
        assert_eq!(r.get(RollupCategory::BondsOrCds).unwrap().dollars, dec!(200));
        assert_eq!(r.get(RollupCategory::Other).unwrap().dollars, dec!(100));
    }

    #[test]
    fn test_rollup_renamed_class_falls_into_other() {
        let s = summary(&[("US Stock", dec!(80)), ("Bonds", dec!(20))]);
        let r = rollup(&s);
        assert_eq!(r.get(RollupCategory::Stock).unwrap().dollars, Decimal::ZERO);
        assert_eq!(r.get(RollupCategory::Other).unwrap().dollars, dec!(80));
    }

    #[test]
    fn test_rollup_zero_total() {
        let r = rollup(&summary(&[("Domestic Stock", dec!(0))]));
        assert!(r.categories.iter().all(|c| c.percentage.is_zero()));
        assert_eq!(r.categories.len(), 3);
    }

    #[test]
    fn test_rollup_and_split_with_extreme_values() {
        let r = rollup(&summary(&[("Domestic Stock", Decimal::MAX), ("Bonds", Decimal::MIN)]));
        assert_eq!(r.categories.len(), 3);

        let split = invested_split(Decimal::MAX, Decimal::MIN);
        assert_eq!(split.invested_amount, Decimal::MAX);
    }

    #[test]
    fn test_invested_split() {
        let split = invested_split(dec!(150), dec!(50));
        assert_eq!(split.invested_amount, dec!(100));
        assert_eq!(split.invested_percentage, dec!(66.67));
        assert_eq!(split.cash_percentage, dec!(33.33));

        let empty = invested_split(Decimal::ZERO, Decimal::ZERO);
        assert!(empty.invested_percentage.is_zero());
        assert!(empty.cash_percentage.is_zero());
    }
}
