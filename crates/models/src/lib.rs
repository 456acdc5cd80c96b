use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const SYMBOL_COLUMN: &str = "Symbol";
pub const DESCRIPTION_COLUMN: &str = "Description";
pub const ACCOUNT_COLUMN: &str = "Account";

/// Columns that identify a holding rather than allocate dollars to an asset class.
pub const IDENTITY_COLUMNS: [&str; 3] = [SYMBOL_COLUMN, DESCRIPTION_COLUMN, ACCOUNT_COLUMN];

/// Character brokerages use to mask account numbers (e.g. `*1234`).
pub const ACCOUNT_MASK: char = '*';

pub const DEFAULT_HISTORY_LOG: &str = "history.log";

/// Adds two dollar amounts, saturating at `Decimal::MAX` / `Decimal::MIN` instead of panicking.
pub fn add_dollars(a: Decimal, b: Decimal) -> Decimal {
	a.checked_add(b).unwrap_or(if b.is_sign_negative() { Decimal::MIN } else { Decimal::MAX })
}

/// Subtracts `b` from `a`, saturating like [`add_dollars`].
pub fn sub_dollars(a: Decimal, b: Decimal) -> Decimal {
	a.checked_sub(b).unwrap_or(if b.is_sign_negative() { Decimal::MAX } else { Decimal::MIN })
}

/// Saturating sum of dollar amounts.
pub fn sum_dollars<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
	values.into_iter().fold(Decimal::ZERO, add_dollars)
}

// Settings models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
	pub excel_filename: String,
	pub cash_symbols: Vec<String>,
	#[serde(default)]
	pub account_nicknames: BTreeMap<String, String>,
	#[serde(default)]
	pub history_log: Option<String>,
}

impl AppConfig {
	pub fn cash_symbol_set(&self) -> HashSet<String> {
		self.cash_symbols
			.iter()
			.map(|s| s.trim().to_string())
			.filter(|s| !s.is_empty())
			.collect()
	}

	pub fn history_log_path(&self) -> &str {
		self.history_log.as_deref().unwrap_or(DEFAULT_HISTORY_LOG)
	}
}

// Raw spreadsheet input
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
	Empty,
	Text(String),
	Number(Decimal),
	Bool(bool),
}

impl Cell {
	pub fn is_blank(&self) -> bool {
		match self {
			Cell::Empty => true,
			Cell::Text(s) => s.trim().is_empty(),
			_ => false,
		}
	}

	/// Trimmed textual form of the cell; `None` when blank.
	pub fn as_text(&self) -> Option<String> {
		match self {
			Cell::Empty => None,
			Cell::Text(s) => {
				let t = s.trim();
				if t.is_empty() { None } else { Some(t.to_string()) }
			}
			Cell::Number(d) => Some(d.normalize().to_string()),
			Cell::Bool(b) => Some(b.to_string()),
		}
	}
}

/// Worksheet as parsed, row 0 being the first row of the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
	pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
	pub fn new(rows: Vec<Vec<Cell>>) -> Self {
		Self { rows }
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}
}

// Normalized holdings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingRecord {
	pub symbol: String,
	pub description: String,
	pub account: String,
	/// Dollars per asset class, in header order. Every holding of a table carries the same keys.
	pub allocations: Vec<(String, Decimal)>,
}

impl HoldingRecord {
	/// Dollars held in `asset_class`; zero when the class is unknown to this holding.
	pub fn allocation(&self, asset_class: &str) -> Decimal {
		self.allocations
			.iter()
			.find(|(name, _)| name == asset_class)
			.map(|(_, v)| *v)
			.unwrap_or(Decimal::ZERO)
	}

	/// Sum of the holding over the given asset columns.
	pub fn total_over(&self, asset_columns: &[String]) -> Decimal {
		sum_dollars(asset_columns.iter().map(|c| self.allocation(c)))
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HoldingsTable {
	pub asset_columns: Vec<String>,
	pub holdings: Vec<HoldingRecord>,
}

// Derived tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationLine {
	pub asset_class: String,
	pub dollars: Decimal,
	pub percentage: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationSummary {
	pub lines: Vec<AllocationLine>,
	pub total: Decimal,
}

impl AllocationSummary {
	pub fn dollars(&self, asset_class: &str) -> Decimal {
		self.lines
			.iter()
			.find(|l| l.asset_class == asset_class)
			.map(|l| l.dollars)
			.unwrap_or(Decimal::ZERO)
	}

	pub fn percentage(&self, asset_class: &str) -> Decimal {
		self.lines
			.iter()
			.find(|l| l.asset_class == asset_class)
			.map(|l| l.percentage)
			.unwrap_or(Decimal::ZERO)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashPosition {
	pub account: String,
	pub symbol: String,
	pub dollars: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountCash {
	pub account: String,
	pub dollars: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RollupCategory {
	Stock,
	BondsOrCds,
	Other,
}

impl RollupCategory {
	pub fn label(&self) -> &'static str {
		match self {
			RollupCategory::Stock => "Stock",
			RollupCategory::BondsOrCds => "Bonds or CDs",
			RollupCategory::Other => "Other",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedCategory {
	pub category: RollupCategory,
	pub dollars: Decimal,
	pub percentage: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryRollup {
	pub categories: Vec<AggregatedCategory>,
	pub total: Decimal,
}

impl CategoryRollup {
	pub fn get(&self, category: RollupCategory) -> Option<&AggregatedCategory> {
		self.categories.iter().find(|c| c.category == category)
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestedSplit {
	pub invested_amount: Decimal,
	pub invested_percentage: Decimal,
	pub cash_amount: Decimal,
	pub cash_percentage: Decimal,
	pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountHoldingsCount {
	pub account: String,
	pub holdings: usize,
}

/// Everything one run produces, ready for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationReport {
	/// Filter tokens as given by the user; `None` means all accounts.
	pub account_filter: Option<Vec<String>>,
	pub asset_columns: Vec<String>,
	/// Holdings retained by the account filter, in source order.
	pub holdings: Vec<HoldingRecord>,
	pub gross: AllocationSummary,
	pub minus_cash: AllocationSummary,
	pub cash_by_account_and_symbol: Vec<CashPosition>,
	pub cash_by_account: Vec<AccountCash>,
	pub rollup: CategoryRollup,
	pub invested: InvestedSplit,
	/// Counts over the unfiltered dataset.
	pub account_holdings: Vec<AccountHoldingsCount>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_dollar_arithmetic_saturates() {
		let big = Decimal::from_scientific("5e28").unwrap();
		assert_eq!(add_dollars(big, big), Decimal::MAX);
		assert_eq!(add_dollars(-big, -big), Decimal::MIN);
		assert_eq!(sub_dollars(-big, big), Decimal::MIN);
		assert_eq!(sub_dollars(big, -big), Decimal::MAX);
		assert_eq!(sum_dollars([big, big, -big]), Decimal::MAX - big);
		assert_eq!(sum_dollars([Decimal::ONE, Decimal::TWO]), Decimal::from(3));
	}

	#[test]
	fn test_total_over_large_values_does_not_panic() {
		let big = Decimal::from_scientific("5e28").unwrap();
		let holding = HoldingRecord {
			symbol: "FXAIX".to_string(),
			description: String::new(),
			account: "*1".to_string(),
			allocations: vec![("Domestic Stock".to_string(), big), ("Bonds".to_string(), big)],
		};
		let columns = vec!["Domestic Stock".to_string(), "Bonds".to_string()];
		assert_eq!(holding.total_over(&columns), Decimal::MAX);
	}
}
