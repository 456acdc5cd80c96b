use models::{ACCOUNT_COLUMN, DESCRIPTION_COLUMN, IDENTITY_COLUMNS, SYMBOL_COLUMN};

/// Where each column of interest sits in a raw row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub symbol: usize,
    pub description: Option<usize>,
    pub account: Option<usize>,
    pub asset_columns: Vec<AssetColumn>,
}

/// An asset class and every raw position carrying its dollars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetColumn {
    pub name: String,
    pub positions: Vec<usize>,
}

impl ColumnLayout {
    pub fn asset_names(&self) -> Vec<String> {
        self.asset_columns.iter().map(|c| c.name.clone()).collect()
    }
}

pub fn is_identity_column(name: &str) -> bool {
    IDENTITY_COLUMNS.contains(&name)
}

/// Asset-class columns: every header except Symbol, Description and Account, in header order.
pub fn asset_columns(headers: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for h in headers {
        if !is_identity_column(h) && !out.contains(h) {
            out.push(h.clone());
        }
    }
    out
}

/// Builds the layout of a header row. Returns `None` when there is no Symbol column.
///
/// `None` entries are unnamed (blank) header cells and are skipped. A header
/// name that repeats maps every occurrence onto the same asset class.
pub fn classify(headers: &[Option<String>]) -> Option<ColumnLayout> {
    let position = |wanted: &str| headers.iter().position(|h| h.as_deref() == Some(wanted));

    let symbol = position(SYMBOL_COLUMN)?;
    let description = position(DESCRIPTION_COLUMN);
    let account = position(ACCOUNT_COLUMN);

    let mut asset_columns: Vec<AssetColumn> = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        let Some(name) = header else { continue };
        if is_identity_column(name) {
            continue;
        }
        match asset_columns.iter_mut().find(|c| &c.name == name) {
            Some(existing) => existing.positions.push(idx),
            None => asset_columns.push(AssetColumn {
                name: name.clone(),
                positions: vec![idx],
            }),
        }
    }

    Some(ColumnLayout {
        symbol,
        description,
        account,
        asset_columns,
    })
}
