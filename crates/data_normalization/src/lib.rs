pub mod classifier;
pub mod normalizer;

pub use classifier::{asset_columns, classify, ColumnLayout};
pub use normalizer::{coerce_decimal, max_cell_dollars, normalize, NormalizeError, HEADER_ROW};
