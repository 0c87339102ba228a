// Dataset module - durable tabular store of labeled captures
//
// This module provides three components:
// 1. schema: the fixed column set and reconciliation of foreign tables onto it
// 2. table: a raw CSV table that keeps whatever columns the file carries
// 3. store: the fixed-schema Dataset with load/append/save
//
// The dataset file is always loaded and saved as a whole; there is no
// on-disk append and no row-level locking.

pub mod schema;
pub mod store;
pub mod table;

pub use schema::{reconcile, ALL_COLS, FEATURE_ORDER, LABEL_COL};
pub use store::{load_or_create, Dataset, DatasetRow};
pub use table::RawTable;
