//! Mortality tables: survivor counts by age, category keys and providers
//!
//! Tables are built once by a provider (usually from CSV) and then shared
//! read-only by every valuation that needs them.

mod key;
mod life_table;
mod provider;
pub mod loader;

pub use key::{Condition, Gender, TableKey};
pub use life_table::{LifeTable, MAX_AGE};
pub use loader::{load_tables, load_tables_from_reader, parse_survivors, NumberFormat};
pub use provider::{LifeTables, TableProvider};
