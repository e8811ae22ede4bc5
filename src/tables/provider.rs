//! Table providers: map a category key to a loaded life table

use std::collections::HashMap;

use super::{LifeTable, TableKey};

/// Source of life tables for the valuation engine
///
/// The engine only ever reads tables, so providers hand out shared references.
pub trait TableProvider {
    /// Table for a category, or `None` if the provider does not carry it
    fn table(&self, key: &TableKey) -> Option<&LifeTable>;
}

/// In-memory set of tables keyed by category
///
/// Loaded once and reused across valuations as a read-only cache.
#[derive(Debug, Clone, Default)]
pub struct LifeTables {
    tables: HashMap<TableKey, LifeTable>,
}

impl LifeTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the table for a category
    pub fn insert(&mut self, key: TableKey, table: LifeTable) -> Option<LifeTable> {
        self.tables.insert(key, table)
    }

    pub fn with_table(mut self, key: TableKey, table: LifeTable) -> Self {
        self.insert(key, table);
        self
    }

    pub fn get(&self, key: &TableKey) -> Option<&LifeTable> {
        self.tables.get(key)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TableProvider for LifeTables {
    fn table(&self, key: &TableKey) -> Option<&LifeTable> {
        self.get(key)
    }
}
