use crate::Key;

use cti_core::{bail, Record, Result};
use indexmap::IndexMap;
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub(crate) struct Store {
    pub(crate) tables: HashMap<String, TableData>,
}

#[derive(Debug, Clone)]
pub(crate) struct TableData {
    pub(crate) rows: IndexMap<Key, Record>,

    /// Next value handed out for the auto-increment column
    pub(crate) next_id: i64,
}

impl Default for TableData {
    fn default() -> Self {
        Self {
            rows: IndexMap::new(),
            next_id: 1,
        }
    }
}

impl Store {
    pub(crate) fn table(&self, name: &str) -> Result<&TableData> {
        match self.tables.get(name) {
            Some(data) => Ok(data),
            None => bail!("table `{}` is not registered", name),
        }
    }

    pub(crate) fn table_mut(&mut self, name: &str) -> Result<&mut TableData> {
        match self.tables.get_mut(name) {
            Some(data) => Ok(data),
            None => bail!("table `{}` is not registered", name),
        }
    }
}
