use super::*;

use crate::stmt;

#[derive(Debug, Clone, PartialEq)]
pub struct GetByKey {
    /// Which table to get from
    pub table: String,

    /// Which keys to fetch. Missing keys are skipped.
    pub keys: Vec<stmt::Value>,
}

impl From<GetByKey> for Operation {
    fn from(value: GetByKey) -> Self {
        Self::GetByKey(value)
    }
}
