use super::*;

use crate::stmt;

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteByKey {
    /// Which table to delete from
    pub table: String,

    /// Which keys to delete
    pub keys: Vec<stmt::Value>,
}

impl From<DeleteByKey> for Operation {
    fn from(value: DeleteByKey) -> Self {
        Self::DeleteByKey(value)
    }
}
