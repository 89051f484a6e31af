use super::*;

use crate::{stmt, Record};

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateByKey {
    /// Which table to update
    pub table: String,

    /// Primary key of the row to update
    pub key: stmt::Value,

    /// Column values to assign
    pub record: Record,
}

impl From<UpdateByKey> for Operation {
    fn from(value: UpdateByKey) -> Self {
        Self::UpdateByKey(value)
    }
}
