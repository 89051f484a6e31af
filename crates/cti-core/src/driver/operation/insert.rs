use super::*;

use crate::Record;

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    /// Which table to insert into
    pub table: String,

    /// Column values. The driver fills in the auto-increment column when it
    /// is absent or `Null`.
    pub record: Record,
}

impl From<Insert> for Operation {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
