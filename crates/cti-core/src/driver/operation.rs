mod delete_by_key;
pub use delete_by_key::DeleteByKey;

mod get_by_key;
pub use get_by_key::GetByKey;

mod insert;
pub use insert::Insert;

mod scan;
pub use scan::Scan;

mod transaction;
pub use transaction::Transaction;

mod update_by_key;
pub use update_by_key::UpdateByKey;

use super::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Create a new record, returning its primary key
    Insert(Insert),

    /// Delete records identified by the given keys
    DeleteByKey(DeleteByKey),

    /// Get one or more records by the primary key
    GetByKey(GetByKey),

    /// Read every record of a table
    Scan(Scan),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),

    /// Update a record by the primary key
    UpdateByKey(UpdateByKey),
}

impl Operation {
    /// The table the operation touches, if any.
    pub fn table(&self) -> Option<&str> {
        match self {
            Operation::Insert(op) => Some(&op.table),
            Operation::DeleteByKey(op) => Some(&op.table),
            Operation::GetByKey(op) => Some(&op.table),
            Operation::Scan(op) => Some(&op.table),
            Operation::UpdateByKey(op) => Some(&op.table),
            Operation::Transaction(_) => None,
        }
    }

    /// True for operations that modify stored rows.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Operation::Insert(_) | Operation::DeleteByKey(_) | Operation::UpdateByKey(_)
        )
    }
}
