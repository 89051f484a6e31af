use crate::{stmt::Value, Error, Record, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Primary key assigned to an inserted row
    Key(Value),

    /// Matching rows
    Records(Vec<Record>),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn key(key: impl Into<Value>) -> Self {
        Self {
            rows: Rows::Key(key.into()),
        }
    }

    pub fn records(records: Vec<Record>) -> Self {
        Self {
            rows: Rows::Records(records),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn into_count(self) -> Result<u64> {
        match self {
            Rows::Count(count) => Ok(count),
            rows => Err(unexpected("count", &rows)),
        }
    }

    pub fn into_key(self) -> Result<Value> {
        match self {
            Rows::Key(key) => Ok(key),
            rows => Err(unexpected("key", &rows)),
        }
    }

    pub fn into_records(self) -> Result<Vec<Record>> {
        match self {
            Rows::Records(records) => Ok(records),
            rows => Err(unexpected("records", &rows)),
        }
    }
}

fn unexpected(expected: &str, actual: &Rows) -> Error {
    crate::err!("driver returned an unexpected response; expected {expected}, got {actual:?}")
}
