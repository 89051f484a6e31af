use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    /// Which table to read
    pub table: String,
}

impl From<Scan> for Operation {
    fn from(value: Scan) -> Self {
        Self::Scan(value)
    }
}
