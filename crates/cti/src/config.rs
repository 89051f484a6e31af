/// Settings applied when a [`Db`](crate::Db) is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prepended to every table name
    pub table_name_prefix: Option<String>,

    /// Column on a superclass table naming the concrete subclass of a row
    pub discriminator_column: String,

    /// Superclass columns that are never inherited, in addition to the
    /// discriminator column
    pub reserved_columns: Vec<String>,

    /// Wrap the superclass and subclass writes of a save in one transaction
    /// when the driver supports transactions.
    pub atomic_save: bool,
}

impl Config {
    pub fn is_reserved(&self, column: &str) -> bool {
        column == self.discriminator_column
            || self.reserved_columns.iter().any(|reserved| reserved == column)
    }

    pub(crate) fn table_name(&self, table_name: &str) -> String {
        match &self.table_name_prefix {
            Some(prefix) => format!("{prefix}{table_name}"),
            None => table_name.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_name_prefix: None,
            discriminator_column: "subtype".to_string(),
            reserved_columns: vec!["type".to_string(), "subtype".to_string()],
            atomic_save: false,
        }
    }
}
