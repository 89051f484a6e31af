use super::{Column, Name, Relation, Table};

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Type name of the model, e.g. `Dog` or `Zoo::Animal`
    pub name: String,

    /// Table the model's own columns live in
    pub table: Table,

    /// Name of the primary key column
    pub primary_key: String,

    /// Declared relations
    pub relations: Vec<Relation>,
}

impl Model {
    /// Creates a model with a table named after the model and an `id`
    /// primary key.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let table = Table::new(Name::new(&name).snake_case());

        Self {
            name,
            table,
            primary_key: "id".to_string(),
            relations: vec![],
        }
    }

    pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table.name = table_name.into();
        self
    }

    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = column.into();
        self
    }

    pub fn column(mut self, column: Column) -> Self {
        self.table.columns.push(column);
        self
    }

    pub fn relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn relation_by_name(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|relation| relation.name == name)
    }

    pub fn relation_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.relations.iter().map(|relation| relation.name.as_str())
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.table.column_names()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.table.has_column(name)
    }

    pub fn primary_key_column(&self) -> Option<&Column> {
        self.table.column(&self.primary_key)
    }
}
