use crate::{proxy::Accessor, Inheritance, Mapping};

use cti_core::schema::Model;
use std::{fmt, sync::Arc};

/// A registered model together with its inheritance state.
///
/// Types are built once by [`Db::builder`](crate::Db::builder) and shared by
/// every instance of the model.
#[derive(Debug)]
pub struct ModelType {
    model: Model,

    /// Set when the model inherits from a superclass-side model
    inheritance: Option<Inheritance>,

    /// Set when rows of this model are re-resolved by discriminator
    acts_as_superclass: bool,
}

impl ModelType {
    pub(crate) fn new(
        model: Model,
        inheritance: Option<Inheritance>,
        acts_as_superclass: bool,
    ) -> Self {
        Self {
            model,
            inheritance,
            acts_as_superclass,
        }
    }

    pub fn name(&self) -> &str {
        &self.model.name
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn table_name(&self) -> &str {
        &self.model.table.name
    }

    pub fn primary_key(&self) -> &str {
        &self.model.primary_key
    }

    pub fn inherits(&self) -> bool {
        self.inheritance.is_some()
    }

    pub fn acts_as_superclass(&self) -> bool {
        self.acts_as_superclass
    }

    pub fn inheritance(&self) -> Option<&Inheritance> {
        self.inheritance.as_ref()
    }

    pub fn mapping(&self) -> Option<&Mapping> {
        self.inheritance.as_ref().map(Inheritance::mapping)
    }

    /// Name of the association to the superclass-side row.
    pub fn association_name(&self) -> Option<&str> {
        self.mapping().map(|mapping| mapping.association.as_str())
    }

    /// The superclass-side type.
    pub fn superclass(&self) -> Option<&Arc<ModelType>> {
        self.inheritance.as_ref().map(Inheritance::target)
    }

    /// Columns of the superclass table the model reads through its
    /// association. Empty for a model that does not inherit.
    pub fn inherited_column_names(&self) -> &[String] {
        self.inheritance
            .as_ref()
            .map(Inheritance::inherited_column_names)
            .unwrap_or_default()
    }

    /// Relations of the superclass model the model follows through its
    /// association. Empty for a model that does not inherit.
    pub fn inherited_method_names(&self) -> &[String] {
        self.inheritance
            .as_ref()
            .map(Inheritance::inherited_method_names)
            .unwrap_or_default()
    }

    /// The model's own column names.
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.model.column_names()
    }

    pub(crate) fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.inheritance.as_ref()?.accessor(name)
    }
}

impl fmt::Display for ModelType {
    /// Renders the model name followed by its own columns and their types,
    /// e.g. `Dog(animal_id: i64, breed: string)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = &self.model.table.columns;

        if columns.is_empty() {
            return write!(f, "{}(Table doesn't exist)", self.name());
        }

        write!(f, "{}(", self.name())?;
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", column.name, column.ty)?;
        }
        f.write_str(")")
    }
}
