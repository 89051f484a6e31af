mod column;
pub use column::Column;

mod model;
pub use model::Model;

mod name;
pub use name::Name;

mod relation;
pub use relation::{Dependent, Relation, RelationKind};

mod table;
pub use table::Table;

mod verify;

use crate::{Error, Result};

use indexmap::IndexMap;

/// All registered models, keyed by model name, in registration order.
#[derive(Debug, Default, Clone)]
pub struct Schema {
    models: IndexMap<String, Model>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a model. Model names must be unique.
    pub fn insert(&mut self, model: Model) -> Result<()> {
        if self.models.contains_key(&model.name) {
            return Err(Error::invalid_schema(format!(
                "model `{}` is registered more than once",
                model.name
            )));
        }
        self.models.insert(model.name.clone(), model);
        Ok(())
    }

    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.get(name)
    }

    pub fn model_mut(&mut self, name: &str) -> Option<&mut Model> {
        self.models.get_mut(name)
    }

    /// Gets a model by name, failing with an unknown model error.
    pub fn expect_model(&self, name: &str) -> Result<&Model> {
        self.model(name).ok_or_else(|| Error::unknown_model(name))
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> + '_ {
        self.models.values()
    }

    pub fn models_mut(&mut self) -> impl Iterator<Item = &mut Model> + '_ {
        self.models.values_mut()
    }

    /// Finds the table with the given name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.models()
            .map(|model| &model.table)
            .find(|table| table.name == name)
    }

    /// Checks that primary keys, foreign keys and relation targets line up.
    pub fn verify(&self) -> Result<()> {
        verify::Verify { schema: self }.verify()
    }
}
