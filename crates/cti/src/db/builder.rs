use super::{Db, Shared};
use crate::{Config, Inheritance, Mapping, ModelType};

use cti_core::{driver::Driver, err, schema::Model, Error, Result, Schema};
use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    /// Registered models, in registration order
    models: Vec<Model>,

    /// Subclass model name to association id, as declared
    mappings: IndexMap<String, String>,

    /// Models declared to act as a superclass
    superclasses: Vec<String>,

    /// Declarations rejected before `build`
    errors: Vec<Error>,

    config: Config,
}

impl Builder {
    pub fn register(&mut self, model: Model) -> &mut Self {
        self.models.push(model);
        self
    }

    /// Declares that `subclass` inherits from the model named by
    /// `association_id`, e.g. `"animal"` or `"Zoo::Animal"`.
    ///
    /// The target is resolved when the `Db` is built.
    pub fn inherits_from(&mut self, subclass: &str, association_id: &str) -> &mut Self {
        if self.mappings.contains_key(subclass) {
            self.errors.push(Error::invalid_schema(format!(
                "`{subclass}` already inherits from `{}`",
                self.mappings[subclass]
            )));
        } else {
            self.mappings
                .insert(subclass.to_string(), association_id.to_string());
        }
        self
    }

    /// Declares that rows of `name` are re-resolved through the type named
    /// by their discriminator. Has no effect when the model's table lacks
    /// the discriminator column.
    pub fn acts_as_superclass(&mut self, name: &str) -> &mut Self {
        self.superclasses.push(name.to_string());
        self
    }

    /// Set the table name prefix for all tables
    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.config.table_name_prefix = Some(prefix.to_string());
        self
    }

    pub fn discriminator_column(&mut self, column: &str) -> &mut Self {
        self.config.discriminator_column = column.to_string();
        self
    }

    pub fn reserved_columns<I, S>(&mut self, columns: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.reserved_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn atomic_save(&mut self, atomic_save: bool) -> &mut Self {
        self.config.atomic_save = atomic_save;
        self
    }

    /// Replaces every setting at once.
    pub fn config(&mut self, config: Config) -> &mut Self {
        self.config = config;
        self
    }

    /// Resolves every declaration, derives inherited members, and registers
    /// the resulting schema with the driver.
    pub async fn build(&mut self, driver: impl Driver) -> Result<Db> {
        if let Some(err) = self.errors.first() {
            return Err(err.clone());
        }

        let schema = self.build_schema()?;
        let types = self.build_types(&schema)?;

        driver.register_schema(&schema).await?;

        tracing::debug!(
            models = schema.models().count(),
            mappings = self.mappings.len(),
            "built db"
        );

        Ok(Db {
            shared: Arc::new(Shared {
                driver: Box::new(driver),
                schema,
                types,
                config: self.config.clone(),
            }),
        })
    }

    fn build_schema(&self) -> Result<Schema> {
        let mut schema = Schema::new();

        for model in &self.models {
            let mut model = model.clone();
            model.table.name = self.config.table_name(&model.table.name);
            schema.insert(model)?;
        }

        for (subclass, association_id) in &self.mappings {
            let context = || err!("declaring `{subclass}` inherits from `{association_id}`");

            if schema.model(subclass).is_none() {
                return Err(Error::unknown_model(subclass).context(context()));
            }

            let mapping = Mapping::new(subclass, association_id);
            let target = mapping
                .resolve_target(&schema)
                .map_err(|e| e.context(context()))?
                .clone();

            if target.name == *subclass {
                return Err(Error::invalid_schema(format!(
                    "`{subclass}` cannot inherit from itself"
                )));
            }

            if self.mappings.contains_key(&target.name) {
                return Err(Error::invalid_schema(format!(
                    "`{subclass}` inherits from `{}`, which inherits from another model",
                    target.name
                )));
            }

            let Some(model) = schema.model_mut(subclass) else {
                return Err(Error::unknown_model(subclass));
            };
            mapping.declare(model, &target)?;
        }

        schema.verify()?;
        Ok(schema)
    }

    fn build_types(&self, schema: &Schema) -> Result<IndexMap<String, Arc<ModelType>>> {
        for name in &self.superclasses {
            schema
                .expect_model(name)
                .map_err(|e| e.context(err!("declaring `{name}` acts as a superclass")))?;
        }

        let mut types = IndexMap::new();

        for model in schema.models() {
            if self.mappings.contains_key(&model.name) {
                continue;
            }
            let ty = ModelType::new(model.clone(), None, self.is_superclass(model));
            types.insert(model.name.clone(), Arc::new(ty));
        }

        for (subclass, association_id) in &self.mappings {
            let model = schema.expect_model(subclass)?;
            let mapping = Mapping::new(subclass, association_id);
            let target = types
                .get(&mapping.resolve_target(schema)?.name)
                .cloned()
                .ok_or_else(|| Error::unknown_model(association_id))?;

            let inheritance = Inheritance::new(mapping, model, target, &self.config);
            let ty = ModelType::new(
                model.clone(),
                Some(inheritance),
                self.is_superclass(model),
            );
            types.insert(subclass.clone(), Arc::new(ty));
        }

        Ok(types)
    }

    fn is_superclass(&self, model: &Model) -> bool {
        if !self.superclasses.contains(&model.name) {
            return false;
        }

        let discriminator = &self.config.discriminator_column;
        if !model.has_column(discriminator) {
            tracing::debug!(
                model = %model.name,
                column = %discriminator,
                "no discriminator column; not acting as a superclass"
            );
            return false;
        }

        true
    }
}
