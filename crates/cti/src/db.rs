mod builder;
pub use builder::Builder;

use crate::{Config, FallbackReason, Instance, ModelType, Polymorphic};

use cti_core::{
    driver::{
        operation::{self, Operation},
        Driver, Response,
    },
    schema::Name,
    stmt::Value,
    Error, Record, Result, Schema,
};
use indexmap::IndexMap;
use std::sync::Arc;

/// Shared state between all `Db` clones.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) driver: Box<dyn Driver>,

    pub(crate) schema: Schema,

    /// Every registered model, superclass-side types first
    pub(crate) types: IndexMap<String, Arc<ModelType>>,

    pub(crate) config: Config,
}

/// Handle to the registered models and the driver storing them.
///
/// Cloning is cheap; all clones share the same driver and types.
#[derive(Debug, Clone)]
pub struct Db {
    pub(crate) shared: Arc<Shared>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Schema {
        &self.shared.schema
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    /// Looks up a registered type by model name.
    pub fn ty(&self, name: &str) -> Result<Arc<ModelType>> {
        self.shared
            .types
            .get(name)
            .cloned()
            .ok_or_else(|| Error::unknown_model(name))
    }

    pub fn types(&self) -> impl Iterator<Item = &Arc<ModelType>> + '_ {
        self.shared.types.values()
    }

    /// A new unsaved instance of the named model.
    pub fn new_instance(&self, name: &str) -> Result<Instance> {
        Ok(Instance::new(self.ty(name)?))
    }

    /// Loads the row with the given key, re-resolved through its concrete
    /// type when the model acts as a superclass.
    pub async fn find(&self, name: &str, key: impl Into<Value>) -> Result<Instance> {
        Ok(self.find_resolved(name, key).await?.into_instance())
    }

    /// Like [`find`](Db::find), reporting how the row was resolved.
    pub async fn find_resolved(&self, name: &str, key: impl Into<Value>) -> Result<Polymorphic> {
        let ty = self.ty(name)?;
        let key = key.into();

        let Some(instance) = self.load(&ty, vec![key.clone()]).await?.pop() else {
            return Err(Error::record_not_found(format!(
                "`{}` with key {}",
                ty.name(),
                key
            )));
        };

        Ok(self.resolve(instance).await)
    }

    /// Loads the rows with the given keys. Missing keys are skipped.
    pub async fn find_many(
        &self,
        name: &str,
        keys: impl IntoIterator<Item = impl Into<Value>>,
    ) -> Result<Vec<Instance>> {
        Ok(self
            .find_many_resolved(name, keys)
            .await?
            .into_iter()
            .map(Polymorphic::into_instance)
            .collect())
    }

    pub async fn find_many_resolved(
        &self,
        name: &str,
        keys: impl IntoIterator<Item = impl Into<Value>>,
    ) -> Result<Vec<Polymorphic>> {
        let ty = self.ty(name)?;
        let keys = keys.into_iter().map(Into::into).collect();
        let instances = self.load(&ty, keys).await?;
        Ok(self.resolve_all(instances).await)
    }

    /// Loads every row of the model.
    pub async fn all(&self, name: &str) -> Result<Vec<Instance>> {
        Ok(self
            .all_resolved(name)
            .await?
            .into_iter()
            .map(Polymorphic::into_instance)
            .collect())
    }

    pub async fn all_resolved(&self, name: &str) -> Result<Vec<Polymorphic>> {
        let ty = self.ty(name)?;
        let records = self
            .exec(operation::Scan {
                table: ty.table_name().to_string(),
            })
            .await?
            .rows
            .into_records()?;
        let instances = self.hydrate(&ty, records).await?;
        Ok(self.resolve_all(instances).await)
    }

    /// Replaces the instance's values, including the superclass row, with
    /// the stored ones. Pending errors are cleared.
    pub async fn reload(&self, instance: &mut Instance) -> Result<()> {
        let key = instance.key().clone();
        let Some(fresh) = self.load(instance.ty(), vec![key.clone()]).await?.pop() else {
            return Err(Error::record_not_found(format!(
                "`{}` with key {}",
                instance.ty().name(),
                key
            )));
        };
        *instance = fresh;
        Ok(())
    }

    pub(crate) async fn exec(&self, op: impl Into<Operation>) -> Result<Response> {
        self.shared
            .driver
            .exec(&self.shared.schema, op.into())
            .await
    }

    /// Loads rows of `ty` by key, attaching the superclass row of each.
    pub(crate) async fn load(
        &self,
        ty: &Arc<ModelType>,
        keys: Vec<Value>,
    ) -> Result<Vec<Instance>> {
        let records = self
            .exec(operation::GetByKey {
                table: ty.table_name().to_string(),
                keys,
            })
            .await?
            .rows
            .into_records()?;
        self.hydrate(ty, records).await
    }

    pub(crate) async fn hydrate(
        &self,
        ty: &Arc<ModelType>,
        records: Vec<Record>,
    ) -> Result<Vec<Instance>> {
        let mut instances: Vec<_> = records
            .into_iter()
            .map(|record| Instance::from_record(ty.clone(), record))
            .collect();

        let Some(target) = ty.superclass() else {
            return Ok(instances);
        };

        let keys = instances.iter().map(|instance| instance.key().clone()).collect();
        let mut rows = self
            .exec(operation::GetByKey {
                table: target.table_name().to_string(),
                keys,
            })
            .await?
            .rows
            .into_records()?;

        for instance in &mut instances {
            let position = rows
                .iter()
                .position(|row| row.get(target.primary_key()) == instance.key());

            match position {
                Some(index) => {
                    let row = rows.swap_remove(index);
                    let association = Instance::from_record(target.clone(), row);
                    instance.association = Some(Box::new(association));
                }
                None => tracing::warn!(
                    model = %ty.name(),
                    key = %instance.key(),
                    "superclass row missing"
                ),
            }
        }

        Ok(instances)
    }

    async fn resolve_all(&self, instances: Vec<Instance>) -> Vec<Polymorphic> {
        let mut resolved = Vec::with_capacity(instances.len());
        for instance in instances {
            resolved.push(self.resolve(instance).await);
        }
        resolved
    }

    /// Re-loads a superclass row through the type its discriminator names.
    /// Failures fall back to the row as loaded.
    async fn resolve(&self, instance: Instance) -> Polymorphic {
        if !instance.ty().acts_as_superclass() {
            return Polymorphic::Concrete(instance);
        }

        let discriminator = instance.record().get(&self.shared.config.discriminator_column);
        let Some(type_name) = discriminator.as_str().filter(|_| !discriminator.is_blank()) else {
            tracing::debug!(
                model = %instance.ty().name(),
                key = %instance.key(),
                "no discriminator; keeping superclass row"
            );
            return fallback(instance, FallbackReason::NoDiscriminator);
        };

        let Some(concrete) = self.concrete_type(instance.ty(), type_name) else {
            tracing::warn!(
                model = %instance.ty().name(),
                key = %instance.key(),
                discriminator = %type_name,
                "discriminator names no subclass of the model"
            );
            let reason = FallbackReason::UnknownType(type_name.to_string());
            return fallback(instance, reason);
        };

        if Arc::ptr_eq(&concrete, instance.ty()) {
            return Polymorphic::Resolved(instance);
        }

        let key = instance.key().clone();
        let err = match self.load(&concrete, vec![key.clone()]).await {
            Ok(mut rows) => match rows.pop() {
                Some(resolved) => return Polymorphic::Resolved(resolved),
                None => Error::record_not_found(format!("`{}` with key {}", concrete.name(), key)),
            },
            Err(err) => err,
        };

        tracing::warn!(
            model = %instance.ty().name(),
            concrete = %concrete.name(),
            key = %key,
            error = %err,
            "failed to load row through its concrete type"
        );
        fallback(instance, FallbackReason::LookupFailed(err))
    }

    /// Discriminator to type: exact model name, then the upper camel case
    /// of the value, then of its singular. Only `ty` itself or a type
    /// inheriting from `ty` qualifies.
    fn concrete_type(
        &self,
        ty: &Arc<ModelType>,
        discriminator: &str,
    ) -> Option<Arc<ModelType>> {
        let types = &self.shared.types;
        let name = Name::new(discriminator);

        let concrete = types
            .get(discriminator)
            .or_else(|| types.get(&name.upper_camel_case()))
            .or_else(|| types.get(&name.singularize().upper_camel_case()))?;

        let related = Arc::ptr_eq(concrete, ty)
            || concrete
                .superclass()
                .is_some_and(|superclass| Arc::ptr_eq(superclass, ty));

        related.then(|| concrete.clone())
    }
}

fn fallback(instance: Instance, reason: FallbackReason) -> Polymorphic {
    Polymorphic::Fallback { instance, reason }
}
