//! Validation, save ordering, and deletion of instances.
//!
//! Saving an inheriting instance writes two rows. The superclass row goes
//! first so the driver can assign the shared identity, which is then copied
//! into the subclass's foreign key before the subclass row is written.

use crate::{Db, Instance};

use cti_core::{
    driver::operation::{self, Transaction},
    err,
    schema::{Dependent, RelationKind},
    validate, Error, Result,
};
use std::{future::Future, pin::Pin};

impl Db {
    /// Runs the column constraints of the instance and, for an inheriting
    /// instance, of its superclass row. Failures of the superclass row are
    /// copied onto the instance under the same attribute names.
    ///
    /// Returns `true` if the instance is valid.
    pub fn validate(&self, instance: &mut Instance) -> bool {
        validate_instance(instance)
    }

    /// Validates and persists the instance.
    ///
    /// An inheriting instance saves its superclass row first. When
    /// [`Config::atomic_save`](crate::Config::atomic_save) is set and the
    /// driver supports transactions, both writes commit or roll back
    /// together.
    pub async fn save(&self, instance: &mut Instance) -> Result<()> {
        if !self.validate(instance) {
            tracing::debug!(
                model = %instance.ty().name(),
                errors = instance.errors().len(),
                "validation failed"
            );
            return Err(Error::validation_failed(
                instance.ty().name(),
                instance.errors().len(),
            ));
        }

        let atomic = self.shared.config.atomic_save
            && instance.ty().inherits()
            && self.shared.driver.capability().transactions;

        if !atomic {
            return self.save_unchecked(instance, false).await;
        }

        let snapshot = instance.clone();
        self.exec(Transaction::Start).await?;

        match self.save_unchecked(instance, true).await {
            Ok(()) => {
                self.exec(Transaction::Commit).await?;
                Ok(())
            }
            Err(err) => {
                *instance = snapshot;
                if let Err(rollback) = self.exec(Transaction::Rollback).await {
                    tracing::warn!(
                        model = %instance.ty().name(),
                        error = %rollback,
                        "rollback failed"
                    );
                }
                Err(err)
            }
        }
    }

    async fn save_unchecked(&self, instance: &mut Instance, atomic: bool) -> Result<()> {
        let model = instance.ty().name().to_string();

        if instance.ty().inherits() {
            tracing::debug!(model = %model, "saving superclass row");
            self.save_inherit(instance).await?;

            tracing::debug!(model = %model, key = %instance.key(), "saving own row");
            if let Err(err) = self.persist(instance).await {
                if !atomic {
                    tracing::warn!(
                        model = %model,
                        key = %instance.key(),
                        error = %err,
                        "own row failed to save; superclass row is orphaned"
                    );
                }
                return Err(err);
            }
        } else {
            tracing::debug!(model = %model, "saving row");
            self.persist(instance).await?;
        }

        tracing::debug!(model = %model, key = %instance.key(), "saved");
        Ok(())
    }

    /// Stamps the discriminator on the superclass row, persists it, and
    /// copies its identity into the instance's foreign key.
    async fn save_inherit(&self, instance: &mut Instance) -> Result<()> {
        let ty = instance.ty().clone();
        let Some(mapping) = ty.mapping() else {
            return Ok(());
        };
        let discriminator = &self.shared.config.discriminator_column;

        // A persisted row keeps its identity; a missing superclass row is
        // re-inserted under it.
        let identity = instance.persisted.then(|| instance.key().clone());

        let Some(association) = instance.association_mut() else {
            return Ok(());
        };

        if let Some(identity) = identity.filter(|_| !association.is_persisted()) {
            tracing::warn!(
                model = %ty.name(),
                key = %identity,
                "re-inserting missing superclass row"
            );
            let primary_key = association.ty().primary_key().to_string();
            association.record.set(primary_key, identity);
        }

        if association.ty().model().has_column(discriminator) {
            association.record.set(discriminator, ty.name());
        }

        self.persist(association).await.map_err(|e| {
            e.context(err!(
                "saving `{}` of `{}`",
                mapping.association,
                ty.name()
            ))
        })?;

        let key = association.key().clone();
        instance.record.set(&mapping.foreign_key, key);
        Ok(())
    }

    /// Inserts a new row or updates a persisted one.
    async fn persist(&self, instance: &mut Instance) -> Result<()> {
        let table = instance.ty().table_name().to_string();

        if instance.persisted {
            let key = instance.key().clone();
            let count = self
                .exec(operation::UpdateByKey {
                    table,
                    key: key.clone(),
                    record: instance.record.clone(),
                })
                .await?
                .rows
                .into_count()?;

            if count == 0 {
                return Err(Error::record_not_found(format!(
                    "`{}` with key {}",
                    instance.ty().name(),
                    key
                )));
            }
        } else {
            let key = self
                .exec(operation::Insert {
                    table,
                    record: instance.record.clone(),
                })
                .await?
                .rows
                .into_key()?;

            let primary_key = instance.ty().primary_key().to_string();
            instance.record.set(primary_key, key);
            instance.persisted = true;
        }

        Ok(())
    }

    /// Deletes the instance's row, then every row reached through a
    /// dependent relation. For an inheriting instance this removes the
    /// superclass row too.
    pub async fn delete(&self, instance: &Instance) -> Result<()> {
        self.delete_boxed(instance).await
    }

    fn delete_boxed<'a>(
        &'a self,
        instance: &'a Instance,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let key = instance.key().clone();
            if key.is_null() {
                return Err(Error::record_not_found(format!(
                    "`{}` has no key",
                    instance.ty().name()
                )));
            }

            let count = self
                .exec(operation::DeleteByKey {
                    table: instance.ty().table_name().to_string(),
                    keys: vec![key.clone()],
                })
                .await?
                .rows
                .into_count()?;

            tracing::debug!(
                model = %instance.ty().name(),
                key = %key,
                count,
                "deleted row"
            );

            for relation in &instance.ty().model().relations {
                if relation.dependent != Dependent::Destroy
                    || relation.kind == RelationKind::BelongsTo
                {
                    continue;
                }

                let dependents = self.related(instance, &relation.name).await?.into_many();
                for dependent in &dependents {
                    if dependent.is_persisted() {
                        self.delete_boxed(dependent).await?;
                    }
                }
            }

            Ok(())
        })
    }
}

fn validate_instance(instance: &mut Instance) -> bool {
    instance.errors.clear();
    let mut valid = validate::validate_record(
        &instance.ty.model().table,
        &instance.record,
        &mut instance.errors,
    );

    if instance.ty.inherits() {
        valid &= inherit_association_must_be_valid(instance);
    }

    valid
}

fn inherit_association_must_be_valid(instance: &mut Instance) -> bool {
    let Some(association) = instance.association_mut() else {
        return true;
    };

    if validate_instance(association) {
        return true;
    }

    let failures: Vec<_> = association
        .errors
        .iter()
        .map(|(attribute, message)| (attribute.to_string(), message.to_string()))
        .collect();

    for (attribute, message) in failures {
        instance.errors.add(attribute, message);
    }

    false
}
