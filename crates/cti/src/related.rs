use crate::{proxy::Accessor, Db, Instance};

use cti_core::{
    driver::operation,
    schema::{Relation, RelationKind},
    Error, Result,
};
use std::{future::Future, pin::Pin};

/// Rows reached by following a relation.
#[derive(Debug)]
pub enum Related {
    /// `belongs_to` and `has_one`
    One(Option<Instance>),

    /// `has_many`
    Many(Vec<Instance>),
}

impl Related {
    pub fn into_one(self) -> Option<Instance> {
        match self {
            Related::One(instance) => instance,
            Related::Many(instances) => instances.into_iter().next(),
        }
    }

    pub fn into_many(self) -> Vec<Instance> {
        match self {
            Related::One(instance) => instance.into_iter().collect(),
            Related::Many(instances) => instances,
        }
    }
}

impl Db {
    /// Loads the rows reached through the relation `name`.
    ///
    /// Relations inherited from the superclass are followed from the
    /// associated row. The inheritance association itself always yields a
    /// row: the loaded or stored superclass row when there is one, otherwise
    /// an unsaved one.
    pub async fn related(&self, instance: &Instance, name: &str) -> Result<Related> {
        self.related_boxed(instance, name).await
    }

    fn related_boxed<'a>(
        &'a self,
        instance: &'a Instance,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Related>> + Send + 'a>> {
        Box::pin(async move {
            if let Some(relation) = instance.ty().model().relation_by_name(name) {
                if instance.ty().association_name() == Some(name) {
                    return self.inheritance_association(instance, relation).await;
                }
                return self.follow(instance, relation).await;
            }

            match instance.ty().accessor(name) {
                Some(Accessor::Relation) => {
                    let association = match instance.association() {
                        Some(association) => association.clone(),
                        None => match instance.ty().superclass() {
                            Some(target) => Instance::new(target.clone()),
                            None => {
                                return Err(Error::unknown_attribute(instance.ty().name(), name))
                            }
                        },
                    };
                    self.related_boxed(&association, name).await
                }
                _ => Err(Error::unknown_attribute(instance.ty().name(), name)),
            }
        })
    }

    /// The superclass-side row: the loaded one if it is persisted, else the
    /// stored row with the instance's key, else the row built in memory (or
    /// a fresh one) that the next save will insert.
    async fn inheritance_association(
        &self,
        instance: &Instance,
        relation: &Relation,
    ) -> Result<Related> {
        if let Some(association) = instance.association().filter(|a| a.is_persisted()) {
            return Ok(Related::One(Some(association.clone())));
        }

        if let Some(stored) = self.follow(instance, relation).await?.into_one() {
            return Ok(Related::One(Some(stored)));
        }

        let built = match (instance.association(), instance.ty().superclass()) {
            (Some(association), _) => Some(association.clone()),
            (None, Some(target)) => Some(Instance::new(target.clone())),
            (None, None) => None,
        };
        Ok(Related::One(built))
    }

    async fn follow(&self, instance: &Instance, relation: &Relation) -> Result<Related> {
        let target = self.ty(&relation.target)?;

        match relation.kind {
            RelationKind::BelongsTo => {
                let key = instance.get(&relation.foreign_key)?;
                if key.is_null() {
                    return Ok(Related::One(None));
                }
                let mut rows = self.load(&target, vec![key]).await?;
                Ok(Related::One(rows.pop()))
            }
            RelationKind::HasOne | RelationKind::HasMany => {
                let key = instance.key().clone();
                if key.is_null() {
                    return Ok(if relation.is_has_many() {
                        Related::Many(vec![])
                    } else {
                        Related::One(None)
                    });
                }

                let records = self
                    .exec(operation::Scan {
                        table: target.table_name().to_string(),
                    })
                    .await?
                    .rows
                    .into_records()?
                    .into_iter()
                    .filter(|record| *record.get(&relation.foreign_key) == key)
                    .collect();
                let mut rows = self.hydrate(&target, records).await?;

                Ok(if relation.is_has_many() {
                    Related::Many(rows)
                } else {
                    Related::One(if rows.is_empty() { None } else { Some(rows.remove(0)) })
                })
            }
        }
    }
}
