use super::{Model, RelationKind, Schema};
use crate::{Error, Result};

pub(super) struct Verify<'a> {
    pub(super) schema: &'a Schema,
}

impl Verify<'_> {
    pub(super) fn verify(&self) -> Result<()> {
        for model in self.schema.models() {
            self.verify_primary_key(model)?;
            self.verify_relations(model)?;
        }

        Ok(())
    }

    fn verify_primary_key(&self, model: &Model) -> Result<()> {
        if model.primary_key_column().is_none() {
            return Err(Error::invalid_schema(format!(
                "primary key `{}` of model `{}` is not a column of table `{}`",
                model.primary_key, model.name, model.table.name
            )));
        }

        Ok(())
    }

    fn verify_relations(&self, model: &Model) -> Result<()> {
        for relation in &model.relations {
            let target = self.schema.model(&relation.target).ok_or_else(|| {
                Error::unknown_model(&relation.target).context(Error::invalid_schema(format!(
                    "relation `{}::{}` targets an unregistered model",
                    model.name, relation.name
                )))
            })?;

            // The foreign key lives on whichever side holds the reference.
            let (holder, column) = match relation.kind {
                RelationKind::BelongsTo => (model, &relation.foreign_key),
                RelationKind::HasOne | RelationKind::HasMany => (target, &relation.foreign_key),
            };

            if !holder.has_column(column) {
                return Err(Error::invalid_schema(format!(
                    "relation `{}::{}` uses foreign key `{}`, which is not a column of table `{}`",
                    model.name, relation.name, column, holder.table.name
                )));
            }
        }

        Ok(())
    }
}
