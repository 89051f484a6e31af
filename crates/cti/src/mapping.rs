use cti_core::{
    err,
    schema::{Dependent, Model, Name, Relation, Schema},
    Error, Result,
};

/// Declares that a subclass shares its identity with one row of a
/// superclass-side model.
///
/// Each mapped type owns its `Mapping`; there is no shared slot, so any
/// number of subclasses can be mapped to different superclasses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    /// Name of the subclass model
    pub subclass: String,

    /// Association name, e.g. `animal` for `Animal` or `zoo_animal` for
    /// `Zoo::Animal`
    pub association: String,

    /// Subclass column holding the superclass row's identity. Also the
    /// subclass's primary key.
    pub foreign_key: String,
}

/// Normalizes an association id into the association name: namespace
/// separators are flattened to `_` and the result is lower-cased.
pub fn association_name(association_id: &str) -> String {
    association_id.replace("::", "_").to_lowercase()
}

impl Mapping {
    pub fn new(subclass: impl Into<String>, association_id: &str) -> Self {
        let association = association_name(association_id);
        let foreign_key = format!("{association}_id");

        Self {
            subclass: subclass.into(),
            association,
            foreign_key,
        }
    }

    /// Finds the superclass-side model for the association.
    ///
    /// A model matches when its name is the camel-cased association name, or
    /// when its own normalized name equals the association name.
    pub fn resolve_target<'a>(&self, schema: &'a Schema) -> Result<&'a Model> {
        let camel = Name::new(&self.association).upper_camel_case();

        schema
            .model(&camel)
            .or_else(|| {
                schema
                    .models()
                    .find(|model| association_name(&model.name) == self.association)
            })
            .ok_or_else(|| {
                Error::unknown_model(&self.association).context(err!(
                    "resolving association `{}` of `{}`",
                    self.association,
                    self.subclass
                ))
            })
    }

    /// Applies the declaration to the subclass model: the primary key moves
    /// to the foreign key column, and a dependent one-to-one relation to the
    /// superclass is added under the association name.
    pub(crate) fn declare(&self, subclass: &mut Model, target: &Model) -> Result<()> {
        if !subclass.has_column(&self.foreign_key) {
            return Err(Error::invalid_schema(format!(
                "`{}` inherits from `{}` but table `{}` has no `{}` column",
                subclass.name, target.name, subclass.table.name, self.foreign_key
            )));
        }

        if subclass.relation_by_name(&self.association).is_some() {
            return Err(Error::invalid_schema(format!(
                "`{}` already declares a relation named `{}`",
                subclass.name, self.association
            )));
        }

        subclass.primary_key = self.foreign_key.clone();
        subclass.relations.push(
            Relation::has_one(&self.association, &target.name, &target.primary_key)
                .dependent(Dependent::Destroy),
        );

        Ok(())
    }
}
