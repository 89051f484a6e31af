use crate::{proxy::Accessor, ModelType};

use cti_core::{bail, stmt::Value, validate::Errors, Error, Record, Result};
use std::{fmt, sync::Arc};

/// One row of a model, plus the superclass-side row it inherits from.
///
/// Inherited attributes are read and written through the associated row;
/// the identity column always reads from the instance's own foreign key.
#[derive(Clone)]
pub struct Instance {
    pub(crate) ty: Arc<ModelType>,

    /// Values of the model's own columns
    pub(crate) record: Record,

    /// The superclass-side row. Built on first write when absent.
    pub(crate) association: Option<Box<Instance>>,

    pub(crate) persisted: bool,

    pub(crate) errors: Errors,
}

impl Instance {
    /// A new, unsaved instance with every own column set to `Null`.
    pub fn new(ty: Arc<ModelType>) -> Self {
        let record = Record::with_columns(ty.column_names());
        Self {
            ty,
            record,
            association: None,
            persisted: false,
            errors: Errors::default(),
        }
    }

    /// An instance for a row loaded from the driver.
    pub(crate) fn from_record(ty: Arc<ModelType>, record: Record) -> Self {
        Self {
            ty,
            record,
            association: None,
            persisted: true,
            errors: Errors::default(),
        }
    }

    pub fn ty(&self) -> &Arc<ModelType> {
        &self.ty
    }

    /// The model's own column values.
    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Value of the primary key column. For an inheriting model this is the
    /// foreign key to the superclass row.
    pub fn key(&self) -> &Value {
        self.record.get(self.ty.primary_key())
    }

    /// The associated superclass-side row, if one is loaded or built.
    pub fn association(&self) -> Option<&Instance> {
        self.association.as_deref()
    }

    /// The associated superclass-side row, constructing an empty unsaved one
    /// when none is loaded. Returns `None` for a model that does not inherit.
    pub fn association_mut(&mut self) -> Option<&mut Instance> {
        let target = self.ty.superclass()?;

        let association = self.association.get_or_insert_with(|| {
            tracing::trace!(
                model = %self.ty.name(),
                target = %target.name(),
                "building superclass row"
            );
            Box::new(Instance::new(target.clone()))
        });

        Some(association.as_mut())
    }

    /// Reads an attribute by name.
    ///
    /// Own columns are read directly. Inherited columns read through the
    /// associated row, or `Null` when no row is loaded yet.
    pub fn get(&self, name: &str) -> Result<Value> {
        if self.ty.model().has_column(name) {
            return Ok(self.record.get(name).clone());
        }

        match self.ty.accessor(name) {
            Some(Accessor::Identity { foreign_key }) => {
                Ok(self.record.get(foreign_key).clone())
            }
            Some(Accessor::Column) => match self.association() {
                Some(association) => association.get(name),
                None => Ok(Value::Null),
            },
            Some(Accessor::Relation) => Err(self.relation_access(name)),
            None => Err(Error::unknown_attribute(self.ty.name(), name)),
        }
    }

    /// Writes an attribute by name. Nothing is persisted until the next
    /// save.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();

        if self.ty.model().has_column(name) {
            self.record.set(name, value);
            return Ok(());
        }

        match self.ty.accessor(name).cloned() {
            Some(Accessor::Identity { foreign_key }) => {
                self.record.set(foreign_key, value);
                Ok(())
            }
            Some(Accessor::Column) => match self.association_mut() {
                Some(association) => association.set(name, value),
                None => Err(Error::unknown_attribute(self.ty.name(), name)),
            },
            Some(Accessor::Relation) => Err(self.relation_access(name)),
            None => Err(Error::unknown_attribute(self.ty.name(), name)),
        }
    }

    /// Reads an own column cast to its declared type, or an inherited
    /// attribute through the association.
    pub fn read_attribute(&self, name: &str) -> Result<Value> {
        if let Some(column) = self.ty.model().table.column(name) {
            return self.record.get(name).clone().cast(column.ty);
        }

        match self.ty.accessor(name) {
            Some(Accessor::Column | Accessor::Identity { .. }) => self.get(name),
            _ => Err(Error::unknown_attribute(self.ty.name(), name)),
        }
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.ty.model().has_column(name)
            || self
                .ty
                .inherited_column_names()
                .iter()
                .any(|inherited| inherited == name)
    }

    /// Inherited column names followed by own column names.
    pub fn attribute_names(&self) -> Vec<&str> {
        self.ty
            .inherited_column_names()
            .iter()
            .map(String::as_str)
            .chain(self.ty.column_names())
            .collect()
    }

    /// Own values merged with inherited values. Own columns win.
    pub fn attributes(&self) -> Record {
        let mut attributes = self.inherited_attributes();
        for (name, value) in self.record.iter() {
            attributes.set(name, value.clone());
        }
        attributes
    }

    /// Values of the inherited columns, read through the proxy.
    pub fn inherited_attributes(&self) -> Record {
        let mut attributes = Record::new();
        for name in self.ty.inherited_column_names() {
            // Every inherited column has a column or identity accessor.
            if let Ok(value) = self.get(name) {
                attributes.set(name, value);
            }
        }
        attributes
    }

    /// Points a `belongs_to` relation at `other`, setting the foreign key to
    /// `other`'s primary key. Inherited relations are set on the associated
    /// row.
    pub fn associate(&mut self, name: &str, other: &Instance) -> Result<()> {
        if let Some(relation) = self.ty.model().relation_by_name(name) {
            if !relation.is_belongs_to() {
                bail!(
                    "`{}` on `{}` is not a belongs_to relation",
                    name,
                    self.ty.name()
                );
            }

            if relation.target != other.ty.name() {
                bail!(
                    "`{}` on `{}` expects a `{}`, got a `{}`",
                    name,
                    self.ty.name(),
                    relation.target,
                    other.ty.name()
                );
            }

            let foreign_key = relation.foreign_key.clone();
            self.record.set(foreign_key, other.key().clone());
            return Ok(());
        }

        match self.ty.accessor(name) {
            Some(Accessor::Relation) => match self.association_mut() {
                Some(association) => association.associate(name, other),
                None => Err(Error::unknown_attribute(self.ty.name(), name)),
            },
            _ => Err(Error::unknown_attribute(self.ty.name(), name)),
        }
    }

    fn relation_access(&self, name: &str) -> Error {
        cti_core::err!(
            "`{}` is a relation of `{}`; load it with `Db::related`",
            name,
            self.ty.name()
        )
    }
}

impl fmt::Debug for Instance {
    /// Renders `#<Dog name: "Rex", animal_id: 1, breed: "Lab">`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<{}", self.ty.name())?;
        for (i, name) in self.attribute_names().into_iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            let value = self.get(name).unwrap_or_default();
            write!(f, "{name}: {value}")?;
        }
        f.write_str(">")
    }
}
