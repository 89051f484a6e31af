use crate::{
    metadata,
    proxy::{Accessor, AccessorTable},
    Config, Mapping, ModelType,
};

use cti_core::schema::Model;
use std::sync::Arc;

/// Everything a subclass type knows about its superclass: the mapping, the
/// resolved superclass type, and the derived inherited names.
///
/// Derived once when the [`Db`](crate::Db) is built and never refreshed.
#[derive(Debug)]
pub struct Inheritance {
    mapping: Mapping,

    /// The superclass-side type
    target: Arc<ModelType>,

    inherited_column_names: Vec<String>,

    inherited_method_names: Vec<String>,

    accessors: AccessorTable,
}

impl Inheritance {
    pub(crate) fn new(
        mapping: Mapping,
        subclass: &Model,
        target: Arc<ModelType>,
        config: &Config,
    ) -> Self {
        let inherited_column_names =
            metadata::inherited_column_names(subclass, target.model(), config);
        let inherited_method_names = metadata::inherited_method_names(subclass, target.model());

        let accessors = AccessorTable::new(
            &inherited_method_names,
            &inherited_column_names,
            &target.model().primary_key,
            &mapping.foreign_key,
        );

        tracing::debug!(
            model = %subclass.name,
            association = %mapping.association,
            columns = ?inherited_column_names,
            methods = ?inherited_method_names,
            "derived inherited members"
        );

        Self {
            mapping,
            target,
            inherited_column_names,
            inherited_method_names,
            accessors,
        }
    }

    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// The superclass-side type.
    pub fn target(&self) -> &Arc<ModelType> {
        &self.target
    }

    pub fn inherited_column_names(&self) -> &[String] {
        &self.inherited_column_names
    }

    pub fn inherited_method_names(&self) -> &[String] {
        &self.inherited_method_names
    }

    /// Every proxied name: relations, then columns.
    pub fn inherited_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.accessors.names()
    }

    pub(crate) fn accessor(&self, name: &str) -> Option<&Accessor> {
        self.accessors.get(name)
    }
}
