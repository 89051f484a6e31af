use crate::Config;

use cti_core::schema::Model;
use indexmap::IndexSet;

/// Columns of the superclass table that the subclass table lacks, in
/// superclass column order. Reserved discriminator columns and the
/// superclass identity column are left out; the identity is reached through
/// the subclass's foreign key.
pub(crate) fn inherited_column_names(
    subclass: &Model,
    target: &Model,
    config: &Config,
) -> Vec<String> {
    target
        .column_names()
        .filter(|name| {
            *name != target.primary_key && !subclass.has_column(name) && !config.is_reserved(name)
        })
        .map(String::from)
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Relations declared on the superclass that the subclass does not declare.
pub(crate) fn inherited_method_names(subclass: &Model, target: &Model) -> Vec<String> {
    target
        .relation_names()
        .filter(|name| subclass.relation_by_name(name).is_none())
        .map(String::from)
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}
