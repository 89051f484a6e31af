use indexmap::IndexMap;

/// How an inherited name is reached from a subclass instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Accessor {
    /// The superclass identity column. Reads and writes go to the
    /// subclass's own foreign key, which always holds the same value, so
    /// the association is never consulted.
    Identity { foreign_key: String },

    /// A column of the associated superclass row.
    Column,

    /// A relation declared on the superclass model, followed from the
    /// associated row.
    Relation,
}

/// Name to accessor lookup consulted by the generic get/set dispatch on
/// [`Instance`](crate::Instance).
#[derive(Debug, Clone, Default)]
pub(crate) struct AccessorTable {
    entries: IndexMap<String, Accessor>,
}

impl AccessorTable {
    /// Builds the table from the derived name sets. Relation names are
    /// entered first, then the identity column, then inherited columns; a
    /// later entry with the same name replaces an earlier one.
    pub(crate) fn new(
        method_names: &[String],
        column_names: &[String],
        identity_column: &str,
        foreign_key: &str,
    ) -> Self {
        let mut entries = IndexMap::new();

        for name in method_names {
            entries.insert(name.clone(), Accessor::Relation);
        }

        entries.insert(
            identity_column.to_string(),
            Accessor::Identity {
                foreign_key: foreign_key.to_string(),
            },
        );

        for name in column_names {
            if name != identity_column {
                entries.insert(name.clone(), Accessor::Column);
            }
        }

        Self { entries }
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Accessor> {
        self.entries.get(name)
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }
}
