/// A named association from one model to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Name the relation is accessed by
    pub name: String,

    pub kind: RelationKind,

    /// Name of the target model
    pub target: String,

    /// For `BelongsTo`, the column on the source table. For `HasOne` and
    /// `HasMany`, the column on the target table.
    pub foreign_key: String,

    /// What happens to the target when the source is deleted
    pub dependent: Dependent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    BelongsTo,
    HasOne,
    HasMany,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Dependent {
    /// Leave associated rows in place
    #[default]
    Keep,

    /// Delete associated rows along with the source
    Destroy,
}

impl Relation {
    pub fn belongs_to(
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self::new(RelationKind::BelongsTo, name, target, foreign_key)
    }

    pub fn has_one(
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self::new(RelationKind::HasOne, name, target, foreign_key)
    }

    pub fn has_many(
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self::new(RelationKind::HasMany, name, target, foreign_key)
    }

    pub fn dependent(mut self, dependent: Dependent) -> Self {
        self.dependent = dependent;
        self
    }

    fn new(
        kind: RelationKind,
        name: impl Into<String>,
        target: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            target: target.into(),
            foreign_key: foreign_key.into(),
            dependent: Dependent::Keep,
        }
    }

    pub fn is_belongs_to(&self) -> bool {
        matches!(self.kind, RelationKind::BelongsTo)
    }

    pub fn is_has_many(&self) -> bool {
        matches!(self.kind, RelationKind::HasMany)
    }
}
