use crate::{stmt::Type, validate::Constraint};

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Storage type
    pub ty: Type,

    /// True if the column may hold `Null`
    pub nullable: bool,

    /// True if the driver assigns the value on insert
    pub auto_increment: bool,

    /// Validation constraints checked before save
    pub constraints: Vec<Constraint>,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: true,
            auto_increment: false,
            constraints: vec![],
        }
    }

    /// Marks the column as driver-assigned. Implies an `I64` column.
    pub fn auto_increment(mut self) -> Self {
        self.ty = Type::I64;
        self.auto_increment = true;
        self
    }

    /// Adds a presence constraint and marks the column non-nullable.
    pub fn required(mut self) -> Self {
        self.nullable = false;
        self.constraints.push(Constraint::Required);
        self
    }

    pub fn length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.constraints.push(Constraint::Length { min, max });
        self
    }
}
