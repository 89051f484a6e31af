//! Class-table inheritance for dynamic models.
//!
//! A superclass table holds the shared columns plus a discriminator; each
//! subclass table holds only its own columns and shares its primary key with
//! the superclass row. An [`Instance`] of a subclass reads and writes the
//! inherited attributes as if they were its own, and [`Db::save`] persists
//! both rows in the right order.

mod config;
pub use config::Config;

pub mod db;
pub use db::Db;

mod inherit;
pub use inherit::Inheritance;

mod instance;
pub use instance::Instance;

mod lifecycle;

mod mapping;
pub use mapping::{association_name, Mapping};

mod metadata;

mod polymorphic;
pub use polymorphic::{FallbackReason, Polymorphic};

mod proxy;

mod related;
pub use related::Related;

mod ty;
pub use ty::ModelType;

pub use cti_core::{
    driver::Driver,
    schema::{Column, Dependent, Model, Relation},
    stmt::{Type, Value},
    validate::{Constraint, Errors},
    Error, Record, Result,
};
