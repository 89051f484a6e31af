pub mod driver;
pub use driver::Driver;

mod error;
pub use error::{Error, IntoError};

mod record;
pub use record::Record;

pub mod schema;
pub use schema::Schema;

pub mod stmt;

pub mod validate;

/// A Result type alias that uses the crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
