mod capability;
pub use capability::Capability;

mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::{async_trait, schema::Schema};

use std::fmt::Debug;

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Describes what the driver supports.
    fn capability(&self) -> &Capability;

    /// Register the schema with the driver, creating storage for each table.
    async fn register_schema(&self, schema: &Schema) -> crate::Result<()>;

    /// Execute a storage operation
    async fn exec(&self, schema: &Schema, op: Operation) -> crate::Result<Response>;
}
