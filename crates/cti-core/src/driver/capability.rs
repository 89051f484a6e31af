#[derive(Debug, Clone)]
pub struct Capability {
    /// When true, the driver honors `Transaction` operations. Drivers without
    /// transactions apply every write immediately.
    pub transactions: bool,
}

impl Capability {
    /// Capabilities of the bundled in-memory driver.
    pub const MEMORY: Self = Self { transactions: true };

    /// A driver that applies each write on its own.
    pub const NON_TRANSACTIONAL: Self = Self {
        transactions: false,
    };
}
