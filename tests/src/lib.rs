mod exec_log;
pub use exec_log::ExecLog;

pub use failing_driver::FailingDriver;

pub use logging_driver::{DriverOp, LoggingDriver};

mod macros;


pub use setup::{build, setup, setup_with, TestDb};

pub use cti::*;
pub use cti_core::driver::{operation, Capability, Operation, Rows};
pub use cti_driver_memory::Memory;
