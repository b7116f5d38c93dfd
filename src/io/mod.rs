pub mod config_io;
pub mod tasks_io;

pub use tasks_io::{StoreError, Workspace};
