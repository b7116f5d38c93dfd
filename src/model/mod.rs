pub mod task;
pub mod week;
pub mod config;

pub use task::*;
pub use week::*;
pub use config::*;
