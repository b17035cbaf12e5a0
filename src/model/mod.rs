pub mod config;
pub mod task;
pub mod touched;

pub use config::*;
pub use task::*;
pub use touched::*;
