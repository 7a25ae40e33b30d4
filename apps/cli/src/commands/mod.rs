//! Command implementations for the trainbox CLI.

pub mod run;
pub mod trainers;
pub mod types;

pub use types::RunArgs;
