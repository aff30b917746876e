//! Implementations of the CLI subcommands.

pub mod predict;
pub mod schema;
pub mod train;
