//! CLI subcommands.

pub mod cart;
pub mod money;
mod terminal;
