//! Command-line interface support for the `pg-hotswap` binary

pub mod commands;
pub mod error;
pub mod output;
