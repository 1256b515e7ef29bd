//! CLI module for fedauth.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ExchangeCommands};
