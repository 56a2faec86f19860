//! Contrail CLI library.
//!
//! This crate provides the command handlers, output formatting and terminal
//! styling behind the `contrail-cli` binary.

pub mod commands;
pub mod output;
pub mod terminal;

#[cfg(test)]
pub(crate) mod test_helpers;
