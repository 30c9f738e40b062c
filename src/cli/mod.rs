//! CLI command handlers

pub mod commands;

pub use commands::{columns, export, import};
