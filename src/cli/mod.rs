// file: src/cli/mod.rs
// version: 1.0.0
// guid: 0f6b2d84-a13c-4e97-95d2-c8e7b41a6f30

//! Command line interface for extproc-shell

pub mod args;
pub mod commands;

pub use args::Cli;
pub use commands::*;
