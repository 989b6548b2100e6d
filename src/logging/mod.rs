// file: src/logging/mod.rs
// version: 1.0.0
// guid: 71c5e2a9-8f03-4d6b-b1e7-3a94d0f6c528

//! Logging setup for extproc-shell

pub mod logger;

pub use logger::{init_json_logger, init_logger};
