//! Taskbook Library
//!
//! Boards of tasks and notes, a command-line mutation grammar, and JSON
//! persistence. The binary wires these together; this crate exports them for
//! testing and reuse.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod parser;
pub mod paths;
pub mod storage;
pub mod store;
pub mod types;
