//! Transport layer: one-shot CLI commands and the interactive shell

pub mod cli;
pub mod shell;
