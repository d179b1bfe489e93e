//! CLI commands.

pub mod send;
