//! CLI command implementations.

pub mod build;
pub mod check;
pub mod config;
pub mod fetch;
pub mod run;
