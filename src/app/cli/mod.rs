//! Command-line and configuration-file settings

pub mod args;
pub mod config;
