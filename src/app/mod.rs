//! Application module

pub mod cli;
pub mod controller;
pub mod error;
pub mod spinner;
pub mod startup;
