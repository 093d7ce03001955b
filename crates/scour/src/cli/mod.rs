//! Command implementations.

pub mod clean;
pub mod config;
pub mod inspect;
