//! The batch sanitizing pipeline.
//!
//! - **discovery**: expand directories into supported files
//! - **item**: process one input end to end
//! - **processor**: worker pool, event stream, cancellation

pub mod discovery;
mod item;
pub mod processor;

pub use discovery::discover;
pub use processor::{BatchEvent, BatchHandle, Processor};
