//! Core traits, settings, and module registry shared by every Bookshelf crate.

pub mod module;
pub mod registry;
pub mod settings;

pub use module::{InitCtx, Module, SchemaStep};
pub use registry::ModuleRegistry;
