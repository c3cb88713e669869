//! Bookshelf application library
//!
//! Book catalog modules plus the bootstrap that wires them to the configured store.

pub mod app;
pub mod modules;
pub mod utils;

pub use app::{serve, Application};
