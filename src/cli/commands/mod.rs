//! CLI command implementations.

pub mod apply;
pub mod rename;
pub mod undo;
