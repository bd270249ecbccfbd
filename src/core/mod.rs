//! Core rename-plan lifecycle.

pub mod executor;
pub mod naming;
pub mod normalizer;
pub mod persistence;
pub mod pipeline;
pub mod scanner;
