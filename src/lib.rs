//! bt-rename Library
//!
//! Renames downloaded episodes and their subtitles using TMDB metadata and an
//! LLM-generated rename plan.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod preflight;
pub mod services;
pub mod utils;

pub use error::{Error, NormalizeError, Result};
