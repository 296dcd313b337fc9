//! # Horus Common Library
//!
//! Shared code for the Horus match-records services:
//! - Error types
//! - Configuration resolution (CLI, environment, TOML, compiled defaults)
//! - Timestamp formatting
//! - Identifier generation

pub mod config;
pub mod error;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
