//! # hookwire-core
//!
//! Core crate for hookwire. Contains the configuration schemas and the
//! unified error system shared by the hook runtime and its modules.
//!
//! This crate has **no** internal dependencies on other hookwire crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
