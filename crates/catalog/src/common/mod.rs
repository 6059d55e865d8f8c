//! Core types used throughout the catalog
//!
//! Errors, the game domain newtype and file helpers live here so the
//! pipelines and the API client share one vocabulary.

pub mod domain;
pub mod error;
pub mod files;

pub use domain::GameDomain;
pub use error::{CatalogError, FileOperation, Result};
