//! # Domain Layer
//!
//! Verdicts, the record cache and the pure validation rules.
//!
//! This module contains NO I/O dependencies.

pub mod cache;
pub mod entities;
pub mod errors;
pub mod rules;

pub use cache::*;
pub use entities::*;
pub use errors::*;
pub use rules::*;
