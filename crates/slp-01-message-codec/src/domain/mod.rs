//! # Domain Layer
//!
//! Message types, wire constants and errors of the codec.
//!
//! This module contains NO I/O dependencies.

pub mod entities;
pub mod errors;
pub mod metadata;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use metadata::*;
pub use value_objects::*;
