//! # Algorithms
//!
//! Script-level decode and encode, plus transaction-level helpers.

mod fields;

pub mod decode;
pub mod encode;
pub mod ownership;
pub mod transaction;

pub use decode::decode;
pub use encode::encode;
pub use ownership::{attribute_output, decode_output_ownership};
pub use transaction::{decode_transaction, parse_transaction};
