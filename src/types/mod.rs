//! Type definitions module.
//!
//! Contains the chain-independent records shared by every contract variant.

pub mod price;
pub mod source;
pub mod tx;

pub use price::*;
pub use source::*;
pub use tx::*;
