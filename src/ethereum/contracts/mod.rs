//! Smart contract bindings.

pub mod pyth;

pub use pyth::IPyth;
