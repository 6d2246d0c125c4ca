//! Numeric utilities: linear interpolation and rolling means.

pub mod interp;
pub mod rolling;

pub use interp::*;
pub use rolling::*;
