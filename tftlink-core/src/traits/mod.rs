//! Hardware abstraction traits
//!
//! The encoder never talks to a bus directly; it hands finished requests to
//! an implementation of these traits.

pub mod transmit;

pub use transmit::Transmit;
