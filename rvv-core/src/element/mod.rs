//! The element-wise arithmetic kernel: every function here works on a pair
//! of equal-width (or, for widening ops, related-width) byte slices sliced
//! straight out of the register file, with no knowledge of masking, vector
//! length, or register-group alignment — that's [`crate::vector`]'s job.

pub mod arith;
pub mod muldiv;
pub mod wideint;

pub use crate::regfile::MAX_ELEM_BYTES;
