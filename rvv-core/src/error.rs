//! Error plumbing for the element-processing core.
//!
//! Every opcode entry point returns a [`SimpleResult<T>`]: a pre-execution
//! check failure surfaces as `Err(ExceptionCode)` and the destination is
//! left untouched, exactly as the caller would expect from a real decode
//! stage that never reaches the functional unit.

pub use rvv_asm::ExceptionCode;

/// The result type returned by every opcode entry point in [`crate::opcodes`].
pub type SimpleResult<T> = Result<T, ExceptionCode>;
