//! RISC-V "V" vector-extension (v0.9) element-processing core.
//!
//! This crate owns no memory of its own: every function borrows a
//! caller-supplied vector register file ([`regfile::RegisterFile`]) and,
//! for loads and stores, a caller-supplied memory-access callback. That
//! split mirrors the reference core's own separation between the
//! instruction set simulator (which owns state) and the element engine
//! (which only computes), and is what lets this crate run under `no_std`.
//!
//! Module map:
//! - [`consts`]: architectural limits (`VLEN`, `SEW` ranges, register count).
//! - [`error`]: the [`error::SimpleResult`] alias threaded through every
//!   fallible operation.
//! - [`regfile`]: the borrowed register-file view and its alignment/overlap
//!   queries.
//! - [`element`]: width-parametric byte-slice arithmetic kernels, with no
//!   knowledge of registers, masking or vector length.
//! - [`vector`]: masked element-wise dispatch and the slide family, built on
//!   [`element`] and [`regfile`].
//! - [`mask`]: comparison opcodes that write predicate bits rather than
//!   values.
//! - [`memory`]: the unit-stride/strided load/store engine.
//! - [`permutation`]: scalar/vector moves and the slide opcode wrappers.
//! - [`opcodes`]: the top-level, per-instruction entry points an instruction
//!   decoder calls directly.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![deny(
    clippy::arithmetic_side_effects,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]

#[cfg(test)]
use criterion as _;

pub mod consts;
pub mod element;
pub mod error;
pub mod mask;
pub mod memory;
pub mod opcodes;
pub mod permutation;
pub mod regfile;
pub mod vector;

#[doc(no_inline)]
pub use rvv_asm;

pub mod prelude {
    //! The common set of imports an instruction decoder reaches for.
    #[doc(no_inline)]
    pub use rvv_asm::{
        decode as decode_vtype,
        encode as encode_vtype,
        DecodedVType,
        ExceptionCode,
        Lmul,
    };

    pub use crate::{
        consts::{
            MASK_REGISTER_INDEX,
            SEW_MAX_BITS,
            SEW_MIN_BITS,
            VECTOR_REGISTER_COUNT,
            VLEN_MAX_BITS,
            VLEN_MIN_BITS,
        },
        error::SimpleResult,
        regfile::{
            RegisterFile,
            MAX_ELEM_BYTES,
        },
        vector::{
            Operand2,
            VecOperand,
        },
    };
}
