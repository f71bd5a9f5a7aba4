//! Atomic types for the RISC-V V-extension (v0.9) element-processing core:
//! the VTYPE configuration-word codec and the architectural exception-code
//! taxonomy that opcode wrappers in `rvv-core` return.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(unused_must_use)]

mod reason;
mod vtype;

pub use reason::ExceptionCode;
pub use vtype::{
    concat_eew,
    decode,
    derive_emul,
    encode,
    extract_lmul,
    extract_ma,
    extract_sew,
    extract_ta,
    DecodedVType,
    Lmul,
};
