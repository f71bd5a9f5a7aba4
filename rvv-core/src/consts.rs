//! Architectural limits of the element-processing core.

/// Minimum architecturally valid `VLEN`, in bits (register contains at
/// least one byte).
pub const VLEN_MIN_BITS: usize = 8;

/// Maximum `VLEN` this implementation accepts, in bits. The element kernel
/// walks register contents byte-by-byte, so nothing algorithmic caps this;
/// the limit exists so a caller-supplied `vlen` can't silently request an
/// unreasonable allocation.
pub const VLEN_MAX_BITS: usize = 8192;

/// Narrowest selectable element width (`SEW`), in bits.
pub const SEW_MIN_BITS: u32 = 8;

/// Widest selectable element width (`SEW`), in bits.
pub const SEW_MAX_BITS: u32 = 1024;

/// Number of architectural vector registers (`v0..=v31`).
pub const VECTOR_REGISTER_COUNT: usize = 32;

/// Index of the mask register, `v0`.
pub const MASK_REGISTER_INDEX: usize = 0;

static_assertions::const_assert!(VLEN_MIN_BITS < VLEN_MAX_BITS);
static_assertions::const_assert!(SEW_MIN_BITS < SEW_MAX_BITS);
static_assertions::const_assert!(MASK_REGISTER_INDEX < VECTOR_REGISTER_COUNT);
