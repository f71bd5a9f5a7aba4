//! Multiply kernels: the low half (`vmul`), and the three high-half
//! variants that differ only in how each operand's sign is interpreted
//! (`vmulh`, `vmulhu`, `vmulhsu`).
//!
//! All three high-half forms share one schoolbook unsigned multiply over
//! the operands' absolute values, then restore the sign of the full
//! double-width product by negating it when the operands' signs differ.
//! This documents-the-algorithm-not-the-bug approach is deliberate: the
//! reference `s_ssmul` this is grounded on contains code that does not
//! compile for its 64-bit specialization, so the sign-split schoolbook
//! algorithm is reconstructed from its accompanying description rather
//! than ported line for line.

use super::arith::{
    is_negative,
    negate,
};
use super::MAX_ELEM_BYTES;

/// Unsigned schoolbook multiply: `out(2w) = a(w) * b(w)`.
fn mul_unsigned_full(out: &mut [u8], a: &[u8], b: &[u8]) {
    let w = a.len();
    for byte in out.iter_mut() {
        *byte = 0;
    }
    for i in 0..w {
        if a[i] == 0 {
            continue;
        }
        let mut carry = 0u16;
        for j in 0..w {
            let idx = i + j;
            let product = u16::from(a[i]) * u16::from(b[j]) + u16::from(out[idx]) + carry;
            out[idx] = product as u8;
            carry = product >> 8;
        }
        let mut k = i + w;
        while carry != 0 {
            let sum = u16::from(out[k]) + carry;
            out[k] = sum as u8;
            carry = sum >> 8;
            k += 1;
        }
    }
}

fn abs_into(dst: &mut [u8], a: &[u8]) -> bool {
    let negative = is_negative(a);
    if negative {
        negate(dst, a);
    } else {
        dst.copy_from_slice(a);
    }
    negative
}

/// `dst(w) = low_w_bits(a * b)`. Identical for signed and unsigned
/// operands: two's-complement multiplication's low half never depends on
/// the sign interpretation.
pub fn mul_low(dst: &mut [u8], a: &[u8], b: &[u8]) {
    let w = dst.len();
    let mut full = [0u8; 2 * MAX_ELEM_BYTES];
    mul_unsigned_full(&mut full[..2 * w], a, b);
    dst.copy_from_slice(&full[w..2 * w]);
}

/// `dst(w) = high_w_bits(a *_unsigned b)`.
pub fn mulh_unsigned(dst: &mut [u8], a: &[u8], b: &[u8]) {
    let w = dst.len();
    let mut full = [0u8; 2 * MAX_ELEM_BYTES];
    mul_unsigned_full(&mut full[..2 * w], a, b);
    dst.copy_from_slice(&full[w..2 * w]);
}

/// `dst(w) = high_w_bits(a *_signed b)`.
pub fn mulh_signed(dst: &mut [u8], a: &[u8], b: &[u8]) {
    let w = dst.len();
    let (mut abs_a, mut abs_b) = ([0u8; MAX_ELEM_BYTES], [0u8; MAX_ELEM_BYTES]);
    let na = abs_into(&mut abs_a[..w], a);
    let nb = abs_into(&mut abs_b[..w], b);
    let mut full = [0u8; 2 * MAX_ELEM_BYTES];
    mul_unsigned_full(&mut full[..2 * w], &abs_a[..w], &abs_b[..w]);
    if na != nb {
        let mut negated = [0u8; 2 * MAX_ELEM_BYTES];
        negate(&mut negated[..2 * w], &full[..2 * w]);
        full[..2 * w].copy_from_slice(&negated[..2 * w]);
    }
    dst.copy_from_slice(&full[w..2 * w]);
}

/// `dst(w) = high_w_bits(a *_signed b_unsigned)` — `a` is signed, `b` is
/// unsigned (`vmulhsu`).
pub fn mulh_signed_unsigned(dst: &mut [u8], a: &[u8], b: &[u8]) {
    let w = dst.len();
    let mut abs_a = [0u8; MAX_ELEM_BYTES];
    let na = abs_into(&mut abs_a[..w], a);
    let mut full = [0u8; 2 * MAX_ELEM_BYTES];
    mul_unsigned_full(&mut full[..2 * w], &abs_a[..w], b);
    if na {
        let mut negated = [0u8; 2 * MAX_ELEM_BYTES];
        negate(&mut negated[..2 * w], &full[..2 * w]);
        full[..2 * w].copy_from_slice(&negated[..2 * w]);
    }
    dst.copy_from_slice(&full[w..2 * w]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_low_matches_native_u16() {
        let mut dst = [0u8; 2];
        mul_low(&mut dst, &1234u16.to_le_bytes(), &56u16.to_le_bytes());
        let expected = 1234u16.wrapping_mul(56);
        assert_eq!(u16::from_le_bytes(dst), expected);
    }

    #[test]
    fn mulh_unsigned_matches_native_u16() {
        let mut dst = [0u8; 2];
        mulh_unsigned(&mut dst, &60000u16.to_le_bytes(), &60000u16.to_le_bytes());
        let expected = ((60000u32 * 60000u32) >> 16) as u16;
        assert_eq!(u16::from_le_bytes(dst), expected);
    }

    #[test]
    fn mulh_signed_matches_native_i16() {
        let a: i16 = -1234;
        let b: i16 = 5678;
        let mut dst = [0u8; 2];
        mulh_signed(&mut dst, &a.to_le_bytes(), &b.to_le_bytes());
        let expected = (((a as i32) * (b as i32)) >> 16) as i16;
        assert_eq!(i16::from_le_bytes(dst), expected);
    }

    #[test]
    fn mulh_signed_unsigned_matches_native() {
        let a: i16 = -1234;
        let b: u16 = 5678;
        let mut dst = [0u8; 2];
        mulh_signed_unsigned(&mut dst, &a.to_le_bytes(), &b.to_le_bytes());
        let expected = (((a as i32) * (b as i32)) >> 16) as i16;
        assert_eq!(i16::from_le_bytes(dst), expected);
    }
}
