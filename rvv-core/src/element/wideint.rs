//! Widening element arithmetic: `2*SEW`-wide destination, `SEW`-wide (or
//! already-widened) sources. Used by the `w`/`wv`/`wx` opcode families.

use super::arith::{
    add_with_carry,
    is_negative,
    sub_with_borrow,
};

/// Zero-extends `narrow` (half the width of `wide`) into `wide`.
pub fn zero_extend(wide: &mut [u8], narrow: &[u8]) {
    let w = narrow.len();
    wide[..w].copy_from_slice(narrow);
    for b in &mut wide[w..] {
        *b = 0;
    }
}

/// Sign-extends `narrow` (half the width of `wide`) into `wide`.
pub fn sign_extend(wide: &mut [u8], narrow: &[u8]) {
    let w = narrow.len();
    wide[..w].copy_from_slice(narrow);
    let fill = if is_negative(narrow) { 0xffu8 } else { 0u8 };
    for b in &mut wide[w..] {
        *b = fill;
    }
}

/// `dst(2w) = zext(a(w)) + zext(b(w))`.
pub fn widen_add_unsigned(dst: &mut [u8], a: &[u8], b: &[u8]) {
    let (mut wa, mut wb) = ([0u8; super::MAX_ELEM_BYTES], [0u8; super::MAX_ELEM_BYTES]);
    let w = dst.len();
    zero_extend(&mut wa[..w], a);
    zero_extend(&mut wb[..w], b);
    add_with_carry(dst, &wa[..w], &wb[..w]);
}

/// `dst(2w) = sext(a(w)) + sext(b(w))`.
pub fn widen_add_signed(dst: &mut [u8], a: &[u8], b: &[u8]) {
    let (mut wa, mut wb) = ([0u8; super::MAX_ELEM_BYTES], [0u8; super::MAX_ELEM_BYTES]);
    let w = dst.len();
    sign_extend(&mut wa[..w], a);
    sign_extend(&mut wb[..w], b);
    add_with_carry(dst, &wa[..w], &wb[..w]);
}

/// `dst(2w) = zext(a(w)) - zext(b(w))`.
pub fn widen_sub_unsigned(dst: &mut [u8], a: &[u8], b: &[u8]) {
    let (mut wa, mut wb) = ([0u8; super::MAX_ELEM_BYTES], [0u8; super::MAX_ELEM_BYTES]);
    let w = dst.len();
    zero_extend(&mut wa[..w], a);
    zero_extend(&mut wb[..w], b);
    sub_with_borrow(dst, &wa[..w], &wb[..w]);
}

/// `dst(2w) = sext(a(w)) - sext(b(w))`.
pub fn widen_sub_signed(dst: &mut [u8], a: &[u8], b: &[u8]) {
    let (mut wa, mut wb) = ([0u8; super::MAX_ELEM_BYTES], [0u8; super::MAX_ELEM_BYTES]);
    let w = dst.len();
    sign_extend(&mut wa[..w], a);
    sign_extend(&mut wb[..w], b);
    let mut neg = [0u8; super::MAX_ELEM_BYTES];
    super::arith::negate(&mut neg[..w], &wb[..w]);
    add_with_carry(dst, &wa[..w], &neg[..w]);
}

/// `dst(2w) = a(2w) +/- ext(b(w))` — the `.wv`/`.wx` family, where `a` is
/// already widened and only `b` needs extending.
pub fn widen_op_already_wide(dst: &mut [u8], a_wide: &[u8], b_narrow: &[u8], signed: bool, add: bool) {
    let mut wb = [0u8; super::MAX_ELEM_BYTES];
    let w = dst.len();
    if signed {
        sign_extend(&mut wb[..w], b_narrow);
    } else {
        zero_extend(&mut wb[..w], b_narrow);
    }
    if add {
        add_with_carry(dst, a_wide, &wb[..w]);
    } else {
        sub_with_borrow(dst, a_wide, &wb[..w]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(&[0xff], &[0x01], &[0x00, 0x01]; "unsigned widening add carries into the high half")]
    fn widen_add_unsigned_matches(a: &[u8], b: &[u8], expected: &[u8]) {
        let mut dst = [0u8; 2];
        widen_add_unsigned(&mut dst, a, b);
        assert_eq!(&dst[..], expected);
    }

    #[test]
    fn widen_add_signed_sign_extends_negative_operands() {
        // -1i8 + -1i8 = -2, widened to i16 is 0xfffe
        let mut dst = [0u8; 2];
        widen_add_signed(&mut dst, &[0xff], &[0xff]);
        assert_eq!(dst, [0xfe, 0xff]);
    }

    #[test]
    fn widen_sub_unsigned_never_sign_extends() {
        let mut dst = [0u8; 2];
        widen_sub_unsigned(&mut dst, &[0x00], &[0x01]);
        // 0 - 1 as a zero-extended 16-bit subtraction wraps to 0xffff
        assert_eq!(dst, [0xff, 0xff]);
    }

    #[test]
    fn widen_op_already_wide_extends_only_narrow_operand() {
        let mut dst = [0u8; 2];
        widen_op_already_wide(&mut dst, &[0x10, 0x00], &[0xff], true, true);
        // 0x0010 + sext(-1i8) == 0x0010 - 1 == 0x000f
        assert_eq!(dst, [0x0f, 0x00]);
    }
}
