//! The mask-register layer: comparison opcodes write one result bit per
//! active element into a destination mask register, gated by the same
//! `!vm || mask_bit(i)` convention as every other masked op in this crate:
//! `vm == false` means masking is disabled (every element is selected);
//! `vm == true` means masking is enabled, so only elements whose mask bit
//! is set are selected.

use crate::regfile::{RegisterFile, MAX_ELEM_BYTES};
use crate::vector::{Operand2, VecOperand};

/// Writes `cmp(vs2[i], vs1[i])` into bit `i` of `dst_mask_reg` for every
/// active, selected element; bits outside that range are left undisturbed.
#[allow(clippy::too_many_arguments)]
pub fn masked_compare(
    regfile: &mut RegisterFile,
    dst_mask_reg: usize,
    vs2: VecOperand,
    vs1: Operand2<'_>,
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
    mut cmp: impl FnMut(&[u8], &[u8]) -> bool,
) {
    let (mut buf2, mut buf1) = ([0u8; MAX_ELEM_BYTES], [0u8; MAX_ELEM_BYTES]);
    for i in vec_elem_start..vec_len {
        if vm && !regfile.mask_bit(0, i) {
            continue;
        }
        regfile.read_element(vs2.reg, vs2.lmul, elem_width_bytes, i, &mut buf2);
        match &vs1 {
            Operand2::Vector(v) => {
                regfile.read_element(v.reg, v.lmul, elem_width_bytes, i, &mut buf1)
            }
            Operand2::Scalar(bytes) => {
                buf1[..elem_width_bytes].copy_from_slice(&bytes[..elem_width_bytes])
            }
        }
        let bit = cmp(&buf2[..elem_width_bytes], &buf1[..elem_width_bytes]);
        regfile.set_mask_bit(dst_mask_reg, i, bit);
    }
}

/// Assigns (copies) bit `i` of `vs1` into bit `i` of `dst` for every
/// active, selected element — the mask-to-mask move used to materialize a
/// derived predicate (`vmand.mm` and friends build on the same primitive).
pub fn masked_assign_bit(
    regfile: &mut RegisterFile,
    dst_mask_reg: usize,
    src_mask_reg: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) {
    for i in vec_elem_start..vec_len {
        if vm && !regfile.mask_bit(0, i) {
            continue;
        }
        let bit = regfile.mask_bit(src_mask_reg, i);
        regfile.set_mask_bit(dst_mask_reg, i, bit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rvv_asm::Lmul;

    fn rf(vlen_bytes: usize) -> Vec<u8> {
        vec![0u8; vlen_bytes * crate::consts::VECTOR_REGISTER_COUNT]
    }

    #[test]
    fn masked_compare_writes_equality_bits() {
        let mut mem = rf(8);
        let mut regfile = RegisterFile::new(&mut mem, 8);
        for i in 0..4u16 {
            regfile.write_element(2, Lmul::M1, 2, i as usize, &i.to_le_bytes());
        }
        regfile.write_element(3, Lmul::M1, 2, 0, &0u16.to_le_bytes());
        regfile.write_element(3, Lmul::M1, 2, 1, &9u16.to_le_bytes());
        regfile.write_element(3, Lmul::M1, 2, 2, &2u16.to_le_bytes());
        regfile.write_element(3, Lmul::M1, 2, 3, &9u16.to_le_bytes());

        masked_compare(
            &mut regfile,
            1,
            VecOperand { reg: 2, lmul: Lmul::M1 },
            Operand2::Vector(VecOperand { reg: 3, lmul: Lmul::M1 }),
            2,
            false,
            0,
            4,
            |a, b| a == b,
        );

        assert!(regfile.mask_bit(1, 0));
        assert!(!regfile.mask_bit(1, 1));
        assert!(regfile.mask_bit(1, 2));
        assert!(!regfile.mask_bit(1, 3));
    }
}
