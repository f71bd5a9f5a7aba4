//! Masked element-wise dispatch and the slide family.
//!
//! Every function here walks `vec_elem_start..vec_len`, gating each
//! element write on `!vm || mask_bit(i)` — `vm == false` disables masking
//! (every element selected), `vm == true` enables it (only elements whose
//! mask bit is set are selected) — the canonical convention used
//! throughout this core.

use rvv_asm::Lmul;

use crate::regfile::{RegisterFile, MAX_ELEM_BYTES};

/// A register-group operand: which architectural register starts the
/// group, and the multiplicity governing how many registers follow it.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VecOperand {
    pub reg: usize,
    pub lmul: Lmul,
}

/// The second source operand of a binary op: either another register
/// group, or a scalar broadcast to every active element.
pub enum Operand2<'a> {
    Vector(VecOperand),
    Scalar(&'a [u8]),
}

fn read_operand2(
    regfile: &RegisterFile,
    operand: &Operand2<'_>,
    elem_width_bytes: usize,
    index: usize,
    out: &mut [u8],
) {
    match operand {
        Operand2::Vector(v) => regfile.read_element(v.reg, v.lmul, elem_width_bytes, index, out),
        Operand2::Scalar(bytes) => out[..elem_width_bytes].copy_from_slice(&bytes[..elem_width_bytes]),
    }
}

/// Masked `dst[i] = op(vs2[i], vs1[i])` for `i` in `vec_elem_start..vec_len`.
pub fn masked_binary(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    vs2: VecOperand,
    vs1: Operand2<'_>,
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
    mut op: impl FnMut(&mut [u8], &[u8], &[u8]),
) {
    let (mut buf2, mut buf1, mut out) =
        ([0u8; MAX_ELEM_BYTES], [0u8; MAX_ELEM_BYTES], [0u8; MAX_ELEM_BYTES]);
    for i in vec_elem_start..vec_len {
        if vm && !regfile.mask_bit(0, i) {
            continue;
        }
        regfile.read_element(vs2.reg, vs2.lmul, elem_width_bytes, i, &mut buf2);
        read_operand2(regfile, &vs1, elem_width_bytes, i, &mut buf1);
        op(
            &mut out[..elem_width_bytes],
            &buf2[..elem_width_bytes],
            &buf1[..elem_width_bytes],
        );
        regfile.write_element(dst.reg, dst.lmul, elem_width_bytes, i, &out[..elem_width_bytes]);
    }
}

/// Masked widening `dst[i](2w) = op(vs2[i], vs1[i])`.
///
/// `vs2_already_wide` selects between the `.vv`/`.vx` forms (both sources
/// `w`-wide, `op` is one of [`crate::element::wideint::widen_add_unsigned`]
/// and friends) and the `.wv`/`.wx` forms (`vs2` already `2w`-wide, `op` is
/// [`crate::element::wideint::widen_op_already_wide`]).
#[allow(clippy::too_many_arguments)]
pub fn masked_widening_binary(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    vs2: VecOperand,
    vs1: Operand2<'_>,
    narrow_width_bytes: usize,
    vs2_already_wide: bool,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
    mut op: impl FnMut(&mut [u8], &[u8], &[u8]),
) {
    let wide_width_bytes = narrow_width_bytes * 2;
    let vs2_width_bytes = if vs2_already_wide {
        wide_width_bytes
    } else {
        narrow_width_bytes
    };
    let (mut buf2, mut buf1, mut out) =
        ([0u8; MAX_ELEM_BYTES], [0u8; MAX_ELEM_BYTES], [0u8; MAX_ELEM_BYTES]);
    for i in vec_elem_start..vec_len {
        if vm && !regfile.mask_bit(0, i) {
            continue;
        }
        regfile.read_element(vs2.reg, vs2.lmul, vs2_width_bytes, i, &mut buf2);
        read_operand2(regfile, &vs1, narrow_width_bytes, i, &mut buf1);
        op(
            &mut out[..wide_width_bytes],
            &buf2[..vs2_width_bytes],
            &buf1[..narrow_width_bytes],
        );
        regfile.write_element(dst.reg, dst.lmul, wide_width_bytes, i, &out[..wide_width_bytes]);
    }
}

/// Elements available in a register group's backing storage, including
/// the portion beyond the active `VL` but within `VLMAX` — the extent
/// [`slidedown`] may read from.
pub fn group_capacity_elements(regfile: &RegisterFile, lmul: Lmul, elem_width_bytes: usize) -> usize {
    let group_bytes = lmul.group_size_regs() * regfile.vlen_bytes();
    group_bytes / elem_width_bytes
}

/// `dst[i] = vs2[i - amount]` for `i` in `max(amount, vec_elem_start)..vec_len`.
/// Elements below `amount` are left undisturbed: there is no source for them.
pub fn slideup(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    vs2: VecOperand,
    amount: usize,
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) {
    let mut buf = [0u8; MAX_ELEM_BYTES];
    let start = vec_elem_start.max(amount);
    for i in start..vec_len {
        if vm && !regfile.mask_bit(0, i) {
            continue;
        }
        regfile.read_element(vs2.reg, vs2.lmul, elem_width_bytes, i - amount, &mut buf);
        regfile.write_element(dst.reg, dst.lmul, elem_width_bytes, i, &buf[..elem_width_bytes]);
    }
}

/// `dst[i] = vs2[i + amount]` when `i + amount` is within the source
/// group's capacity, else `0`.
pub fn slidedown(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    vs2: VecOperand,
    amount: usize,
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) {
    let capacity = group_capacity_elements(regfile, vs2.lmul, elem_width_bytes);
    let mut buf = [0u8; MAX_ELEM_BYTES];
    for i in vec_elem_start..vec_len {
        if vm && !regfile.mask_bit(0, i) {
            continue;
        }
        let src_index = i + amount;
        if src_index < capacity {
            regfile.read_element(vs2.reg, vs2.lmul, elem_width_bytes, src_index, &mut buf);
        } else {
            buf[..elem_width_bytes].fill(0);
        }
        regfile.write_element(dst.reg, dst.lmul, elem_width_bytes, i, &buf[..elem_width_bytes]);
    }
}

/// `vslide1up`: shifts `vs2` up by one element and inserts `scalar` at
/// `vec_elem_start`. The insertion is unconditional; the shifted body is
/// masked like any other element-wise op.
pub fn slide1up(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    vs2: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) {
    slideup(
        regfile,
        dst,
        vs2,
        1,
        elem_width_bytes,
        vm,
        vec_elem_start + 1,
        vec_len,
    );
    if vec_elem_start < vec_len {
        regfile.write_element(
            dst.reg,
            dst.lmul,
            elem_width_bytes,
            vec_elem_start,
            &scalar[..elem_width_bytes],
        );
    }
}

/// `vslide1down`: shifts `vs2` down by one element and inserts `scalar` at
/// the last active element. The insertion is unconditional; the shifted
/// body is masked like any other element-wise op.
pub fn slide1down(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    vs2: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) {
    slidedown(regfile, dst, vs2, 1, elem_width_bytes, vm, vec_elem_start, vec_len);
    if vec_len > 0 {
        regfile.write_element(
            dst.reg,
            dst.lmul,
            elem_width_bytes,
            vec_len - 1,
            &scalar[..elem_width_bytes],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::arith::add_with_carry;

    fn rf(vlen_bytes: usize) -> Vec<u8> {
        vec![0u8; vlen_bytes * crate::consts::VECTOR_REGISTER_COUNT]
    }

    #[test]
    fn masked_binary_skips_elements_with_clear_mask_bit() {
        let mut mem = rf(8);
        let mut regfile = RegisterFile::new(&mut mem, 8);
        for i in 0..4u16 {
            regfile.write_element(2, Lmul::M1, 2, i as usize, &i.to_le_bytes());
            regfile.write_element(3, Lmul::M1, 2, i as usize, &1u16.to_le_bytes());
        }
        regfile.set_mask_bit(0, 0, true);
        regfile.set_mask_bit(0, 2, true);
        masked_binary(
            &mut regfile,
            VecOperand { reg: 1, lmul: Lmul::M1 },
            VecOperand { reg: 2, lmul: Lmul::M1 },
            Operand2::Vector(VecOperand { reg: 3, lmul: Lmul::M1 }),
            2,
            true,
            0,
            4,
            |dst, a, b| {
                add_with_carry(dst, a, b);
            },
        );
        let mut out = [0u8; 2];
        regfile.read_element(1, Lmul::M1, 2, 0, &mut out);
        assert_eq!(u16::from_le_bytes(out), 1);
        regfile.read_element(1, Lmul::M1, 2, 1, &mut out);
        assert_eq!(u16::from_le_bytes(out), 0, "unselected element left undisturbed");
        regfile.read_element(1, Lmul::M1, 2, 2, &mut out);
        assert_eq!(u16::from_le_bytes(out), 3);
    }

    #[test]
    fn slideup_shifts_by_amount() {
        let mut mem = rf(8);
        let mut regfile = RegisterFile::new(&mut mem, 8);
        for i in 0..4u16 {
            regfile.write_element(2, Lmul::M1, 2, i as usize, &i.to_le_bytes());
        }
        slideup(
            &mut regfile,
            VecOperand { reg: 1, lmul: Lmul::M1 },
            VecOperand { reg: 2, lmul: Lmul::M1 },
            2,
            2,
            false,
            0,
            4,
        );
        let mut out = [0u8; 2];
        regfile.read_element(1, Lmul::M1, 2, 2, &mut out);
        assert_eq!(u16::from_le_bytes(out), 0);
        regfile.read_element(1, Lmul::M1, 2, 3, &mut out);
        assert_eq!(u16::from_le_bytes(out), 1);
    }

    #[test]
    fn slidedown_zero_fills_past_group_capacity() {
        let mut mem = rf(8);
        let mut regfile = RegisterFile::new(&mut mem, 8);
        for i in 0..4u16 {
            regfile.write_element(2, Lmul::M1, 2, i as usize, &(i + 1).to_le_bytes());
        }
        slidedown(
            &mut regfile,
            VecOperand { reg: 1, lmul: Lmul::M1 },
            VecOperand { reg: 2, lmul: Lmul::M1 },
            2,
            2,
            false,
            0,
            4,
        );
        let mut out = [0u8; 2];
        regfile.read_element(1, Lmul::M1, 2, 0, &mut out);
        assert_eq!(u16::from_le_bytes(out), 3);
        regfile.read_element(1, Lmul::M1, 2, 3, &mut out);
        assert_eq!(u16::from_le_bytes(out), 0);
    }

    #[test]
    fn slide1up_inserts_scalar_unconditionally() {
        let mut mem = rf(8);
        let mut regfile = RegisterFile::new(&mut mem, 8);
        for i in 0..4u16 {
            regfile.write_element(2, Lmul::M1, 2, i as usize, &(i + 10).to_le_bytes());
        }
        slide1up(
            &mut regfile,
            VecOperand { reg: 1, lmul: Lmul::M1 },
            VecOperand { reg: 2, lmul: Lmul::M1 },
            &99u16.to_le_bytes(),
            2,
            false,
            0,
            4,
        );
        let mut out = [0u8; 2];
        regfile.read_element(1, Lmul::M1, 2, 0, &mut out);
        assert_eq!(u16::from_le_bytes(out), 99);
        regfile.read_element(1, Lmul::M1, 2, 1, &mut out);
        assert_eq!(u16::from_le_bytes(out), 10);
    }
}
