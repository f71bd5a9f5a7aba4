//! The permutation opcode family: scalar/vector moves and the slide group.
//!
//! These functions sit at the same layer as [`crate::opcodes`]'s
//! arithmetic wrappers — they run the alignment pre-checks and then
//! delegate to [`crate::vector`]'s slide kernels.

use rvv_asm::{ExceptionCode, Lmul};

use crate::element::arith;
use crate::error::SimpleResult;
use crate::regfile::{RegisterFile, MAX_ELEM_BYTES};
use crate::vector::{self, VecOperand};

/// `vmv.x.s`: reads element `0` of `vs2` into `out` — `out` is the
/// scalar-register-width (`XLEN/8`-byte) destination, which may be
/// narrower or wider than `SEW`; the element is sign-extended or
/// truncated into it (§4.7). A silent no-op (leaving `out` untouched)
/// when `vec_elem_start > vec_len`, matching the reference implementation.
pub fn mv_xs(
    regfile: &RegisterFile,
    vs2: VecOperand,
    elem_width_bytes: usize,
    vec_elem_start: usize,
    vec_len: usize,
    out: &mut [u8],
) {
    if vec_elem_start > vec_len {
        return;
    }
    let mut elem = [0u8; MAX_ELEM_BYTES];
    regfile.read_element(vs2.reg, vs2.lmul, elem_width_bytes, 0, &mut elem[..elem_width_bytes]);
    arith::resize_signed(out, &elem[..elem_width_bytes]);
}

/// `vmv.s.x`: writes `scalar` — an `XLEN/8`-byte scalar register, narrower
/// or wider than `SEW` — into element `0` of `vd`, sign-extending or
/// truncating as needed. A silent no-op when `vec_elem_start > vec_len`.
pub fn mv_sx(
    regfile: &mut RegisterFile,
    vd: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vec_elem_start: usize,
    vec_len: usize,
) {
    if vec_elem_start > vec_len {
        return;
    }
    let mut elem = [0u8; MAX_ELEM_BYTES];
    arith::resize_signed(&mut elem[..elem_width_bytes], scalar);
    regfile.write_element(vd.reg, vd.lmul, elem_width_bytes, 0, &elem[..elem_width_bytes]);
}

/// `vmv.v.v`: copies `vs1` into `vd` element-wise over `vstart..vl`. Unlike
/// every arithmetic opcode, `vmv.v.*` carries no `vm` bit in its encoding —
/// the reference `vmv_vv` wrapper takes no mask parameter at all — so every
/// selected element is written unconditionally.
pub fn mv_vv(
    regfile: &mut RegisterFile,
    vd: VecOperand,
    vs1: VecOperand,
    elem_width_bytes: usize,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    check_src2_then_dst(regfile, vs1, vd)?;
    let mut elem = [0u8; MAX_ELEM_BYTES];
    for i in vec_elem_start..vec_len {
        regfile.read_element(vs1.reg, vs1.lmul, elem_width_bytes, i, &mut elem[..elem_width_bytes]);
        regfile.write_element(vd.reg, vd.lmul, elem_width_bytes, i, &elem[..elem_width_bytes]);
    }
    Ok(())
}

/// `vmv.v.i`: broadcasts a sign-extended immediate into every element of
/// `vd` over `vstart..vl`. No `vm` bit, same as [`mv_vv`].
pub fn mv_vi(
    regfile: &mut RegisterFile,
    vd: VecOperand,
    imm: &[u8],
    elem_width_bytes: usize,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    if !RegisterFile::is_aligned(vd.reg, vd.lmul) {
        return Err(ExceptionCode::DstVecIll);
    }
    let mut elem = [0u8; MAX_ELEM_BYTES];
    arith::resize_signed(&mut elem[..elem_width_bytes], imm);
    for i in vec_elem_start..vec_len {
        regfile.write_element(vd.reg, vd.lmul, elem_width_bytes, i, &elem[..elem_width_bytes]);
    }
    Ok(())
}

/// `vmv.v.x`: broadcasts a sign-extended scalar register into every element
/// of `vd` over `vstart..vl`. No `vm` bit, same as [`mv_vv`].
pub fn mv_vx(
    regfile: &mut RegisterFile,
    vd: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    mv_vi(regfile, vd, scalar, elem_width_bytes, vec_elem_start, vec_len)
}

/// `vfmv.f.s` / `vfmv.s.f`: floating-point scalar moves are not modeled by
/// this core (see the crate-level Non-goals); both always succeed as a
/// no-op, matching the reference implementation's own stub.
pub fn fmv_stub() -> SimpleResult<()> {
    Ok(())
}

/// `vfslide1up.vf`: floating-point slide-by-one is not modeled by this core,
/// same rationale as [`fmv_stub`].
pub fn fslide1up_stub() -> SimpleResult<()> {
    Ok(())
}

/// `vfslide1down.vf`: see [`fslide1up_stub`].
pub fn fslide1down_stub() -> SimpleResult<()> {
    Ok(())
}

fn check_src2_then_dst(
    regfile: &RegisterFile,
    vs2: VecOperand,
    vd: VecOperand,
) -> SimpleResult<()> {
    if !RegisterFile::is_aligned(vs2.reg, vs2.lmul) {
        return Err(ExceptionCode::Src2VecIll);
    }
    if !RegisterFile::is_aligned(vd.reg, vd.lmul) {
        return Err(ExceptionCode::DstVecIll);
    }
    Ok(())
}

/// `vslideup.vx` / `vslideup.vi`: shift `vs2` up by `amount` elements into
/// `vd`. A silent no-op when `vec_elem_start > vec_len`.
#[allow(clippy::too_many_arguments)]
pub fn slideup(
    regfile: &mut RegisterFile,
    vd: VecOperand,
    vs2: VecOperand,
    amount: usize,
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    if vec_elem_start > vec_len {
        return Ok(());
    }
    check_src2_then_dst(regfile, vs2, vd)?;
    vector::slideup(
        regfile,
        vd,
        vs2,
        amount,
        elem_width_bytes,
        vm,
        vec_elem_start,
        vec_len,
    );
    Ok(())
}

/// `vslidedown.vx` / `vslidedown.vi`: shift `vs2` down by `amount`
/// elements into `vd`. Unlike `slideup`, there is no `vstart > vl`
/// early-return in the reference implementation.
#[allow(clippy::too_many_arguments)]
pub fn slidedown(
    regfile: &mut RegisterFile,
    vd: VecOperand,
    vs2: VecOperand,
    amount: usize,
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    check_src2_then_dst(regfile, vs2, vd)?;
    vector::slidedown(
        regfile,
        vd,
        vs2,
        amount,
        elem_width_bytes,
        vm,
        vec_elem_start,
        vec_len,
    );
    Ok(())
}

/// `vslide1up.vx`: shift `vs2` up by one element, inserting `scalar` at
/// `vec_elem_start`. A silent no-op when `vec_elem_start > vec_len`.
#[allow(clippy::too_many_arguments)]
pub fn slide1up(
    regfile: &mut RegisterFile,
    vd: VecOperand,
    vs2: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    if vec_elem_start > vec_len {
        return Ok(());
    }
    check_src2_then_dst(regfile, vs2, vd)?;
    let mut elem = [0u8; MAX_ELEM_BYTES];
    arith::resize_signed(&mut elem[..elem_width_bytes], scalar);
    vector::slide1up(
        regfile,
        vd,
        vs2,
        &elem[..elem_width_bytes],
        elem_width_bytes,
        vm,
        vec_elem_start,
        vec_len,
    );
    Ok(())
}

/// `vslide1down.vx`: shift `vs2` down by one element, inserting `scalar`
/// at the last active element. No `vstart > vl` early-return.
#[allow(clippy::too_many_arguments)]
pub fn slide1down(
    regfile: &mut RegisterFile,
    vd: VecOperand,
    vs2: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    check_src2_then_dst(regfile, vs2, vd)?;
    let mut elem = [0u8; MAX_ELEM_BYTES];
    arith::resize_signed(&mut elem[..elem_width_bytes], scalar);
    vector::slide1down(
        regfile,
        vd,
        vs2,
        &elem[..elem_width_bytes],
        elem_width_bytes,
        vm,
        vec_elem_start,
        vec_len,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rf(vlen_bytes: usize) -> Vec<u8> {
        vec![0u8; vlen_bytes * crate::consts::VECTOR_REGISTER_COUNT]
    }

    #[test]
    fn mv_xs_reads_element_zero() {
        let mut mem = rf(8);
        let mut regfile = RegisterFile::new(&mut mem, 8);
        regfile.write_element(2, Lmul::M1, 2, 0, &42u16.to_le_bytes());
        let mut out = [0u8; 2];
        mv_xs(&regfile, VecOperand { reg: 2, lmul: Lmul::M1 }, 2, 0, 4, &mut out);
        assert_eq!(u16::from_le_bytes(out), 42);
    }

    #[test]
    fn mv_xs_is_noop_past_vl() {
        let mut mem = rf(8);
        let mut regfile = RegisterFile::new(&mut mem, 8);
        regfile.write_element(2, Lmul::M1, 2, 0, &42u16.to_le_bytes());
        let mut out = [0xAAu8; 2];
        mv_xs(&regfile, VecOperand { reg: 2, lmul: Lmul::M1 }, 2, 5, 4, &mut out);
        assert_eq!(out, [0xAA, 0xAA]);
    }

    #[test]
    fn mv_vv_copies_every_selected_element() {
        let mut mem = rf(8);
        let mut regfile = RegisterFile::new(&mut mem, 8);
        for i in 0..4u16 {
            regfile.write_element(2, Lmul::M1, 2, i as usize, &(i + 1).to_le_bytes());
        }
        mv_vv(
            &mut regfile,
            VecOperand { reg: 1, lmul: Lmul::M1 },
            VecOperand { reg: 2, lmul: Lmul::M1 },
            2,
            0,
            4,
        )
        .unwrap();
        let mut out = [0u8; 2];
        regfile.read_element(1, Lmul::M1, 2, 3, &mut out);
        assert_eq!(u16::from_le_bytes(out), 4);
    }

    #[test]
    fn mv_vi_broadcasts_immediate() {
        let mut mem = rf(8);
        let mut regfile = RegisterFile::new(&mut mem, 8);
        mv_vi(
            &mut regfile,
            VecOperand { reg: 1, lmul: Lmul::M1 },
            &(-1i16).to_le_bytes(),
            2,
            0,
            4,
        )
        .unwrap();
        let mut out = [0u8; 2];
        regfile.read_element(1, Lmul::M1, 2, 2, &mut out);
        assert_eq!(i16::from_le_bytes(out), -1);
    }

    #[test]
    fn slideup_rejects_misaligned_dst() {
        let mut mem = rf(8);
        let mut regfile = RegisterFile::new(&mut mem, 8);
        let result = slideup(
            &mut regfile,
            VecOperand { reg: 1, lmul: Lmul::M2 },
            VecOperand { reg: 2, lmul: Lmul::M1 },
            1,
            2,
            true,
            0,
            4,
        );
        assert_eq!(result, Err(ExceptionCode::DstVecIll));
    }

    #[test]
    fn slide1down_inserts_at_last_element() {
        let mut mem = rf(8);
        let mut regfile = RegisterFile::new(&mut mem, 8);
        for i in 0..4u16 {
            regfile.write_element(2, Lmul::M1, 2, i as usize, &(i + 1).to_le_bytes());
        }
        slide1down(
            &mut regfile,
            VecOperand { reg: 1, lmul: Lmul::M1 },
            VecOperand { reg: 2, lmul: Lmul::M1 },
            &77u16.to_le_bytes(),
            2,
            false,
            0,
            4,
        )
        .unwrap();
        let mut out = [0u8; 2];
        regfile.read_element(1, Lmul::M1, 2, 3, &mut out);
        assert_eq!(u16::from_le_bytes(out), 77);
        regfile.read_element(1, Lmul::M1, 2, 0, &mut out);
        assert_eq!(u16::from_le_bytes(out), 2);
    }
}
