//! The external, C-ABI-shaped opcode facade.
//!
//! Every function here takes the raw vector-register-file byte buffer
//! (via [`RegisterFile`]), the `VLEN`/`VL`/`vstart`/`EMUL` parameters an
//! instruction decode stage would already have on hand, and returns
//! [`SimpleResult<()>`] — `Err` for a pre-execution alignment or overlap
//! failure, `Ok(())` once the destination has been fully (and only)
//! written according to the active mask. A `tracing` span wraps each
//! entry point; the element kernel underneath never touches `tracing`,
//! matching the reference core's separation between the ISS-facing
//! wrapper and the bit-twiddling engine.
//!
//! Every masked entry point below takes a `vm: bool` straight from the
//! instruction's `vm` bit and forwards it unchanged to [`vector`]/[`mask`]/
//! [`memory`]: `vm == false` disables masking (every element in range is
//! written), `vm == true` enables it (only elements whose bit is set in
//! mask register `v0` are written, the rest of the destination is left
//! untouched). Callers decoding the RVV encoding pass the raw `vm` bit
//! through with no inversion.

use rvv_asm::{ExceptionCode, Lmul};

use crate::element::{arith, muldiv, wideint};
use crate::error::SimpleResult;
use crate::regfile::{RegisterFile, MAX_ELEM_BYTES};
use crate::vector::{self, Operand2, VecOperand};
use crate::{mask, memory, permutation};

/// Couples a scalar register operand — supplied as a raw `&[u8]` of
/// whatever width the caller's `XLEN` is — to an element of
/// `elem_width_bytes`: sign-extends when `SEW > XLEN`, truncates when
/// `SEW < XLEN`. The default policy for every signed-consumer opcode.
fn extend_scalar_signed<'b>(buf: &'b mut [u8; MAX_ELEM_BYTES], scalar: &[u8], elem_width_bytes: usize) -> &'b [u8] {
    arith::resize_signed(&mut buf[..elem_width_bytes], scalar);
    &buf[..elem_width_bytes]
}

/// As [`extend_scalar_signed`], but zero-extends — the policy for
/// shift-amount and unsigned-comparison scalar operands.
fn extend_scalar_unsigned<'b>(buf: &'b mut [u8; MAX_ELEM_BYTES], scalar: &[u8], elem_width_bytes: usize) -> &'b [u8] {
    arith::resize_unsigned(&mut buf[..elem_width_bytes], scalar);
    &buf[..elem_width_bytes]
}

fn check_vv(
    src1: VecOperand,
    src2: VecOperand,
    dst: VecOperand,
) -> SimpleResult<()> {
    if !RegisterFile::is_aligned(src1.reg, src1.lmul) {
        return Err(ExceptionCode::Src1VecIll);
    }
    if !RegisterFile::is_aligned(src2.reg, src2.lmul) {
        return Err(ExceptionCode::Src2VecIll);
    }
    if !RegisterFile::is_aligned(dst.reg, dst.lmul) {
        return Err(ExceptionCode::DstVecIll);
    }
    Ok(())
}

fn check_vx(src2: VecOperand, dst: VecOperand) -> SimpleResult<()> {
    if !RegisterFile::is_aligned(src2.reg, src2.lmul) {
        return Err(ExceptionCode::Src2VecIll);
    }
    if !RegisterFile::is_aligned(dst.reg, dst.lmul) {
        return Err(ExceptionCode::DstVecIll);
    }
    Ok(())
}

#[tracing::instrument(skip_all)]
#[allow(clippy::too_many_arguments)]
fn binary_vv(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    src1: VecOperand,
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
    op: impl FnMut(&mut [u8], &[u8], &[u8]),
) -> SimpleResult<()> {
    check_vv(src1, src2, dst)?;
    vector::masked_binary(
        regfile,
        dst,
        src2,
        Operand2::Vector(src1),
        elem_width_bytes,
        vm,
        vec_elem_start,
        vec_len,
        op,
    );
    Ok(())
}

#[tracing::instrument(skip_all)]
#[allow(clippy::too_many_arguments)]
fn binary_vx(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
    op: impl FnMut(&mut [u8], &[u8], &[u8]),
) -> SimpleResult<()> {
    check_vx(src2, dst)?;
    vector::masked_binary(
        regfile,
        dst,
        src2,
        Operand2::Scalar(scalar),
        elem_width_bytes,
        vm,
        vec_elem_start,
        vec_len,
        op,
    );
    Ok(())
}

/// `vadd.vv`: `vd = vs2 + vs1`.
#[allow(clippy::too_many_arguments)]
pub fn add_vv(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    src1: VecOperand,
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    binary_vv(regfile, dst, src2, src1, elem_width_bytes, vm, vec_elem_start, vec_len, |d, a, b| {
        arith::add_with_carry(d, a, b);
    })
}

/// `vadd.vx` / `vadd.vi`: `vd = vs2 + scalar`.
#[allow(clippy::too_many_arguments)]
pub fn add_vx(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    let mut buf = [0u8; MAX_ELEM_BYTES];
    let scalar = extend_scalar_signed(&mut buf, scalar, elem_width_bytes);
    binary_vx(regfile, dst, src2, scalar, elem_width_bytes, vm, vec_elem_start, vec_len, |d, a, b| {
        arith::add_with_carry(d, a, b);
    })
}

/// `vsub.vv`: `vd = vs2 - vs1`.
#[allow(clippy::too_many_arguments)]
pub fn sub_vv(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    src1: VecOperand,
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    binary_vv(regfile, dst, src2, src1, elem_width_bytes, vm, vec_elem_start, vec_len, |d, a, b| {
        arith::sub_with_borrow(d, a, b);
    })
}

/// `vsub.vx`: `vd = vs2 - scalar`.
#[allow(clippy::too_many_arguments)]
pub fn sub_vx(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    let mut buf = [0u8; MAX_ELEM_BYTES];
    let scalar = extend_scalar_signed(&mut buf, scalar, elem_width_bytes);
    binary_vx(regfile, dst, src2, scalar, elem_width_bytes, vm, vec_elem_start, vec_len, |d, a, b| {
        arith::sub_with_borrow(d, a, b);
    })
}

/// `vrsub.vx` / `vrsub.vi`: `vd = scalar - vs2`, a true reverse subtract.
///
/// The reference `s_rsub`'s doc comment promises exactly this but its body
/// calls the same add-based helper `add_vv` uses; this implementation
/// follows the documented contract, not the mismatched body.
#[allow(clippy::too_many_arguments)]
pub fn rsub_vx(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    let mut buf = [0u8; MAX_ELEM_BYTES];
    let scalar = extend_scalar_signed(&mut buf, scalar, elem_width_bytes);
    binary_vx(regfile, dst, src2, scalar, elem_width_bytes, vm, vec_elem_start, vec_len, |d, a, b| {
        arith::sub_with_borrow(d, b, a);
    })
}

/// `vand.vv`.
#[allow(clippy::too_many_arguments)]
pub fn and_vv(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    src1: VecOperand,
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    binary_vv(regfile, dst, src2, src1, elem_width_bytes, vm, vec_elem_start, vec_len, arith::and)
}

/// `vand.vx` / `vand.vi`.
#[allow(clippy::too_many_arguments)]
pub fn and_vx(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    let mut buf = [0u8; MAX_ELEM_BYTES];
    let scalar = extend_scalar_signed(&mut buf, scalar, elem_width_bytes);
    binary_vx(regfile, dst, src2, scalar, elem_width_bytes, vm, vec_elem_start, vec_len, arith::and)
}

/// `vor.vv`.
#[allow(clippy::too_many_arguments)]
pub fn or_vv(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    src1: VecOperand,
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    binary_vv(regfile, dst, src2, src1, elem_width_bytes, vm, vec_elem_start, vec_len, arith::or)
}

/// `vor.vx` / `vor.vi`.
#[allow(clippy::too_many_arguments)]
pub fn or_vx(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    let mut buf = [0u8; MAX_ELEM_BYTES];
    let scalar = extend_scalar_signed(&mut buf, scalar, elem_width_bytes);
    binary_vx(regfile, dst, src2, scalar, elem_width_bytes, vm, vec_elem_start, vec_len, arith::or)
}

/// `vxor.vv`.
#[allow(clippy::too_many_arguments)]
pub fn xor_vv(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    src1: VecOperand,
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    binary_vv(regfile, dst, src2, src1, elem_width_bytes, vm, vec_elem_start, vec_len, arith::xor)
}

/// `vxor.vx` / `vxor.vi`.
#[allow(clippy::too_many_arguments)]
pub fn xor_vx(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    let mut buf = [0u8; MAX_ELEM_BYTES];
    let scalar = extend_scalar_signed(&mut buf, scalar, elem_width_bytes);
    binary_vx(regfile, dst, src2, scalar, elem_width_bytes, vm, vec_elem_start, vec_len, arith::xor)
}

fn shift_op(
    elem_width_bits: u32,
    shifter: fn(&mut [u8], &[u8], u32),
) -> impl FnMut(&mut [u8], &[u8], &[u8]) {
    move |dst, a, amount_raw| {
        let amount = arith::shift_amount(amount_raw, elem_width_bits);
        shifter(dst, a, amount);
    }
}

/// `vsll.vv`: logical shift left by `vs1 mod SEW`.
#[allow(clippy::too_many_arguments)]
pub fn sll_vv(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    src1: VecOperand,
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    let elem_width_bits = elem_width_bytes as u32 * 8;
    binary_vv(
        regfile,
        dst,
        src2,
        src1,
        elem_width_bytes,
        vm,
        vec_elem_start,
        vec_len,
        shift_op(elem_width_bits, arith::shift_left),
    )
}

/// `vsll.vx` / `vsll.vi`.
#[allow(clippy::too_many_arguments)]
pub fn sll_vx(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    let elem_width_bits = elem_width_bytes as u32 * 8;
    let mut buf = [0u8; MAX_ELEM_BYTES];
    let scalar = extend_scalar_unsigned(&mut buf, scalar, elem_width_bytes);
    binary_vx(
        regfile,
        dst,
        src2,
        scalar,
        elem_width_bytes,
        vm,
        vec_elem_start,
        vec_len,
        shift_op(elem_width_bits, arith::shift_left),
    )
}

/// `vsrl.vv`: logical shift right by `vs1 mod SEW`.
#[allow(clippy::too_many_arguments)]
pub fn srl_vv(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    src1: VecOperand,
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    let elem_width_bits = elem_width_bytes as u32 * 8;
    binary_vv(
        regfile,
        dst,
        src2,
        src1,
        elem_width_bytes,
        vm,
        vec_elem_start,
        vec_len,
        shift_op(elem_width_bits, arith::shift_right_logical),
    )
}

/// `vsrl.vx` / `vsrl.vi`.
#[allow(clippy::too_many_arguments)]
pub fn srl_vx(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    let elem_width_bits = elem_width_bytes as u32 * 8;
    let mut buf = [0u8; MAX_ELEM_BYTES];
    let scalar = extend_scalar_unsigned(&mut buf, scalar, elem_width_bytes);
    binary_vx(
        regfile,
        dst,
        src2,
        scalar,
        elem_width_bytes,
        vm,
        vec_elem_start,
        vec_len,
        shift_op(elem_width_bits, arith::shift_right_logical),
    )
}

/// `vsra.vv`: arithmetic shift right by `vs1 mod SEW`.
#[allow(clippy::too_many_arguments)]
pub fn sra_vv(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    src1: VecOperand,
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    let elem_width_bits = elem_width_bytes as u32 * 8;
    binary_vv(
        regfile,
        dst,
        src2,
        src1,
        elem_width_bytes,
        vm,
        vec_elem_start,
        vec_len,
        shift_op(elem_width_bits, arith::shift_right_arithmetic),
    )
}

/// `vsra.vx` / `vsra.vi`.
#[allow(clippy::too_many_arguments)]
pub fn sra_vx(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    let elem_width_bits = elem_width_bytes as u32 * 8;
    let mut buf = [0u8; MAX_ELEM_BYTES];
    let scalar = extend_scalar_unsigned(&mut buf, scalar, elem_width_bytes);
    binary_vx(
        regfile,
        dst,
        src2,
        scalar,
        elem_width_bytes,
        vm,
        vec_elem_start,
        vec_len,
        shift_op(elem_width_bits, arith::shift_right_arithmetic),
    )
}

/// `vmul.vv`: `vd = low_w(vs2 * vs1)`.
#[allow(clippy::too_many_arguments)]
pub fn mul_vv(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    src1: VecOperand,
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    binary_vv(regfile, dst, src2, src1, elem_width_bytes, vm, vec_elem_start, vec_len, muldiv::mul_low)
}

/// `vmul.vx`.
#[allow(clippy::too_many_arguments)]
pub fn mul_vx(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    let mut buf = [0u8; MAX_ELEM_BYTES];
    let scalar = extend_scalar_signed(&mut buf, scalar, elem_width_bytes);
    binary_vx(regfile, dst, src2, scalar, elem_width_bytes, vm, vec_elem_start, vec_len, muldiv::mul_low)
}

/// The three high-half multiply forms, selected by `(signed_lhs, signed_rhs)`.
fn mulh_op(signed_lhs: bool, signed_rhs: bool) -> fn(&mut [u8], &[u8], &[u8]) {
    match (signed_lhs, signed_rhs) {
        (false, false) => muldiv::mulh_unsigned,
        (true, true) => muldiv::mulh_signed,
        (true, false) => muldiv::mulh_signed_unsigned,
        (false, true) => muldiv::mulh_signed_unsigned,
    }
}

/// `vmulh.vv` / `vmulhu.vv` / `vmulhsu.vv`.
#[allow(clippy::too_many_arguments)]
pub fn mulh_vv(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    src1: VecOperand,
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
    signed_lhs: bool,
    signed_rhs: bool,
) -> SimpleResult<()> {
    binary_vv(
        regfile,
        dst,
        src2,
        src1,
        elem_width_bytes,
        vm,
        vec_elem_start,
        vec_len,
        mulh_op(signed_lhs, signed_rhs),
    )
}

/// `vmulh.vx` / `vmulhu.vx` / `vmulhsu.vx`.
#[allow(clippy::too_many_arguments)]
pub fn mulh_vx(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
    signed_lhs: bool,
    signed_rhs: bool,
) -> SimpleResult<()> {
    let mut buf = [0u8; MAX_ELEM_BYTES];
    let scalar = if signed_rhs {
        extend_scalar_signed(&mut buf, scalar, elem_width_bytes)
    } else {
        extend_scalar_unsigned(&mut buf, scalar, elem_width_bytes)
    };
    binary_vx(
        regfile,
        dst,
        src2,
        scalar,
        elem_width_bytes,
        vm,
        vec_elem_start,
        vec_len,
        mulh_op(signed_lhs, signed_rhs),
    )
}

/// A comparison opcode: writes one predicate bit per selected element into
/// a mask register rather than an arithmetic value into a vector register.
#[allow(clippy::too_many_arguments)]
pub fn compare_vv(
    regfile: &mut RegisterFile,
    dst_mask_reg: usize,
    src2: VecOperand,
    src1: VecOperand,
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
    cmp: impl FnMut(&[u8], &[u8]) -> bool,
) -> SimpleResult<()> {
    if !RegisterFile::is_aligned(src1.reg, src1.lmul) {
        return Err(ExceptionCode::Src1VecIll);
    }
    if !RegisterFile::is_aligned(src2.reg, src2.lmul) {
        return Err(ExceptionCode::Src2VecIll);
    }
    mask::masked_compare(
        regfile,
        dst_mask_reg,
        src2,
        Operand2::Vector(src1),
        elem_width_bytes,
        vm,
        vec_elem_start,
        vec_len,
        cmp,
    );
    Ok(())
}

/// A comparison opcode against a scalar. `signed` selects how the scalar
/// is coupled to an `elem_width_bytes`-wide element: sign-extended for the
/// signed comparisons, zero-extended for the unsigned ones (§4.3).
#[allow(clippy::too_many_arguments)]
pub fn compare_vx(
    regfile: &mut RegisterFile,
    dst_mask_reg: usize,
    src2: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
    signed: bool,
    cmp: impl FnMut(&[u8], &[u8]) -> bool,
) -> SimpleResult<()> {
    if !RegisterFile::is_aligned(src2.reg, src2.lmul) {
        return Err(ExceptionCode::Src2VecIll);
    }
    let mut buf = [0u8; MAX_ELEM_BYTES];
    let scalar = if signed {
        extend_scalar_signed(&mut buf, scalar, elem_width_bytes)
    } else {
        extend_scalar_unsigned(&mut buf, scalar, elem_width_bytes)
    };
    mask::masked_compare(
        regfile,
        dst_mask_reg,
        src2,
        Operand2::Scalar(scalar),
        elem_width_bytes,
        vm,
        vec_elem_start,
        vec_len,
        cmp,
    );
    Ok(())
}

/// Direction/signedness-parametrized widening add/sub, matching the
/// reference's `wop_vv`/`wop_vx`/`wop_wv`/`wop_wx` one-function-per-shape
/// but collapsed to shared dispatch the way the kept-as-reference
/// `alu_capture_overflow`-style closures already do for the scalar ALU.
fn widen_narrow_op(signed: bool, add: bool) -> fn(&mut [u8], &[u8], &[u8]) {
    match (signed, add) {
        (false, true) => wideint::widen_add_unsigned,
        (false, false) => wideint::widen_sub_unsigned,
        (true, true) => wideint::widen_add_signed,
        (true, false) => wideint::widen_sub_signed,
    }
}

/// `vwadd(u).vv` / `vwsub(u).vv`: both sources narrow, destination wide.
#[allow(clippy::too_many_arguments)]
pub fn wop_vv(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    src1: VecOperand,
    narrow_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
    signed: bool,
    add: bool,
) -> SimpleResult<()> {
    if !RegisterFile::is_aligned(src1.reg, src1.lmul) {
        return Err(ExceptionCode::Src1VecIll);
    }
    if !RegisterFile::is_aligned(src2.reg, src2.lmul) {
        return Err(ExceptionCode::Src2VecIll);
    }
    if !RegisterFile::is_aligned(dst.reg, dst.lmul) {
        return Err(ExceptionCode::DstVecIll);
    }
    if regfile.overlaps(dst.reg, dst.lmul, src2.reg, src2.lmul) {
        return Err(ExceptionCode::WideningOverlapVdVs2Ill);
    }
    if regfile.overlaps(dst.reg, dst.lmul, src1.reg, src1.lmul) {
        return Err(ExceptionCode::WideningOverlapVdVs1Ill);
    }
    vector::masked_widening_binary(
        regfile,
        dst,
        src2,
        Operand2::Vector(src1),
        narrow_width_bytes,
        false,
        vm,
        vec_elem_start,
        vec_len,
        widen_narrow_op(signed, add),
    );
    Ok(())
}

/// `vwadd(u).vx` / `vwsub(u).vx`: `vs1` is a scalar, so only `vs2`
/// participates in the widening-overlap check.
#[allow(clippy::too_many_arguments)]
pub fn wop_vx(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    scalar: &[u8],
    narrow_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
    signed: bool,
    add: bool,
) -> SimpleResult<()> {
    if !RegisterFile::is_aligned(src2.reg, src2.lmul) {
        return Err(ExceptionCode::Src2VecIll);
    }
    if !RegisterFile::is_aligned(dst.reg, dst.lmul) {
        return Err(ExceptionCode::DstVecIll);
    }
    if regfile.overlaps(dst.reg, dst.lmul, src2.reg, src2.lmul) {
        return Err(ExceptionCode::WideningOverlapVdVs2Ill);
    }
    let mut buf = [0u8; MAX_ELEM_BYTES];
    let scalar = if signed {
        extend_scalar_signed(&mut buf, scalar, narrow_width_bytes)
    } else {
        extend_scalar_unsigned(&mut buf, scalar, narrow_width_bytes)
    };
    vector::masked_widening_binary(
        regfile,
        dst,
        src2,
        Operand2::Scalar(scalar),
        narrow_width_bytes,
        false,
        vm,
        vec_elem_start,
        vec_len,
        widen_narrow_op(signed, add),
    );
    Ok(())
}

/// `vwadd(u).wv` / `vwsub(u).wv`: `vs2` is already wide (the running
/// accumulator); only `vs1` (narrow) needs extending.
#[allow(clippy::too_many_arguments)]
pub fn wop_wv(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2_wide: VecOperand,
    src1: VecOperand,
    narrow_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
    signed: bool,
    add: bool,
) -> SimpleResult<()> {
    if !RegisterFile::is_aligned(src1.reg, src1.lmul) {
        return Err(ExceptionCode::Src1VecIll);
    }
    if !RegisterFile::is_aligned(dst.reg, dst.lmul) {
        return Err(ExceptionCode::DstVecIll);
    }
    if !RegisterFile::is_aligned(src2_wide.reg, src2_wide.lmul) {
        return Err(ExceptionCode::Src2VecIll);
    }
    if regfile.overlaps(dst.reg, dst.lmul, src2_wide.reg, src2_wide.lmul) {
        return Err(ExceptionCode::WideningOverlapVdVs2Ill);
    }
    if regfile.overlaps(dst.reg, dst.lmul, src1.reg, src1.lmul) {
        return Err(ExceptionCode::WideningOverlapVdVs1Ill);
    }
    vector::masked_widening_binary(
        regfile,
        dst,
        src2_wide,
        Operand2::Vector(src1),
        narrow_width_bytes,
        true,
        vm,
        vec_elem_start,
        vec_len,
        |d, a, b| wideint::widen_op_already_wide(d, a, b, signed, add),
    );
    Ok(())
}

/// `vwadd(u).wx` / `vwsub(u).wx`: both `vd` and `vs2` are the wide group.
#[allow(clippy::too_many_arguments)]
pub fn wop_wx(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2_wide: VecOperand,
    scalar: &[u8],
    narrow_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
    signed: bool,
    add: bool,
) -> SimpleResult<()> {
    if !RegisterFile::is_aligned(dst.reg, dst.lmul) {
        return Err(ExceptionCode::DstVecIll);
    }
    if !RegisterFile::is_aligned(src2_wide.reg, src2_wide.lmul) {
        return Err(ExceptionCode::Src2VecIll);
    }
    if regfile.overlaps(dst.reg, dst.lmul, src2_wide.reg, src2_wide.lmul) {
        return Err(ExceptionCode::WideningOverlapVdVs2Ill);
    }
    let mut buf = [0u8; MAX_ELEM_BYTES];
    let scalar = if signed {
        extend_scalar_signed(&mut buf, scalar, narrow_width_bytes)
    } else {
        extend_scalar_unsigned(&mut buf, scalar, narrow_width_bytes)
    };
    vector::masked_widening_binary(
        regfile,
        dst,
        src2_wide,
        Operand2::Scalar(scalar),
        narrow_width_bytes,
        true,
        vm,
        vec_elem_start,
        vec_len,
        |d, a, b| wideint::widen_op_already_wide(d, a, b, signed, add),
    );
    Ok(())
}

/// `vle<eew>.v`: unit-stride (or strided) load. `EMUL` is derived here from
/// `eew_bits`/`sew_bits`/`lmul` (§3 "Derived effective multiplicity") and
/// rejected before any memory access if it falls outside `[1/8, 8]`.
#[allow(clippy::too_many_arguments)]
pub fn load(
    read_mem: impl FnMut(u64, &mut [u8]),
    regfile: &mut RegisterFile,
    eew_bits: u32,
    sew_bits: u32,
    lmul: Lmul,
    vec_len: usize,
    dst_vec_reg: usize,
    src_mem_start: u64,
    vec_elem_start: usize,
    vm: bool,
    stride_bytes: i32,
) -> SimpleResult<()> {
    let emul = rvv_asm::derive_emul(eew_bits, sew_bits, lmul, 1)?;
    memory::load_eew(
        read_mem,
        regfile,
        emul,
        (eew_bits / 8) as usize,
        vec_len,
        dst_vec_reg,
        src_mem_start,
        vec_elem_start,
        vm,
        stride_bytes,
    )
}

/// `vse<eew>.v`: unit-stride (or strided) store. `EMUL` is derived the
/// same way as [`load`].
#[allow(clippy::too_many_arguments)]
pub fn store(
    write_mem: impl FnMut(u64, &[u8]),
    regfile: &RegisterFile,
    eew_bits: u32,
    sew_bits: u32,
    lmul: Lmul,
    vec_len: usize,
    src_vec_reg: usize,
    dst_mem_start: u64,
    vec_elem_start: usize,
    vm: bool,
    stride_bytes: i32,
) -> SimpleResult<()> {
    let emul = rvv_asm::derive_emul(eew_bits, sew_bits, lmul, 1)?;
    memory::store_eew(
        write_mem,
        regfile,
        emul,
        (eew_bits / 8) as usize,
        vec_len,
        src_vec_reg,
        dst_mem_start,
        vec_elem_start,
        vm,
        stride_bytes,
    )
}

/// `vlseg<nf>e<eew>.v` / `vlsseg<nf>e<eew>.v`: segment load, unit-stride or
/// strided selected by `stride_bytes` (`None` for unit-stride). `EMUL` is
/// derived from `eew_bits`/`sew_bits`/`lmul`, scaled by `nf` fields
/// sharing the same bound (§4.6, §7 item 4); the segment is additionally
/// rejected if it would span past architectural register 31 (§7 item 5).
#[allow(clippy::too_many_arguments)]
pub fn load_segment(
    read_mem: impl FnMut(u64, &mut [u8]),
    regfile: &mut RegisterFile,
    eew_bits: u32,
    sew_bits: u32,
    lmul: Lmul,
    nf: usize,
    vec_len: usize,
    dst_vec_reg: usize,
    src_mem_start: u64,
    vec_elem_start: usize,
    vm: bool,
    stride_bytes: Option<i32>,
) -> SimpleResult<()> {
    let emul = rvv_asm::derive_emul(eew_bits, sew_bits, lmul, nf as u32)?;
    let eew_bytes = (eew_bits / 8) as usize;
    match stride_bytes {
        None => memory::load_segment_unitstride(
            read_mem,
            regfile,
            emul,
            nf,
            eew_bytes,
            vec_len,
            dst_vec_reg,
            src_mem_start,
            vec_elem_start,
            vm,
        ),
        Some(stride) => memory::load_segment_stride(
            read_mem,
            regfile,
            emul,
            nf,
            eew_bytes,
            vec_len,
            dst_vec_reg,
            src_mem_start,
            vec_elem_start,
            vm,
            stride,
        ),
    }
}

/// `vsseg<nf>e<eew>.v` / `vssseg<nf>e<eew>.v`: segment store, mirroring
/// [`load_segment`].
#[allow(clippy::too_many_arguments)]
pub fn store_segment(
    write_mem: impl FnMut(u64, &[u8]),
    regfile: &RegisterFile,
    eew_bits: u32,
    sew_bits: u32,
    lmul: Lmul,
    nf: usize,
    vec_len: usize,
    src_vec_reg: usize,
    dst_mem_start: u64,
    vec_elem_start: usize,
    vm: bool,
    stride_bytes: Option<i32>,
) -> SimpleResult<()> {
    let emul = rvv_asm::derive_emul(eew_bits, sew_bits, lmul, nf as u32)?;
    let eew_bytes = (eew_bits / 8) as usize;
    match stride_bytes {
        None => memory::store_segment_unitstride(
            write_mem,
            regfile,
            emul,
            nf,
            eew_bytes,
            vec_len,
            src_vec_reg,
            dst_mem_start,
            vec_elem_start,
            vm,
        ),
        Some(stride) => memory::store_segment_stride(
            write_mem,
            regfile,
            emul,
            nf,
            eew_bytes,
            vec_len,
            src_vec_reg,
            dst_mem_start,
            vec_elem_start,
            vm,
            stride,
        ),
    }
}

/// `vmv.x.s`.
pub fn mv_xs(
    regfile: &RegisterFile,
    src2: VecOperand,
    elem_width_bytes: usize,
    vec_elem_start: usize,
    vec_len: usize,
    out: &mut [u8],
) {
    permutation::mv_xs(regfile, src2, elem_width_bytes, vec_elem_start, vec_len, out);
}

/// `vmv.s.x`.
pub fn mv_sx(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vec_elem_start: usize,
    vec_len: usize,
) {
    permutation::mv_sx(regfile, dst, scalar, elem_width_bytes, vec_elem_start, vec_len);
}

/// `vmv.v.v`: unmasked vector-to-vector move. No `vm` parameter — the
/// encoding carries none.
pub fn mv_vv(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src1: VecOperand,
    elem_width_bytes: usize,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    permutation::mv_vv(regfile, dst, src1, elem_width_bytes, vec_elem_start, vec_len)
}

/// `vmv.v.i`: unmasked immediate broadcast.
pub fn mv_vi(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    imm: &[u8],
    elem_width_bytes: usize,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    permutation::mv_vi(regfile, dst, imm, elem_width_bytes, vec_elem_start, vec_len)
}

/// `vmv.v.x`: unmasked scalar broadcast.
pub fn mv_vx(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    permutation::mv_vx(regfile, dst, scalar, elem_width_bytes, vec_elem_start, vec_len)
}

/// `vfmv.f.s`: floating-point scalar read, not modeled (Non-goals); always
/// succeeds as a no-op.
pub fn fmv_fs() -> SimpleResult<()> {
    permutation::fmv_stub()
}

/// `vfmv.s.f`: floating-point scalar write, not modeled (Non-goals); always
/// succeeds as a no-op.
pub fn fmv_sf() -> SimpleResult<()> {
    permutation::fmv_stub()
}

/// `vfslide1up.vf`: floating-point slide-by-one, not modeled (Non-goals);
/// always succeeds as a no-op.
pub fn fslide1up() -> SimpleResult<()> {
    permutation::fslide1up_stub()
}

/// `vfslide1down.vf`: see [`fslide1up`].
pub fn fslide1down() -> SimpleResult<()> {
    permutation::fslide1down_stub()
}

/// `vslideup.vx` / `vslideup.vi`.
#[allow(clippy::too_many_arguments)]
pub fn slideup(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    amount: usize,
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    permutation::slideup(regfile, dst, src2, amount, elem_width_bytes, vm, vec_elem_start, vec_len)
}

/// `vslidedown.vx` / `vslidedown.vi`.
#[allow(clippy::too_many_arguments)]
pub fn slidedown(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    amount: usize,
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    permutation::slidedown(regfile, dst, src2, amount, elem_width_bytes, vm, vec_elem_start, vec_len)
}

/// `vslide1up.vx`.
#[allow(clippy::too_many_arguments)]
pub fn slide1up(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    permutation::slide1up(regfile, dst, src2, scalar, elem_width_bytes, vm, vec_elem_start, vec_len)
}

/// `vslide1down.vx`.
#[allow(clippy::too_many_arguments)]
pub fn slide1down(
    regfile: &mut RegisterFile,
    dst: VecOperand,
    src2: VecOperand,
    scalar: &[u8],
    elem_width_bytes: usize,
    vm: bool,
    vec_elem_start: usize,
    vec_len: usize,
) -> SimpleResult<()> {
    permutation::slide1down(regfile, dst, src2, scalar, elem_width_bytes, vm, vec_elem_start, vec_len)
}
