//! The unit-stride/strided load/store engine.
//!
//! Memory access is abstracted behind `FnMut` callbacks rather than a
//! concrete address space, the same shape the reference implementation
//! gives its `std::function<void(size_t, uint8_t*, size_t)>` read/write
//! hooks: this crate never owns main memory, only the vector register
//! file, so the caller supplies how a byte address turns into bytes.

use rvv_asm::{ExceptionCode, Lmul};

use crate::consts::VECTOR_REGISTER_COUNT;
use crate::error::SimpleResult;
use crate::regfile::{RegisterFile, MAX_ELEM_BYTES};

/// Loads `vec_len` elements of `eew_bytes` width, striding through memory
/// by `eew_bytes + stride_bytes` per element, into the register group at
/// `dst_vec_reg` under multiplicity `emul`.
///
/// `vm == false` disables masking (every element selected); `vm == true`
/// enables it (only elements whose mask bit is set are selected).
/// Masking never affects address progression: `mem_offset` advances by
/// the full stride every iteration, masked or not, exactly as address
/// generation in hardware does not depend on the predicate.
#[allow(clippy::too_many_arguments)]
pub fn load_eew(
    mut read_mem: impl FnMut(u64, &mut [u8]),
    regfile: &mut RegisterFile,
    emul: Lmul,
    eew_bytes: usize,
    vec_len: usize,
    dst_vec_reg: usize,
    src_mem_start: u64,
    vec_elem_start: usize,
    vm: bool,
    stride_bytes: i32,
) -> SimpleResult<()> {
    if !RegisterFile::is_aligned(dst_vec_reg, emul) {
        return Err(ExceptionCode::DstVecIll);
    }
    let mut mem_offset: i64 = 0;
    let mut buf = [0u8; MAX_ELEM_BYTES];
    for i in 0..vec_len {
        if i >= vec_elem_start && (!vm || regfile.mask_bit(0, i)) {
            let addr = (src_mem_start as i64 + mem_offset) as u64;
            read_mem(addr, &mut buf[..eew_bytes]);
            regfile.write_element(dst_vec_reg, emul, eew_bytes, i, &buf[..eew_bytes]);
        }
        mem_offset += eew_bytes as i64 + stride_bytes as i64;
    }
    Ok(())
}

/// Stores `vec_len` elements of `eew_bytes` width out of the register
/// group at `src_vec_reg`, striding through memory by `eew_bytes +
/// stride_bytes` per element.
///
/// A misaligned source surfaces as [`ExceptionCode::Src3VecIll`]: the
/// store's vector operand occupies the third operand role (destination
/// memory address and mask are the other two), matching the reference
/// error-code table.
#[allow(clippy::too_many_arguments)]
pub fn store_eew(
    mut write_mem: impl FnMut(u64, &[u8]),
    regfile: &RegisterFile,
    emul: Lmul,
    eew_bytes: usize,
    vec_len: usize,
    src_vec_reg: usize,
    dst_mem_start: u64,
    vec_elem_start: usize,
    vm: bool,
    stride_bytes: i32,
) -> SimpleResult<()> {
    if !RegisterFile::is_aligned(src_vec_reg, emul) {
        return Err(ExceptionCode::Src3VecIll);
    }
    let mut mem_offset: i64 = 0;
    let mut buf = [0u8; MAX_ELEM_BYTES];
    for i in 0..vec_len {
        if i >= vec_elem_start && (!vm || regfile.mask_bit(0, i)) {
            regfile.read_element(src_vec_reg, emul, eew_bytes, i, &mut buf);
            let addr = (dst_mem_start as i64 + mem_offset) as u64;
            write_mem(addr, &buf[..eew_bytes]);
        }
        mem_offset += eew_bytes as i64 + stride_bytes as i64;
    }
    Ok(())
}

/// Register-group stride between consecutive fields of a segment access:
/// `EMUL_num / EMUL_den`, truncating integer division — `0` for a
/// fractional EMUL, matching the reference's per-field register-index
/// arithmetic (every field of a fractional-EMUL segment packs into the
/// same single register rather than spanning to a new one).
fn field_register_stride(emul: Lmul) -> usize {
    emul.numerator as usize / emul.denominator as usize
}

fn check_segment_bounds(dst_vec_reg: usize, nf: usize, emul: Lmul) -> SimpleResult<()> {
    if dst_vec_reg + nf * field_register_stride(emul) > VECTOR_REGISTER_COUNT {
        return Err(ExceptionCode::DstVecIll);
    }
    Ok(())
}

/// `vlseg<nf>e<eew>.v`: unit-stride segment load. Calls [`load_eew`] once
/// per field `f ∈ [0, nf)`; the memory cursor advances by `(vec_len -
/// vec_elem_start) × eew_bytes` between fields and `vec_elem_start` resets
/// to `0` after the first field (§4.6). A silent no-op when
/// `vec_elem_start >= vec_len`.
#[allow(clippy::too_many_arguments)]
pub fn load_segment_unitstride(
    mut read_mem: impl FnMut(u64, &mut [u8]),
    regfile: &mut RegisterFile,
    emul: Lmul,
    nf: usize,
    eew_bytes: usize,
    vec_len: usize,
    dst_vec_reg: usize,
    src_mem_start: u64,
    vec_elem_start: usize,
    vm: bool,
) -> SimpleResult<()> {
    check_segment_bounds(dst_vec_reg, nf, emul)?;
    if vec_elem_start >= vec_len {
        return Ok(());
    }
    let stride = field_register_stride(emul);
    let mut mem_offset = src_mem_start;
    let mut start = vec_elem_start;
    for f in 0..nf {
        load_eew(
            &mut read_mem,
            regfile,
            emul,
            eew_bytes,
            vec_len,
            dst_vec_reg + f * stride,
            mem_offset,
            start,
            vm,
            0,
        )?;
        mem_offset += ((vec_len - start) * eew_bytes) as u64;
        start = 0;
    }
    Ok(())
}

/// `vlseg<nf>e<eew>.v` with a non-zero stride: each field's memory base is
/// `src_mem_start + f × eew_bytes`, independently of the others, and the
/// same `stride_bytes` applies within every field.
#[allow(clippy::too_many_arguments)]
pub fn load_segment_stride(
    mut read_mem: impl FnMut(u64, &mut [u8]),
    regfile: &mut RegisterFile,
    emul: Lmul,
    nf: usize,
    eew_bytes: usize,
    vec_len: usize,
    dst_vec_reg: usize,
    src_mem_start: u64,
    vec_elem_start: usize,
    vm: bool,
    stride_bytes: i32,
) -> SimpleResult<()> {
    check_segment_bounds(dst_vec_reg, nf, emul)?;
    if vec_elem_start >= vec_len {
        return Ok(());
    }
    let stride = field_register_stride(emul);
    let mut start = vec_elem_start;
    for f in 0..nf {
        let field_base = src_mem_start + (f * eew_bytes) as u64;
        load_eew(
            &mut read_mem,
            regfile,
            emul,
            eew_bytes,
            vec_len,
            dst_vec_reg + f * stride,
            field_base,
            start,
            vm,
            stride_bytes,
        )?;
        start = 0;
    }
    Ok(())
}

/// `vsseg<nf>e<eew>.v`: unit-stride segment store, mirroring
/// [`load_segment_unitstride`].
#[allow(clippy::too_many_arguments)]
pub fn store_segment_unitstride(
    mut write_mem: impl FnMut(u64, &[u8]),
    regfile: &RegisterFile,
    emul: Lmul,
    nf: usize,
    eew_bytes: usize,
    vec_len: usize,
    src_vec_reg: usize,
    dst_mem_start: u64,
    vec_elem_start: usize,
    vm: bool,
) -> SimpleResult<()> {
    check_segment_bounds(src_vec_reg, nf, emul)?;
    if vec_elem_start >= vec_len {
        return Ok(());
    }
    let stride = field_register_stride(emul);
    let mut mem_offset = dst_mem_start;
    let mut start = vec_elem_start;
    for f in 0..nf {
        store_eew(
            &mut write_mem,
            regfile,
            emul,
            eew_bytes,
            vec_len,
            src_vec_reg + f * stride,
            mem_offset,
            start,
            vm,
            0,
        )?;
        mem_offset += ((vec_len - start) * eew_bytes) as u64;
        start = 0;
    }
    Ok(())
}

/// `vsseg<nf>e<eew>.v` with a non-zero stride, mirroring
/// [`load_segment_stride`].
#[allow(clippy::too_many_arguments)]
pub fn store_segment_stride(
    mut write_mem: impl FnMut(u64, &[u8]),
    regfile: &RegisterFile,
    emul: Lmul,
    nf: usize,
    eew_bytes: usize,
    vec_len: usize,
    src_vec_reg: usize,
    dst_mem_start: u64,
    vec_elem_start: usize,
    vm: bool,
    stride_bytes: i32,
) -> SimpleResult<()> {
    check_segment_bounds(src_vec_reg, nf, emul)?;
    if vec_elem_start >= vec_len {
        return Ok(());
    }
    let stride = field_register_stride(emul);
    let mut start = vec_elem_start;
    for f in 0..nf {
        let field_base = dst_mem_start + (f * eew_bytes) as u64;
        store_eew(
            &mut write_mem,
            regfile,
            emul,
            eew_bytes,
            vec_len,
            src_vec_reg + f * stride,
            field_base,
            start,
            vm,
            stride_bytes,
        )?;
        start = 0;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn rf(vlen_bytes: usize) -> Vec<u8> {
        vec![0u8; vlen_bytes * crate::consts::VECTOR_REGISTER_COUNT]
    }

    #[test]
    fn load_unit_stride_reads_consecutive_words() {
        let mut mem = rf(8);
        let mut regfile = RegisterFile::new(&mut mem, 8);
        let backing: Vec<u8> = (0u8..16).collect();
        load_eew(
            |addr, out| out.copy_from_slice(&backing[addr as usize..addr as usize + out.len()]),
            &mut regfile,
            Lmul::M1,
            2,
            4,
            1,
            0,
            0,
            false,
            0,
        )
        .unwrap();
        let mut out = [0u8; 2];
        regfile.read_element(1, Lmul::M1, 2, 0, &mut out);
        assert_eq!(out, [0, 1]);
        regfile.read_element(1, Lmul::M1, 2, 3, &mut out);
        assert_eq!(out, [6, 7]);
    }

    #[test]
    fn load_misaligned_dst_is_rejected() {
        let mut mem = rf(8);
        let mut regfile = RegisterFile::new(&mut mem, 8);
        let result = load_eew(
            |_, _| {},
            &mut regfile,
            Lmul::M2,
            2,
            4,
            1,
            0,
            0,
            true,
            0,
        );
        assert_eq!(result, Err(ExceptionCode::DstVecIll));
    }

    #[test]
    fn store_strided_writes_with_gaps() {
        let mut mem = rf(8);
        let mut regfile = RegisterFile::new(&mut mem, 8);
        for i in 0..4u16 {
            regfile.write_element(1, Lmul::M1, 2, i as usize, &i.to_le_bytes());
        }
        let mut written = BTreeMap::new();
        store_eew(
            |addr, bytes| {
                written.insert(addr, bytes.to_vec());
            },
            &regfile,
            Lmul::M1,
            2,
            4,
            1,
            0,
            0,
            false,
            2,
        )
        .unwrap();
        assert_eq!(written[&0], vec![0, 0]);
        assert_eq!(written[&4], vec![1, 0]);
        assert_eq!(written[&8], vec![2, 0]);
    }

    #[test]
    fn masking_does_not_perturb_address_progression() {
        let mut mem = rf(8);
        let mut regfile = RegisterFile::new(&mut mem, 8);
        for i in 0..4u16 {
            regfile.write_element(1, Lmul::M1, 2, i as usize, &i.to_le_bytes());
        }
        regfile.set_mask_bit(0, 0, true);
        regfile.set_mask_bit(0, 2, true);
        let mut written = BTreeMap::new();
        store_eew(
            |addr, bytes| {
                written.insert(addr, bytes.to_vec());
            },
            &regfile,
            Lmul::M1,
            2,
            4,
            1,
            0,
            0,
            true,
            0,
        )
        .unwrap();
        assert_eq!(written.len(), 2);
        assert!(written.contains_key(&0));
        assert!(written.contains_key(&4));
    }

    #[test]
    fn load_segment_unitstride_deinterleaves_fields_into_separate_registers() {
        let mut mem = rf(8);
        let mut regfile = RegisterFile::new(&mut mem, 8);
        // 2 fields, 2 elements each, EEW=16 bits (2 bytes): memory is
        // [f0e0, f1e0, f0e1, f1e1, ...] interleaved per the segment layout.
        let backing: Vec<u8> = (0u8..8).collect();
        load_segment_unitstride(
            |addr, out| out.copy_from_slice(&backing[addr as usize..addr as usize + out.len()]),
            &mut regfile,
            Lmul::M1,
            2,
            2,
            2,
            2,
            0,
            0,
            false,
        )
        .unwrap();
        let mut out = [0u8; 2];
        regfile.read_element(2, Lmul::M1, 2, 0, &mut out);
        assert_eq!(out, [0, 1], "field 0, element 0");
        regfile.read_element(2, Lmul::M1, 2, 1, &mut out);
        assert_eq!(out, [2, 3], "field 0, element 1");
        regfile.read_element(3, Lmul::M1, 2, 0, &mut out);
        assert_eq!(out, [4, 5], "field 1, element 0");
        regfile.read_element(3, Lmul::M1, 2, 1, &mut out);
        assert_eq!(out, [6, 7], "field 1, element 1");
    }

    #[test]
    fn load_segment_rejects_when_fields_span_past_register_31() {
        let mut mem = rf(8);
        let mut regfile = RegisterFile::new(&mut mem, 8);
        let result = load_segment_unitstride(
            |_, _| {},
            &mut regfile,
            Lmul::M8,
            4,
            2,
            2,
            16,
            0,
            0,
            true,
        );
        assert_eq!(result, Err(ExceptionCode::DstVecIll));
    }

    #[test]
    fn load_segment_is_noop_when_vstart_at_or_past_vl() {
        let mut mem = rf(8);
        let mut regfile = RegisterFile::new(&mut mem, 8);
        load_segment_unitstride(
            |_, _| panic!("must not touch memory"),
            &mut regfile,
            Lmul::M1,
            2,
            2,
            4,
            2,
            0,
            4,
            true,
        )
        .unwrap();
    }

    #[test]
    fn store_segment_stride_bases_each_field_independently() {
        let mut mem = rf(8);
        let mut regfile = RegisterFile::new(&mut mem, 8);
        regfile.write_element(2, Lmul::M1, 2, 0, &0xAAAAu16.to_le_bytes());
        regfile.write_element(3, Lmul::M1, 2, 0, &0xBBBBu16.to_le_bytes());
        let mut written = BTreeMap::new();
        store_segment_stride(
            |addr, bytes| {
                written.insert(addr, bytes.to_vec());
            },
            &regfile,
            Lmul::M1,
            2,
            2,
            1,
            2,
            0x100,
            0,
            false,
            0,
        )
        .unwrap();
        assert_eq!(written[&0x100], vec![0xAA, 0xAA], "field 0 base is unshifted");
        assert_eq!(written[&0x102], vec![0xBB, 0xBB], "field 1 base is shifted by one eew");
    }
}
