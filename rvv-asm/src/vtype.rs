//! Codec for the 16-bit VTYPE configuration word: SEW, LMUL (as a rational
//! numerator/denominator pair so fractional multiplicities survive later
//! arithmetic unambiguously), tail-agnostic and mask-agnostic policy.

use crate::ExceptionCode;

const MASK_SEW: u16 = 0x38;
const OFFSET_SEW: u16 = 3;
const MASK_LMUL: u16 = 0x07;
const MASK_TA: u16 = 0x40;
const MASK_MA: u16 = 0x80;

/// LMUL expressed as a rational multiplicity `numerator / denominator`.
///
/// `numerator >= denominator` for LMUL >= 1 (whole-register groups);
/// `numerator < denominator` for fractional LMUL (`1/2`, `1/4`, `1/8`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lmul {
    /// LMUL numerator (`Z`).
    pub numerator: u8,
    /// LMUL denominator (`N`).
    pub denominator: u8,
}

impl Lmul {
    /// The whole-register multiplicities: ×1, ×2, ×4, ×8.
    pub const M1: Self = Self::whole(1);
    /// ×2.
    pub const M2: Self = Self::whole(2);
    /// ×4.
    pub const M4: Self = Self::whole(4);
    /// ×8.
    pub const M8: Self = Self::whole(8);
    /// ÷2.
    pub const MF2: Self = Self::fractional(2);
    /// ÷4.
    pub const MF4: Self = Self::fractional(4);
    /// ÷8.
    pub const MF8: Self = Self::fractional(8);

    const fn whole(z: u8) -> Self {
        Lmul {
            numerator: z,
            denominator: 1,
        }
    }

    const fn fractional(n: u8) -> Self {
        Lmul {
            numerator: 1,
            denominator: n,
        }
    }

    /// True iff this multiplicity is fractional (`N > Z`), i.e. a register
    /// group never spans more than one architectural register.
    pub const fn is_fractional(self) -> bool {
        self.denominator > self.numerator
    }

    /// Register-group stride in architectural registers: `max(1, Z/N)`.
    pub const fn group_size_regs(self) -> usize {
        if self.is_fractional() {
            1
        } else {
            (self.numerator / self.denominator) as usize
        }
    }
}

/// The fields decoded out of a VTYPE word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodedVType {
    /// Selected element width, in bits.
    pub sew: u32,
    /// Register-group multiplicity.
    pub lmul: Lmul,
    /// Tail-agnostic flag.
    pub ta: bool,
    /// Mask-agnostic flag.
    pub ma: bool,
}

/// Decode a VTYPE word into its constituent fields.
///
/// Returns [`ExceptionCode::DstVecIll`] for the reserved LMUL code (`4`):
/// a reserved VTYPE makes every subsequent register-group computation
/// meaningless, so the decoder surfaces it as a generic illegal-instruction
/// the way the caller would for a malformed destination.
pub fn decode(vtype: u16) -> Result<DecodedVType, ExceptionCode> {
    let sew = 8u32 << extract_sew(vtype);
    let ta = extract_ta(vtype) != 0;
    let ma = extract_ma(vtype) != 0;
    let lmul = match extract_lmul(vtype) {
        0 => Lmul::M1,
        1 => Lmul::M2,
        2 => Lmul::M4,
        3 => Lmul::M8,
        5 => Lmul::MF8,
        6 => Lmul::MF4,
        7 => Lmul::MF2,
        _ => return Err(ExceptionCode::DstVecIll),
    };
    Ok(DecodedVType { sew, lmul, ta, ma })
}

/// Encode a VTYPE word from its constituent fields.
///
/// `sew` must be a power of two in `8..=1024`. When `Z >= N` the LMUL code
/// is `log2(Z/N)`; when `Z < N` the code is one of `{5, 6, 7}` for
/// `{÷8, ÷4, ÷2}`. Other `(Z, N)` ratios have no valid encoding and yield
/// the reserved code `4` — it is the caller's responsibility never to
/// construct such a value (see [`decode`] for how it is rejected on the
/// way back in).
pub fn encode(sew: u32, lmul: Lmul, ta: bool, ma: bool) -> u16 {
    let sew_code = (sew >> 3).trailing_zeros() as u16;
    let lmul_code: u16 = if lmul.numerator >= lmul.denominator {
        let whole = lmul.numerator / lmul.denominator;
        whole.trailing_zeros() as u16
    } else {
        match lmul.denominator / lmul.numerator {
            2 => 7,
            4 => 6,
            8 => 5,
            _ => 4,
        }
    };
    (ma as u16) << 7 | (ta as u16) << 6 | sew_code << 3 | lmul_code
}

/// Extract the raw 3-bit SEW code (not the bit width itself).
pub fn extract_sew(vtype: u16) -> u8 {
    ((vtype & MASK_SEW) >> OFFSET_SEW) as u8
}

/// Extract the raw 3-bit LMUL code.
pub fn extract_lmul(vtype: u16) -> u8 {
    (vtype & MASK_LMUL) as u8
}

/// Extract the tail-agnostic bit.
pub fn extract_ta(vtype: u16) -> u8 {
    ((vtype & MASK_TA) != 0) as u8
}

/// Extract the mask-agnostic bit.
pub fn extract_ma(vtype: u16) -> u8 {
    ((vtype & MASK_MA) != 0) as u8
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Derives the effective register multiplicity (EMUL) a load/store with
/// `nf` fields and effective element width `eew_bits` requires, given the
/// active `SEW`/`LMUL`: `EMUL = (EEW × LMUL) / SEW`, scaled by `nf` fields
/// sharing the same bound. `nf == 1` is the plain (non-segment) case.
///
/// Returns [`ExceptionCode::DstVecIll`] — the same generic
/// illegal-instruction code [`decode`] uses for a reserved LMUL — if the
/// derived multiplicity would fall outside `[1/8, 8]`.
pub fn derive_emul(eew_bits: u32, sew_bits: u32, lmul: Lmul, nf: u32) -> Result<Lmul, ExceptionCode> {
    let z_emul = u64::from(eew_bits) * u64::from(lmul.numerator);
    let n_emul = u64::from(sew_bits) * u64::from(lmul.denominator);
    let nf = u64::from(nf);
    if n_emul > z_emul.saturating_mul(nf).saturating_mul(8)
        || z_emul.saturating_mul(nf) > n_emul.saturating_mul(8)
    {
        return Err(ExceptionCode::DstVecIll);
    }
    let g = gcd(z_emul, n_emul).max(1);
    Ok(Lmul {
        numerator: (z_emul / g) as u8,
        denominator: (n_emul / g) as u8,
    })
}

/// Concatenate a 1-bit MEW and 3-bit WIDTH field into an effective element
/// width, in bits. Unrecognized combinations return `0`.
pub fn concat_eew(mew: u8, width: u8) -> u32 {
    match ((mew & 0x1) << 3) | (width & 0x7) {
        0x0 => 8,
        0x5 => 16,
        0x6 => 32,
        0x7 => 64,
        0x8 => 128,
        0xd => 256,
        0xe => 512,
        0xf => 1024,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0x00, 8, Lmul::M1, false, false)]
    #[case(0x08, 16, Lmul::M1, false, false)]
    #[case(0x10, 32, Lmul::M1, false, false)]
    #[case(0xC9, 16, Lmul::M2, true, true)]
    #[case(0x05, 8, Lmul::MF8, false, false)]
    #[case(0x47, 8, Lmul::MF2, true, false)]
    fn decode_matches_table(
        #[case] vtype: u16,
        #[case] sew: u32,
        #[case] lmul: Lmul,
        #[case] ta: bool,
        #[case] ma: bool,
    ) {
        let decoded = decode(vtype).unwrap();
        assert_eq!(decoded.sew, sew);
        assert_eq!(decoded.lmul, lmul);
        assert_eq!(decoded.ta, ta);
        assert_eq!(decoded.ma, ma);
    }

    #[test]
    fn reserved_lmul_fails() {
        assert_eq!(decode(0x04), Err(ExceptionCode::DstVecIll));
    }

    #[rstest]
    #[case(8, Lmul::M1, false, false)]
    #[case(32, Lmul::M4, true, false)]
    #[case(64, Lmul::MF4, false, true)]
    #[case(1024, Lmul::M8, true, true)]
    fn encode_decode_round_trips(
        #[case] sew: u32,
        #[case] lmul: Lmul,
        #[case] ta: bool,
        #[case] ma: bool,
    ) {
        let vtype = encode(sew, lmul, ta, ma);
        let decoded = decode(vtype).unwrap();
        assert_eq!(decoded.sew, sew);
        assert_eq!(decoded.lmul, lmul);
        assert_eq!(decoded.ta, ta);
        assert_eq!(decoded.ma, ma);
        assert_eq!(encode(decoded.sew, decoded.lmul, decoded.ta, decoded.ma), vtype);
    }

    #[rstest]
    #[case(32, 8, Lmul::M1, 1, Lmul { numerator: 4, denominator: 1 })]
    #[case(8, 32, Lmul::M1, 1, Lmul { numerator: 1, denominator: 4 })]
    #[case(16, 16, Lmul::M2, 1, Lmul { numerator: 2, denominator: 1 })]
    fn derive_emul_reduces_the_ratio(
        #[case] eew_bits: u32,
        #[case] sew_bits: u32,
        #[case] lmul: Lmul,
        #[case] nf: u32,
        #[case] expected: Lmul,
    ) {
        assert_eq!(derive_emul(eew_bits, sew_bits, lmul, nf).unwrap(), expected);
    }

    #[test]
    fn derive_emul_rejects_out_of_bounds() {
        // EEW=64, SEW=8, LMUL=1 -> EMUL=8, fine; with nf=2 that's EMUL*nf=16, over the bound.
        assert_eq!(
            derive_emul(64, 8, Lmul::M1, 2),
            Err(ExceptionCode::DstVecIll)
        );
        assert_eq!(derive_emul(64, 8, Lmul::M1, 1), Ok(Lmul { numerator: 8, denominator: 1 }));
    }

    #[test]
    fn concat_eew_matches_table() {
        assert_eq!(concat_eew(0, 0), 8);
        assert_eq!(concat_eew(0, 5), 16);
        assert_eq!(concat_eew(0, 6), 32);
        assert_eq!(concat_eew(0, 7), 64);
        assert_eq!(concat_eew(1, 0), 128);
        assert_eq!(concat_eew(1, 5), 256);
        assert_eq!(concat_eew(1, 6), 512);
        assert_eq!(concat_eew(1, 7), 1024);
        assert_eq!(concat_eew(0, 1), 0);
    }
}
