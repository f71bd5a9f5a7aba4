use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
#[non_exhaustive]
/// Exception code returned by an opcode entry point of the element core.
///
/// Zero means no exception. A non-zero code tells the caller which
/// pre-execution check rejected the instruction; the core never mutates the
/// destination once a non-zero code is going to be returned.
pub enum ExceptionCode {
    /// No exception: the instruction ran to completion.
    NoExcept = 0x00,
    /// The destination register index is not aligned to its group stride.
    DstVecIll = 0x01,
    /// The first source register index is not aligned to its group stride.
    Src1VecIll = 0x02,
    /// The second source register index is not aligned to its group stride.
    Src2VecIll = 0x03,
    /// The third source register index is not aligned to its group stride
    /// (used by the store side of the load/store engine, whose source
    /// vector occupies operand role 3).
    Src3VecIll = 0x04,
    /// A widening destination group overlaps the narrow `vs1` source group.
    WideningOverlapVdVs1Ill = 0x05,
    /// A widening destination group overlaps the narrow `vs2` source group.
    WideningOverlapVdVs2Ill = 0x06,
}

impl fmt::Display for ExceptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ExceptionCode {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

impl From<u8> for ExceptionCode {
    /// Converts the `u8` return code into an `ExceptionCode`. Unknown codes
    /// collapse to `NoExcept` rather than panicking: a caller decoding a
    /// stray return byte has no architectural code to map unrecognized
    /// values onto.
    fn from(b: u8) -> Self {
        use ExceptionCode::*;
        match b {
            0x01 => DstVecIll,
            0x02 => Src1VecIll,
            0x03 => Src2VecIll,
            0x04 => Src3VecIll,
            0x05 => WideningOverlapVdVs1Ill,
            0x06 => WideningOverlapVdVs2Ill,
            _ => NoExcept,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn round_trips_through_u8() {
        for reason in ExceptionCode::iter() {
            assert_eq!(ExceptionCode::from(reason as u8), reason);
        }
    }

    #[test]
    fn unknown_code_is_no_except() {
        assert_eq!(ExceptionCode::from(0xff), ExceptionCode::NoExcept);
    }
}
