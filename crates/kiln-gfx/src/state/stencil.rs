//! The 32-bit stencil-state word.
//!
//! Field layout (shift, width): reference value at 0 (8 bits), read mask at
//! 8 (8 bits), test function at 16 (4 bits), stencil-fail op at 20, depth-
//! fail op at 24 and depth-pass op at 28 (4 bits each).

/// Stencil comparison function. `0` in the field means "test disabled".
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u32)]
pub enum StencilTest {
    Less = 1,
    LessEqual = 2,
    Equal = 3,
    GreaterEqual = 4,
    Greater = 5,
    NotEqual = 6,
    Never = 7,
    Always = 8,
}

impl StencilTest {
    const fn from_bits(bits: u32) -> Option<Self> {
        Some(match bits {
            1 => StencilTest::Less,
            2 => StencilTest::LessEqual,
            3 => StencilTest::Equal,
            4 => StencilTest::GreaterEqual,
            5 => StencilTest::Greater,
            6 => StencilTest::NotEqual,
            7 => StencilTest::Never,
            8 => StencilTest::Always,
            _ => return None,
        })
    }
}

/// Operation applied to the stencil buffer. `Zero` is the zero encoding.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[repr(u32)]
pub enum StencilOp {
    #[default]
    Zero = 0,
    Keep = 1,
    Replace = 2,
    IncrWrap = 3,
    IncrClamp = 4,
    DecrWrap = 5,
    DecrClamp = 6,
    Invert = 7,
}

impl StencilOp {
    const fn from_bits(bits: u32) -> Self {
        match bits {
            1 => StencilOp::Keep,
            2 => StencilOp::Replace,
            3 => StencilOp::IncrWrap,
            4 => StencilOp::IncrClamp,
            5 => StencilOp::DecrWrap,
            6 => StencilOp::DecrClamp,
            7 => StencilOp::Invert,
            _ => StencilOp::Zero,
        }
    }
}

/// Packed stencil state.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Hash)]
pub struct StencilState(u32);

impl StencilState {
    pub const NONE: StencilState = StencilState(0);

    pub const FUNC_REF_SHIFT: u32 = 0;
    pub const FUNC_REF_MASK: u32 = 0x0000_00ff;
    pub const READ_MASK_SHIFT: u32 = 8;
    pub const READ_MASK_MASK: u32 = 0x0000_ff00;
    pub const TEST_SHIFT: u32 = 16;
    pub const TEST_MASK: u32 = 0x000f_0000;
    pub const OP_FAIL_S_SHIFT: u32 = 20;
    pub const OP_FAIL_S_MASK: u32 = 0x00f0_0000;
    pub const OP_FAIL_Z_SHIFT: u32 = 24;
    pub const OP_FAIL_Z_MASK: u32 = 0x0f00_0000;
    pub const OP_PASS_Z_SHIFT: u32 = 28;
    pub const OP_PASS_Z_MASK: u32 = 0xf000_0000;

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn with_func_ref(self, reference: u8) -> Self {
        Self(self.0 & !Self::FUNC_REF_MASK | (reference as u32) << Self::FUNC_REF_SHIFT)
    }

    pub const fn with_read_mask(self, mask: u8) -> Self {
        Self(self.0 & !Self::READ_MASK_MASK | (mask as u32) << Self::READ_MASK_SHIFT)
    }

    pub const fn with_test(self, test: StencilTest) -> Self {
        Self(self.0 & !Self::TEST_MASK | (test as u32) << Self::TEST_SHIFT)
    }

    /// Sets the fail / depth-fail / depth-pass op triple at once.
    pub const fn with_ops(self, fail: StencilOp, depth_fail: StencilOp, depth_pass: StencilOp) -> Self {
        let cleared =
            self.0 & !(Self::OP_FAIL_S_MASK | Self::OP_FAIL_Z_MASK | Self::OP_PASS_Z_MASK);
        Self(
            cleared
                | (fail as u32) << Self::OP_FAIL_S_SHIFT
                | (depth_fail as u32) << Self::OP_FAIL_Z_SHIFT
                | (depth_pass as u32) << Self::OP_PASS_Z_SHIFT,
        )
    }

    pub const fn func_ref(self) -> u8 {
        (self.0 & Self::FUNC_REF_MASK) as u8
    }

    pub const fn read_mask(self) -> u8 {
        ((self.0 & Self::READ_MASK_MASK) >> Self::READ_MASK_SHIFT) as u8
    }

    pub const fn test(self) -> Option<StencilTest> {
        StencilTest::from_bits((self.0 & Self::TEST_MASK) >> Self::TEST_SHIFT)
    }

    pub const fn op_fail(self) -> StencilOp {
        StencilOp::from_bits((self.0 & Self::OP_FAIL_S_MASK) >> Self::OP_FAIL_S_SHIFT)
    }

    pub const fn op_depth_fail(self) -> StencilOp {
        StencilOp::from_bits((self.0 & Self::OP_FAIL_Z_MASK) >> Self::OP_FAIL_Z_SHIFT)
    }

    pub const fn op_depth_pass(self) -> StencilOp {
        StencilOp::from_bits((self.0 & Self::OP_PASS_Z_MASK) >> Self::OP_PASS_Z_SHIFT)
    }
}

impl std::ops::BitOr for StencilState {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_and_mask_round_trip() {
        let state = StencilState::NONE.with_func_ref(0x2a).with_read_mask(0xf0);
        assert_eq!(state.func_ref(), 0x2a);
        assert_eq!(state.read_mask(), 0xf0);
    }

    #[test]
    fn test_func_round_trip() {
        for test in [
            StencilTest::Less,
            StencilTest::Equal,
            StencilTest::Never,
            StencilTest::Always,
        ] {
            assert_eq!(StencilState::NONE.with_test(test).test(), Some(test));
        }
        assert_eq!(StencilState::NONE.test(), None);
    }

    #[test]
    fn op_triple_round_trip() {
        let state = StencilState::NONE.with_ops(
            StencilOp::Keep,
            StencilOp::IncrWrap,
            StencilOp::Replace,
        );
        assert_eq!(state.op_fail(), StencilOp::Keep);
        assert_eq!(state.op_depth_fail(), StencilOp::IncrWrap);
        assert_eq!(state.op_depth_pass(), StencilOp::Replace);
    }

    #[test]
    fn fields_do_not_overlap() {
        let state = StencilState::NONE
            .with_func_ref(0xff)
            .with_read_mask(0xff)
            .with_test(StencilTest::Always)
            .with_ops(StencilOp::Invert, StencilOp::Invert, StencilOp::Invert);
        assert_eq!(state.func_ref(), 0xff);
        assert_eq!(state.read_mask(), 0xff);
        assert_eq!(state.test(), Some(StencilTest::Always));
        assert_eq!(state.op_fail(), StencilOp::Invert);
    }
}
