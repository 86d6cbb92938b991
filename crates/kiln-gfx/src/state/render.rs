//! The 64-bit render-state word.
//!
//! Field layout (shift, width):
//!
//! | field                | shift | width |
//! |----------------------|-------|-------|
//! | write R/G/B/A        | 0     | 4     |
//! | depth test           | 4     | 4     |
//! | blend src RGB        | 12    | 4     |
//! | blend dst RGB        | 16    | 4     |
//! | blend src alpha      | 20    | 4     |
//! | blend dst alpha      | 24    | 4     |
//! | blend equation RGB   | 28    | 3     |
//! | blend equation alpha | 31    | 3     |
//! | blend independent    | 34    | 1     |
//! | alpha to coverage    | 35    | 1     |
//! | cull mode            | 36    | 2     |
//! | depth write          | 38    | 1     |
//! | front CCW            | 39    | 1     |
//! | alpha ref            | 40    | 8     |
//! | topology             | 48    | 3     |
//! | point size           | 52    | 4     |
//! | MSAA                 | 56    | 1     |
//! | line AA              | 57    | 1     |
//! | conservative raster  | 58    | 1     |
//! | reserved             | 61    | 3     |
//!
//! Reserved bits are never masked by any `with_*` method; a word built from
//! raw bits keeps them verbatim.

/// Depth-test comparison function. `0` in the field means "test disabled".
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u64)]
pub enum DepthTest {
    Less = 1,
    LessEqual = 2,
    Equal = 3,
    GreaterEqual = 4,
    Greater = 5,
    NotEqual = 6,
    Never = 7,
    Always = 8,
}

impl DepthTest {
    const fn from_bits(bits: u64) -> Option<Self> {
        Some(match bits {
            1 => DepthTest::Less,
            2 => DepthTest::LessEqual,
            3 => DepthTest::Equal,
            4 => DepthTest::GreaterEqual,
            5 => DepthTest::Greater,
            6 => DepthTest::NotEqual,
            7 => DepthTest::Never,
            8 => DepthTest::Always,
            _ => return None,
        })
    }
}

/// Blend factor. `0` in a factor field means "blending disabled".
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u64)]
pub enum BlendFactor {
    Zero = 0x1,
    One = 0x2,
    SrcColor = 0x3,
    InvSrcColor = 0x4,
    SrcAlpha = 0x5,
    InvSrcAlpha = 0x6,
    DstAlpha = 0x7,
    InvDstAlpha = 0x8,
    DstColor = 0x9,
    InvDstColor = 0xa,
    SrcAlphaSat = 0xb,
    Factor = 0xc,
    InvFactor = 0xd,
}

impl BlendFactor {
    const fn from_bits(bits: u64) -> Option<Self> {
        Some(match bits {
            0x1 => BlendFactor::Zero,
            0x2 => BlendFactor::One,
            0x3 => BlendFactor::SrcColor,
            0x4 => BlendFactor::InvSrcColor,
            0x5 => BlendFactor::SrcAlpha,
            0x6 => BlendFactor::InvSrcAlpha,
            0x7 => BlendFactor::DstAlpha,
            0x8 => BlendFactor::InvDstAlpha,
            0x9 => BlendFactor::DstColor,
            0xa => BlendFactor::InvDstColor,
            0xb => BlendFactor::SrcAlphaSat,
            0xc => BlendFactor::Factor,
            0xd => BlendFactor::InvFactor,
            _ => return None,
        })
    }
}

/// Blend equation. `Add` is the zero encoding.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[repr(u64)]
pub enum BlendEquation {
    #[default]
    Add = 0,
    Sub = 1,
    RevSub = 2,
    Min = 3,
    Max = 4,
}

impl BlendEquation {
    const fn from_bits(bits: u64) -> Self {
        match bits {
            1 => BlendEquation::Sub,
            2 => BlendEquation::RevSub,
            3 => BlendEquation::Min,
            4 => BlendEquation::Max,
            _ => BlendEquation::Add,
        }
    }
}

/// Triangle cull mode. `0` in the field means "no culling".
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u64)]
pub enum CullMode {
    Clockwise = 1,
    CounterClockwise = 2,
}

/// Primitive topology. Triangle list is the zero encoding.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[repr(u64)]
pub enum Topology {
    #[default]
    TriangleList = 0,
    TriangleStrip = 1,
    Lines = 2,
    LineStrip = 3,
    Points = 4,
}

impl Topology {
    const fn from_bits(bits: u64) -> Self {
        match bits {
            1 => Topology::TriangleStrip,
            2 => Topology::Lines,
            3 => Topology::LineStrip,
            4 => Topology::Points,
            _ => Topology::TriangleList,
        }
    }
}

/// Packed render state. Compose with `with_*`; fields never overlap.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Hash)]
pub struct RenderState(u64);

impl RenderState {
    pub const NONE: RenderState = RenderState(0);

    /// Write RGB+A+depth, depth test less, clockwise culling, MSAA.
    pub const DEFAULT: RenderState = RenderState(0x0100_0050_0000_001f);

    const WRITE_R: u64 = 0x0000_0000_0000_0001;
    const WRITE_G: u64 = 0x0000_0000_0000_0002;
    const WRITE_B: u64 = 0x0000_0000_0000_0004;
    const WRITE_A: u64 = 0x0000_0000_0000_0008;
    const WRITE_Z: u64 = 0x0000_0040_0000_0000;

    pub const DEPTH_TEST_SHIFT: u64 = 4;
    pub const DEPTH_TEST_MASK: u64 = 0x0000_0000_0000_00f0;

    pub const BLEND_SHIFT: u64 = 12;
    pub const BLEND_MASK: u64 = 0x0000_0000_0fff_f000;

    pub const BLEND_EQUATION_SHIFT: u64 = 28;
    pub const BLEND_EQUATION_MASK: u64 = 0x0000_0003_f000_0000;

    const BLEND_INDEPENDENT: u64 = 0x0000_0004_0000_0000;
    const BLEND_ALPHA_TO_COVERAGE: u64 = 0x0000_0008_0000_0000;

    pub const CULL_SHIFT: u64 = 36;
    pub const CULL_MASK: u64 = 0x0000_0030_0000_0000;

    const FRONT_CCW: u64 = 0x0000_0080_0000_0000;

    pub const ALPHA_REF_SHIFT: u64 = 40;
    pub const ALPHA_REF_MASK: u64 = 0x0000_ff00_0000_0000;

    pub const TOPOLOGY_SHIFT: u64 = 48;
    pub const TOPOLOGY_MASK: u64 = 0x0007_0000_0000_0000;

    pub const POINT_SIZE_SHIFT: u64 = 52;
    pub const POINT_SIZE_MASK: u64 = 0x00f0_0000_0000_0000;

    const MSAA: u64 = 0x0100_0000_0000_0000;
    const LINE_AA: u64 = 0x0200_0000_0000_0000;
    const CONSERVATIVE_RASTER: u64 = 0x0400_0000_0000_0000;

    pub const RESERVED_SHIFT: u64 = 61;
    pub const RESERVED_MASK: u64 = 0xe000_0000_0000_0000;

    // ── construction ─────────────────────────────────────────────────────

    #[inline]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Wraps raw bits verbatim, reserved ranges included.
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn with_write_r(self) -> Self {
        Self(self.0 | Self::WRITE_R)
    }

    pub const fn with_write_g(self) -> Self {
        Self(self.0 | Self::WRITE_G)
    }

    pub const fn with_write_b(self) -> Self {
        Self(self.0 | Self::WRITE_B)
    }

    /// Enables R, G and B writes.
    pub const fn with_write_rgb(self) -> Self {
        Self(self.0 | Self::WRITE_R | Self::WRITE_G | Self::WRITE_B)
    }

    pub const fn with_write_alpha(self) -> Self {
        Self(self.0 | Self::WRITE_A)
    }

    pub const fn with_write_depth(self) -> Self {
        Self(self.0 | Self::WRITE_Z)
    }

    pub const fn with_depth_test(self, test: DepthTest) -> Self {
        Self(self.0 & !Self::DEPTH_TEST_MASK | (test as u64) << Self::DEPTH_TEST_SHIFT)
    }

    /// Single-factor blend: the pair is duplicated into the alpha sub-field.
    pub const fn with_blend_func(self, src: BlendFactor, dst: BlendFactor) -> Self {
        self.with_blend_func_separate(src, dst, src, dst)
    }

    /// Separate RGB and alpha blend factors.
    ///
    /// Packs `src_rgb` at bits [12,16), `dst_rgb` at [16,20); the alpha pair
    /// is packed the same way and shifted left by a further 8 bits.
    pub const fn with_blend_func_separate(
        self,
        src_rgb: BlendFactor,
        dst_rgb: BlendFactor,
        src_alpha: BlendFactor,
        dst_alpha: BlendFactor,
    ) -> Self {
        let rgb = src_rgb as u64 | (dst_rgb as u64) << 4;
        let alpha = src_alpha as u64 | (dst_alpha as u64) << 4;
        Self(self.0 & !Self::BLEND_MASK | (rgb | alpha << 8) << Self::BLEND_SHIFT)
    }

    pub const fn with_blend_equation(self, equation: BlendEquation) -> Self {
        self.with_blend_equation_separate(equation, equation)
    }

    pub const fn with_blend_equation_separate(self, rgb: BlendEquation, alpha: BlendEquation) -> Self {
        let field = rgb as u64 | (alpha as u64) << 3;
        Self(self.0 & !Self::BLEND_EQUATION_MASK | field << Self::BLEND_EQUATION_SHIFT)
    }

    pub const fn with_blend_independent(self) -> Self {
        Self(self.0 | Self::BLEND_INDEPENDENT)
    }

    pub const fn with_alpha_to_coverage(self) -> Self {
        Self(self.0 | Self::BLEND_ALPHA_TO_COVERAGE)
    }

    pub const fn with_cull(self, mode: CullMode) -> Self {
        Self(self.0 & !Self::CULL_MASK | (mode as u64) << Self::CULL_SHIFT)
    }

    /// Front faces wind counter-clockwise (default is clockwise).
    pub const fn with_front_ccw(self) -> Self {
        Self(self.0 | Self::FRONT_CCW)
    }

    pub const fn with_alpha_ref(self, reference: u8) -> Self {
        Self(self.0 & !Self::ALPHA_REF_MASK | (reference as u64) << Self::ALPHA_REF_SHIFT)
    }

    pub const fn with_topology(self, topology: Topology) -> Self {
        Self(self.0 & !Self::TOPOLOGY_MASK | (topology as u64) << Self::TOPOLOGY_SHIFT)
    }

    /// Point size for `Topology::Points`. Only the low 4 bits are stored.
    pub const fn with_point_size(self, size: u8) -> Self {
        Self(self.0 & !Self::POINT_SIZE_MASK | ((size & 0x0f) as u64) << Self::POINT_SIZE_SHIFT)
    }

    pub const fn with_msaa(self) -> Self {
        Self(self.0 | Self::MSAA)
    }

    pub const fn with_line_aa(self) -> Self {
        Self(self.0 | Self::LINE_AA)
    }

    pub const fn with_conservative_raster(self) -> Self {
        Self(self.0 | Self::CONSERVATIVE_RASTER)
    }

    // ── decoding ─────────────────────────────────────────────────────────

    pub const fn write_r(self) -> bool {
        self.0 & Self::WRITE_R != 0
    }

    pub const fn write_g(self) -> bool {
        self.0 & Self::WRITE_G != 0
    }

    pub const fn write_b(self) -> bool {
        self.0 & Self::WRITE_B != 0
    }

    pub const fn write_alpha(self) -> bool {
        self.0 & Self::WRITE_A != 0
    }

    pub const fn write_depth(self) -> bool {
        self.0 & Self::WRITE_Z != 0
    }

    pub const fn depth_test(self) -> Option<DepthTest> {
        DepthTest::from_bits((self.0 & Self::DEPTH_TEST_MASK) >> Self::DEPTH_TEST_SHIFT)
    }

    pub const fn blend_src_rgb(self) -> Option<BlendFactor> {
        BlendFactor::from_bits(self.0 >> Self::BLEND_SHIFT & 0xf)
    }

    pub const fn blend_dst_rgb(self) -> Option<BlendFactor> {
        BlendFactor::from_bits(self.0 >> (Self::BLEND_SHIFT + 4) & 0xf)
    }

    pub const fn blend_src_alpha(self) -> Option<BlendFactor> {
        BlendFactor::from_bits(self.0 >> (Self::BLEND_SHIFT + 8) & 0xf)
    }

    pub const fn blend_dst_alpha(self) -> Option<BlendFactor> {
        BlendFactor::from_bits(self.0 >> (Self::BLEND_SHIFT + 12) & 0xf)
    }

    pub const fn blend_equation_rgb(self) -> BlendEquation {
        BlendEquation::from_bits(self.0 >> Self::BLEND_EQUATION_SHIFT & 0x7)
    }

    pub const fn blend_equation_alpha(self) -> BlendEquation {
        BlendEquation::from_bits(self.0 >> (Self::BLEND_EQUATION_SHIFT + 3) & 0x7)
    }

    pub const fn blend_independent(self) -> bool {
        self.0 & Self::BLEND_INDEPENDENT != 0
    }

    pub const fn alpha_to_coverage(self) -> bool {
        self.0 & Self::BLEND_ALPHA_TO_COVERAGE != 0
    }

    pub const fn cull(self) -> Option<CullMode> {
        match (self.0 & Self::CULL_MASK) >> Self::CULL_SHIFT {
            1 => Some(CullMode::Clockwise),
            2 => Some(CullMode::CounterClockwise),
            _ => None,
        }
    }

    pub const fn front_ccw(self) -> bool {
        self.0 & Self::FRONT_CCW != 0
    }

    pub const fn alpha_ref(self) -> u8 {
        ((self.0 & Self::ALPHA_REF_MASK) >> Self::ALPHA_REF_SHIFT) as u8
    }

    pub const fn topology(self) -> Topology {
        Topology::from_bits((self.0 & Self::TOPOLOGY_MASK) >> Self::TOPOLOGY_SHIFT)
    }

    pub const fn point_size(self) -> u8 {
        ((self.0 & Self::POINT_SIZE_MASK) >> Self::POINT_SIZE_SHIFT) as u8
    }

    pub const fn msaa(self) -> bool {
        self.0 & Self::MSAA != 0
    }

    pub const fn line_aa(self) -> bool {
        self.0 & Self::LINE_AA != 0
    }

    pub const fn conservative_raster(self) -> bool {
        self.0 & Self::CONSERVATIVE_RASTER != 0
    }
}

impl std::ops::BitOr for RenderState {
    type Output = Self;

    /// Fields are disjoint, so union is plain OR.
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
