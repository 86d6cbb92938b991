//! Shared enums and flag words for the backend interface.
//!
//! Numeric values match the native API's wire encoding exactly and must not
//! be reordered. Flag words are thin newtypes with named constants and
//! documented `(shift, mask)` pairs rather than bare integer literals.

macro_rules! impl_flag_ops {
    ($name:ident, $repr:ty) => {
        impl $name {
            /// Raw bit pattern.
            #[inline]
            pub const fn bits(self) -> $repr {
                self.0
            }

            /// Wraps a raw bit pattern verbatim.
            #[inline]
            pub const fn from_bits(bits: $repr) -> Self {
                Self(bits)
            }

            /// True if every bit of `other` is set in `self`.
            #[inline]
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;
            #[inline]
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl std::ops::BitOrAssign for $name {
            #[inline]
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl std::ops::BitAnd for $name {
            type Output = Self;
            #[inline]
            fn bitand(self, rhs: Self) -> Self {
                Self(self.0 & rhs.0)
            }
        }
    };
}

/// Which native renderer the backend should drive.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RendererType {
    /// No rendering; every command is accepted and discarded.
    Noop,
    Direct3D11,
    Direct3D12,
    Metal,
    OpenGl,
    Vulkan,
}

/// Texture/backbuffer pixel formats used by this wrapper.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TextureFormat {
    R8,
    A8,
    Rg8,
    Bgra8,
    Rgba8,
    Rgba16F,
    D16,
    D24S8,
    D32F,
}

impl TextureFormat {
    /// Bytes per pixel, used to validate caller-supplied pixel data.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            TextureFormat::R8 | TextureFormat::A8 => 1,
            TextureFormat::Rg8 | TextureFormat::D16 => 2,
            TextureFormat::Bgra8
            | TextureFormat::Rgba8
            | TextureFormat::D24S8
            | TextureFormat::D32F => 4,
            TextureFormat::Rgba16F => 8,
        }
    }
}

/// Shader uniform type.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformType {
    Sampler,
    Vec4,
    Mat3,
    Mat4,
}

/// Draw ordering within one view.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum ViewMode {
    /// Backend-default sort order.
    #[default]
    Default,
    /// Submissions execute in the exact order they were issued.
    Sequential,
    /// Sort by submitted depth, ascending.
    DepthAscending,
    /// Sort by submitted depth, descending.
    DepthDescending,
}

/// Vertex attribute semantic.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Attrib {
    Position,
    Normal,
    Tangent,
    Bitangent,
    Color0,
    Color1,
    TexCoord0,
    TexCoord1,
    TexCoord2,
    TexCoord3,
}

/// Vertex attribute component type.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AttribType {
    Uint8,
    Int16,
    Half,
    Float,
}

impl AttribType {
    /// Size of one component in bytes.
    pub const fn size(self) -> u16 {
        match self {
            AttribType::Uint8 => 1,
            AttribType::Int16 | AttribType::Half => 2,
            AttribType::Float => 4,
        }
    }
}

/// Per-view clear flags (16-bit word).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct ClearFlags(u16);

impl ClearFlags {
    pub const NONE: ClearFlags = ClearFlags(0x0000);
    pub const COLOR: ClearFlags = ClearFlags(0x0001);
    pub const DEPTH: ClearFlags = ClearFlags(0x0002);
    pub const STENCIL: ClearFlags = ClearFlags(0x0004);
    pub const ALL: ClearFlags = ClearFlags(0x0007);
}

impl_flag_ops!(ClearFlags, u16);

/// Backbuffer reset flags (32-bit word).
///
/// The MSAA level lives in a 3-bit field at shift 4; the four levels are
/// mutually exclusive by construction.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct ResetFlags(u32);

impl ResetFlags {
    pub const NONE: ResetFlags = ResetFlags(0x0000_0000);
    pub const FULLSCREEN: ResetFlags = ResetFlags(0x0000_0001);

    pub const MSAA_X2: ResetFlags = ResetFlags(0x0000_0010);
    pub const MSAA_X4: ResetFlags = ResetFlags(0x0000_0020);
    pub const MSAA_X8: ResetFlags = ResetFlags(0x0000_0030);
    pub const MSAA_X16: ResetFlags = ResetFlags(0x0000_0040);
    pub const MSAA_SHIFT: u32 = 4;
    pub const MSAA_MASK: u32 = 0x0000_0070;

    pub const VSYNC: ResetFlags = ResetFlags(0x0000_0080);
    pub const MAX_ANISOTROPY: ResetFlags = ResetFlags(0x0000_0100);
    pub const CAPTURE: ResetFlags = ResetFlags(0x0000_0200);
    pub const SRGB_BACKBUFFER: ResetFlags = ResetFlags(0x0000_8000);
    pub const HDR10: ResetFlags = ResetFlags(0x0001_0000);
    pub const HIDPI: ResetFlags = ResetFlags(0x0002_0000);
    pub const DEPTH_CLAMP: ResetFlags = ResetFlags(0x0004_0000);
    pub const SUSPEND: ResetFlags = ResetFlags(0x0008_0000);

    /// Decoded MSAA sample count (`None` when multisampling is off).
    pub const fn msaa_samples(self) -> Option<u32> {
        match (self.0 & Self::MSAA_MASK) >> Self::MSAA_SHIFT {
            1 => Some(2),
            2 => Some(4),
            3 => Some(8),
            4 => Some(16),
            _ => None,
        }
    }
}

impl_flag_ops!(ResetFlags, u32);

/// Debug-visualization flags (32-bit word).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct DebugFlags(u32);

impl DebugFlags {
    pub const NONE: DebugFlags = DebugFlags(0x0000_0000);
    /// Wireframe for all primitives.
    pub const WIREFRAME: DebugFlags = DebugFlags(0x0000_0001);
    /// Infinitely fast hardware test: commands are accepted but not drawn.
    pub const IFH: DebugFlags = DebugFlags(0x0000_0002);
    /// Statistics overlay.
    pub const STATS: DebugFlags = DebugFlags(0x0000_0004);
    /// Debug text overlay.
    pub const TEXT: DebugFlags = DebugFlags(0x0000_0008);
    /// Profiler hooks.
    pub const PROFILER: DebugFlags = DebugFlags(0x0000_0010);
}

impl_flag_ops!(DebugFlags, u32);

/// Texture sampler flags (32-bit word).
///
/// Wrap modes occupy 2-bit fields (U at shift 0, V at 2, W at 4);
/// min/mag/mip filters follow at shifts 6, 8 and 10.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct SamplerFlags(u32);

impl SamplerFlags {
    pub const NONE: SamplerFlags = SamplerFlags(0x0000_0000);

    pub const U_MIRROR: SamplerFlags = SamplerFlags(0x0000_0001);
    pub const U_CLAMP: SamplerFlags = SamplerFlags(0x0000_0002);
    pub const U_BORDER: SamplerFlags = SamplerFlags(0x0000_0003);
    pub const V_MIRROR: SamplerFlags = SamplerFlags(0x0000_0004);
    pub const V_CLAMP: SamplerFlags = SamplerFlags(0x0000_0008);
    pub const V_BORDER: SamplerFlags = SamplerFlags(0x0000_000c);
    pub const W_MIRROR: SamplerFlags = SamplerFlags(0x0000_0010);
    pub const W_CLAMP: SamplerFlags = SamplerFlags(0x0000_0020);
    pub const W_BORDER: SamplerFlags = SamplerFlags(0x0000_0030);

    /// Clamp on all three axes.
    pub const UVW_CLAMP: SamplerFlags = SamplerFlags(0x0000_002a);
    /// Mirror on all three axes.
    pub const UVW_MIRROR: SamplerFlags = SamplerFlags(0x0000_0015);

    pub const MIN_POINT: SamplerFlags = SamplerFlags(0x0000_0040);
    pub const MIN_ANISOTROPIC: SamplerFlags = SamplerFlags(0x0000_0080);
    pub const MAG_POINT: SamplerFlags = SamplerFlags(0x0000_0100);
    pub const MAG_ANISOTROPIC: SamplerFlags = SamplerFlags(0x0000_0200);
    pub const MIP_POINT: SamplerFlags = SamplerFlags(0x0000_0400);

    /// Point filtering on min, mag and mip.
    pub const POINT: SamplerFlags = SamplerFlags(0x0000_0540);
}

impl_flag_ops!(SamplerFlags, u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msaa_field_is_exclusive() {
        assert_eq!(ResetFlags::MSAA_X2.msaa_samples(), Some(2));
        assert_eq!(ResetFlags::MSAA_X4.msaa_samples(), Some(4));
        assert_eq!(ResetFlags::MSAA_X8.msaa_samples(), Some(8));
        assert_eq!(ResetFlags::MSAA_X16.msaa_samples(), Some(16));
        assert_eq!(ResetFlags::NONE.msaa_samples(), None);
        assert_eq!((ResetFlags::VSYNC | ResetFlags::HIDPI).msaa_samples(), None);
    }

    #[test]
    fn flag_union_and_contains() {
        let flags = ClearFlags::COLOR | ClearFlags::DEPTH;
        assert!(flags.contains(ClearFlags::COLOR));
        assert!(flags.contains(ClearFlags::DEPTH));
        assert!(!flags.contains(ClearFlags::STENCIL));
        assert_eq!(ClearFlags::ALL.bits(), 0x0007);
    }

    #[test]
    fn uvw_clamp_is_the_three_axis_union() {
        let manual = SamplerFlags::U_CLAMP | SamplerFlags::V_CLAMP | SamplerFlags::W_CLAMP;
        assert_eq!(manual, SamplerFlags::UVW_CLAMP);
    }

    #[test]
    fn format_sizes() {
        assert_eq!(TextureFormat::Rgba8.bytes_per_pixel(), 4);
        assert_eq!(TextureFormat::R8.bytes_per_pixel(), 1);
        assert_eq!(TextureFormat::Rgba16F.bytes_per_pixel(), 8);
    }
}
