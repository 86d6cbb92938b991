//! Opaque resource handles and the slot allocator behind the registry.
//!
//! A handle is a 16-bit index into a backend-owned resource table. The
//! wrapper never owns the resource; it only tracks which indices are live
//! so that stale handles are caught here instead of reaching the backend.

/// Index value meaning "no resource".
pub const INVALID_HANDLE: u16 = 0xffff;

macro_rules! handle_type {
    ($(#[$doc:meta])* $name:ident, $kind:expr) => {
        $(#[$doc])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
        pub struct $name(u16);

        impl $name {
            /// Handle referring to no resource.
            pub const INVALID: $name = $name(INVALID_HANDLE);

            #[inline]
            pub(crate) const fn new(index: u16) -> Self {
                Self(index)
            }

            /// Raw table index.
            #[inline]
            pub const fn index(self) -> u16 {
                self.0
            }

            /// True unless this is the invalid sentinel.
            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != INVALID_HANDLE
            }

            /// Resource category, for diagnostics.
            #[inline]
            pub const fn kind(self) -> HandleKind {
                $kind
            }
        }
    };
}

handle_type!(
    /// Compiled shader stage owned by the backend.
    ShaderHandle,
    HandleKind::Shader
);
handle_type!(
    /// Linked vertex+fragment program.
    ProgramHandle,
    HandleKind::Program
);
handle_type!(
    /// 2D texture (optionally layered / mipmapped).
    TextureHandle,
    HandleKind::Texture
);
handle_type!(
    /// Named shader uniform (sampler, vec4, mat3, mat4).
    UniformHandle,
    HandleKind::Uniform
);

/// Resource category a handle refers to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum HandleKind {
    Shader,
    Program,
    Texture,
    Uniform,
}

impl HandleKind {
    pub const fn name(self) -> &'static str {
        match self {
            HandleKind::Shader => "shader",
            HandleKind::Program => "program",
            HandleKind::Texture => "texture",
            HandleKind::Uniform => "uniform",
        }
    }
}

impl std::fmt::Display for HandleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Free-listed slot allocator for one resource kind.
///
/// Indices are handed out densely and recycled after explicit destruction.
/// `0xffff` is never issued; it is reserved for [`INVALID_HANDLE`].
#[derive(Debug, Default)]
pub(crate) struct HandleAllocator {
    alive: Vec<bool>,
    free: Vec<u16>,
}

impl HandleAllocator {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Allocates a slot, reusing freed indices first.
    ///
    /// Returns `None` once all 65535 usable indices are live.
    pub(crate) fn alloc(&mut self) -> Option<u16> {
        if let Some(index) = self.free.pop() {
            self.alive[index as usize] = true;
            return Some(index);
        }
        let index = self.alive.len();
        if index >= INVALID_HANDLE as usize {
            return None;
        }
        self.alive.push(true);
        Some(index as u16)
    }

    /// Releases a slot. Returns `false` if the index was not live.
    pub(crate) fn free(&mut self, index: u16) -> bool {
        if !self.is_alive(index) {
            return false;
        }
        self.alive[index as usize] = false;
        self.free.push(index);
        true
    }

    #[inline]
    pub(crate) fn is_alive(&self, index: u16) -> bool {
        self.alive.get(index as usize).copied().unwrap_or(false)
    }

    /// Number of currently live slots.
    pub(crate) fn live_count(&self) -> usize {
        self.alive.iter().filter(|alive| **alive).count()
    }
}
