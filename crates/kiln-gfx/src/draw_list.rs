//! Retained-mode draw lists, as produced by an immediate-mode GUI layer.
//!
//! One list is a shared vertex buffer, a shared 16-bit index buffer, and
//! an ordered run of commands. Index offsets are cumulative over the whole
//! list: every command's element count advances the running offset whether
//! or not the command is rendered.

use crate::handle::TextureHandle;

/// Fixed GUI vertex record: position, texcoord, packed RGBA color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawVert {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
    /// 0xAABBGGRR byte order in memory (little-endian u32).
    pub color: u32,
}

/// Draw lists index with 16-bit indices.
pub type DrawIndex = u16;

/// One span of the shared index buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Render `element_count` indices, clipped and textured.
    Draw {
        /// Clip rect as (left, top, right, bottom), unclamped.
        clip: [f32; 4],
        element_count: u32,
        /// `None` = untextured; the translator substitutes a white texture.
        texture: Option<TextureHandle>,
    },
    /// Opaque native callback. Never executed by the translator; its
    /// element count still advances the cumulative index offset.
    Callback { element_count: u32 },
}

impl DrawCommand {
    pub fn element_count(&self) -> u32 {
        match self {
            DrawCommand::Draw { element_count, .. } => *element_count,
            DrawCommand::Callback { element_count } => *element_count,
        }
    }
}

/// A complete retained draw list for one GUI frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DrawList {
    pub vertices: Vec<DrawVert>,
    pub indices: Vec<DrawIndex>,
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears contents, keeping allocated capacity for reuse.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.commands.clear();
    }

    /// Sum of all command element counts. Equals `indices.len()` for a
    /// well-formed list.
    pub fn element_total(&self) -> u32 {
        self.commands.iter().map(DrawCommand::element_count).sum()
    }

    /// Appends an axis-aligned quad (two triangles) with one draw command.
    ///
    /// A convenience for demos and tests; real GUI layers fill the buffers
    /// directly.
    pub fn push_quad(&mut self, min: [f32; 2], max: [f32; 2], color: u32, texture: Option<TextureHandle>) {
        let base = self.vertices.len() as DrawIndex;
        self.vertices.extend_from_slice(&[
            DrawVert { pos: [min[0], min[1]], uv: [0.0, 0.0], color },
            DrawVert { pos: [max[0], min[1]], uv: [1.0, 0.0], color },
            DrawVert { pos: [max[0], max[1]], uv: [1.0, 1.0], color },
            DrawVert { pos: [min[0], max[1]], uv: [0.0, 1.0], color },
        ]);
        self.indices.extend_from_slice(&[
            base,
            base + 1,
            base + 2,
            base,
            base + 2,
            base + 3,
        ]);
        self.commands.push(DrawCommand::Draw {
            clip: [min[0], min[1], max[0], max[1]],
            element_count: 6,
            texture,
        });
    }
}
