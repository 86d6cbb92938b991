//! Pending draw submissions for the current frame.
//!
//! Between two `frame()` calls every submission is queued here; the flush
//! hands them to the backend in ascending view-id order, with the order
//! inside a view decided by that view's [`ViewMode`].

use crate::flags::ViewMode;
use crate::handle::{ProgramHandle, TextureHandle, UniformHandle};
use crate::state::{RenderState, StencilState};
use crate::view::ViewId;

/// Texture stages addressable per draw.
pub const MAX_TEXTURE_STAGES: usize = 8;

/// Scissor rectangle in pixels, clamped to u16 range by the caller.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub struct ScissorRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// A texture bound to a sampler uniform for one draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TextureBinding {
    pub uniform: UniformHandle,
    pub texture: TextureHandle,
}

/// Slice of a transient vertex buffer bound to a stream.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexRange {
    pub stream: u8,
    pub(crate) offset: usize,
    pub start_vertex: u32,
    pub num_vertices: u32,
    pub stride: u16,
}

/// Slice of a transient index buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct IndexRange {
    pub(crate) offset: usize,
    pub first_index: u32,
    pub num_indices: u32,
}

/// One queued draw: the complete state captured at `submit` time.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub view: ViewId,
    pub program: ProgramHandle,
    /// Depth sort key (only meaningful under the Depth* view modes).
    pub depth: u32,
    pub state: RenderState,
    /// Constant color for `BlendFactor::Factor`, 0xRRGGBBAA.
    pub blend_factor: u32,
    pub stencil: StencilState,
    pub scissor: Option<ScissorRect>,
    pub textures: [Option<TextureBinding>; MAX_TEXTURE_STAGES],
    pub transform: Option<[f32; 16]>,
    pub vertices: Option<VertexRange>,
    pub indices: Option<IndexRange>,
    pub(crate) sequence: u32,
}

/// Draw state being assembled between `submit` calls.
#[derive(Debug, Clone)]
pub(crate) struct EncoderState {
    pub scissor: Option<ScissorRect>,
    pub state: RenderState,
    pub blend_factor: u32,
    pub stencil: StencilState,
    pub textures: [Option<TextureBinding>; MAX_TEXTURE_STAGES],
    pub transform: Option<[f32; 16]>,
    pub vertices: Option<VertexRange>,
    pub indices: Option<IndexRange>,
}

impl Default for EncoderState {
    fn default() -> Self {
        Self {
            scissor: None,
            // A submit without set_state draws with the backend defaults.
            state: RenderState::DEFAULT,
            blend_factor: 0,
            stencil: StencilState::NONE,
            textures: [None; MAX_TEXTURE_STAGES],
            transform: None,
            vertices: None,
            indices: None,
        }
    }
}

/// Queue of draws submitted since the last flush.
#[derive(Debug)]
pub(crate) struct FrameQueue {
    pending: Vec<DrawCall>,
    next_seq: u32,
    submitted_views: Vec<bool>,
}

impl FrameQueue {
    pub(crate) fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
            submitted_views: vec![false; crate::view::MAX_VIEW_ID as usize + 1],
        }
    }

    pub(crate) fn push(&mut self, mut call: DrawCall) {
        call.sequence = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.submitted_views[call.view.index() as usize] = true;
        self.pending.push(call);
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub(crate) fn calls(&self) -> &[DrawCall] {
        &self.pending
    }

    /// Views that received at least one submission this frame.
    pub(crate) fn submitted_views(&self) -> &[bool] {
        &self.submitted_views
    }

    /// Indices into [`calls`](Self::calls) in flush order: ascending view
    /// id, then the view's mode decides within-view order.
    pub(crate) fn flush_order(&self, mode_of: impl Fn(ViewId) -> ViewMode) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.pending.len()).collect();
        order.sort_by(|&a, &b| {
            let da = &self.pending[a];
            let db = &self.pending[b];
            da.view.cmp(&db.view).then_with(|| match mode_of(da.view) {
                ViewMode::DepthAscending => {
                    da.depth.cmp(&db.depth).then(da.sequence.cmp(&db.sequence))
                }
                ViewMode::DepthDescending => {
                    db.depth.cmp(&da.depth).then(da.sequence.cmp(&db.sequence))
                }
                // Default and Sequential both keep submission order here;
                // the backend may re-batch Default views internally.
                ViewMode::Default | ViewMode::Sequential => da.sequence.cmp(&db.sequence),
            })
        });
        order
    }

    /// Drops all queued draws and per-frame bookkeeping.
    pub(crate) fn clear(&mut self) {
        self.pending.clear();
        self.next_seq = 0;
        self.submitted_views.fill(false);
    }
}
