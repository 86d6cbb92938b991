//! The process-wide rendering context.
//!
//! One `Context` exists per process. It owns the backend, the resource
//! registry, the per-view state, the transient arena and the queue of
//! pending draws. Every mutation is local until [`Context::frame`], the
//! single synchronization point: the flush hands all queued work to the
//! backend and voids every transient allocation of the completed frame.
//!
//! The API is single-writer by construction: all operations take
//! `&mut self`, so cross-thread use requires external synchronization.

use std::sync::atomic::{AtomicBool, Ordering};

use raw_window_handle::RawWindowHandle;

use crate::backend::{Backend, BackendInit, TextureDesc, TextureRegion};
use crate::error::{FatalError, GfxError, HandleError, TransientError};
use crate::flags::{
    ClearFlags, DebugFlags, RendererType, ResetFlags, SamplerFlags, TextureFormat, UniformType,
    ViewMode,
};
use crate::frame::{
    DrawCall, EncoderState, FrameQueue, IndexRange, MAX_TEXTURE_STAGES, ScissorRect,
    TextureBinding, VertexRange,
};
use crate::handle::{HandleAllocator, ProgramHandle, ShaderHandle, TextureHandle, UniformHandle};
use crate::layout::VertexLayout;
use crate::state::{RenderState, StencilState};
use crate::transform::TransformBlock;
use crate::transient::{TransientArena, TransientIndexBuffer, TransientVertexBuffer};
use crate::view::{ViewId, ViewRect, ViewSet};

/// Only one backend context may be live per process.
static CONTEXT_ALIVE: AtomicBool = AtomicBool::new(false);

/// Default shared per-frame transient budget: 8 MiB.
pub const DEFAULT_TRANSIENT_BUDGET: usize = 8 * 1024 * 1024;

/// Native window handle forwarded to the backend before initialization.
#[derive(Debug, Copy, Clone)]
pub struct PlatformData {
    pub window: RawWindowHandle,
}

impl PlatformData {
    pub fn new(window: RawWindowHandle) -> Self {
        Self { window }
    }
}

/// Everything [`Context::init`] needs.
#[derive(Debug, Clone)]
pub struct InitParams {
    pub width: u32,
    pub height: u32,
    pub renderer: RendererType,
    pub reset: ResetFlags,
    pub format: TextureFormat,
    /// Shared per-frame transient buffer budget in bytes.
    pub transient_budget: usize,
    /// Must be supplied before init when rendering to a window.
    pub platform: Option<PlatformData>,
}

impl Default for InitParams {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            renderer: RendererType::Noop,
            reset: ResetFlags::NONE,
            format: TextureFormat::Bgra8,
            transient_budget: DEFAULT_TRANSIENT_BUDGET,
            platform: None,
        }
    }
}

/// See module docs.
pub struct Context {
    backend: Box<dyn Backend>,
    frame_number: u64,

    shaders: HandleAllocator,
    programs: HandleAllocator,
    textures: HandleAllocator,
    uniforms: HandleAllocator,
    /// Creation-time description per live texture slot, for validation.
    texture_descs: Vec<Option<TextureDesc>>,

    views: ViewSet,
    queue: FrameQueue,
    encoder: EncoderState,
    arena: TransientArena,
}

impl Context {
    /// Brings up the backend and claims the process-wide context slot.
    ///
    /// Must be called exactly once before any other operation; a second
    /// live context fails with [`FatalError::UnableToInitialize`].
    pub fn init(params: InitParams, mut backend: Box<dyn Backend>) -> Result<Self, FatalError> {
        if CONTEXT_ALIVE.swap(true, Ordering::AcqRel) {
            log::error!("a rendering context is already live in this process");
            return Err(FatalError::UnableToInitialize);
        }

        let init = BackendInit {
            width: params.width,
            height: params.height,
            renderer: params.renderer,
            reset: params.reset,
            format: params.format,
            window: params.platform.map(|p| p.window),
        };
        if let Err(err) = backend.init(&init) {
            CONTEXT_ALIVE.store(false, Ordering::Release);
            return Err(err);
        }

        log::info!(
            "context up: {}x{}, renderer {:?}, transient budget {} bytes",
            params.width,
            params.height,
            params.renderer,
            params.transient_budget
        );

        Ok(Self {
            backend,
            frame_number: 0,
            shaders: HandleAllocator::new(),
            programs: HandleAllocator::new(),
            textures: HandleAllocator::new(),
            uniforms: HandleAllocator::new(),
            texture_descs: Vec::new(),
            views: ViewSet::new(),
            queue: FrameQueue::new(),
            encoder: EncoderState::default(),
            arena: TransientArena::new(params.transient_budget),
        })
    }

    /// Explicit teardown. Call after the final [`frame`](Self::frame) and
    /// after destroying all resource handles.
    pub fn shutdown(self) {}

    /// Completed-frame counter.
    #[inline]
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    // ── registry ─────────────────────────────────────────────────────────

    fn check_shader(&self, handle: ShaderHandle) -> Result<(), HandleError> {
        if self.shaders.is_alive(handle.index()) {
            Ok(())
        } else {
            Err(HandleError { kind: handle.kind(), index: handle.index() })
        }
    }

    fn check_program(&self, handle: ProgramHandle) -> Result<(), HandleError> {
        if self.programs.is_alive(handle.index()) {
            Ok(())
        } else {
            Err(HandleError { kind: handle.kind(), index: handle.index() })
        }
    }

    fn check_texture(&self, handle: TextureHandle) -> Result<(), HandleError> {
        if self.textures.is_alive(handle.index()) {
            Ok(())
        } else {
            Err(HandleError { kind: handle.kind(), index: handle.index() })
        }
    }

    fn check_uniform(&self, handle: UniformHandle) -> Result<(), HandleError> {
        if self.uniforms.is_alive(handle.index()) {
            Ok(())
        } else {
            Err(HandleError { kind: handle.kind(), index: handle.index() })
        }
    }

    /// Hands backend-specific shader bytecode to the backend verbatim.
    pub fn create_shader(&mut self, bytecode: &[u8]) -> Result<ShaderHandle, FatalError> {
        if bytecode.is_empty() {
            log::error!("rejecting empty shader bytecode");
            return Err(FatalError::InvalidShader);
        }
        let index = self.shaders.alloc().ok_or(FatalError::DebugCheck {
            reason: "shader handle table exhausted",
        })?;
        let handle = ShaderHandle::new(index);
        if let Err(err) = self.backend.create_shader(handle, bytecode) {
            self.shaders.free(index);
            return Err(err);
        }
        Ok(handle)
    }

    pub fn destroy_shader(&mut self, handle: ShaderHandle) -> Result<(), HandleError> {
        self.check_shader(handle)?;
        self.shaders.free(handle.index());
        self.backend.destroy_shader(handle);
        Ok(())
    }

    /// Links a vertex+fragment program.
    ///
    /// With `destroy_shaders`, both input handles are invalidated as a side
    /// effect; any later use of them is a [`HandleError`].
    pub fn create_program(
        &mut self,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
        destroy_shaders: bool,
    ) -> Result<ProgramHandle, GfxError> {
        self.check_shader(vertex)?;
        self.check_shader(fragment)?;
        let index = self.programs.alloc().ok_or(FatalError::DebugCheck {
            reason: "program handle table exhausted",
        })?;
        let handle = ProgramHandle::new(index);
        if let Err(err) = self.backend.create_program(handle, vertex, fragment) {
            self.programs.free(index);
            return Err(err.into());
        }
        if destroy_shaders {
            self.shaders.free(vertex.index());
            self.backend.destroy_shader(vertex);
            if fragment != vertex {
                self.shaders.free(fragment.index());
                self.backend.destroy_shader(fragment);
            }
        }
        Ok(handle)
    }

    pub fn destroy_program(&mut self, handle: ProgramHandle) -> Result<(), HandleError> {
        self.check_program(handle)?;
        self.programs.free(handle.index());
        self.backend.destroy_program(handle);
        Ok(())
    }

    pub fn create_uniform(
        &mut self,
        name: &str,
        ty: UniformType,
        count: u16,
    ) -> Result<UniformHandle, FatalError> {
        if name.is_empty() {
            return Err(FatalError::DebugCheck { reason: "uniform name must not be empty" });
        }
        if count == 0 {
            return Err(FatalError::DebugCheck { reason: "uniform count must be at least 1" });
        }
        let index = self.uniforms.alloc().ok_or(FatalError::DebugCheck {
            reason: "uniform handle table exhausted",
        })?;
        let handle = UniformHandle::new(index);
        self.backend.create_uniform(handle, name, ty, count);
        Ok(handle)
    }

    pub fn destroy_uniform(&mut self, handle: UniformHandle) -> Result<(), HandleError> {
        self.check_uniform(handle)?;
        self.uniforms.free(handle.index());
        self.backend.destroy_uniform(handle);
        Ok(())
    }

    /// Creates a 2D texture, optionally with initial pixel data for the
    /// base mip of all layers.
    pub fn create_texture_2d(
        &mut self,
        width: u16,
        height: u16,
        has_mips: bool,
        layers: u16,
        format: TextureFormat,
        sampler: SamplerFlags,
        pixels: Option<&[u8]>,
    ) -> Result<TextureHandle, FatalError> {
        if width == 0 || height == 0 {
            return Err(FatalError::UnableToCreateTexture { reason: "zero-sized texture" });
        }
        if layers == 0 {
            return Err(FatalError::UnableToCreateTexture {
                reason: "texture needs at least one layer",
            });
        }
        if let Some(pixels) = pixels {
            let expected =
                width as usize * height as usize * layers as usize * format.bytes_per_pixel();
            if pixels.len() != expected {
                log::error!(
                    "texture pixel data is {} bytes, expected {expected}",
                    pixels.len()
                );
                return Err(FatalError::UnableToCreateTexture {
                    reason: "pixel data size does not match dimensions",
                });
            }
        }

        let index = self.textures.alloc().ok_or(FatalError::DebugCheck {
            reason: "texture handle table exhausted",
        })?;
        let handle = TextureHandle::new(index);
        let desc = TextureDesc { width, height, has_mips, layers, format, sampler };
        if let Err(err) = self.backend.create_texture_2d(handle, &desc, pixels) {
            self.textures.free(index);
            return Err(err);
        }
        if self.texture_descs.len() <= index as usize {
            self.texture_descs.resize(index as usize + 1, None);
        }
        self.texture_descs[index as usize] = Some(desc);
        Ok(handle)
    }

    /// Updates a region of one texture layer/mip.
    ///
    /// `pitch` is the source row stride in bytes; `u16::MAX` means tightly
    /// packed. The pixel slice must cover the whole region.
    pub fn update_texture_2d(
        &mut self,
        handle: TextureHandle,
        layer: u16,
        mip: u8,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        pixels: &[u8],
        pitch: u16,
    ) -> Result<(), GfxError> {
        self.check_texture(handle)?;
        let desc = self.texture_descs[handle.index() as usize]
            .as_ref()
            .ok_or(FatalError::DebugCheck { reason: "texture has no recorded description" })?;
        if layer >= desc.layers || x.saturating_add(width) > desc.width
            || y.saturating_add(height) > desc.height
        {
            return Err(FatalError::DebugCheck { reason: "texture update region out of range" }.into());
        }
        let row = if pitch == u16::MAX {
            width as usize * desc.format.bytes_per_pixel()
        } else {
            pitch as usize
        };
        if pixels.len() < row * height as usize {
            return Err(
                FatalError::DebugCheck { reason: "texture update data smaller than region" }.into()
            );
        }
        let region = TextureRegion { layer, mip, x, y, width, height, pitch };
        self.backend.update_texture_2d(handle, &region, pixels);
        Ok(())
    }

    pub fn destroy_texture(&mut self, handle: TextureHandle) -> Result<(), HandleError> {
        self.check_texture(handle)?;
        self.textures.free(handle.index());
        self.texture_descs[handle.index() as usize] = None;
        self.backend.destroy_texture(handle);
        Ok(())
    }

    // ── transient buffers ────────────────────────────────────────────────

    /// Allocates frame-scoped vertex space; zero-capacity on exhaustion.
    pub fn alloc_transient_vertex_buffer(
        &mut self,
        num: u32,
        layout: &VertexLayout,
    ) -> TransientVertexBuffer {
        self.arena.alloc_vertex(num, layout)
    }

    /// Allocates frame-scoped index space; zero-capacity on exhaustion.
    pub fn alloc_transient_index_buffer(&mut self, num: u32) -> TransientIndexBuffer {
        self.arena.alloc_index(num)
    }

    pub fn copy_into_vertices(
        &mut self,
        buffer: &TransientVertexBuffer,
        data: &[u8],
    ) -> Result<(), TransientError> {
        self.arena.copy_into_vertices(buffer, data)
    }

    pub fn copy_into_indices(
        &mut self,
        buffer: &TransientIndexBuffer,
        data: &[u16],
    ) -> Result<(), TransientError> {
        self.arena.copy_into_indices(buffer, data)
    }

    /// Transient bytes still available this frame.
    pub fn transient_remaining(&self) -> usize {
        self.arena.remaining()
    }

    // ── view configuration ───────────────────────────────────────────────

    pub fn set_view_clear(
        &mut self,
        view: ViewId,
        flags: ClearFlags,
        color: u32,
        depth: f32,
        stencil: u8,
    ) {
        let state = self.views.state_mut(view);
        state.clear_flags = flags;
        state.clear_color = color;
        state.clear_depth = depth;
        state.clear_stencil = stencil;
    }

    pub fn set_view_mode(&mut self, view: ViewId, mode: ViewMode) {
        self.views.state_mut(view).mode = mode;
    }

    pub fn set_view_rect(&mut self, view: ViewId, x: u16, y: u16, width: u16, height: u16) {
        self.views.state_mut(view).rect = Some(ViewRect { x, y, width, height });
    }

    /// `None` leaves the corresponding stored matrix unchanged.
    pub fn set_view_transform(
        &mut self,
        view: ViewId,
        view_matrix: Option<&[f32; 16]>,
        proj_matrix: Option<&[f32; 16]>,
    ) {
        let state = self.views.state_mut(view);
        if let Some(matrix) = view_matrix {
            state.view = Some(*matrix);
        }
        if let Some(matrix) = proj_matrix {
            state.proj = Some(*matrix);
        }
    }

    /// Marks a view active this frame so its clear executes even without
    /// submissions.
    pub fn touch(&mut self, view: ViewId) {
        self.views.touch(view);
    }

    pub fn set_debug(&mut self, flags: DebugFlags) {
        self.backend.set_debug(flags);
    }

    /// Reconfigures the backbuffer. The current backbuffer contents are
    /// invalidated; call between frames.
    pub fn reset(&mut self, width: u32, height: u32, flags: ResetFlags, format: TextureFormat) {
        log::info!("reset backbuffer to {width}x{height}");
        self.backend.reset(width, height, flags, format);
    }

    // ── draw encoder ─────────────────────────────────────────────────────

    pub fn set_scissor(&mut self, x: u16, y: u16, width: u16, height: u16) {
        self.encoder.scissor = Some(ScissorRect { x, y, width, height });
    }

    /// `blend_factor` is the constant color for `BlendFactor::Factor`.
    pub fn set_state(&mut self, state: RenderState, blend_factor: u32) {
        self.encoder.state = state;
        self.encoder.blend_factor = blend_factor;
    }

    pub fn set_stencil(&mut self, stencil: StencilState) {
        self.encoder.stencil = stencil;
    }

    /// Binds `texture` to `stage` through a sampler uniform.
    ///
    /// # Panics
    /// Panics if `stage >= MAX_TEXTURE_STAGES`.
    pub fn set_texture(
        &mut self,
        stage: u8,
        sampler: UniformHandle,
        texture: TextureHandle,
    ) -> Result<(), HandleError> {
        assert!((stage as usize) < MAX_TEXTURE_STAGES, "texture stage out of range");
        self.check_uniform(sampler)?;
        self.check_texture(texture)?;
        self.encoder.textures[stage as usize] = Some(TextureBinding { uniform: sampler, texture });
        Ok(())
    }

    pub fn set_transform(&mut self, matrix: &[f32; 16]) {
        self.encoder.transform = Some(*matrix);
    }

    /// Sets the draw transform from one matrix of a [`TransformBlock`].
    pub fn set_transform_from(
        &mut self,
        block: &TransformBlock,
        index: usize,
    ) -> Result<(), FatalError> {
        let matrix = block.matrix(index).ok_or(FatalError::DebugCheck {
            reason: "transform block index out of range",
        })?;
        self.encoder.transform = Some(*matrix);
        Ok(())
    }

    /// Binds a range of a transient vertex buffer to a stream.
    pub fn set_transient_vertex_buffer(
        &mut self,
        stream: u8,
        buffer: &TransientVertexBuffer,
        start_vertex: u32,
        num_vertices: u32,
    ) -> Result<(), TransientError> {
        if buffer.generation() != self.arena.generation() {
            return Err(TransientError::StaleFrame {
                allocated: buffer.generation(),
                current: self.arena.generation(),
            });
        }
        // Widen before adding; the sum of two u32 ranges can overflow.
        let end = start_vertex as u64 + num_vertices as u64;
        if end > buffer.num() as u64 {
            return Err(TransientError::OutOfBounds {
                requested: end as usize * buffer.stride() as usize,
                capacity: buffer.capacity_bytes(),
            });
        }
        self.encoder.vertices = Some(VertexRange {
            stream,
            offset: buffer.offset,
            start_vertex,
            num_vertices,
            stride: buffer.stride(),
        });
        Ok(())
    }

    /// Binds a range of a transient index buffer.
    pub fn set_transient_index_buffer(
        &mut self,
        buffer: &TransientIndexBuffer,
        first_index: u32,
        num_indices: u32,
    ) -> Result<(), TransientError> {
        if buffer.generation() != self.arena.generation() {
            return Err(TransientError::StaleFrame {
                allocated: buffer.generation(),
                current: self.arena.generation(),
            });
        }
        let end = first_index as u64 + num_indices as u64;
        if end > buffer.num() as u64 {
            return Err(TransientError::OutOfBounds {
                requested: end as usize * crate::transient::INDEX_STRIDE as usize,
                capacity: buffer.capacity_bytes(),
            });
        }
        self.encoder.indices = Some(IndexRange {
            offset: buffer.offset,
            first_index,
            num_indices,
        });
        Ok(())
    }

    /// Queues one draw with the state accumulated since the last submit.
    ///
    /// Unless `preserve_state` is set, the per-draw state resets to the
    /// defaults afterwards. The draw executes at the next `frame()`.
    pub fn submit(
        &mut self,
        view: ViewId,
        program: ProgramHandle,
        depth: u32,
        preserve_state: bool,
    ) -> Result<(), HandleError> {
        self.check_program(program)?;
        for binding in self.encoder.textures.iter().flatten() {
            self.check_uniform(binding.uniform)?;
            self.check_texture(binding.texture)?;
        }

        let call = DrawCall {
            view,
            program,
            depth,
            state: self.encoder.state,
            blend_factor: self.encoder.blend_factor,
            stencil: self.encoder.stencil,
            scissor: self.encoder.scissor,
            textures: self.encoder.textures,
            transform: self.encoder.transform,
            vertices: self.encoder.vertices,
            indices: self.encoder.indices,
            sequence: 0,
        };
        self.queue.push(call);

        if !preserve_state {
            self.encoder = EncoderState::default();
        }
        Ok(())
    }

    // ── frame boundary ───────────────────────────────────────────────────

    /// Flushes all queued view state and draws to the backend, reclaims
    /// the transient arena, and returns the completed frame's number.
    ///
    /// Views flush in ascending id order. Within a view, `Sequential`
    /// preserves submission order and the `Depth*` modes sort by the
    /// submitted depth key.
    pub fn frame(&mut self, capture: bool) -> u64 {
        let completed = self.frame_number;

        for id in self.views.active_ids(self.queue.submitted_views()) {
            self.backend.apply_view(id, self.views.state(id));
        }

        let order = self.queue.flush_order(|id| self.views.mode(id));
        log::debug!("frame {completed}: flushing {} draws", order.len());
        for i in order {
            let call = &self.queue.calls()[i];
            let vertices = call.vertices.map_or(&[][..], |r| {
                self.arena.slice(
                    r.offset + r.start_vertex as usize * r.stride as usize,
                    r.num_vertices as usize * r.stride as usize,
                )
            });
            let indices = call.indices.map_or(&[][..], |r| {
                self.arena.slice(
                    r.offset + r.first_index as usize * 2,
                    r.num_indices as usize * 2,
                )
            });
            self.backend.submit(call, vertices, indices);
        }
        self.backend.end_frame(completed, capture);

        self.queue.clear();
        self.views.end_frame();
        self.encoder = EncoderState::default();
        self.arena.reset();
        self.frame_number += 1;
        completed
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        let live = self.shaders.live_count()
            + self.programs.live_count()
            + self.textures.live_count()
            + self.uniforms.live_count();
        if live > 0 {
            log::warn!("context dropped with {live} live resource handles");
        }
        self.backend.shutdown();
        CONTEXT_ALIVE.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::NoopBackend;
    use crate::flags::{Attrib, AttribType};
    use crate::testutil::{recording_context, serial};

    fn quad_layout() -> VertexLayout {
        VertexLayout::builder()
            .add(Attrib::Position, 2, AttribType::Float, false)
            .build()
    }

    // ── lifecycle ────────────────────────────────────────────────────────

    #[test]
    fn second_live_context_is_rejected() {
        let _guard = serial();
        let ctx = Context::init(InitParams::default(), Box::new(NoopBackend::new())).unwrap();
        let err = Context::init(InitParams::default(), Box::new(NoopBackend::new()))
            .err()
            .unwrap();
        assert_eq!(err, FatalError::UnableToInitialize);
        drop(ctx);
        // Slot is free again after teardown.
        let ctx = Context::init(InitParams::default(), Box::new(NoopBackend::new())).unwrap();
        drop(ctx);
    }

    #[test]
    fn frame_numbers_are_monotonic() {
        let _guard = serial();
        let (mut ctx, _log) = recording_context();
        assert_eq!(ctx.frame(false), 0);
        assert_eq!(ctx.frame(false), 1);
        assert_eq!(ctx.frame(false), 2);
        assert_eq!(ctx.frame_number(), 3);
    }

    #[test]
    fn shutdown_reaches_backend() {
        let _guard = serial();
        let (ctx, log) = recording_context();
        ctx.shutdown();
        assert!(log.borrow().shut_down);
    }

    // ── registry ─────────────────────────────────────────────────────────

    #[test]
    fn empty_shader_bytecode_is_fatal() {
        let _guard = serial();
        let (mut ctx, _log) = recording_context();
        assert_eq!(ctx.create_shader(&[]), Err(FatalError::InvalidShader));
    }

    #[test]
    fn program_with_destroy_shaders_invalidates_inputs() {
        let _guard = serial();
        let (mut ctx, _log) = recording_context();
        let vs = ctx.create_shader(&[1, 2, 3]).unwrap();
        let fs = ctx.create_shader(&[4, 5, 6]).unwrap();
        let _program = ctx.create_program(vs, fs, true).unwrap();

        let err = ctx.destroy_shader(vs).unwrap_err();
        assert_eq!(err.index, vs.index());
        assert!(ctx.create_program(vs, fs, false).is_err());
    }

    #[test]
    fn destroyed_texture_cannot_be_updated() {
        let _guard = serial();
        let (mut ctx, _log) = recording_context();
        let tex = ctx
            .create_texture_2d(2, 2, false, 1, TextureFormat::Rgba8, SamplerFlags::NONE, None)
            .unwrap();
        ctx.destroy_texture(tex).unwrap();
        let err = ctx
            .update_texture_2d(tex, 0, 0, 0, 0, 1, 1, &[0; 4], u16::MAX)
            .unwrap_err();
        assert!(matches!(err, GfxError::Handle(_)));
    }

    #[test]
    fn texture_pixel_size_must_match() {
        let _guard = serial();
        let (mut ctx, _log) = recording_context();
        let err = ctx
            .create_texture_2d(2, 2, false, 1, TextureFormat::Rgba8, SamplerFlags::NONE, Some(&[0; 15]))
            .unwrap_err();
        assert_eq!(
            err,
            FatalError::UnableToCreateTexture { reason: "pixel data size does not match dimensions" }
        );
    }

    #[test]
    fn update_region_must_fit() {
        let _guard = serial();
        let (mut ctx, _log) = recording_context();
        let tex = ctx
            .create_texture_2d(4, 4, false, 1, TextureFormat::Rgba8, SamplerFlags::NONE, None)
            .unwrap();
        let err = ctx
            .update_texture_2d(tex, 0, 0, 2, 2, 4, 4, &[0; 64], u16::MAX)
            .unwrap_err();
        assert!(matches!(err, GfxError::Fatal(FatalError::DebugCheck { .. })));
    }

    #[test]
    fn submit_with_destroyed_program_is_surfaced() {
        let _guard = serial();
        let (mut ctx, _log) = recording_context();
        let vs = ctx.create_shader(&[1]).unwrap();
        let fs = ctx.create_shader(&[2]).unwrap();
        let program = ctx.create_program(vs, fs, true).unwrap();
        ctx.destroy_program(program).unwrap();
        let err = ctx.submit(ViewId::new(0), program, 0, false).unwrap_err();
        assert_eq!(err.index, program.index());
    }

    // ── transient lifetime ───────────────────────────────────────────────

    #[test]
    fn transient_buffer_dies_at_frame_boundary() {
        let _guard = serial();
        let (mut ctx, _log) = recording_context();
        let tvb = ctx.alloc_transient_vertex_buffer(4, &quad_layout());
        ctx.copy_into_vertices(&tvb, &[0u8; 32]).unwrap();

        ctx.frame(false);
        let err = ctx.copy_into_vertices(&tvb, &[0u8; 32]).unwrap_err();
        assert_eq!(err, TransientError::StaleFrame { allocated: 0, current: 1 });
        assert!(matches!(
            ctx.set_transient_vertex_buffer(0, &tvb, 0, 4),
            Err(TransientError::StaleFrame { .. })
        ));
    }

    #[test]
    fn overflowing_transient_ranges_are_rejected() {
        let _guard = serial();
        let (mut ctx, _log) = recording_context();
        let tvb = ctx.alloc_transient_vertex_buffer(4, &quad_layout());
        assert!(matches!(
            ctx.set_transient_vertex_buffer(0, &tvb, u32::MAX, 2),
            Err(TransientError::OutOfBounds { .. })
        ));
        let tib = ctx.alloc_transient_index_buffer(4);
        assert!(matches!(
            ctx.set_transient_index_buffer(&tib, u32::MAX, 2),
            Err(TransientError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn transient_budget_resets_each_frame() {
        let _guard = serial();
        let (mut ctx, _log) = recording_context();
        let budget = ctx.transient_remaining();
        ctx.alloc_transient_index_buffer(64);
        assert!(ctx.transient_remaining() < budget);
        ctx.frame(false);
        assert_eq!(ctx.transient_remaining(), budget);
    }

    // ── frame flush ──────────────────────────────────────────────────────

    #[test]
    fn touch_flushes_view_clear_without_draws() {
        let _guard = serial();
        let (mut ctx, log) = recording_context();
        let view = ViewId::new(0);
        ctx.set_view_clear(view, ClearFlags::COLOR | ClearFlags::DEPTH, 0x6495_edff, 0.0, 0);
        ctx.set_view_mode(view, ViewMode::Sequential);
        ctx.set_view_rect(view, 0, 0, 800, 600);
        ctx.touch(view);
        ctx.frame(false);

        let log = log.borrow();
        assert_eq!(log.applied_views.len(), 1);
        let (id, state) = &log.applied_views[0];
        assert_eq!(*id, 0);
        assert_eq!(state.clear_color, 0x6495_edff);
        assert_eq!(state.mode, ViewMode::Sequential);
        assert_eq!(state.rect, Some(ViewRect { x: 0, y: 0, width: 800, height: 600 }));
        assert!(log.draws.is_empty());
    }

    #[test]
    fn draws_flush_in_view_then_submission_order() {
        let _guard = serial();
        let (mut ctx, log) = recording_context();
        let vs = ctx.create_shader(&[1]).unwrap();
        let fs = ctx.create_shader(&[2]).unwrap();
        let program = ctx.create_program(vs, fs, true).unwrap();
        ctx.set_view_mode(ViewId::new(1), ViewMode::Sequential);
        ctx.set_view_mode(ViewId::new(2), ViewMode::Sequential);

        ctx.submit(ViewId::new(2), program, 0, false).unwrap();
        ctx.submit(ViewId::new(1), program, 0, false).unwrap();
        ctx.submit(ViewId::new(2), program, 0, false).unwrap();
        ctx.frame(false);

        let log = log.borrow();
        let order: Vec<(u16, u32)> = log
            .draws
            .iter()
            .map(|d| (d.call.view.index(), d.call.sequence))
            .collect();
        assert_eq!(order, vec![(1, 1), (2, 0), (2, 2)]);
    }

    #[test]
    fn submit_captures_and_resets_encoder_state() {
        let _guard = serial();
        let (mut ctx, log) = recording_context();
        let vs = ctx.create_shader(&[1]).unwrap();
        let fs = ctx.create_shader(&[2]).unwrap();
        let program = ctx.create_program(vs, fs, true).unwrap();

        ctx.set_scissor(1, 2, 3, 4);
        ctx.set_state(RenderState::NONE.with_write_rgb(), 7);
        ctx.submit(ViewId::new(0), program, 0, false).unwrap();
        // State was not preserved; the second draw uses defaults.
        ctx.submit(ViewId::new(0), program, 0, false).unwrap();
        ctx.frame(false);

        let log = log.borrow();
        assert_eq!(log.draws[0].call.scissor, Some(ScissorRect { x: 1, y: 2, width: 3, height: 4 }));
        assert_eq!(log.draws[0].call.blend_factor, 7);
        assert_eq!(log.draws[1].call.scissor, None);
        assert_eq!(log.draws[1].call.state, RenderState::DEFAULT);
    }

    #[test]
    fn transform_block_matrices_reach_the_backend() {
        let _guard = serial();
        let (mut ctx, log) = recording_context();
        let vs = ctx.create_shader(&[1]).unwrap();
        let fs = ctx.create_shader(&[2]).unwrap();
        let program = ctx.create_program(vs, fs, true).unwrap();

        let mut block = TransformBlock::new(2);
        block.matrix_mut(1).unwrap()[12] = 3.0;
        ctx.set_transform_from(&block, 1).unwrap();
        ctx.submit(ViewId::new(0), program, 0, false).unwrap();
        assert_eq!(
            ctx.set_transform_from(&block, 5),
            Err(FatalError::DebugCheck { reason: "transform block index out of range" })
        );
        ctx.frame(false);

        let log = log.borrow();
        let matrix = log.draws[0].call.transform.unwrap();
        assert_eq!(matrix[12], 3.0);
    }

    #[test]
    fn view_transform_none_keeps_the_previous_matrix() {
        let _guard = serial();
        let (mut ctx, log) = recording_context();
        let view = ViewId::new(0);
        let mut proj = crate::transform::IDENTITY;
        proj[0] = 2.0;

        ctx.set_view_transform(view, None, Some(&proj));
        ctx.set_view_transform(view, Some(&crate::transform::IDENTITY), None);
        ctx.touch(view);
        ctx.frame(false);

        let log = log.borrow();
        let (_, state) = &log.applied_views[0];
        assert_eq!(state.proj, Some(proj));
        assert_eq!(state.view, Some(crate::transform::IDENTITY));
    }

    #[test]
    fn reset_is_forwarded() {
        let _guard = serial();
        let (mut ctx, log) = recording_context();
        ctx.reset(1024, 768, ResetFlags::VSYNC | ResetFlags::MSAA_X4, TextureFormat::Bgra8);
        let log = log.borrow();
        assert_eq!(
            log.resets,
            vec![(1024, 768, ResetFlags::VSYNC | ResetFlags::MSAA_X4, TextureFormat::Bgra8)]
        );
    }
}
