//! The backend seam.
//!
//! Everything below the wrapper is an opaque command consumer behind the
//! [`Backend`] trait: resource creation, per-view setup and draw
//! submissions flow through it, and it is free to execute on its own
//! thread. The wrapper never blocks on GPU completion; only `end_frame`
//! may pace submission.
//!
//! Two consumers ship in-tree: [`NoopBackend`] (the native API's NOOP
//! renderer: accept and discard) and [`RecordingBackend`] (captures every
//! call for tests and headless inspection).

mod noop;
mod recording;

pub use noop::NoopBackend;
pub use recording::{RecordedDraw, RecordingBackend, RecordingLog};

use raw_window_handle::RawWindowHandle;

use crate::error::FatalError;
use crate::flags::{
    DebugFlags, RendererType, ResetFlags, SamplerFlags, TextureFormat, UniformType,
};
use crate::frame::DrawCall;
use crate::handle::{ProgramHandle, ShaderHandle, TextureHandle, UniformHandle};
use crate::view::{ViewId, ViewState};

/// Parameters handed to the backend exactly once, before anything else.
#[derive(Debug, Clone)]
pub struct BackendInit {
    pub width: u32,
    pub height: u32,
    pub renderer: RendererType,
    pub reset: ResetFlags,
    pub format: TextureFormat,
    /// Native window handle, if rendering to a window.
    pub window: Option<RawWindowHandle>,
}

/// Immutable description of a 2D texture at creation time.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TextureDesc {
    pub width: u16,
    pub height: u16,
    pub has_mips: bool,
    pub layers: u16,
    pub format: TextureFormat,
    pub sampler: SamplerFlags,
}

/// Target region of a texture update.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TextureRegion {
    pub layer: u16,
    pub mip: u8,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    /// Source row pitch in bytes; `u16::MAX` = tightly packed.
    pub pitch: u16,
}

/// The opaque command consumer the wrapper drives.
///
/// Handle arguments are guaranteed live by the registry; implementations
/// may index their tables without re-checking.
pub trait Backend {
    fn init(&mut self, params: &BackendInit) -> Result<(), FatalError>;
    fn shutdown(&mut self);

    fn reset(&mut self, width: u32, height: u32, flags: ResetFlags, format: TextureFormat);
    fn set_debug(&mut self, flags: DebugFlags);

    fn create_shader(&mut self, handle: ShaderHandle, bytecode: &[u8]) -> Result<(), FatalError>;
    fn destroy_shader(&mut self, handle: ShaderHandle);

    fn create_program(
        &mut self,
        handle: ProgramHandle,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
    ) -> Result<(), FatalError>;
    fn destroy_program(&mut self, handle: ProgramHandle);

    fn create_uniform(&mut self, handle: UniformHandle, name: &str, ty: UniformType, count: u16);
    fn destroy_uniform(&mut self, handle: UniformHandle);

    fn create_texture_2d(
        &mut self,
        handle: TextureHandle,
        desc: &TextureDesc,
        pixels: Option<&[u8]>,
    ) -> Result<(), FatalError>;
    fn update_texture_2d(&mut self, handle: TextureHandle, region: &TextureRegion, pixels: &[u8]);
    fn destroy_texture(&mut self, handle: TextureHandle);

    /// Applies one view's configuration for the coming frame.
    fn apply_view(&mut self, id: ViewId, state: &ViewState);

    /// Consumes one draw. `vertices`/`indices` are the full transient
    /// ranges the call's buffer bindings refer to (empty when unbound).
    fn submit(&mut self, call: &DrawCall, vertices: &[u8], indices: &[u8]);

    /// Frame boundary. May block briefly to pace submission.
    fn end_frame(&mut self, frame_number: u64, capture: bool);
}
