//! Accept-and-discard backend, equivalent to the native NOOP renderer.
//!
//! Useful for headless runs and for exercising the full submission path
//! without a GPU. Commands are validated upstream and logged at trace
//! level here.

use super::{Backend, BackendInit, TextureDesc, TextureRegion};
use crate::error::FatalError;
use crate::flags::{DebugFlags, ResetFlags, TextureFormat, UniformType};
use crate::frame::DrawCall;
use crate::handle::{ProgramHandle, ShaderHandle, TextureHandle, UniformHandle};
use crate::view::{ViewId, ViewState};

#[derive(Debug, Default)]
pub struct NoopBackend {
    frames: u64,
}

impl NoopBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames completed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Backend for NoopBackend {
    fn init(&mut self, params: &BackendInit) -> Result<(), FatalError> {
        log::info!(
            "noop backend up: {}x{}, renderer {:?}",
            params.width,
            params.height,
            params.renderer
        );
        Ok(())
    }

    fn shutdown(&mut self) {
        log::info!("noop backend down after {} frames", self.frames);
    }

    fn reset(&mut self, width: u32, height: u32, flags: ResetFlags, format: TextureFormat) {
        log::debug!("reset {width}x{height} flags={:#x} format={format:?}", flags.bits());
    }

    fn set_debug(&mut self, flags: DebugFlags) {
        log::debug!("debug flags {:#x}", flags.bits());
    }

    fn create_shader(&mut self, handle: ShaderHandle, bytecode: &[u8]) -> Result<(), FatalError> {
        log::trace!("create shader {} ({} bytes)", handle.index(), bytecode.len());
        Ok(())
    }

    fn destroy_shader(&mut self, handle: ShaderHandle) {
        log::trace!("destroy shader {}", handle.index());
    }

    fn create_program(
        &mut self,
        handle: ProgramHandle,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
    ) -> Result<(), FatalError> {
        log::trace!(
            "create program {} (vs {}, fs {})",
            handle.index(),
            vertex.index(),
            fragment.index()
        );
        Ok(())
    }

    fn destroy_program(&mut self, handle: ProgramHandle) {
        log::trace!("destroy program {}", handle.index());
    }

    fn create_uniform(&mut self, handle: UniformHandle, name: &str, ty: UniformType, count: u16) {
        log::trace!("create uniform {} '{name}' {ty:?} x{count}", handle.index());
    }

    fn destroy_uniform(&mut self, handle: UniformHandle) {
        log::trace!("destroy uniform {}", handle.index());
    }

    fn create_texture_2d(
        &mut self,
        handle: TextureHandle,
        desc: &TextureDesc,
        _pixels: Option<&[u8]>,
    ) -> Result<(), FatalError> {
        log::trace!(
            "create texture {} {}x{} {:?}",
            handle.index(),
            desc.width,
            desc.height,
            desc.format
        );
        Ok(())
    }

    fn update_texture_2d(&mut self, handle: TextureHandle, region: &TextureRegion, _pixels: &[u8]) {
        log::trace!(
            "update texture {} region {}x{}+{}+{}",
            handle.index(),
            region.width,
            region.height,
            region.x,
            region.y
        );
    }

    fn destroy_texture(&mut self, handle: TextureHandle) {
        log::trace!("destroy texture {}", handle.index());
    }

    fn apply_view(&mut self, id: ViewId, state: &ViewState) {
        log::trace!("view {} clear={:#x}", id.index(), state.clear_flags.bits());
    }

    fn submit(&mut self, call: &DrawCall, _vertices: &[u8], _indices: &[u8]) {
        log::trace!(
            "submit view {} program {}",
            call.view.index(),
            call.program.index()
        );
    }

    fn end_frame(&mut self, frame_number: u64, _capture: bool) {
        self.frames = frame_number;
    }
}
