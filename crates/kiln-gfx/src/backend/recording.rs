//! Backend that records every command it consumes.
//!
//! The log lives behind a shared `Rc`, so a caller can keep a clone while
//! the backend itself is owned by the context. Used heavily by the test
//! suite; also handy for dumping a frame's worth of submissions headlessly.

use std::cell::RefCell;
use std::rc::Rc;

use super::{Backend, BackendInit, TextureDesc, TextureRegion};
use crate::error::FatalError;
use crate::flags::{DebugFlags, ResetFlags, TextureFormat, UniformType};
use crate::frame::DrawCall;
use crate::handle::{ProgramHandle, ShaderHandle, TextureHandle, UniformHandle};
use crate::view::{ViewId, ViewState};

/// One recorded draw with the transient bytes it referenced.
#[derive(Debug, Clone)]
pub struct RecordedDraw {
    pub call: DrawCall,
    pub vertices: Vec<u8>,
    pub indices: Vec<u8>,
    /// Frame the draw was flushed in.
    pub frame: u64,
}

/// Everything the backend has consumed so far.
#[derive(Debug, Default)]
pub struct RecordingLog {
    pub initialized: bool,
    pub shut_down: bool,
    pub resets: Vec<(u32, u32, ResetFlags, TextureFormat)>,
    pub debug_flags: Vec<DebugFlags>,
    pub shaders: Vec<u16>,
    pub programs: Vec<(u16, u16, u16)>,
    pub uniforms: Vec<(u16, String, UniformType, u16)>,
    pub textures: Vec<(u16, TextureDesc)>,
    pub texture_updates: Vec<(u16, TextureRegion)>,
    pub destroyed_shaders: Vec<u16>,
    pub destroyed_programs: Vec<u16>,
    pub destroyed_uniforms: Vec<u16>,
    pub destroyed_textures: Vec<u16>,
    pub applied_views: Vec<(u16, ViewState)>,
    pub draws: Vec<RecordedDraw>,
    pub frames: Vec<u64>,
}

impl RecordingLog {
    /// Draws flushed during a particular frame.
    pub fn draws_in_frame(&self, frame: u64) -> impl Iterator<Item = &RecordedDraw> {
        self.draws.iter().filter(move |d| d.frame == frame)
    }
}

/// See module docs.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    log: Rc<RefCell<RecordingLog>>,
    current_frame: u64,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the log; keep a clone before handing the backend off.
    pub fn log(&self) -> Rc<RefCell<RecordingLog>> {
        Rc::clone(&self.log)
    }
}

impl Backend for RecordingBackend {
    fn init(&mut self, _params: &BackendInit) -> Result<(), FatalError> {
        self.log.borrow_mut().initialized = true;
        Ok(())
    }

    fn shutdown(&mut self) {
        self.log.borrow_mut().shut_down = true;
    }

    fn reset(&mut self, width: u32, height: u32, flags: ResetFlags, format: TextureFormat) {
        self.log.borrow_mut().resets.push((width, height, flags, format));
    }

    fn set_debug(&mut self, flags: DebugFlags) {
        self.log.borrow_mut().debug_flags.push(flags);
    }

    fn create_shader(&mut self, handle: ShaderHandle, _bytecode: &[u8]) -> Result<(), FatalError> {
        self.log.borrow_mut().shaders.push(handle.index());
        Ok(())
    }

    fn destroy_shader(&mut self, handle: ShaderHandle) {
        self.log.borrow_mut().destroyed_shaders.push(handle.index());
    }

    fn create_program(
        &mut self,
        handle: ProgramHandle,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
    ) -> Result<(), FatalError> {
        self.log
            .borrow_mut()
            .programs
            .push((handle.index(), vertex.index(), fragment.index()));
        Ok(())
    }

    fn destroy_program(&mut self, handle: ProgramHandle) {
        self.log.borrow_mut().destroyed_programs.push(handle.index());
    }

    fn create_uniform(&mut self, handle: UniformHandle, name: &str, ty: UniformType, count: u16) {
        self.log
            .borrow_mut()
            .uniforms
            .push((handle.index(), name.to_owned(), ty, count));
    }

    fn destroy_uniform(&mut self, handle: UniformHandle) {
        self.log.borrow_mut().destroyed_uniforms.push(handle.index());
    }

    fn create_texture_2d(
        &mut self,
        handle: TextureHandle,
        desc: &TextureDesc,
        _pixels: Option<&[u8]>,
    ) -> Result<(), FatalError> {
        self.log.borrow_mut().textures.push((handle.index(), *desc));
        Ok(())
    }

    fn update_texture_2d(&mut self, handle: TextureHandle, region: &TextureRegion, _pixels: &[u8]) {
        self.log
            .borrow_mut()
            .texture_updates
            .push((handle.index(), *region));
    }

    fn destroy_texture(&mut self, handle: TextureHandle) {
        self.log.borrow_mut().destroyed_textures.push(handle.index());
    }

    fn apply_view(&mut self, id: ViewId, state: &ViewState) {
        self.log
            .borrow_mut()
            .applied_views
            .push((id.index(), state.clone()));
    }

    fn submit(&mut self, call: &DrawCall, vertices: &[u8], indices: &[u8]) {
        self.log.borrow_mut().draws.push(RecordedDraw {
            call: call.clone(),
            vertices: vertices.to_vec(),
            indices: indices.to_vec(),
            frame: self.current_frame,
        });
    }

    fn end_frame(&mut self, frame_number: u64, _capture: bool) {
        self.log.borrow_mut().frames.push(frame_number);
        self.current_frame = frame_number + 1;
    }
}
