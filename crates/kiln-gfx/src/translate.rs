//! Translates GUI draw lists into queued submissions.
//!
//! One [`DrawListRenderer`] owns the GUI pipeline fixtures: the sampler
//! uniform, a 1×1 white fallback texture and the fixed vertex layout. Per
//! frame, [`render`](DrawListRenderer::render) uploads a whole list into
//! transient buffers and emits one submission per draw command, sharing the
//! vertex upload across all of them.

use crate::context::Context;
use crate::draw_list::{DrawCommand, DrawList};
use crate::error::{FatalError, GfxError};
use crate::flags::{Attrib, AttribType, SamplerFlags, TextureFormat, UniformType};
use crate::handle::{ProgramHandle, TextureHandle, UniformHandle};
use crate::layout::VertexLayout;
use crate::state::{BlendFactor, RenderState};
use crate::view::ViewId;

/// GUI vertex layout: 2D position, texcoord, normalized RGBA8 color.
fn gui_layout() -> VertexLayout {
    VertexLayout::builder()
        .add(Attrib::Position, 2, AttribType::Float, false)
        .add(Attrib::TexCoord0, 2, AttribType::Float, false)
        .add(Attrib::Color0, 4, AttribType::Uint8, true)
        .build()
}

/// Clamps a float clip rect (left, top, right, bottom) to a u16 scissor
/// (x, y, width, height). Negative edges clamp to zero, the far edges to
/// the u16 maximum, and an inverted rect degenerates to zero size.
fn clamp_scissor(clip: &[f32; 4]) -> (u16, u16, u16, u16) {
    let x = clip[0].max(0.0) as u16;
    let y = clip[1].max(0.0) as u16;
    let right = clip[2].max(0.0).min(65535.0) as u16;
    let bottom = clip[3].max(0.0).min(65535.0) as u16;
    (x, y, right.saturating_sub(x), bottom.saturating_sub(y))
}

/// See module docs.
pub struct DrawListRenderer {
    view: ViewId,
    program: ProgramHandle,
    sampler: UniformHandle,
    white_texture: TextureHandle,
    layout: VertexLayout,
}

impl DrawListRenderer {
    /// Creates the GUI fixtures. `program` must sample stage 0 through a
    /// `s_tex` uniform and consume the [`gui_layout`] vertex format.
    pub fn new(ctx: &mut Context, view: ViewId, program: ProgramHandle) -> Result<Self, FatalError> {
        let sampler = ctx.create_uniform("s_tex", UniformType::Sampler, 1)?;
        let white_texture = ctx.create_texture_2d(
            1,
            1,
            false,
            1,
            TextureFormat::Rgba8,
            SamplerFlags::UVW_CLAMP | SamplerFlags::POINT,
            Some(&[0xff; 4]),
        )?;
        Ok(Self {
            view,
            program,
            sampler,
            white_texture,
            layout: gui_layout(),
        })
    }

    /// Uploads `list` and queues one submission per draw command.
    ///
    /// The whole list shares one transient vertex upload and one index
    /// upload; each command binds its own span of the index buffer. When
    /// the frame's transient budget cannot hold the list, the list is
    /// dropped for this frame with a warning and `Ok` is returned.
    pub fn render(&self, ctx: &mut Context, list: &DrawList) -> Result<(), GfxError> {
        if list.commands.is_empty() || list.vertices.is_empty() {
            return Ok(());
        }

        let num_vertices = list.vertices.len() as u32;
        let num_indices = list.indices.len() as u32;
        let tvb = ctx.alloc_transient_vertex_buffer(num_vertices, &self.layout);
        let tib = ctx.alloc_transient_index_buffer(num_indices);
        if tvb.is_empty() || tib.is_empty() {
            log::warn!(
                "transient budget exhausted, dropping draw list ({num_vertices} vertices, {num_indices} indices)"
            );
            return Ok(());
        }
        ctx.copy_into_vertices(&tvb, bytemuck::cast_slice(&list.vertices))?;
        ctx.copy_into_indices(&tib, &list.indices)?;

        let state = RenderState::NONE
            .with_write_rgb()
            .with_write_alpha()
            .with_msaa()
            .with_blend_func(BlendFactor::SrcAlpha, BlendFactor::InvSrcAlpha);

        // Index offsets are cumulative over the whole list, including
        // skipped commands.
        let mut index_offset = 0u32;
        for command in &list.commands {
            match command {
                DrawCommand::Callback { element_count } => {
                    index_offset += element_count;
                }
                DrawCommand::Draw { clip, element_count, texture } => {
                    if *element_count == 0 {
                        continue;
                    }
                    let (x, y, width, height) = clamp_scissor(clip);
                    ctx.set_scissor(x, y, width, height);
                    ctx.set_state(state, 0);
                    let texture = texture.unwrap_or(self.white_texture);
                    ctx.set_texture(0, self.sampler, texture)?;
                    ctx.set_transient_vertex_buffer(0, &tvb, 0, num_vertices)?;
                    ctx.set_transient_index_buffer(&tib, index_offset, *element_count)?;
                    ctx.submit(self.view, self.program, 0, false)?;
                    index_offset += element_count;
                }
            }
        }
        debug_assert_eq!(
            index_offset, num_indices,
            "draw list element counts disagree with its index buffer"
        );
        Ok(())
    }

    /// Releases the GUI fixtures. The program is the caller's to destroy.
    pub fn destroy(self, ctx: &mut Context) {
        let _ = ctx.destroy_uniform(self.sampler);
        let _ = ctx.destroy_texture(self.white_texture);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Context, InitParams};
    use crate::draw_list::DrawVert;
    use crate::testutil::{recording_context, serial};

    fn gui_program(ctx: &mut Context) -> ProgramHandle {
        let vs = ctx.create_shader(&[0x10]).unwrap();
        let fs = ctx.create_shader(&[0x20]).unwrap();
        ctx.create_program(vs, fs, true).unwrap()
    }

    /// A list with four shared vertices and one draw command per count.
    fn list_with_counts(counts: &[u32]) -> DrawList {
        let mut list = DrawList::new();
        list.vertices = vec![
            DrawVert {
                pos: [0.0, 0.0],
                uv: [0.0, 0.0],
                color: 0xffff_ffff,
            };
            4
        ];
        for &count in counts {
            for i in 0..count {
                list.indices.push((i % 4) as u16);
            }
            list.commands.push(DrawCommand::Draw {
                clip: [0.0, 0.0, 64.0, 64.0],
                element_count: count,
                texture: None,
            });
        }
        list
    }

    // ── scissor clamping ─────────────────────────────────────────────────

    #[test]
    fn scissor_clamps_into_u16_range() {
        assert_eq!(clamp_scissor(&[-10.0, -5.0, 70000.0, 100.0]), (0, 0, 65535, 100));
        assert_eq!(clamp_scissor(&[10.0, 20.0, 30.0, 60.0]), (10, 20, 20, 40));
    }

    #[test]
    fn inverted_clip_degenerates_to_zero_size() {
        assert_eq!(clamp_scissor(&[50.0, 50.0, 10.0, 10.0]), (50, 50, 0, 0));
        assert_eq!(clamp_scissor(&[-20.0, -20.0, -5.0, -5.0]), (0, 0, 0, 0));
    }

    // ── command translation ──────────────────────────────────────────────

    #[test]
    fn each_command_gets_its_own_index_span() {
        let _guard = serial();
        let (mut ctx, log) = recording_context();
        let program = gui_program(&mut ctx);
        let renderer = DrawListRenderer::new(&mut ctx, ViewId::new(0), program).unwrap();

        renderer.render(&mut ctx, &list_with_counts(&[6, 6, 12])).unwrap();
        ctx.frame(false);

        let log = log.borrow();
        assert_eq!(log.draws.len(), 3);
        let spans: Vec<(u32, u32)> = log
            .draws
            .iter()
            .map(|d| {
                let r = d.call.indices.unwrap();
                (r.first_index, r.num_indices)
            })
            .collect();
        assert_eq!(spans, vec![(0, 6), (6, 6), (12, 12)]);
        // The flushed index bytes cover exactly each command's span.
        assert_eq!(log.draws[2].indices.len(), 24);
        // All commands share the one vertex upload.
        for draw in &log.draws {
            let v = draw.call.vertices.unwrap();
            assert_eq!((v.start_vertex, v.num_vertices), (0, 4));
        }
    }

    #[test]
    fn callbacks_advance_the_offset_without_drawing() {
        let _guard = serial();
        let (mut ctx, log) = recording_context();
        let program = gui_program(&mut ctx);
        let renderer = DrawListRenderer::new(&mut ctx, ViewId::new(0), program).unwrap();

        let mut list = list_with_counts(&[6, 6, 6]);
        list.commands[1] = DrawCommand::Callback { element_count: 6 };
        renderer.render(&mut ctx, &list).unwrap();
        ctx.frame(false);

        let log = log.borrow();
        let spans: Vec<(u32, u32)> = log
            .draws
            .iter()
            .map(|d| {
                let r = d.call.indices.unwrap();
                (r.first_index, r.num_indices)
            })
            .collect();
        assert_eq!(spans, vec![(0, 6), (12, 6)]);
    }

    #[test]
    fn empty_commands_are_skipped() {
        let _guard = serial();
        let (mut ctx, log) = recording_context();
        let program = gui_program(&mut ctx);
        let renderer = DrawListRenderer::new(&mut ctx, ViewId::new(0), program).unwrap();

        renderer.render(&mut ctx, &list_with_counts(&[6, 0, 6])).unwrap();
        ctx.frame(false);
        assert_eq!(log.borrow().draws.len(), 2);
    }

    #[test]
    fn untextured_commands_use_the_white_texture() {
        let _guard = serial();
        let (mut ctx, log) = recording_context();
        let program = gui_program(&mut ctx);
        let renderer = DrawListRenderer::new(&mut ctx, ViewId::new(0), program).unwrap();

        renderer.render(&mut ctx, &list_with_counts(&[6])).unwrap();
        ctx.frame(false);

        let log = log.borrow();
        let binding = log.draws[0].call.textures[0].unwrap();
        assert_eq!(binding.texture, renderer.white_texture);
        assert_eq!(binding.uniform, renderer.sampler);
    }

    #[test]
    fn translated_draws_blend_and_scissor() {
        let _guard = serial();
        let (mut ctx, log) = recording_context();
        let program = gui_program(&mut ctx);
        let renderer = DrawListRenderer::new(&mut ctx, ViewId::new(0), program).unwrap();

        renderer.render(&mut ctx, &list_with_counts(&[6])).unwrap();
        ctx.frame(false);

        let log = log.borrow();
        let call = &log.draws[0].call;
        assert_eq!(call.state.blend_src_rgb(), Some(BlendFactor::SrcAlpha));
        assert_eq!(call.state.blend_dst_rgb(), Some(BlendFactor::InvSrcAlpha));
        assert!(!call.state.write_depth());
        let scissor = call.scissor.unwrap();
        assert_eq!((scissor.width, scissor.height), (64, 64));
    }

    #[test]
    fn exhausted_budget_drops_the_list() {
        let _guard = serial();
        let backend = crate::backend::RecordingBackend::new();
        let log = backend.log();
        let params = InitParams {
            transient_budget: 64,
            ..InitParams::default()
        };
        let mut ctx = Context::init(params, Box::new(backend)).unwrap();
        let program = gui_program(&mut ctx);
        let renderer = DrawListRenderer::new(&mut ctx, ViewId::new(0), program).unwrap();

        let mut list = DrawList::new();
        for i in 0..32 {
            list.push_quad([0.0, 0.0], [i as f32, i as f32], 0xffff_ffff, None);
        }
        renderer.render(&mut ctx, &list).unwrap();
        ctx.frame(false);
        assert!(log.borrow().draws.is_empty());
    }
}
