//! Windowed demo: brings up a context over the noop backend and pushes a
//! small GUI draw list through the translator every frame.

use anyhow::{Context as _, Result};
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use kiln_gfx::backend::NoopBackend;
use kiln_gfx::context::{Context, InitParams, PlatformData};
use kiln_gfx::draw_list::DrawList;
use kiln_gfx::flags::{ClearFlags, DebugFlags, RendererType, ResetFlags, TextureFormat, ViewMode};
use kiln_gfx::logging::init_logging;
use kiln_gfx::translate::DrawListRenderer;
use kiln_gfx::view::ViewId;

const GUI_VIEW: ViewId = ViewId::new(0);

fn main() -> Result<()> {
    init_logging(None);

    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut app = Demo::default();
    event_loop
        .run_app(&mut app)
        .context("winit event loop terminated with error")?;
    Ok(())
}

/// Context plus the GUI fixtures, created once the window exists.
struct Gfx {
    ctx: Context,
    gui: DrawListRenderer,
    list: DrawList,
}

impl Gfx {
    fn new(window: &Window) -> Result<Self> {
        let size = window.inner_size();
        let handle = window
            .window_handle()
            .context("failed to get native window handle")?
            .as_raw();

        let params = InitParams {
            width: size.width,
            height: size.height,
            renderer: RendererType::Noop,
            reset: ResetFlags::VSYNC,
            platform: Some(PlatformData::new(handle)),
            ..InitParams::default()
        };
        let mut ctx = Context::init(params, Box::new(NoopBackend::new()))
            .context("failed to initialize rendering context")?;

        ctx.set_view_clear(
            GUI_VIEW,
            ClearFlags::COLOR | ClearFlags::DEPTH,
            // Cornflower blue.
            0x6495_edff,
            1.0,
            0,
        );
        ctx.set_view_mode(GUI_VIEW, ViewMode::Sequential);
        ctx.set_debug(DebugFlags::STATS | DebugFlags::TEXT);

        // The noop backend discards bytecode; placeholders stand in for
        // real compiled shaders.
        let vs = ctx.create_shader(&[0x01])?;
        let fs = ctx.create_shader(&[0x02])?;
        let program = ctx.create_program(vs, fs, true)?;
        let gui = DrawListRenderer::new(&mut ctx, GUI_VIEW, program)?;

        Ok(Self {
            ctx,
            gui,
            list: DrawList::new(),
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.ctx.reset(width, height, ResetFlags::VSYNC, TextureFormat::Bgra8);
    }

    fn render(&mut self, width: u32, height: u32) -> Result<()> {
        self.ctx
            .set_view_rect(GUI_VIEW, 0, 0, width as u16, height as u16);
        self.ctx.touch(GUI_VIEW);

        self.list.clear();
        self.list
            .push_quad([40.0, 40.0], [240.0, 140.0], 0xcc33_33ff, None);
        self.list
            .push_quad([120.0, 100.0], [420.0, 260.0], 0x3333_ccaa, None);
        self.gui.render(&mut self.ctx, &self.list)?;

        let frame = self.ctx.frame(false);
        log::trace!("frame {frame} submitted");
        Ok(())
    }
}

#[derive(Default)]
struct Demo {
    window: Option<Window>,
    gfx: Option<Gfx>,
}

impl ApplicationHandler for Demo {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("kiln demo")
            .with_inner_size(LogicalSize::new(800.0, 600.0));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => window,
            Err(e) => {
                log::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match Gfx::new(&window) {
            Ok(gfx) => self.gfx = Some(gfx),
            Err(e) => {
                log::error!("failed to bring up rendering: {e:#}");
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.gfx = None;
                self.window = None;
                event_loop.exit();
            }

            WindowEvent::KeyboardInput { event, .. }
                if event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                self.gfx = None;
                self.window = None;
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(gfx) = &mut self.gfx {
                    gfx.resize(size.width, size.height);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                let Some(window) = &self.window else { return };
                let size = window.inner_size();
                if let Some(gfx) = &mut self.gfx {
                    if let Err(e) = gfx.render(size.width, size.height) {
                        log::error!("frame failed: {e:#}");
                        event_loop.exit();
                    }
                }
            }

            _ => {}
        }
    }
}
