//! Spiral ribbon viewer.
//!
//! Generates the default spiral once, uploads it, and spins it slowly.
//! Build with `--features tight-spiral` for the tighter preset.
//! Escape closes the window.

mod view;

use anyhow::Result;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use spiral_engine::core::{App, AppControl, FrameCtx};
use spiral_engine::device::GpuInit;
use spiral_engine::logging::{LoggingConfig, init_logging};
use spiral_engine::paint::Color;
use spiral_engine::render::solid::SolidRenderer;
use spiral_engine::window::{Runtime, RuntimeConfig};
use spiral_mesh::{Mesh, SpiralMesh};

const BACKGROUND: Color = Color::new(0.06, 0.06, 0.08, 1.0);
const FACE_COLOR: Color = Color::new(0.85, 0.45, 0.15, 1.0);
const EDGE_COLOR: Color = Color::new(1.0, 0.9, 0.7, 1.0);

/// Mesh extent captured at load time; the CPU mesh itself is dropped.
#[derive(Copy, Clone)]
struct Framing {
    dimensions: glam::Vec4,
    center: glam::Vec4,
}

#[derive(Default)]
struct Viewer {
    renderer: Option<SolidRenderer>,
    framing: Option<Framing>,
}

impl Viewer {
    fn draw(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        let angle = ctx.time.elapsed * view::SPIN_RATE;
        let (renderer, framing) = (&mut self.renderer, &mut self.framing);
        let mut setup_error = None;

        let control = ctx.render(|rctx, target| {
            if renderer.is_none() {
                match create_renderer(rctx) {
                    Ok((r, f)) => {
                        *renderer = Some(r);
                        *framing = Some(f);
                    }
                    Err(e) => {
                        setup_error = Some(e);
                        return;
                    }
                }
            }
            let (Some(renderer), Some(framing)) = (renderer.as_mut(), *framing) else {
                return;
            };

            renderer.clear_frame(target, BACKGROUND);
            renderer.set_transform(view::fit_transform(
                framing.dimensions,
                framing.center,
                rctx.viewport.aspect(),
                angle,
            ));
            renderer.display_faces(rctx, target, FACE_COLOR);
            renderer.display_edges(rctx, target, EDGE_COLOR);
        });

        match setup_error {
            Some(e) => Err(e.context("failed to set up renderer")),
            None => Ok(control),
        }
    }
}

fn create_renderer(rctx: &spiral_engine::render::RenderCtx<'_>) -> Result<(SolidRenderer, Framing)> {
    let mut renderer = SolidRenderer::new(rctx)?;

    let mesh = SpiralMesh::new();
    log::info!("spiral preset: {:?}", mesh.params());
    renderer.load_mesh(rctx, &mesh)?;

    let framing = Framing {
        dimensions: mesh.dimensions(),
        center: mesh.center(),
    };
    Ok((renderer, framing))
}

impl App for Viewer {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        self.draw(ctx)
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "spiral".to_string(),
        ..Default::default()
    };

    Runtime::run(config, GpuInit::default(), Viewer::default())
}
