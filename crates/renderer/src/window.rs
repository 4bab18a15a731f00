use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget};
use winit::window::{Window, WindowBuilder};

use paramstore::{AnimationState, BlobStore, MotionPreference, ParamPatch, Rgb};

use crate::controls::{command_for_key, Command, ControlTarget};
use crate::field::render_field;
use crate::grid::{grid_for, GridSize};
use crate::runtime::{FrameLimiter, RenderPolicy};
use crate::types::{ColorMap, RendererConfig, SurfaceMetrics};

/// Opens the presentation window and drives the event loop.
///
/// One redraw is in flight at a time: `AboutToWait` requests the next frame
/// only while animating and visible, and `RedrawRequested` ticks the store
/// and repaints. Pausing, occlusion, or a still policy leaves the loop
/// waiting on events, so no frame requests leak while nothing moves.
pub(crate) fn run_windowed(config: RendererConfig) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to initialize event loop")?;
    let (width, height) = config.surface_size;
    let window = WindowBuilder::new()
        .with_title("blobwall")
        .with_inner_size(PhysicalSize::new(width.max(1), height.max(1)))
        .build(&event_loop)
        .context("failed to create presentation window")?;

    let mut state = WindowState::new(&window, &config)?;
    window.request_redraw();

    event_loop
        .run(|event, elwt| match event {
            Event::WindowEvent { window_id, event } if window_id == state.window.id() => {
                match event {
                    WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
                    WindowEvent::Resized(new_size) => state.resize(new_size),
                    WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                        state.rescale(scale_factor)
                    }
                    WindowEvent::Occluded(occluded) => state.set_occluded(occluded),
                    WindowEvent::KeyboardInput { event, .. } => {
                        if event.state == ElementState::Pressed {
                            if let Some(command) =
                                command_for_key(&event.logical_key, event.repeat)
                            {
                                if command == Command::Quit {
                                    elwt.exit();
                                } else {
                                    state.apply(command);
                                }
                            }
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        if let Err(err) = state.render_frame() {
                            tracing::error!("frame render failed: {err:#}");
                            elwt.exit();
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => state.schedule(elwt),
            _ => {}
        })
        .map_err(|err| anyhow!("event loop error: {err}"))
}

/// Everything the event loop mutates between frames.
struct WindowState<'win> {
    window: &'win Window,
    pixels: Pixels<'win>,
    store: BlobStore,
    color_map: ColorMap,
    startup_color_map: ColorMap,
    rng: StdRng,
    metrics: SurfaceMetrics,
    grid: GridSize,
    limiter: FrameLimiter,
    target: ControlTarget,
    occluded: bool,
    params_dirty: Rc<Cell<bool>>,
    still_state: Option<AnimationState>,
}

impl<'win> WindowState<'win> {
    fn new(window: &'win Window, config: &RendererConfig) -> Result<Self> {
        let size = window.inner_size();
        let metrics = SurfaceMetrics::new(size.width, size.height, window.scale_factor());
        let grid = grid_for(&metrics, config.params.pixelated);

        let surface_texture = SurfaceTexture::new(
            metrics.physical_width.max(1),
            metrics.physical_height.max(1),
            window,
        );
        let pixels = PixelsBuilder::new(grid.cells_x.max(1), grid.cells_y.max(1), surface_texture)
            .clear_color(background_clear_color(&config.params.bg_color))
            .build()
            .map_err(|err| anyhow!("failed to create presentation framebuffer: {err}"))?;

        let mut store = BlobStore::with_params(config.params.clone(), config.seed);
        store.set_motion_preference(config.motion);
        if config.randomize_at_start {
            store.randomize();
        }

        let params_dirty = Rc::new(Cell::new(false));
        let dirty = Rc::clone(&params_dirty);
        store.subscribe(move |_| dirty.set(true));

        let (limiter, still_state) = match &config.policy {
            RenderPolicy::Animate { target_fps } => (FrameLimiter::new(*target_fps), None),
            RenderPolicy::Still { time } => (
                FrameLimiter::new(None),
                Some(AnimationState::at_time(time.unwrap_or(0.0))),
            ),
            RenderPolicy::Export { .. } => {
                // Export runs headless; the window path never sees it.
                (FrameLimiter::new(None), None)
            }
        };

        info!(
            width = metrics.physical_width,
            height = metrics.physical_height,
            cells_x = grid.cells_x,
            cells_y = grid.cells_y,
            pixelated = config.params.pixelated,
            "presentation surface ready"
        );

        Ok(Self {
            window,
            pixels,
            store,
            color_map: config.color_map.clone(),
            startup_color_map: config.color_map.clone(),
            rng: StdRng::seed_from_u64(config.seed.wrapping_add(1)),
            metrics,
            grid,
            limiter,
            target: ControlTarget::default(),
            occluded: false,
            params_dirty,
            still_state,
        })
    }

    fn animating(&self) -> bool {
        self.still_state.is_none() && !self.store.is_paused() && !self.occluded
    }

    /// Decides whether another frame should be requested once the loop is
    /// about to go idle again.
    fn schedule(&mut self, elwt: &EventLoopWindowTarget<()>) {
        if self.animating() {
            let now = Instant::now();
            if self.limiter.ready_for_frame(now) {
                self.window.request_redraw();
                elwt.set_control_flow(ControlFlow::Wait);
            } else if let Some(deadline) = self.limiter.next_deadline() {
                elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
            }
        } else {
            // Frozen surface: repaint only when parameters changed under it.
            if self.params_dirty.get() {
                self.window.request_redraw();
            }
            elwt.set_control_flow(ControlFlow::Wait);
        }
    }

    /// Ticks the clock, regenerates the raster, and presents it.
    fn render_frame(&mut self) -> Result<()> {
        let now = Instant::now();
        if self.still_state.is_none() {
            self.store.tick(now);
        }
        let params = self.store.params().clone();
        let state = self.still_state.unwrap_or_else(|| self.store.state());

        let grid = grid_for(&self.metrics, params.pixelated);
        if grid != self.grid {
            debug!(
                cells_x = grid.cells_x,
                cells_y = grid.cells_y,
                pixelated = params.pixelated,
                "raster grid changed"
            );
            self.grid = grid;
            if !grid.is_empty() {
                self.pixels
                    .resize_buffer(grid.cells_x, grid.cells_y)
                    .map_err(|err| anyhow!("framebuffer resize failed: {err}"))?;
            }
        }

        self.params_dirty.set(false);
        if grid.is_empty() {
            return Ok(());
        }

        let field = render_field(&params, &state, grid);
        let raster = self.color_map.apply(&field);
        self.pixels.frame_mut().copy_from_slice(raster.data());
        self.pixels
            .render()
            .map_err(|err| anyhow!("presentation failed: {err}"))?;
        self.limiter.mark_rendered(now);
        Ok(())
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.metrics =
            SurfaceMetrics::new(size.width, size.height, self.metrics.scale_factor);
        if !self.metrics.is_empty() {
            if let Err(err) = self.pixels.resize_surface(size.width, size.height) {
                warn!("surface resize failed: {err}");
            }
        }
        debug!(
            width = size.width,
            height = size.height,
            "surface resized"
        );
        self.window.request_redraw();
    }

    fn rescale(&mut self, scale_factor: f64) {
        self.metrics.scale_factor = scale_factor;
        debug!(scale_factor, "scale factor changed");
        self.window.request_redraw();
    }

    fn set_occluded(&mut self, occluded: bool) {
        self.occluded = occluded;
        debug!(occluded, "visibility changed");
        if !occluded {
            // Drop the hidden interval from the next delta instead of
            // replaying it as one giant jump.
            self.store.rebase();
            self.limiter.reset();
            self.window.request_redraw();
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::TogglePause => {
                self.store.toggle_pause();
                info!(paused = self.store.is_paused(), "pause toggled");
                if !self.store.is_paused() {
                    self.window.request_redraw();
                }
            }
            Command::Randomize => {
                self.store.randomize();
                info!("parameters randomized");
            }
            Command::RandomizeColors => {
                self.color_map = self.color_map.randomize_colors(&mut self.rng);
                self.params_dirty.set(true);
                info!("gradient colors randomized");
            }
            Command::ResetDefaults => {
                self.color_map = self.startup_color_map.clone();
                self.store.reset_to_defaults();
                info!("parameters reset to defaults");
            }
            Command::TogglePixelated => {
                let pixelated = !self.store.params().pixelated;
                self.store.update(ParamPatch {
                    pixelated: Some(pixelated),
                    ..ParamPatch::default()
                });
                info!(pixelated, "pixelation toggled");
            }
            Command::ToggleReducedMotion => {
                let motion = match self.store.motion_preference() {
                    MotionPreference::Full => MotionPreference::Reduced,
                    MotionPreference::Reduced => MotionPreference::Full,
                };
                self.store.set_motion_preference(motion);
                info!(?motion, "motion preference changed");
            }
            Command::CycleTarget => {
                self.target = self.target.next();
                info!(target = self.target.label(), "nudge target selected");
            }
            Command::NudgeUp => {
                let patch = self.target.nudge(self.store.params(), 1.0);
                self.store.update(patch);
            }
            Command::NudgeDown => {
                let patch = self.target.nudge(self.store.params(), -1.0);
                self.store.update(patch);
            }
            Command::Quit => {}
        }
    }
}

/// Window clear color behind the blob; a malformed background string falls
/// back to black rather than failing presentation setup.
fn background_clear_color(hex: &str) -> pixels::wgpu::Color {
    let rgb = Rgb::from_hex(hex).unwrap_or(Rgb::BLACK);
    pixels::wgpu::Color {
        r: rgb.r as f64 / 255.0,
        g: rgb.g as f64 / 255.0,
        b: rgb.b as f64 / 255.0,
        a: 1.0,
    }
}
