//! Raster renderer for the blobwall metaball surface.
//!
//! The module glues the parameter store, the CPU metaball rasterizer, and
//! the windowed presentation together. The overall flow is:
//!
//! ```text
//!   CLI / blobwall
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ WindowState ──▶ winit event loop ──▶ render_frame()
//!          │                                      │
//!          │                                      ├─▶ BlobStore::tick()
//!          │                                      ├─▶ render_field() ─▶ ColorMap::apply()
//!          │                                      └─▶ pixels framebuffer (nearest upscale)
//!          └──▶ export (headless still frame to disk)
//! ```
//!
//! Each frame renders the grayscale metaball field at the grid resolution
//! picked by the breakpoint table, remaps it through the gradient color
//! map, and hands the low-resolution raster to the `pixels` framebuffer,
//! which upscales without smoothing so pixelated mode keeps hard cell
//! edges. The export policy drives the same pipeline headless and writes
//! the frame with `image` instead of presenting it.

mod controls;
mod export;
mod field;
mod gradient;
mod grid;
mod raster;
mod runtime;
mod types;
mod window;

use anyhow::Result;

pub use field::{render_field, GrayField};
pub use grid::{grid_for, GridSize};
pub use raster::Raster;
pub use runtime::{ExportFormat, FrameLimiter, RenderPolicy};
pub use types::{ColorMap, ColorStop, RendererConfig, SurfaceMetrics};

/// High-level entry point that owns the chosen configuration.
///
/// The heavy lifting lives inside the window and export paths; `Renderer`
/// simply selects the presentation path and forwards the request.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Launches the renderer under its configured policy.
    ///
    /// Animate and still policies open the presentation window; the export
    /// policy renders headless and returns once the file is written.
    /// Initialization failures (no event loop, no framebuffer) surface as
    /// errors rather than panics so the host can degrade gracefully.
    pub fn run(&mut self) -> Result<()> {
        match self.config.policy.clone() {
            RenderPolicy::Export { time, path, format } => {
                export::run_export(&self.config, time, &path, format)?;
                Ok(())
            }
            RenderPolicy::Animate { .. } | RenderPolicy::Still { .. } => {
                window::run_windowed(self.config.clone())
            }
        }
    }
}
