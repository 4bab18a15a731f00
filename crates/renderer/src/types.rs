use paramstore::{BlobParams, MotionPreference, Rgb};

use crate::runtime::RenderPolicy;

/// One stop of the grayscale-to-color gradient map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorStop {
    /// Grayscale value this stop anchors, 0–255.
    pub threshold: u8,
    pub color: Rgb,
}

/// Piecewise-linear gradient map from grayscale intensity to RGB.
///
/// Replaces the original's implicit dependency on document-level styling:
/// the surrounding application pushes a concrete stop table in and updates
/// it explicitly when its palette changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    stops: Vec<ColorStop>,
}

impl ColorMap {
    /// Builds a map from `(threshold, color)` pairs. Callers are expected
    /// to provide stops in ascending threshold order spanning 0–255; the
    /// configuration layer validates this before anything reaches here.
    pub fn new(stops: impl IntoIterator<Item = (u8, Rgb)>) -> Self {
        Self {
            stops: stops
                .into_iter()
                .map(|(threshold, color)| ColorStop { threshold, color })
                .collect(),
        }
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Redraws every stop color except the base stop, keeping thresholds.
    /// The base stays put so unlit cells remain anchored to the background.
    pub fn randomize_colors(&self, rng: &mut impl rand::Rng) -> ColorMap {
        Self {
            stops: self
                .stops
                .iter()
                .enumerate()
                .map(|(index, stop)| ColorStop {
                    threshold: stop.threshold,
                    color: if index == 0 {
                        stop.color
                    } else {
                        Rgb::new(rng.gen(), rng.gen(), rng.gen())
                    },
                })
                .collect(),
        }
    }
}

impl Default for ColorMap {
    /// The documented ramp: black → dark green → yellow-green → magenta.
    fn default() -> Self {
        Self::new([
            (0, Rgb::BLACK),
            (20, Rgb::new(0x22, 0x6b, 0x22)),
            (150, Rgb::new(0xac, 0xc4, 0x24)),
            (255, Rgb::new(0xff, 0x00, 0xfc)),
        ])
    }
}

/// Physical size and scale factor of the presentation surface.
///
/// The breakpoint table is keyed by logical width (the window-system
/// equivalent of CSS pixels); the scale factor applies once to the
/// presentation surface and never to the low-resolution raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMetrics {
    pub physical_width: u32,
    pub physical_height: u32,
    pub scale_factor: f64,
}

impl SurfaceMetrics {
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        Self {
            physical_width,
            physical_height,
            scale_factor,
        }
    }

    pub fn logical_width(&self) -> u32 {
        if self.scale_factor > 0.0 {
            (self.physical_width as f64 / self.scale_factor).round() as u32
        } else {
            self.physical_width
        }
    }

    pub fn is_empty(&self) -> bool {
        self.physical_width == 0 || self.physical_height == 0
    }
}

/// Immutable configuration passed to the renderer at start-up.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Window or export surface size in physical pixels.
    pub surface_size: (u32, u32),
    /// Initial parameter set (config file overrides already applied).
    pub params: BlobParams,
    /// Gradient map used by the remap pass.
    pub color_map: ColorMap,
    /// High-level render behaviour requested by the caller.
    pub policy: RenderPolicy,
    /// Reduced-motion preference at start-up; toggleable at runtime.
    pub motion: MotionPreference,
    /// Seed for the store's randomize draws.
    pub seed: u64,
    /// Draw a randomized parameter set before the first frame.
    pub randomize_at_start: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: (1280, 720),
            params: BlobParams::defaults(),
            color_map: ColorMap::default(),
            policy: RenderPolicy::default(),
            motion: MotionPreference::Full,
            seed: 0,
            randomize_at_start: false,
        }
    }
}
