use std::f32::consts::TAU;

use paramstore::{AnimationState, BlobParams};

use crate::grid::GridSize;

const NUM_BUBBLES: usize = 5;
const LAYERS: u32 = 4;

/// One stop of a radial falloff: fractional offset from the center,
/// grayscale value, and alpha.
#[derive(Debug, Clone, Copy)]
struct FalloffStop {
    offset: f32,
    gray: f32,
    alpha: f32,
}

/// Low-resolution grayscale field the metaballs are painted into.
///
/// Gradients blend additively: overlapping bubbles accumulate brightness,
/// clamped at deposit time so the field never exceeds the display range.
/// Coverage accumulates separately so the remap pass can carry it into the
/// output alpha channel.
#[derive(Debug, Clone)]
pub struct GrayField {
    grid: GridSize,
    value: Vec<f32>,
    alpha: Vec<f32>,
}

impl GrayField {
    pub fn new(grid: GridSize) -> Self {
        Self {
            grid,
            value: vec![0.0; grid.len()],
            alpha: vec![0.0; grid.len()],
        }
    }

    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Accumulated grayscale value at a cell, 0–255.
    pub fn value_at(&self, x: u32, y: u32) -> f32 {
        self.value[self.index(x, y)]
    }

    /// Accumulated coverage at a cell, 0–1.
    pub fn alpha_at(&self, x: u32, y: u32) -> f32 {
        self.alpha[self.index(x, y)]
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.grid.cells_x as usize + x as usize
    }

    /// Paints one radial gradient additively. Degenerate geometry (empty
    /// radius, non-finite center, off-grid extent) is skipped rather than
    /// allowed to corrupt the raster.
    fn paint_radial(&mut self, cx: f32, cy: f32, radius: f32, stops: &[FalloffStop]) {
        if !radius.is_finite() || radius <= 0.0 || !cx.is_finite() || !cy.is_finite() {
            return;
        }

        let width = self.grid.cells_x as i64;
        let height = self.grid.cells_y as i64;
        let x0 = ((cx - radius).floor() as i64).max(0);
        let x1 = ((cx + radius).ceil() as i64).min(width - 1);
        let y0 = ((cy - radius).floor() as i64).max(0);
        let y1 = ((cy + radius).ceil() as i64).min(height - 1);
        if x0 > x1 || y0 > y1 {
            return;
        }

        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let t = (dx * dx + dy * dy).sqrt() / radius;
                if t > 1.0 {
                    continue;
                }
                let (gray, alpha) = sample_falloff(stops, t);
                if alpha <= 0.0 {
                    continue;
                }
                let idx = y as usize * width as usize + x as usize;
                self.value[idx] = (self.value[idx] + gray * alpha).min(255.0);
                self.alpha[idx] = (self.alpha[idx] + alpha).min(1.0);
            }
        }
    }
}

fn sample_falloff(stops: &[FalloffStop], t: f32) -> (f32, f32) {
    for pair in stops.windows(2) {
        if t >= pair[0].offset && t <= pair[1].offset {
            let span = pair[1].offset - pair[0].offset;
            let s = if span > 0.0 {
                (t - pair[0].offset) / span
            } else {
                0.0
            };
            return (
                pair[0].gray + (pair[1].gray - pair[0].gray) * s,
                pair[0].alpha + (pair[1].alpha - pair[0].alpha) * s,
            );
        }
    }
    match stops.last() {
        Some(stop) => (stop.gray, stop.alpha),
        None => (0.0, 0.0),
    }
}

/// Generates the grayscale metaball field for one snapshot.
///
/// Five bubbles orbit the animated center with wobble-driven positional
/// offsets; each is painted as four concentric soft layers, outer layers
/// larger and fainter. A specular highlight orbits the center on top.
pub fn render_field(params: &BlobParams, state: &AnimationState, grid: GridSize) -> GrayField {
    let mut field = GrayField::new(grid);
    if grid.is_empty() {
        return field;
    }

    let time = state.time;
    let center_x = state.cx * grid.cells_x as f32;
    let center_y = state.cy * grid.cells_y as f32;
    // Out-of-range radii are accepted by the store; negative clamps to zero
    // here, which paints nothing.
    let base_radius = params.radius.max(0.0) * grid.cells_x.min(grid.cells_y) as f32;
    if !base_radius.is_finite() || base_radius <= 0.0 {
        return field;
    }

    let wobble_strength = params.wobble * base_radius * 0.75;

    for i in 0..NUM_BUBBLES {
        let angle = (i as f32 / NUM_BUBBLES as f32) * TAU + time * 1.5;
        let offset1 = (angle * 1.3 + time * 1.8).sin() * wobble_strength;
        let offset2 = (angle * 1.7 - time * 1.2).cos() * wobble_strength * 0.7;

        let bx = center_x + offset1;
        let by = center_y + offset2;
        let br = base_radius * (0.7 + (time * 0.8 + i as f32).sin() * 0.15);

        for layer in (1..=LAYERS).rev() {
            let t = layer as f32 / LAYERS as f32;
            let radius = br * (0.9 + t * 0.9);
            let gray = (60.0 + t * 100.0).round();
            let alpha = ((0.06 + t * 0.18) * params.intensity).clamp(0.0, 1.0);
            field.paint_radial(
                bx,
                by,
                radius,
                &[
                    FalloffStop {
                        offset: 0.0,
                        gray,
                        alpha,
                    },
                    FalloffStop {
                        offset: 0.7,
                        gray,
                        alpha: alpha * 0.5,
                    },
                    FalloffStop {
                        offset: 1.0,
                        gray: 0.0,
                        alpha: 0.0,
                    },
                ],
            );
        }
    }

    let highlight_angle = time * 1.2;
    let hx = center_x + highlight_angle.cos() * base_radius * 0.6;
    let hy = center_y + highlight_angle.sin() * base_radius * 0.6;
    field.paint_radial(
        hx,
        hy,
        base_radius * 0.4,
        &[
            FalloffStop {
                offset: 0.0,
                gray: 220.0,
                alpha: (0.25 * params.intensity).clamp(0.0, 1.0),
            },
            FalloffStop {
                offset: 0.5,
                gray: 180.0,
                alpha: (0.12 * params.intensity).clamp(0.0, 1.0),
            },
            FalloffStop {
                offset: 1.0,
                gray: 0.0,
                alpha: 0.0,
            },
        ],
    );

    field
}
