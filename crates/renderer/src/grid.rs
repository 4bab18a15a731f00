use crate::types::SurfaceMetrics;

/// Breakpoint table mapping container logical width to horizontal cell
/// count in pixelated mode. Wider containers get more cells.
const BREAKPOINTS: [(u32, u32); 5] = [(2160, 87), (1560, 77), (1160, 67), (536, 37), (0, 27)];

/// Cell count floor on the vertical axis in pixelated mode.
const MIN_CELLS_Y: u32 = 8;

/// Raster dimensions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridSize {
    pub cells_x: u32,
    pub cells_y: u32,
}

impl GridSize {
    pub fn new(cells_x: u32, cells_y: u32) -> Self {
        Self { cells_x, cells_y }
    }

    pub fn is_empty(&self) -> bool {
        self.cells_x == 0 || self.cells_y == 0
    }

    pub fn len(&self) -> usize {
        self.cells_x as usize * self.cells_y as usize
    }
}

/// Chooses the raster resolution for the given surface.
///
/// Pixelated mode reads the breakpoint table and derives the vertical count
/// from the surface aspect ratio; otherwise the raster matches the physical
/// pixel dimensions. A zero-sized surface yields an empty grid so resizes
/// during window setup or minimization degrade to a no-op render.
pub fn grid_for(metrics: &SurfaceMetrics, pixelated: bool) -> GridSize {
    if metrics.is_empty() {
        return GridSize::default();
    }

    if !pixelated {
        return GridSize::new(metrics.physical_width, metrics.physical_height);
    }

    let cells_x = cell_count_for_width(metrics.logical_width());
    let aspect = metrics.physical_height as f32 / metrics.physical_width as f32;
    let cells_y = ((cells_x as f32 * aspect).round() as u32).max(MIN_CELLS_Y);
    GridSize::new(cells_x, cells_y)
}

fn cell_count_for_width(width: u32) -> u32 {
    for (min_width, cells) in BREAKPOINTS {
        if width >= min_width {
            return cells;
        }
    }
    27
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(width: u32, height: u32) -> SurfaceMetrics {
        SurfaceMetrics::new(width, height, 1.0)
    }

    #[test]
    fn breakpoints_pick_wider_tables_for_wider_surfaces() {
        assert_eq!(grid_for(&metrics(320, 240), true).cells_x, 27);
        assert_eq!(grid_for(&metrics(536, 400), true).cells_x, 37);
        assert_eq!(grid_for(&metrics(1280, 720), true).cells_x, 67);
        assert_eq!(grid_for(&metrics(1600, 900), true).cells_x, 77);
        assert_eq!(grid_for(&metrics(2560, 1440), true).cells_x, 87);
    }

    #[test]
    fn breakpoints_use_logical_width_not_physical() {
        // 2560 physical at 2x scale is 1280 logical, which lands in the
        // 1160 bucket rather than the 2160 one.
        let metrics = SurfaceMetrics::new(2560, 1440, 2.0);
        assert_eq!(grid_for(&metrics, true).cells_x, 67);
    }

    #[test]
    fn vertical_count_follows_aspect_ratio() {
        let grid = grid_for(&metrics(1280, 720), true);
        assert_eq!(grid.cells_x, 67);
        assert_eq!(grid.cells_y, (67.0_f32 * 720.0 / 1280.0).round() as u32);
    }

    #[test]
    fn vertical_count_never_drops_below_the_floor() {
        let grid = grid_for(&metrics(1280, 20), true);
        assert_eq!(grid.cells_y, 8);
    }

    #[test]
    fn non_pixelated_matches_physical_dimensions() {
        let grid = grid_for(&metrics(800, 600), false);
        assert_eq!(grid, GridSize::new(800, 600));
    }

    #[test]
    fn zero_sized_surface_yields_an_empty_grid() {
        assert!(grid_for(&metrics(0, 720), true).is_empty());
        assert!(grid_for(&metrics(1280, 0), true).is_empty());
        assert!(grid_for(&metrics(0, 0), false).is_empty());
    }
}
