use paramstore::Rgb;

use crate::field::GrayField;
use crate::raster::Raster;
use crate::types::ColorMap;

impl ColorMap {
    /// Maps one grayscale value through the stop table: the first stop pair
    /// bracketing the value is selected and each RGB channel interpolates
    /// linearly across it.
    pub fn remap_gray(&self, gray: u8) -> Rgb {
        for pair in self.stops().windows(2) {
            let lo = pair[0];
            let hi = pair[1];
            if gray >= lo.threshold && gray <= hi.threshold {
                let span = (hi.threshold - lo.threshold) as f32;
                let t = if span > 0.0 {
                    (gray - lo.threshold) as f32 / span
                } else {
                    0.0
                };
                return Rgb::new(
                    lerp_channel(lo.color.r, hi.color.r, t),
                    lerp_channel(lo.color.g, hi.color.g, t),
                    lerp_channel(lo.color.b, hi.color.b, t),
                );
            }
        }
        Rgb::BLACK
    }

    /// Colorizes the grayscale field into an RGBA raster.
    ///
    /// Cells with zero grayscale are left transparent black, keeping only
    /// their accumulated coverage in the alpha channel, so an unpainted
    /// field round-trips unchanged.
    pub fn apply(&self, field: &GrayField) -> Raster {
        let grid = field.grid();
        let mut raster = Raster::new(grid);
        for y in 0..grid.cells_y {
            for x in 0..grid.cells_x {
                let gray = field.value_at(x, y).clamp(0.0, 255.0).round() as u8;
                let alpha = (field.alpha_at(x, y).clamp(0.0, 1.0) * 255.0).round() as u8;
                if gray > 0 {
                    let color = self.remap_gray(gray);
                    raster.put_pixel(x, y, [color.r, color.g, color.b, alpha]);
                } else {
                    raster.put_pixel(x, y, [0, 0, 0, alpha]);
                }
            }
        }
        raster
    }
}

fn lerp_channel(from: u8, to: u8, t: f32) -> u8 {
    (from as f32 + (to as f32 - from as f32) * t).round() as u8
}
