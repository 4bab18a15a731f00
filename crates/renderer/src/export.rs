use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;

use paramstore::{AnimationState, BlobStore};

use crate::field::render_field;
use crate::grid::grid_for;
use crate::runtime::ExportFormat;
use crate::types::{RendererConfig, SurfaceMetrics};

/// Renders one frame at a fixed timestamp and writes it to disk.
///
/// The headless path mirrors the windowed pipeline: grid sizing, field
/// generation, gradient remap, then a nearest-neighbor upscale to the
/// export surface. The background stays transparent; compositing is the
/// consumer's business.
pub(crate) fn run_export(
    config: &RendererConfig,
    time: Option<f32>,
    path: &Path,
    format: ExportFormat,
) -> Result<PathBuf> {
    let (width, height) = config.surface_size;
    if width == 0 || height == 0 {
        bail!("export dimensions must be greater than zero");
    }

    let params = if config.randomize_at_start {
        let mut store = BlobStore::with_params(config.params.clone(), config.seed);
        store.randomize();
        store.params().clone()
    } else {
        config.params.clone()
    };

    let metrics = SurfaceMetrics::new(width, height, 1.0);
    let grid = grid_for(&metrics, params.pixelated);
    let state = AnimationState::at_time(time.unwrap_or(0.0));

    let field = render_field(&params, &state, grid);
    let raster = config.color_map.apply(&field);
    let scaled = raster.scale_nearest(width, height);

    let image = image::RgbaImage::from_raw(width, height, scaled.into_data())
        .ok_or_else(|| anyhow!("raster dimensions do not match the export surface"))?;
    let image_format = match format {
        ExportFormat::Png => image::ImageFormat::Png,
        ExportFormat::Bmp => image::ImageFormat::Bmp,
    };
    image
        .save_with_format(path, image_format)
        .with_context(|| format!("failed to write export to {}", path.display()))?;

    info!(
        path = %path.display(),
        width,
        height,
        time = state.time,
        "exported still frame"
    );
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RenderPolicy;

    fn export_config() -> RendererConfig {
        RendererConfig {
            surface_size: (320, 180),
            policy: RenderPolicy::Still { time: Some(1.0) },
            ..RendererConfig::default()
        }
    }

    #[test]
    fn writes_a_readable_png_at_surface_size() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("frame.png");
        let written = run_export(&export_config(), Some(1.0), &path, ExportFormat::Png)
            .expect("export frame");
        assert_eq!(written, path);

        let decoded = image::open(&path).expect("reload export").to_rgba8();
        assert_eq!(decoded.dimensions(), (320, 180));
        let lit = decoded.pixels().any(|pixel| pixel.0[3] > 0);
        assert!(lit, "exported frame should contain visible cells");
    }

    #[test]
    fn rejects_zero_sized_exports() {
        let mut config = export_config();
        config.surface_size = (0, 180);
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("frame.png");
        assert!(run_export(&config, None, &path, ExportFormat::Png).is_err());
        assert!(!path.exists());
    }
}
