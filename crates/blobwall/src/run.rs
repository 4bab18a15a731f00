use std::fs;

use anyhow::{Context, Result};
use blobconfig::BlobConfig;
use paramstore::MotionPreference;
use renderer::{ColorMap, RenderPolicy, Renderer, RendererConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{parse_surface_size, resolve_export_format, Args};
use crate::paths::AppPaths;

pub fn run(args: Args) -> Result<()> {
    initialise_tracing();

    let paths = AppPaths::discover()?;
    let config = load_config(&args, &paths)?;
    let renderer_config = build_renderer_config(&args, &config)?;

    info!(policy = ?renderer_config.policy, "bootstrapping blobwall renderer");
    let mut renderer = Renderer::new(renderer_config);
    renderer.run()
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Loads the TOML configuration: an explicit `--config` path must exist,
/// while the default location is optional and falls back to built-ins.
fn load_config(args: &Args, paths: &AppPaths) -> Result<BlobConfig> {
    let path = match &args.config {
        Some(path) => Some(path.clone()),
        None => {
            let default = paths.config_file();
            default.exists().then_some(default)
        }
    };

    match path {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read config at {}", path.display()))?;
            let config = BlobConfig::from_toml_str(&text)
                .with_context(|| format!("invalid config at {}", path.display()))?;
            info!(path = %path.display(), "loaded configuration");
            Ok(config)
        }
        None => {
            debug!("no configuration file found; using built-in defaults");
            Ok(BlobConfig::default())
        }
    }
}

fn build_renderer_config(args: &Args, config: &BlobConfig) -> Result<RendererConfig> {
    let mut params = config.resolved_params();
    if let Some(radius) = args.radius {
        params.radius = radius;
    }
    if let Some(speed) = args.speed {
        params.speed = speed;
    }
    if let Some(wobble) = args.wobble {
        params.wobble = wobble;
    }
    if let Some(intensity) = args.intensity {
        params.intensity = intensity;
    }
    if let Some(pixelated) = args.pixelated {
        params.pixelated = pixelated;
    }

    let color_map = ColorMap::new(config.gradient_stops()?);

    let surface_size = match &args.size {
        Some(spec) => parse_surface_size(spec)?,
        None => (config.window.width, config.window.height),
    };

    let policy = if let Some(path) = &args.export {
        RenderPolicy::Export {
            time: Some(args.time),
            format: resolve_export_format(args.format, path),
            path: path.clone(),
        }
    } else if let Some(time) = args.still {
        RenderPolicy::Still { time: Some(time) }
    } else {
        let target_fps = match args.fps {
            Some(fps) if fps > 0.0 => Some(fps),
            Some(_) => None,
            None => config.fps_cap(),
        };
        RenderPolicy::Animate { target_fps }
    };

    let motion = if args.reduced_motion || config.window.reduced_motion {
        MotionPreference::Reduced
    } else {
        MotionPreference::Full
    };

    Ok(RendererConfig {
        surface_size,
        params,
        color_map,
        policy,
        motion,
        seed: args.seed.unwrap_or_else(rand::random),
        randomize_at_start: args.randomize,
    })
}
