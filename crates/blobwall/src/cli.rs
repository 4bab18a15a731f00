use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use renderer::ExportFormat;

#[derive(Parser, Debug)]
#[command(
    name = "blobwall",
    author,
    version,
    about = "Animated metaball wallpaper renderer",
    arg_required_else_help = false
)]
pub struct Args {
    /// Path to a blobwall.toml configuration file. Defaults to the file in
    /// the user config directory when present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub size: Option<String>,

    /// Optional FPS cap for the animation (0 = uncapped).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Present a single still frame at the given timestamp (seconds).
    #[arg(long, value_name = "SECONDS")]
    pub still: Option<f32>,

    /// Render one frame headless and write it to the given file.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Timestamp evaluated by --export (seconds).
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    pub time: f32,

    /// Export format: `png` or `bmp`. Defaults to the file extension.
    #[arg(long, value_name = "FORMAT", value_parser = parse_export_format)]
    pub format: Option<ExportFormat>,

    /// Seed for randomize draws; a fresh random seed when omitted.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Start from a randomized parameter set.
    #[arg(long)]
    pub randomize: bool,

    /// Clamp the animation speed as if the desktop asked for reduced motion.
    #[arg(long)]
    pub reduced_motion: bool,

    /// Override the pixelation toggle: `on` or `off`.
    #[arg(long, value_name = "MODE", value_parser = parse_toggle)]
    pub pixelated: Option<bool>,

    /// Blob radius as a fraction of the smaller raster dimension.
    #[arg(long, value_name = "VALUE")]
    pub radius: Option<f32>,

    /// Animation speed multiplier.
    #[arg(long, value_name = "VALUE")]
    pub speed: Option<f32>,

    /// Positional wobble strength.
    #[arg(long, value_name = "VALUE")]
    pub wobble: Option<f32>,

    /// Bubble opacity multiplier.
    #[arg(long, value_name = "VALUE")]
    pub intensity: Option<f32>,
}

pub fn parse() -> Args {
    Args::parse()
}

pub fn parse_export_format(value: &str) -> Result<ExportFormat, String> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "png" => Ok(ExportFormat::Png),
        "bmp" => Ok(ExportFormat::Bmp),
        other => Err(format!("unknown export format '{other}'; expected png or bmp")),
    }
}

pub fn parse_toggle(value: &str) -> Result<bool, String> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "on" | "true" | "1" | "yes" => Ok(true),
        "off" | "false" | "0" | "no" => Ok(false),
        other => Err(format!("invalid toggle '{other}'; expected on or off")),
    }
}

/// Picks the export format: explicit flag first, then the file extension,
/// falling back to PNG for unknown or missing extensions.
pub fn resolve_export_format(explicit: Option<ExportFormat>, path: &Path) -> ExportFormat {
    if let Some(format) = explicit {
        return format;
    }
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("bmp") => ExportFormat::Bmp,
        _ => ExportFormat::Png,
    }
}

pub fn parse_surface_size(spec: &str) -> Result<(u32, u32)> {
    let trimmed = spec.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow::anyhow!("expected WxH format, e.g. 1280x720"))?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid width in size specification"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid height in size specification"))?;

    if width == 0 || height == 0 {
        anyhow::bail!("surface dimensions must be greater than zero");
    }

    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_surface_size_specs() {
        assert_eq!(parse_surface_size("1280x720").unwrap(), (1280, 720));
        assert_eq!(parse_surface_size(" 640X480 ").unwrap(), (640, 480));
        assert!(parse_surface_size("1280").is_err());
        assert!(parse_surface_size("0x720").is_err());
        assert!(parse_surface_size("axb").is_err());
    }

    #[test]
    fn parses_export_formats() {
        assert_eq!(parse_export_format("png").unwrap(), ExportFormat::Png);
        assert_eq!(parse_export_format("BMP").unwrap(), ExportFormat::Bmp);
        assert!(parse_export_format("gif").is_err());
    }

    #[test]
    fn resolves_format_from_extension_when_not_explicit() {
        assert_eq!(
            resolve_export_format(None, Path::new("frame.bmp")),
            ExportFormat::Bmp
        );
        assert_eq!(
            resolve_export_format(None, Path::new("frame.png")),
            ExportFormat::Png
        );
        assert_eq!(
            resolve_export_format(None, Path::new("frame")),
            ExportFormat::Png
        );
        assert_eq!(
            resolve_export_format(Some(ExportFormat::Bmp), Path::new("frame.png")),
            ExportFormat::Bmp
        );
    }

    #[test]
    fn parses_parameter_overrides() {
        let args = Args::try_parse_from([
            "blobwall",
            "--speed",
            "1.2",
            "--wobble",
            "0.8",
            "--pixelated",
            "off",
            "--seed",
            "42",
        ])
        .unwrap();
        assert_eq!(args.speed, Some(1.2));
        assert_eq!(args.wobble, Some(0.8));
        assert_eq!(args.pixelated, Some(false));
        assert_eq!(args.seed, Some(42));
        assert!(!args.randomize);
    }

    #[test]
    fn rejects_invalid_toggle_values() {
        let result = Args::try_parse_from(["blobwall", "--pixelated", "maybe"]);
        assert!(result.is_err());
    }
}
