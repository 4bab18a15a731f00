use paramstore::{BlobParams, Rgb};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlobConfig {
    pub version: u32,
    #[serde(default)]
    pub params: ParamOverrides,
    #[serde(default)]
    pub window: WindowOptions,
    #[serde(default)]
    pub colors: ColorRamp,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ParamOverrides {
    pub radius: Option<f32>,
    pub speed: Option<f32>,
    pub wobble: Option<f32>,
    pub intensity: Option<f32>,
    pub fg_color: Option<String>,
    pub bg_color: Option<String>,
    pub pixelated: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WindowOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub fps: Option<f32>,
    #[serde(default)]
    pub reduced_motion: bool,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: None,
            reduced_motion: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColorRamp {
    #[serde(default = "default_stops")]
    pub stops: Vec<RampStop>,
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self {
            stops: default_stops(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RampStop {
    pub threshold: u8,
    pub color: String,
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

fn default_stops() -> Vec<RampStop> {
    [
        (0, "#000000"),
        (20, "#226B22"),
        (150, "#ACC424"),
        (255, "#FF00FC"),
    ]
    .into_iter()
    .map(|(threshold, color)| RampStop {
        threshold,
        color: color.to_string(),
    })
    .collect()
}

impl BlobConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: BlobConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected 1",
                self.version
            )));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(
                "window dimensions must be greater than zero".into(),
            ));
        }

        if let Some(fps) = self.window.fps {
            if !fps.is_finite() || fps < 0.0 {
                return Err(ConfigError::Invalid("window.fps must be >= 0".into()));
            }
        }

        for (name, value) in [
            ("radius", self.params.radius),
            ("speed", self.params.speed),
            ("wobble", self.params.wobble),
            ("intensity", self.params.intensity),
        ] {
            if let Some(value) = value {
                if !value.is_finite() {
                    return Err(ConfigError::Invalid(format!(
                        "params.{name} must be a finite number"
                    )));
                }
            }
        }

        for (name, color) in [
            ("fg_color", self.params.fg_color.as_deref()),
            ("bg_color", self.params.bg_color.as_deref()),
        ] {
            if let Some(color) = color {
                Rgb::from_hex(color).map_err(|err| {
                    ConfigError::Invalid(format!("params.{name}: {err}"))
                })?;
            }
        }

        if self.colors.stops.len() < 2 {
            return Err(ConfigError::Invalid(
                "colors.stops must define at least two stops".into(),
            ));
        }

        for pair in self.colors.stops.windows(2) {
            if pair[1].threshold <= pair[0].threshold {
                return Err(ConfigError::Invalid(format!(
                    "colors.stops thresholds must be strictly increasing ({} then {})",
                    pair[0].threshold, pair[1].threshold
                )));
            }
        }

        let first = self.colors.stops.first().map(|s| s.threshold);
        let last = self.colors.stops.last().map(|s| s.threshold);
        if first != Some(0) || last != Some(255) {
            return Err(ConfigError::Invalid(
                "colors.stops must start at threshold 0 and end at 255".into(),
            ));
        }

        for stop in &self.colors.stops {
            Rgb::from_hex(&stop.color).map_err(|err| {
                ConfigError::Invalid(format!("colors.stops[{}]: {err}", stop.threshold))
            })?;
        }

        Ok(())
    }

    /// Layers the file's `[params]` overrides onto the built-in defaults.
    pub fn resolved_params(&self) -> BlobParams {
        let defaults = BlobParams::defaults();
        BlobParams {
            radius: self.params.radius.unwrap_or(defaults.radius),
            speed: self.params.speed.unwrap_or(defaults.speed),
            wobble: self.params.wobble.unwrap_or(defaults.wobble),
            intensity: self.params.intensity.unwrap_or(defaults.intensity),
            fg_color: self
                .params
                .fg_color
                .clone()
                .unwrap_or(defaults.fg_color),
            bg_color: self
                .params
                .bg_color
                .clone()
                .unwrap_or(defaults.bg_color),
            pixelated: self.params.pixelated.unwrap_or(defaults.pixelated),
        }
    }

    /// Decoded gradient stops; call after `validate`.
    pub fn gradient_stops(&self) -> Result<Vec<(u8, Rgb)>, ConfigError> {
        self.colors
            .stops
            .iter()
            .map(|stop| {
                Rgb::from_hex(&stop.color)
                    .map(|rgb| (stop.threshold, rgb))
                    .map_err(|err| {
                        ConfigError::Invalid(format!(
                            "colors.stops[{}]: {err}",
                            stop.threshold
                        ))
                    })
            })
            .collect()
    }

    /// FPS cap for the animate policy; 0 means uncapped, as on the CLI.
    pub fn fps_cap(&self) -> Option<f32> {
        self.window.fps.filter(|fps| *fps > 0.0)
    }
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            version: 1,
            params: ParamOverrides::default(),
            window: WindowOptions::default(),
            colors: ColorRamp::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
version = 1

[params]
radius = 0.12
speed = 1.0
pixelated = false

[window]
width = 1920
height = 1080
fps = 30

[[colors.stops]]
threshold = 0
color = "#000000"

[[colors.stops]]
threshold = 128
color = "#ff8800"

[[colors.stops]]
threshold = 255
color = "#ffffff"
"##;

    #[test]
    fn parses_sample_config() {
        let config = BlobConfig::from_toml_str(SAMPLE).expect("parse config");
        assert_eq!(config.version, 1);
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.fps_cap(), Some(30.0));
        assert_eq!(config.colors.stops.len(), 3);
    }

    #[test]
    fn minimal_config_uses_documented_defaults() {
        let config = BlobConfig::from_toml_str("version = 1").unwrap();
        let params = config.resolved_params();
        assert_eq!(params, BlobParams::defaults());

        let stops = config.gradient_stops().unwrap();
        assert_eq!(stops[0], (0, Rgb::BLACK));
        assert_eq!(stops[1], (20, Rgb::new(34, 107, 34)));
        assert_eq!(stops[2], (150, Rgb::new(172, 196, 36)));
        assert_eq!(stops[3], (255, Rgb::new(255, 0, 252)));
    }

    #[test]
    fn layers_param_overrides_over_defaults() {
        let config = BlobConfig::from_toml_str(SAMPLE).unwrap();
        let params = config.resolved_params();
        assert_eq!(params.radius, 0.12);
        assert_eq!(params.speed, 1.0);
        assert!(!params.pixelated);
        assert_eq!(params.wobble, BlobParams::defaults().wobble);
        assert_eq!(params.bg_color, BlobParams::defaults().bg_color);
    }

    #[test]
    fn rejects_unknown_version() {
        let err = BlobConfig::from_toml_str("version = 2").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_non_increasing_stops() {
        let config = r##"
version = 1

[[colors.stops]]
threshold = 0
color = "#000000"

[[colors.stops]]
threshold = 200
color = "#ff0000"

[[colors.stops]]
threshold = 100
color = "#00ff00"
"##;
        let err = BlobConfig::from_toml_str(config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_ramp_not_spanning_full_range() {
        let config = r##"
version = 1

[[colors.stops]]
threshold = 10
color = "#000000"

[[colors.stops]]
threshold = 255
color = "#ffffff"
"##;
        let err = BlobConfig::from_toml_str(config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_stop_color() {
        let config = r##"
version = 1

[[colors.stops]]
threshold = 0
color = "#000000"

[[colors.stops]]
threshold = 255
color = "magenta"
"##;
        let err = BlobConfig::from_toml_str(config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_fps_means_uncapped() {
        let config = BlobConfig::from_toml_str(
            r#"
version = 1

[window]
fps = 0
"#,
        )
        .unwrap();
        assert_eq!(config.fps_cap(), None);
    }
}
