use std::time::Instant;

use rand::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color '{0}': expected #RRGGBB")]
pub struct ColorParseError(pub String);

/// 8-bit RGB triple decoded from a `#RRGGBB` parameter string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` or `RRGGBB`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorParseError(hex.to_string()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

/// Speed ceiling applied while the reduced-motion preference is active.
pub const REDUCED_MOTION_MAX_SPEED: f32 = 0.3;

/// The animated center orbits within ±12% of the unit square.
pub const ORBIT_RADIUS: f32 = 0.12;

/// User-tunable visual parameters, immutable within a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BlobParams {
    /// Blob radius as a fraction of the smaller raster dimension.
    pub radius: f32,
    /// Animation speed multiplier.
    pub speed: f32,
    /// Positional wobble strength. The historically documented range of
    /// 0.00–0.50 is stale; randomize() draws from 0.50–2.00 and that range
    /// is operative.
    pub wobble: f32,
    /// Bubble opacity multiplier.
    pub intensity: f32,
    /// Foreground accent color, hex RGB.
    pub fg_color: String,
    /// Background clear color, hex RGB.
    pub bg_color: String,
    /// Render at a deliberately low cell resolution and upscale.
    pub pixelated: bool,
}

impl BlobParams {
    /// The fixed default parameter set.
    pub fn defaults() -> Self {
        Self {
            radius: 0.16,
            speed: 0.6,
            wobble: 1.3,
            intensity: 1.4,
            fg_color: "#00ff41".to_string(),
            bg_color: "#000000".to_string(),
            pixelated: true,
        }
    }
}

impl Default for BlobParams {
    fn default() -> Self {
        Self::defaults()
    }
}

/// Partial parameter update; unset fields keep their prior values.
///
/// Values are forwarded as-is; the store performs no range validation, so
/// the renderer has to tolerate anything that lands here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamPatch {
    pub radius: Option<f32>,
    pub speed: Option<f32>,
    pub wobble: Option<f32>,
    pub intensity: Option<f32>,
    pub fg_color: Option<String>,
    pub bg_color: Option<String>,
    pub pixelated: Option<bool>,
}

/// Live animation state, advanced once per display frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    /// Center X in fractional [0, 1] coordinates.
    pub cx: f32,
    /// Center Y in fractional [0, 1] coordinates.
    pub cy: f32,
    /// Accumulated animation time in seconds.
    pub time: f32,
    pub is_paused: bool,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            cx: 0.5,
            cy: 0.5,
            time: 0.0,
            is_paused: false,
        }
    }
}

/// Whether the host signalled a preference for reduced motion.
///
/// Re-sampled on every tick, so flipping it mid-flight changes the rate of
/// time without a discontinuity in the accumulated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionPreference {
    #[default]
    Full,
    Reduced,
}

type ParamListener = Box<dyn FnMut(&BlobParams)>;

/// Owns the current parameters and animation state, and advances the clock.
///
/// Mutations and frame ticks happen on the same event-loop thread; renderers
/// clone a snapshot per frame rather than holding a borrow across the draw.
pub struct BlobStore {
    params: BlobParams,
    state: AnimationState,
    motion: MotionPreference,
    last_instant: Option<Instant>,
    rng: StdRng,
    listeners: Vec<ParamListener>,
}

impl BlobStore {
    pub fn new(seed: u64) -> Self {
        Self::with_params(BlobParams::defaults(), seed)
    }

    pub fn with_params(params: BlobParams, seed: u64) -> Self {
        Self {
            params,
            state: AnimationState::default(),
            motion: MotionPreference::default(),
            last_instant: None,
            rng: StdRng::seed_from_u64(seed),
            listeners: Vec::new(),
        }
    }

    pub fn params(&self) -> &BlobParams {
        &self.params
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused
    }

    pub fn motion_preference(&self) -> MotionPreference {
        self.motion
    }

    pub fn set_motion_preference(&mut self, motion: MotionPreference) {
        self.motion = motion;
    }

    /// Registers a callback fired after every parameter mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&BlobParams) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Advances the clock to `now` and recomputes the orbit position.
    ///
    /// Returns the new state, or `None` while paused; callers stop
    /// scheduling frames on `None` and must not re-tick until resumed.
    pub fn tick(&mut self, now: Instant) -> Option<AnimationState> {
        if self.state.is_paused {
            self.last_instant = None;
            return None;
        }

        let delta = match self.last_instant {
            Some(last) => now.saturating_duration_since(last).as_secs_f32(),
            None => 0.0,
        };
        self.last_instant = Some(now);

        let effective_speed = match self.motion {
            MotionPreference::Reduced => self.params.speed.min(REDUCED_MOTION_MAX_SPEED),
            MotionPreference::Full => self.params.speed,
        };
        let adjusted_speed = adjust_for_wobble(effective_speed, self.params.wobble);

        self.state.time += delta * adjusted_speed;
        let (cx, cy) = orbit_position(self.state.time);
        self.state.cx = cx;
        self.state.cy = cy;
        Some(self.state)
    }

    pub fn pause(&mut self) {
        self.state.is_paused = true;
        self.last_instant = None;
    }

    /// Resumes from the frozen time value; the clock rebases so the first
    /// tick after resuming sees a zero delta instead of the pause duration.
    pub fn resume(&mut self) {
        self.state.is_paused = false;
        self.last_instant = None;
    }

    pub fn toggle_pause(&mut self) {
        if self.state.is_paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Forgets the last tick instant without touching accumulated time.
    /// Used when the surface becomes visible again after occlusion.
    pub fn rebase(&mut self) {
        self.last_instant = None;
    }

    /// Merges the patch into the current parameters. Unset fields keep
    /// their prior values; no range validation is applied.
    pub fn update(&mut self, patch: ParamPatch) {
        if let Some(radius) = patch.radius {
            self.params.radius = radius;
        }
        if let Some(speed) = patch.speed {
            self.params.speed = speed;
        }
        if let Some(wobble) = patch.wobble {
            self.params.wobble = wobble;
        }
        if let Some(intensity) = patch.intensity {
            self.params.intensity = intensity;
        }
        if let Some(fg_color) = patch.fg_color {
            self.params.fg_color = fg_color;
        }
        if let Some(bg_color) = patch.bg_color {
            self.params.bg_color = bg_color;
        }
        if let Some(pixelated) = patch.pixelated {
            self.params.pixelated = pixelated;
        }
        self.notify();
    }

    pub fn reset_to_defaults(&mut self) {
        self.params = BlobParams::defaults();
        self.notify();
    }

    /// Draws a fresh parameter set. Colors stay fixed and the pixelation
    /// toggle keeps its current value.
    pub fn randomize(&mut self) {
        self.params = BlobParams {
            radius: self.rng.gen_range(0.10..0.20),
            speed: self.rng.gen_range(0.20..1.50),
            wobble: self.rng.gen_range(0.50..2.00),
            intensity: self.rng.gen_range(0.50..2.00),
            fg_color: "#00ff41".to_string(),
            bg_color: "#000000".to_string(),
            pixelated: self.params.pixelated,
        };
        self.notify();
    }

    fn notify(&mut self) {
        for listener in &mut self.listeners {
            listener(&self.params);
        }
    }
}

/// Lissajous-style orbit around the canvas center, bounded to
/// `0.5 ± ORBIT_RADIUS` on both axes.
pub fn orbit_position(time: f32) -> (f32, f32) {
    (
        0.5 + (time * 0.8).sin() * ORBIT_RADIUS,
        0.5 + (time * 0.6).cos() * ORBIT_RADIUS,
    )
}

impl AnimationState {
    /// Frozen state at a fixed timestamp, for still frames and exports.
    pub fn at_time(time: f32) -> Self {
        let (cx, cy) = orbit_position(time);
        Self {
            cx,
            cy,
            time,
            is_paused: true,
        }
    }
}

/// Compensates the perceived speed increase from wobble. Wobble values that
/// are zero, negative, or otherwise not a positive normal number leave the
/// speed untouched instead of dividing.
fn adjust_for_wobble(speed: f32, wobble: f32) -> f32 {
    if wobble.is_normal() && wobble > 0.0 {
        speed / wobble
    } else {
        speed
    }
}
