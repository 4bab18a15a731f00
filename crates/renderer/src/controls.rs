use paramstore::{BlobParams, ParamPatch};
use winit::keyboard::{Key, NamedKey};

/// Actions reachable from the keyboard, mirroring the control panel:
/// pause, randomize (shape and colors), reset, pixelation toggle, and
/// slider-style nudges on one selected parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    TogglePause,
    Randomize,
    RandomizeColors,
    ResetDefaults,
    TogglePixelated,
    ToggleReducedMotion,
    CycleTarget,
    NudgeUp,
    NudgeDown,
    Quit,
}

/// Maps a pressed logical key to a command. Held-key repeats only drive
/// the nudge commands; everything else fires once per press.
pub(crate) fn command_for_key(key: &Key, repeat: bool) -> Option<Command> {
    let command = match key {
        Key::Named(NamedKey::Space) => Command::TogglePause,
        Key::Named(NamedKey::Escape) => Command::Quit,
        Key::Named(NamedKey::Tab) => Command::CycleTarget,
        Key::Named(NamedKey::ArrowUp) => Command::NudgeUp,
        Key::Named(NamedKey::ArrowDown) => Command::NudgeDown,
        Key::Character(text) => match text.as_str() {
            "r" | "R" => Command::Randomize,
            "c" | "C" => Command::RandomizeColors,
            "d" | "D" => Command::ResetDefaults,
            "p" | "P" => Command::TogglePixelated,
            "m" | "M" => Command::ToggleReducedMotion,
            "q" | "Q" => Command::Quit,
            _ => return None,
        },
        _ => return None,
    };

    if repeat && !matches!(command, Command::NudgeUp | Command::NudgeDown) {
        return None;
    }
    Some(command)
}

/// Parameter currently bound to the nudge keys, cycled with Tab in the
/// control panel's slider order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum ControlTarget {
    #[default]
    Speed,
    Wobble,
    Intensity,
    Radius,
}

impl ControlTarget {
    pub(crate) fn next(self) -> Self {
        match self {
            Self::Speed => Self::Wobble,
            Self::Wobble => Self::Intensity,
            Self::Intensity => Self::Radius,
            Self::Radius => Self::Speed,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Speed => "speed",
            Self::Wobble => "wobble",
            Self::Intensity => "intensity",
            Self::Radius => "radius",
        }
    }

    fn step(self) -> f32 {
        match self {
            Self::Radius => 0.01,
            _ => 0.05,
        }
    }

    /// Slider bounds. The wobble range follows the randomize draw rather
    /// than the stale documented 0.00–0.50 range.
    fn range(self) -> (f32, f32) {
        match self {
            Self::Speed => (0.20, 1.50),
            Self::Wobble => (0.50, 2.00),
            Self::Intensity => (0.50, 2.00),
            Self::Radius => (0.10, 0.20),
        }
    }

    /// Builds the partial update for one slider-style step. The keyboard
    /// clamps to the slider range the way the panel's inputs do, even
    /// though the store itself accepts anything.
    pub(crate) fn nudge(self, params: &BlobParams, direction: f32) -> ParamPatch {
        let current = match self {
            Self::Speed => params.speed,
            Self::Wobble => params.wobble,
            Self::Intensity => params.intensity,
            Self::Radius => params.radius,
        };
        let (min, max) = self.range();
        let value = (current + self.step() * direction).clamp(min, max);

        let mut patch = ParamPatch::default();
        match self {
            Self::Speed => patch.speed = Some(value),
            Self::Wobble => patch.wobble = Some(value),
            Self::Intensity => patch.intensity = Some(value),
            Self::Radius => patch.radius = Some(value),
        }
        patch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    fn character(text: &str) -> Key {
        Key::Character(SmolStr::new(text))
    }

    #[test]
    fn maps_the_control_panel_keys() {
        assert_eq!(
            command_for_key(&Key::Named(NamedKey::Space), false),
            Some(Command::TogglePause)
        );
        assert_eq!(command_for_key(&character("r"), false), Some(Command::Randomize));
        assert_eq!(
            command_for_key(&character("C"), false),
            Some(Command::RandomizeColors)
        );
        assert_eq!(
            command_for_key(&character("p"), false),
            Some(Command::TogglePixelated)
        );
        assert_eq!(command_for_key(&character("q"), false), Some(Command::Quit));
        assert_eq!(command_for_key(&character("x"), false), None);
    }

    #[test]
    fn repeats_only_drive_nudges() {
        assert_eq!(
            command_for_key(&Key::Named(NamedKey::ArrowUp), true),
            Some(Command::NudgeUp)
        );
        assert_eq!(command_for_key(&character("r"), true), None);
        assert_eq!(command_for_key(&Key::Named(NamedKey::Space), true), None);
    }

    #[test]
    fn target_cycle_visits_every_parameter() {
        let mut target = ControlTarget::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(target.label());
            target = target.next();
        }
        assert_eq!(seen, ["speed", "wobble", "intensity", "radius"]);
        assert_eq!(target, ControlTarget::Speed);
    }

    #[test]
    fn nudge_steps_and_clamps_like_a_slider() {
        let params = BlobParams::defaults();
        let patch = ControlTarget::Speed.nudge(&params, 1.0);
        assert!((patch.speed.unwrap() - 0.65).abs() < 1e-6);
        assert_eq!(patch.radius, None);

        let mut fast = params.clone();
        fast.speed = 1.49;
        let patch = ControlTarget::Speed.nudge(&fast, 1.0);
        assert_eq!(patch.speed, Some(1.50));

        let mut slow = params;
        slow.speed = 0.20;
        let patch = ControlTarget::Speed.nudge(&slow, -1.0);
        assert_eq!(patch.speed, Some(0.20));
    }

    #[test]
    fn radius_nudges_use_the_finer_step() {
        let params = BlobParams::defaults();
        let patch = ControlTarget::Radius.nudge(&params, -1.0);
        assert!((patch.radius.unwrap() - 0.15).abs() < 1e-6);
    }
}
