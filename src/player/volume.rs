pub const MAX_LEVEL: u8 = 100;

/// Slider level with an explicit mute flag.
///
/// Muting drops the level to 0 and remembers the last audible level so that
/// unmuting can bring it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volume {
    level: u8,
    muted: bool,
    last_audible: Option<u8>,
    fallback: u8,
}

impl Volume {
    /// `fallback` is restored on unmute when no audible level was ever set.
    pub fn new(initial: u8, fallback: u8) -> Self {
        let level = initial.min(MAX_LEVEL);
        Self {
            level,
            muted: level == 0,
            last_audible: (level > 0).then_some(level),
            fallback: fallback.clamp(1, MAX_LEVEL),
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn gain(&self) -> f32 {
        f32::from(self.level) / f32::from(MAX_LEVEL)
    }

    /// Clamp to `0..=100`; the volume is muted exactly when the level is 0.
    pub fn set_level(&mut self, level: i32) {
        let level = level.clamp(0, i32::from(MAX_LEVEL)) as u8;
        self.level = level;
        self.muted = level == 0;
        if level > 0 {
            self.last_audible = Some(level);
        }
    }

    pub fn toggle_mute(&mut self) {
        if self.muted {
            let restore = self.last_audible.unwrap_or(self.fallback);
            self.set_level(i32::from(restore));
        } else {
            if self.level > 0 {
                self.last_audible = Some(self.level);
            }
            self.level = 0;
            self.muted = true;
        }
    }

    pub fn icon(&self) -> &'static str {
        if self.muted { "🔇" } else { "🔊" }
    }
}
