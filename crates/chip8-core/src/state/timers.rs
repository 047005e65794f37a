use crate::SoundTimerPolicy;

/// Delay and sound countdown timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Timers {
    /// Delay timer (`DT`), readable by programs.
    pub delay: u8,
    /// Sound timer (`ST`); a tone plays while nonzero.
    pub sound: u8,
}

impl Timers {
    /// Applies one timer tick. Both timers saturate at zero.
    pub const fn tick(&mut self, sound_policy: SoundTimerPolicy) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = match sound_policy {
            SoundTimerPolicy::Decrement => self.sound.saturating_sub(1),
            SoundTimerPolicy::ForceZero => 0,
        };
    }

    /// Returns `true` while the sound timer requests a tone.
    #[must_use]
    pub const fn sound_active(&self) -> bool {
        self.sound > 0
    }
}
