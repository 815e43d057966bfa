//! Audio cues
//!
//! The engine never synthesizes sound itself. It reports [`SoundEffect`]s to a
//! [`SoundSystem`]; [`AudioManager`] turns them into simple beep descriptors
//! (frequency, gain, decay) that a host synthesizer can play.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Target hit below the combo threshold
    Hit,
    /// Target expired, or the board was clicked outside any target
    Miss,
    /// Hit at or past the combo threshold
    Combo,
    /// Session ran out of time
    GameOver,
}

/// One oscillator beep with exponential decay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    /// Starting gain before volume scaling
    pub gain: f32,
    pub duration_secs: f32,
}

impl SoundEffect {
    pub fn tone(&self) -> Tone {
        let (frequency_hz, gain, duration_secs) = match self {
            SoundEffect::Hit => (800.0, 0.3, 0.1),
            SoundEffect::Miss => (200.0, 0.2, 0.2),
            SoundEffect::Combo => (1200.0, 0.3, 0.3),
            SoundEffect::GameOver => (300.0, 0.3, 0.5),
        };
        Tone {
            frequency_hz,
            gain,
            duration_secs,
        }
    }
}

/// Receives sound cues from the session. Purely advisory: implementations
/// must swallow their own failures.
pub trait SoundSystem {
    fn play(&mut self, effect: SoundEffect);
}

/// Discards every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl SoundSystem for Silent {
    fn play(&mut self, _effect: SoundEffect) {}
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    queued: Vec<Tone>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            queued: Vec::new(),
        }
    }

    /// Build from persisted settings
    pub fn from_settings(settings: &crate::Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(!settings.sound_enabled);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Flip the sound toggle; returns true when sound is now on
    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        !self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Take the tones queued since the last call
    pub fn drain_tones(&mut self) -> Vec<Tone> {
        std::mem::take(&mut self.queued)
    }
}

impl SoundSystem for AudioManager {
    fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let mut tone = effect.tone();
        tone.gain *= vol;
        log::trace!("{:?}: {} Hz for {}s", effect, tone.frequency_hz, tone.duration_secs);
        self.queued.push(tone);
    }
}
