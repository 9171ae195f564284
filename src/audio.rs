//! Sound cues
//!
//! The simulation emits [`GameEvent`]s; this module maps them to fire-and-forget
//! cues and hands them to whatever sink the host provides.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Cannon fired
    Shoot,
    /// Something was destroyed and nothing slipped past
    Hit,
    /// Item crossed the danger line
    Miss,
    /// A life was lost
    Loss,
    /// Bomb cleared the board
    Bomb,
    /// Bullet-time kicked in
    BulletTime,
}

impl SoundCue {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<SoundCue> {
        match event {
            GameEvent::Shot { .. } => Some(SoundCue::Shoot),
            GameEvent::Hit => Some(SoundCue::Hit),
            GameEvent::Miss => Some(SoundCue::Miss),
            GameEvent::LifeLost { .. } => Some(SoundCue::Loss),
            GameEvent::BombCleared => Some(SoundCue::Bomb),
            GameEvent::BulletTime => Some(SoundCue::BulletTime),
            _ => None,
        }
    }
}

/// Something that can play cues
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Audio manager: volume and mute state in front of a backend.
///
/// Without a real backend it just logs the cue it would have played.
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
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
        }
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

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        log::trace!("cue {:?} at volume {:.2}", cue, vol);
    }
}

/// Sink that remembers every cue, for tests and replays
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub cues: Vec<SoundCue>,
}

impl AudioSink for RecordingSink {
    fn play(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }
}
