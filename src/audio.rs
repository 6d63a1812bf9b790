//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects, no asset files to load. Off the web
//! there is no audio backend and the manager stays silent.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::Settings;
use crate::sim::GameEvent;

/// Sound cues the game can play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Ball hits a wall or the paddle
    Bounce,
    /// Brick destroyed by a ball or laser
    BrickBreak,
    GameOver,
    /// Paddle fires its lasers
    Laser,
}

impl SoundCue {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<SoundCue> {
        match event {
            GameEvent::Bounce => Some(SoundCue::Bounce),
            GameEvent::BrickBreak => Some(SoundCue::BrickBreak),
            GameEvent::LaserFired => Some(SoundCue::Laser),
            GameEvent::GameOver => Some(SoundCue::GameOver),
            GameEvent::LifeLost
            | GameEvent::PowerUpCollected(_)
            | GameEvent::LevelStarted(_)
            | GameEvent::Won => None,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
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
    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        log::warn!("No audio backend on this platform - audio disabled");
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Manager configured from user settings
    pub fn with_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.apply_settings(settings);
        audio
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// True when a backend exists to play through
    pub fn is_available(&self) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            self.ctx.is_some()
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            false
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
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

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play the cues for one tick's events. Returns how many were audible.
    pub fn play_events(&self, events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter_map(SoundCue::for_event)
            .filter(|cue| self.play(*cue))
            .count()
    }

    /// Play a sound cue. Returns false when muted or silent.
    pub fn play(&self, cue: SoundCue) -> bool {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return false;
        }
        self.synthesize(cue, vol)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn synthesize(&self, _cue: SoundCue, _vol: f32) -> bool {
        false
    }

    #[cfg(target_arch = "wasm32")]
    fn synthesize(&self, cue: SoundCue, vol: f32) -> bool {
        let Some(ctx) = &self.ctx else { return false };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            SoundCue::Bounce => self.play_bounce(ctx, vol),
            SoundCue::BrickBreak => self.play_brick_break(ctx, vol),
            SoundCue::GameOver => self.play_game_over(ctx, vol),
            SoundCue::Laser => self.play_laser(ctx, vol),
        }
        true
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    #[cfg(target_arch = "wasm32")]
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Short dropping thump
    #[cfg(target_arch = "wasm32")]
    fn play_bounce(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(90.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.12).ok();
    }

    /// Crunchy crack with a high tinkle on top
    #[cfg(target_arch = "wasm32")]
    fn play_brick_break(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.frequency().set_value_at_time(120.0, t).ok();
            osc.frequency().set_value_at_time(2800.0, t + 0.01).ok();
            osc.frequency().set_value_at_time(180.0, t + 0.03).ok();
            osc.frequency().set_value_at_time(2200.0, t + 0.05).ok();
            osc.frequency().set_value_at_time(90.0, t + 0.08).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.18).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 5000.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.08, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.frequency().set_value_at_time(5000.0, t).ok();
            osc.frequency().set_value_at_time(7000.0, t + 0.03).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }
    }

    /// Rising zap
    #[cfg(target_arch = "wasm32")]
    fn play_laser(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 1600.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(1600.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(400.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Descending four-note phrase
    #[cfg(target_arch = "wasm32")]
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }
}
