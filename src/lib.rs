//! Brickout - a brick-breaking arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, screens, levels)
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Sound cues driven by simulation events
//! - `settings`: User preferences (volume, mute, particle quality)

pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use audio::{AudioManager, SoundCue};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (one tick per displayed frame)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Canvas dimensions (y grows downward)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    pub const PADDLE_BOTTOM_MARGIN: f32 = 30.0;
    /// Pixels per tick while a move key is held
    pub const PADDLE_SPEED: f32 = 8.0;
    pub const PADDLE_GROWN_WIDTH: f32 = 150.0;
    pub const PADDLE_SHRUNK_WIDTH: f32 = 60.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Launch speed on each axis, pixels per tick
    pub const BALL_LAUNCH_SPEED: f32 = 6.0;
    /// Horizontal speed at the very edge of the paddle
    pub const BALL_MAX_DEFLECT_SPEED: f32 = 6.0;
    /// Velocity multiplier applied by the slow power-up
    pub const BALL_SLOW_FACTOR: f32 = 0.6;
    /// Per-axis speed of balls spawned by the multi power-up
    pub const MULTI_BALL_SPEED: f32 = 4.0;
    pub const MULTI_BALL_COUNT: usize = 2;

    /// Brick wall layout
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_PADDING: f32 = 5.0;
    pub const WALL_START_Y: f32 = 50.0;

    /// Power-ups
    pub const POWER_UP_WIDTH: f32 = 30.0;
    pub const POWER_UP_HEIGHT: f32 = 15.0;
    pub const POWER_UP_FALL_SPEED: f32 = 3.0;
    pub const POWER_UP_DROP_CHANCE: f32 = 0.3;

    /// Lasers
    pub const LASER_WIDTH: f32 = 4.0;
    pub const LASER_HEIGHT: f32 = 15.0;
    pub const LASER_SPEED: f32 = 10.0;
    /// Horizontal offset of each laser from paddle center
    pub const LASER_SPREAD: f32 = 30.0;

    /// Scoring and lives
    pub const START_LIVES: u32 = 3;
    pub const BRICK_SCORE: u64 = 10;

    /// Message durations in ticks
    pub const POWER_UP_MESSAGE_TICKS: u32 = 120;
    pub const LEVEL_MESSAGE_TICKS: u32 = 90;

    /// Particle bursts
    pub const BOUNCE_PARTICLES: usize = 5;
    pub const BRICK_PARTICLES: usize = 15;
    pub const SECONDARY_BRICK_PARTICLES: usize = 10;
    /// Size lost per tick
    pub const PARTICLE_SHRINK: f32 = 0.1;

    /// Win screen fireworks
    pub const FIREWORK_MIN_INTERVAL: i32 = 20;
    pub const FIREWORK_MAX_INTERVAL: i32 = 50;
    pub const FIREWORK_SPARKS: usize = 40;
    pub const FIREWORK_GRAVITY: f32 = 0.2;
}

/// 8-bit RGB color, as used by the level palettes
pub type Color = [u8; 3];

/// Convert an 8-bit RGB color to normalized RGBA
#[inline]
pub fn color_to_rgba(color: Color, alpha: f32) -> [f32; 4] {
    [
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
        alpha,
    ]
}
