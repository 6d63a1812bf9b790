//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one tick per frame)
//! - Seeded RNG only
//! - Stable iteration order (wall order for bricks, spawn order elsewhere)
//! - No rendering or platform dependencies

pub mod effects;
pub mod entities;
pub mod geometry;
pub mod level;
pub mod state;
pub mod tick;

pub use effects::{Firework, Particle, ParticleSpec};
pub use entities::{
    Ball, BallKind, BallStatus, Brick, CollisionObject, Laser, Paddle, PowerUp, PowerUpKind,
};
pub use geometry::Rect;
pub use level::{LEVELS, LevelDef, brick_width_for_cols, create_brick_wall};
pub use state::{GameEvent, GameState, MAX_PARTICLES, Message, Screen};
pub use tick::{TickInput, tick};
