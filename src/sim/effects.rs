//! Cosmetic effects: particles and win-screen fireworks
//!
//! Nothing here feeds back into gameplay. Effects still draw from the
//! game RNG so a replay with the same seed looks identical.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Color;
use crate::consts::*;

/// Bright colors a firework may burst in
const FIREWORK_COLORS: [Color; 6] = [
    [255, 80, 80],
    [255, 215, 0],
    [80, 255, 120],
    [0, 191, 255],
    [255, 105, 180],
    [200, 120, 255],
];

/// Spawn parameters for a burst of particles
#[derive(Debug, Clone, Copy)]
pub struct ParticleSpec {
    pub color: Color,
    pub size: (f32, f32),
    pub speed: (f32, f32),
    pub gravity: f32,
}

impl ParticleSpec {
    /// Sparks from a wall or paddle bounce
    pub const BOUNCE: ParticleSpec = ParticleSpec {
        color: [255, 255, 0],
        size: (1.0, 3.0),
        speed: (1.0, 3.0),
        gravity: 0.0,
    };

    /// Debris from a brick broken by the primary ball
    pub fn brick(color: Color) -> Self {
        Self {
            color,
            size: (1.0, 4.0),
            speed: (1.0, 4.0),
            gravity: 0.05,
        }
    }

    /// Debris from a brick broken by an extra ball or a laser
    pub fn brick_small(color: Color) -> Self {
        Self {
            color,
            size: (1.0, 3.0),
            speed: (1.0, 3.0),
            gravity: 0.05,
        }
    }
}

/// A short-lived shrinking fragment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub size: f32,
    pub gravity: f32,
}

impl Particle {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, pos: Vec2, spec: &ParticleSpec) -> Self {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(spec.speed.0..=spec.speed.1);
        Self {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            color: spec.color,
            size: rng.random_range(spec.size.0..=spec.size.1),
            gravity: spec.gravity,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel.y += self.gravity;
        self.size -= PARTICLE_SHRINK;
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.size <= 0.0
    }
}

/// A rocket that rises, bursts into sparks at its apex, then fades out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Firework {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    pub exploded: bool,
    pub sparks: Vec<Particle>,
}

impl Firework {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let color = FIREWORK_COLORS[rng.random_range(0..FIREWORK_COLORS.len())];
        Self {
            pos: Vec2::new(rng.random_range(100.0..700.0), SCREEN_HEIGHT),
            vel: Vec2::new(0.0, rng.random_range(-13.0..-9.0)),
            color,
            exploded: false,
            sparks: Vec::new(),
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if !self.exploded {
            self.pos += self.vel;
            self.vel.y += FIREWORK_GRAVITY;
            if self.vel.y >= 0.0 {
                self.explode(rng);
            }
            return;
        }
        for spark in &mut self.sparks {
            spark.update();
        }
        self.sparks.retain(|s| !s.is_dead());
    }

    fn explode<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.exploded = true;
        let spec = ParticleSpec {
            color: self.color,
            size: (2.0, 4.0),
            speed: (1.0, 5.0),
            gravity: 0.05,
        };
        self.sparks = Vec::with_capacity(FIREWORK_SPARKS);
        for _ in 0..FIREWORK_SPARKS {
            self.sparks.push(Particle::new(rng, self.pos, &spec));
        }
    }

    pub fn is_dead(&self) -> bool {
        self.exploded && self.sparks.is_empty()
    }
}
