//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]. It is plain data,
//! serializable, and the RNG travels with it so runs replay exactly.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{Firework, Particle, ParticleSpec};
use super::entities::{Ball, Brick, Laser, Paddle, PowerUp, PowerUpKind};
use super::level::{LEVELS, create_brick_wall};
use crate::{Color, Settings};
use crate::consts::*;

/// Default particle cap when no settings are applied
pub const MAX_PARTICLES: usize = 500;

/// Which screen is active. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// Waiting for the action key
    TitleScreen,
    /// Active gameplay
    Playing,
    /// Out of lives
    GameOver,
    /// Every level cleared
    YouWin,
}

/// Things that happened during a tick, for audio and front ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball bounced off a wall or the paddle
    Bounce,
    BrickBreak,
    LaserFired,
    PowerUpCollected(PowerUpKind),
    /// Primary ball lost (lives remain or not)
    LifeLost,
    GameOver,
    /// A new level began (1-based number)
    LevelStarted(usize),
    Won,
}

/// Transient on-screen message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    /// Ticks left on screen
    pub ticks: u32,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// The only source of randomness
    pub rng: Pcg32,
    pub screen: Screen,
    /// Index into [`LEVELS`] (0-based)
    pub level_index: usize,
    pub lives: u32,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub paddle: Paddle,
    /// The ball whose loss costs a life
    pub ball: Ball,
    /// Balls from the multi power-up
    pub extra_balls: Vec<Ball>,
    pub bricks: Vec<Brick>,
    pub power_ups: Vec<PowerUp>,
    pub lasers: Vec<Laser>,
    pub particles: Vec<Particle>,
    pub fireworks: Vec<Firework>,
    /// Ticks until the next firework on the win screen
    pub firework_timer: i32,
    pub message: Option<Message>,
    pub muted: bool,
    /// Particle spawns beyond this are dropped
    pub max_particles: usize,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game on the title screen
    pub fn new(seed: u64) -> Self {
        let paddle = Paddle::default();
        let ball = Ball::new_primary(&paddle);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            screen: Screen::TitleScreen,
            level_index: 0,
            lives: START_LIVES,
            score: 0,
            time_ticks: 0,
            paddle,
            ball,
            extra_balls: Vec::new(),
            bricks: create_brick_wall(0),
            power_ups: Vec::new(),
            lasers: Vec::new(),
            particles: Vec::new(),
            fireworks: Vec::new(),
            firework_timer: 0,
            message: None,
            muted: false,
            max_particles: MAX_PARTICLES,
            events: Vec::new(),
        }
    }

    /// New game with the user's particle budget and mute preference
    pub fn with_settings(seed: u64, settings: &Settings) -> Self {
        let mut state = Self::new(seed);
        state.max_particles = settings.max_particles();
        state.muted = settings.muted;
        state
    }

    /// 1-based level number for display
    pub fn level_number(&self) -> usize {
        self.level_index + 1
    }

    pub fn show_message(&mut self, text: impl Into<String>, ticks: u32) {
        self.message = Some(Message {
            text: text.into(),
            ticks,
        });
    }

    /// Put the paddle and primary ball back to serve and drop extra balls
    pub fn reset_ball_and_paddle(&mut self) {
        self.paddle.reset();
        self.ball.reset(&self.paddle);
        self.extra_balls.clear();
    }

    /// Full reset back to the title screen (score, lives, level, transient entities)
    pub fn reset_to_title(&mut self) {
        self.reset_ball_and_paddle();
        self.level_index = 0;
        self.bricks = create_brick_wall(0);
        self.score = 0;
        self.lives = START_LIVES;
        self.power_ups.clear();
        self.lasers.clear();
        self.particles.clear();
        self.fireworks.clear();
        self.firework_timer = 0;
        self.message = None;
        self.set_screen(Screen::TitleScreen);
    }

    /// Advance to the next level, or to the win screen after the last one
    pub fn advance_level(&mut self) {
        self.level_index += 1;
        if self.level_index < LEVELS.len() {
            self.bricks = create_brick_wall(self.level_index);
            self.reset_ball_and_paddle();
            let number = self.level_number();
            self.show_message(format!("Level {}", number), LEVEL_MESSAGE_TICKS);
            self.events.push(GameEvent::LevelStarted(number));
            log::info!("Level {} started ({} bricks)", number, self.bricks.len());
        } else {
            self.set_screen(Screen::YouWin);
            self.events.push(GameEvent::Won);
            log::info!("All levels cleared with score {}", self.score);
        }
    }

    pub(crate) fn set_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            log::info!("Screen {:?} -> {:?}", self.screen, screen);
            self.screen = screen;
        }
    }

    /// Emit a burst of particles, respecting the particle cap
    pub fn spawn_particles(&mut self, pos: Vec2, count: usize, spec: &ParticleSpec) {
        let room = self.max_particles.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let particle = Particle::new(&mut self.rng, pos, spec);
            self.particles.push(particle);
        }
    }

    /// Index of the first brick overlapping `ball` (first match wins)
    pub fn first_brick_hit(&self, ball: &Ball) -> Option<usize> {
        let rect = ball.rect();
        self.bricks.iter().position(|b| b.rect.overlaps(&rect))
    }

    /// Remove a brick, award its score and spray its debris
    pub fn destroy_brick(&mut self, index: usize, particles: usize, spec: fn(Color) -> ParticleSpec) -> Brick {
        let brick = self.bricks.remove(index);
        self.spawn_particles(brick.rect.center(), particles, &spec(brick.color));
        self.score += BRICK_SCORE;
        self.events.push(GameEvent::BrickBreak);
        brick
    }

    /// Roll the drop chance and maybe pick a power-up kind uniformly
    pub fn roll_power_up(&mut self) -> Option<PowerUpKind> {
        if self.rng.random::<f32>() < POWER_UP_DROP_CHANCE {
            let index = self.rng.random_range(0..PowerUpKind::ALL.len());
            Some(PowerUpKind::ALL[index])
        } else {
            None
        }
    }
}
