//! Gameplay entities: paddle, balls, bricks, power-ups and lasers

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use crate::Color;
use crate::consts::*;

/// What a ball bounced off during its update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionObject {
    Wall,
    Paddle,
}

/// Outcome of a single ball update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallStatus {
    /// Riding on the paddle, waiting for launch
    Glued,
    /// In flight
    Normal,
    /// Fell past the bottom of the screen
    Lost,
}

/// Primary ball costs a life when lost; extra balls don't
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallKind {
    Primary,
    Extra,
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
    /// Pixels per tick
    pub speed: f32,
    pub has_laser: bool,
    pub is_grown: bool,
    pub is_shrunk: bool,
    /// Sticky paddle: the primary ball glues on contact
    pub is_glued: bool,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            rect: Rect::new(
                (SCREEN_WIDTH - PADDLE_WIDTH) / 2.0,
                SCREEN_HEIGHT - PADDLE_BOTTOM_MARGIN - PADDLE_HEIGHT,
                PADDLE_WIDTH,
                PADDLE_HEIGHT,
            ),
            speed: PADDLE_SPEED,
            has_laser: false,
            is_grown: false,
            is_shrunk: false,
            is_glued: false,
        }
    }
}

impl Paddle {
    /// Move by the held direction keys, clamped to the screen
    pub fn update(&mut self, left: bool, right: bool) {
        let dir = match (left, right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        self.rect.x = (self.rect.x + dir * self.speed).clamp(0.0, SCREEN_WIDTH - self.rect.w);
    }

    /// Apply a paddle power-up. Effects last until reset or overwritten.
    ///
    /// Returns false for kinds that don't target the paddle.
    pub fn activate_power_up(&mut self, kind: PowerUpKind) -> bool {
        match kind {
            PowerUpKind::Grow => {
                self.set_width(PADDLE_GROWN_WIDTH);
                self.is_grown = true;
                self.is_shrunk = false;
            }
            PowerUpKind::Shrink => {
                self.set_width(PADDLE_SHRUNK_WIDTH);
                self.is_shrunk = true;
                self.is_grown = false;
            }
            PowerUpKind::Laser => self.has_laser = true,
            PowerUpKind::Glue => self.is_glued = true,
            PowerUpKind::Slow | PowerUpKind::Multi | PowerUpKind::ExtraLife => return false,
        }
        true
    }

    /// Resize around the current center, staying on screen
    fn set_width(&mut self, width: f32) {
        let center_x = self.rect.center_x();
        self.rect.w = width;
        self.rect.x = (center_x - width / 2.0).clamp(0.0, SCREEN_WIDTH - width);
    }

    /// Restore default size, position and flags
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Two lasers symmetric around paddle center, if the laser is armed
    pub fn fire_lasers(&self) -> Option<[Laser; 2]> {
        if !self.has_laser {
            return None;
        }
        let cx = self.rect.center_x();
        let top = self.rect.top();
        Some([
            Laser::new(cx - LASER_SPREAD, top),
            Laser::new(cx + LASER_SPREAD, top),
        ])
    }
}

/// A ball entity (primary or extra)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Center position
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub radius: f32,
    pub kind: BallKind,
    pub is_glued: bool,
    /// Horizontal offset from paddle center while glued
    pub glue_offset: f32,
    pub is_slowed: bool,
}

impl Ball {
    /// Primary ball, glued to the paddle center
    pub fn new_primary(paddle: &Paddle) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            kind: BallKind::Primary,
            is_glued: true,
            glue_offset: 0.0,
            is_slowed: false,
        };
        ball.follow_paddle(paddle);
        ball
    }

    /// Free-flying extra ball
    pub fn new_extra(center: Vec2, vel: Vec2) -> Self {
        Self {
            pos: center,
            vel,
            radius: BALL_RADIUS,
            kind: BallKind::Extra,
            is_glued: false,
            glue_offset: 0.0,
            is_slowed: false,
        }
    }

    /// Bounding square used for all overlap tests
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.radius * 2.0, self.radius * 2.0)
    }

    fn speed_scale(&self) -> f32 {
        if self.is_slowed { BALL_SLOW_FACTOR } else { 1.0 }
    }

    fn follow_paddle(&mut self, paddle: &Paddle) {
        let half = paddle.rect.w / 2.0;
        self.glue_offset = self.glue_offset.clamp(-half, half);
        self.pos = Vec2::new(
            paddle.rect.center_x() + self.glue_offset,
            paddle.rect.top() - self.radius,
        );
    }

    fn launch(&mut self) {
        self.is_glued = false;
        self.vel = Vec2::new(BALL_LAUNCH_SPEED, -BALL_LAUNCH_SPEED) * self.speed_scale();
    }

    /// Advance one tick
    ///
    /// A glued ball rides the paddle until `launch` is set. A free ball moves,
    /// reflects off the side and top walls, and deflects off the paddle by
    /// how far from center it hit.
    pub fn update(&mut self, paddle: &Paddle, launch: bool) -> (BallStatus, Option<CollisionObject>) {
        if self.is_glued {
            self.follow_paddle(paddle);
            if !launch {
                return (BallStatus::Glued, None);
            }
            self.launch();
            return (BallStatus::Normal, None);
        }

        self.pos += self.vel;
        let r = self.radius;
        let mut collision = None;

        if self.pos.x - r <= 0.0 {
            self.pos.x = r;
            self.vel.x = self.vel.x.abs();
            collision = Some(CollisionObject::Wall);
        } else if self.pos.x + r >= SCREEN_WIDTH {
            self.pos.x = SCREEN_WIDTH - r;
            self.vel.x = -self.vel.x.abs();
            collision = Some(CollisionObject::Wall);
        }
        if self.pos.y - r <= 0.0 {
            self.pos.y = r;
            self.vel.y = self.vel.y.abs();
            collision = Some(CollisionObject::Wall);
        }

        // Only deflect while descending so the ball can't get trapped inside
        if self.vel.y > 0.0 && self.rect().overlaps(&paddle.rect) {
            self.deflect_off_paddle(paddle);
            collision = Some(CollisionObject::Paddle);
        }

        if self.rect().top() > SCREEN_HEIGHT {
            return (BallStatus::Lost, collision);
        }
        (BallStatus::Normal, collision)
    }

    fn deflect_off_paddle(&mut self, paddle: &Paddle) {
        let half = paddle.rect.w / 2.0;
        let offset = ((self.pos.x - paddle.rect.center_x()) / half).clamp(-1.0, 1.0);

        self.pos.y = paddle.rect.top() - self.radius;
        self.vel.y = -self.vel.y.abs();
        self.vel.x = offset * BALL_MAX_DEFLECT_SPEED * self.speed_scale();

        if paddle.is_glued && self.kind == BallKind::Primary {
            self.is_glued = true;
            self.glue_offset = self.pos.x - paddle.rect.center_x();
            self.vel = Vec2::ZERO;
        }
    }

    /// Apply a ball power-up. Only `Slow` affects the ball; it does not stack.
    pub fn activate_power_up(&mut self, kind: PowerUpKind) -> bool {
        if kind != PowerUpKind::Slow {
            return false;
        }
        if !self.is_slowed {
            self.is_slowed = true;
            self.vel *= BALL_SLOW_FACTOR;
        }
        true
    }

    /// Back onto the paddle center with no speed modifiers
    pub fn reset(&mut self, paddle: &Paddle) {
        *self = Self::new_primary(paddle);
    }
}

/// A single-hit brick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub color: Color,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Grow,
    Laser,
    Glue,
    Slow,
    Shrink,
    Multi,
    ExtraLife,
}

impl PowerUpKind {
    /// Every kind, in drop-table order
    pub const ALL: [PowerUpKind; 7] = [
        PowerUpKind::Grow,
        PowerUpKind::Laser,
        PowerUpKind::Glue,
        PowerUpKind::Slow,
        PowerUpKind::Shrink,
        PowerUpKind::Multi,
        PowerUpKind::ExtraLife,
    ];

    /// Text shown when collected
    pub fn message(&self) -> &'static str {
        match self {
            PowerUpKind::Grow => "Paddle Grow!",
            PowerUpKind::Laser => "Lasers Activated!",
            PowerUpKind::Glue => "Sticky Paddle!",
            PowerUpKind::Slow => "Slow Ball!",
            PowerUpKind::Shrink => "Paddle Shrink!",
            PowerUpKind::Multi => "Multi-Ball!",
            PowerUpKind::ExtraLife => "Extra Life!",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            PowerUpKind::Grow => [50, 205, 50],
            PowerUpKind::Laser => [220, 20, 60],
            PowerUpKind::Glue => [148, 0, 211],
            PowerUpKind::Slow => [30, 144, 255],
            PowerUpKind::Shrink => [255, 140, 0],
            PowerUpKind::Multi => [240, 240, 240],
            PowerUpKind::ExtraLife => [255, 105, 180],
        }
    }
}

/// A falling power-up capsule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub rect: Rect,
}

impl PowerUp {
    pub fn new(center: Vec2, kind: PowerUpKind) -> Self {
        Self {
            kind,
            rect: Rect::from_center(center, POWER_UP_WIDTH, POWER_UP_HEIGHT),
        }
    }

    pub fn update(&mut self) {
        self.rect.y += POWER_UP_FALL_SPEED;
    }

    pub fn is_off_screen(&self) -> bool {
        self.rect.top() > SCREEN_HEIGHT
    }
}

/// An upward laser bolt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub rect: Rect,
}

impl Laser {
    /// Bolt whose bottom sits at `bottom`, centered on `center_x`
    pub fn new(center_x: f32, bottom: f32) -> Self {
        Self {
            rect: Rect::new(
                center_x - LASER_WIDTH / 2.0,
                bottom - LASER_HEIGHT,
                LASER_WIDTH,
                LASER_HEIGHT,
            ),
        }
    }

    pub fn update(&mut self) {
        self.rect.y -= LASER_SPEED;
    }

    pub fn is_off_screen(&self) -> bool {
        self.rect.bottom() < 0.0
    }
}
