//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;
use rand::Rng;

use super::effects::{Firework, ParticleSpec};
use super::entities::{Ball, BallStatus, PowerUp, PowerUpKind};
use super::state::{GameEvent, GameState, Screen};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move paddle left (held)
    pub left: bool,
    /// Move paddle right (held)
    pub right: bool,
    /// Action key pressed this tick: start, restart, launch
    pub action: bool,
    /// Action key currently held: launches a glued ball
    pub action_held: bool,
    /// Fire key pressed this tick
    pub fire: bool,
    /// Mute key pressed this tick
    pub toggle_mute: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one tick (1/60 s)
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();
    state.time_ticks += 1;

    if let Some(message) = state.message.as_mut() {
        message.ticks = message.ticks.saturating_sub(1);
        if message.ticks == 0 {
            state.message = None;
        }
    }

    let input = if input.idle_mode {
        autopilot(state, input)
    } else {
        input.clone()
    };
    let input = &input;

    if input.toggle_mute {
        state.muted = !state.muted;
        log::info!("Sound {}", if state.muted { "muted" } else { "unmuted" });
    }

    // The screen check runs before the glue check: the press that starts a
    // game never also launches the ball.
    let was_playing = state.screen == Screen::Playing;
    if input.action {
        match state.screen {
            Screen::TitleScreen => state.set_screen(Screen::Playing),
            Screen::GameOver | Screen::YouWin => state.reset_to_title(),
            Screen::Playing => {}
        }
    }

    if input.fire && was_playing {
        if let Some(lasers) = state.paddle.fire_lasers() {
            state.lasers.extend(lasers);
            state.events.push(GameEvent::LaserFired);
        }
    }

    match state.screen {
        Screen::Playing => {
            let launch = was_playing && (input.action || input.action_held);
            update_playing(state, input, launch);
        }
        Screen::YouWin => update_fireworks(state),
        Screen::TitleScreen | Screen::GameOver => {}
    }

    // Effects keep animating on every screen
    for particle in &mut state.particles {
        particle.update();
    }
    state.particles.retain(|p| !p.is_dead());
}

fn update_playing(state: &mut GameState, input: &TickInput, launch: bool) {
    state.paddle.update(input.left, input.right);
    let (status, collision) = state.ball.update(&state.paddle, launch);

    // Extra balls vanish quietly when lost
    let paddle = &state.paddle;
    state
        .extra_balls
        .retain_mut(|ball| ball.update(paddle, false).0 != BallStatus::Lost);

    if status == BallStatus::Lost {
        state.lives = state.lives.saturating_sub(1);
        state.events.push(GameEvent::LifeLost);
        log::debug!("Ball lost, {} lives left", state.lives);
        if state.lives == 0 {
            state.set_screen(Screen::GameOver);
            state.events.push(GameEvent::GameOver);
            log::info!("Game over with score {}", state.score);
            return;
        }
        state.reset_ball_and_paddle();
    } else if collision.is_some() {
        state.events.push(GameEvent::Bounce);
        let pos = state.ball.pos;
        state.spawn_particles(pos, BOUNCE_PARTICLES, &ParticleSpec::BOUNCE);
    }

    resolve_ball_bricks(state);
    update_power_ups(state);
    update_lasers(state);

    if state.bricks.is_empty() {
        state.advance_level();
    }
}

/// At most one brick per ball per tick; the first overlap in wall order wins
fn resolve_ball_bricks(state: &mut GameState) {
    if let Some(index) = state.first_brick_hit(&state.ball) {
        state.ball.vel.y = -state.ball.vel.y;
        let brick = state.destroy_brick(index, BRICK_PARTICLES, ParticleSpec::brick);
        if let Some(kind) = state.roll_power_up() {
            state.power_ups.push(PowerUp::new(brick.rect.center(), kind));
        }
    }

    for i in 0..state.extra_balls.len() {
        if let Some(index) = state.first_brick_hit(&state.extra_balls[i]) {
            state.extra_balls[i].vel.y = -state.extra_balls[i].vel.y;
            state.destroy_brick(index, SECONDARY_BRICK_PARTICLES, ParticleSpec::brick_small);
        }
    }
}

fn update_power_ups(state: &mut GameState) {
    let mut power_ups = std::mem::take(&mut state.power_ups);
    power_ups.retain_mut(|power_up| {
        power_up.update();
        if power_up.is_off_screen() {
            return false;
        }
        if power_up.rect.overlaps(&state.paddle.rect) {
            collect_power_up(state, power_up.kind);
            return false;
        }
        true
    });
    state.power_ups = power_ups;
}

fn collect_power_up(state: &mut GameState, kind: PowerUpKind) {
    state.show_message(kind.message(), POWER_UP_MESSAGE_TICKS);
    state.events.push(GameEvent::PowerUpCollected(kind));
    log::debug!("Collected power-up {:?}", kind);

    match kind {
        PowerUpKind::Grow | PowerUpKind::Shrink | PowerUpKind::Laser | PowerUpKind::Glue => {
            state.paddle.activate_power_up(kind);
        }
        PowerUpKind::Slow => {
            state.ball.activate_power_up(kind);
        }
        PowerUpKind::Multi => {
            let center = state.ball.pos;
            for _ in 0..MULTI_BALL_COUNT {
                let dir = if state.rng.random_bool(0.5) { 1.0 } else { -1.0 };
                let vel = Vec2::new(dir * MULTI_BALL_SPEED, -MULTI_BALL_SPEED);
                state.extra_balls.push(Ball::new_extra(center, vel));
            }
        }
        PowerUpKind::ExtraLife => state.lives += 1,
    }
}

fn update_lasers(state: &mut GameState) {
    let mut lasers = std::mem::take(&mut state.lasers);
    lasers.retain_mut(|laser| {
        laser.update();
        if laser.is_off_screen() {
            return false;
        }
        match state.bricks.iter().position(|b| b.rect.overlaps(&laser.rect)) {
            Some(index) => {
                state.destroy_brick(index, SECONDARY_BRICK_PARTICLES, ParticleSpec::brick_small);
                false
            }
            None => true,
        }
    });
    state.lasers = lasers;
}

fn update_fireworks(state: &mut GameState) {
    state.firework_timer -= 1;
    if state.firework_timer <= 0 {
        let firework = Firework::new(&mut state.rng);
        state.fireworks.push(firework);
        state.firework_timer = state
            .rng
            .random_range(FIREWORK_MIN_INTERVAL..=FIREWORK_MAX_INTERVAL);
    }

    for firework in &mut state.fireworks {
        firework.update(&mut state.rng);
    }
    state.fireworks.retain(|f| !f.is_dead());
}

/// Demo player: starts the game, chases the lowest falling ball, grabs
/// power-ups when nothing is falling, and keeps lasers firing.
fn autopilot(state: &GameState, input: &TickInput) -> TickInput {
    let mut input = input.clone();
    match state.screen {
        Screen::TitleScreen => input.action = true,
        Screen::Playing => {
            let falling_ball = std::iter::once(&state.ball)
                .chain(state.extra_balls.iter())
                .filter(|b| !b.is_glued && b.vel.y > 0.0)
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|b| b.pos.x);
            let lowest_power_up = state
                .power_ups
                .iter()
                .max_by(|a, b| a.rect.y.total_cmp(&b.rect.y))
                .map(|p| p.rect.center_x());
            let target = falling_ball
                .or(lowest_power_up)
                .unwrap_or(state.ball.pos.x);

            // Oscillating offset so the ball doesn't settle into a vertical loop
            let time_factor = state.time_ticks as f32 * 0.05;
            let offset = time_factor.sin() * state.paddle.rect.w * 0.3;

            let dx = target + offset - state.paddle.rect.center_x();
            input.left = dx < -PADDLE_SPEED;
            input.right = dx > PADDLE_SPEED;
            input.action_held = state.ball.is_glued;
            input.fire = state.paddle.has_laser && state.time_ticks % 15 == 0;
        }
        Screen::GameOver | Screen::YouWin => {}
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::{Brick, Laser};
    use crate::sim::geometry::Rect;
    use crate::sim::level::LEVELS;

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        tick(
            &mut state,
            &TickInput {
                action: true,
                ..Default::default()
            },
        );
        assert_eq!(state.screen, Screen::Playing);
        state
    }

    /// Free the primary ball and place it so its next move overlaps the
    /// bottom edge of `brick` while rising
    fn aim_at(state: &mut GameState, brick_index: usize) {
        let rect = state.bricks[brick_index].rect;
        state.ball.is_glued = false;
        state.ball.vel = Vec2::new(0.0, -1.0);
        state.ball.pos = Vec2::new(rect.center_x(), rect.bottom() + BALL_RADIUS - 0.5);
    }

    #[test]
    fn test_title_to_playing_does_not_launch() {
        let mut state = GameState::new(12345);
        assert_eq!(state.screen, Screen::TitleScreen);

        // Tick without input - stays on title
        tick(&mut state, &TickInput::default());
        assert_eq!(state.screen, Screen::TitleScreen);

        // Press and hold action: starts the game but the ball stays glued
        let press = TickInput {
            action: true,
            action_held: true,
            ..Default::default()
        };
        tick(&mut state, &press);
        assert_eq!(state.screen, Screen::Playing);
        assert!(state.ball.is_glued);

        // Still held on the next tick: now it launches
        let held = TickInput {
            action_held: true,
            ..Default::default()
        };
        tick(&mut state, &held);
        assert!(!state.ball.is_glued);
        assert!(state.ball.vel.y < 0.0);
    }

    #[test]
    fn test_single_brick_hit() {
        let mut state = playing_state(1);
        aim_at(&mut state, 35);
        let target = state.bricks[35].rect;
        let before = state.bricks.len();

        tick(&mut state, &TickInput::default());

        assert_eq!(state.bricks.len(), before - 1);
        assert!(state.bricks.iter().all(|b| b.rect != target));
        assert_eq!(state.score, BRICK_SCORE);
        assert!(state.ball.vel.y > 0.0);
        assert!(state.events.contains(&GameEvent::BrickBreak));
        // Debris starts at size >= 1.0, so none fades in its first tick
        assert_eq!(state.particles.len(), BRICK_PARTICLES);
    }

    #[test]
    fn test_extra_ball_breaks_brick_without_drop() {
        let mut state = playing_state(21);
        let target = state.bricks[35].rect;
        state.extra_balls.push(Ball::new_extra(
            Vec2::new(target.center_x(), target.bottom() + BALL_RADIUS - 0.5),
            Vec2::new(0.0, -1.0),
        ));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.bricks.len(), 39);
        assert!(state.bricks.iter().all(|b| b.rect != target));
        assert_eq!(state.score, BRICK_SCORE);
        assert_eq!(state.particles.len(), SECONDARY_BRICK_PARTICLES);
        assert!(state.power_ups.is_empty());
        assert_eq!(state.extra_balls[0].vel.y, 1.0);
        assert!(state.ball.is_glued);
    }

    #[test]
    fn test_primary_hit_drops_power_up_at_brick_center() {
        // Drops are a 30% roll; walk seeds until one drops
        let dropped = (0..64u64).find_map(|seed| {
            let mut state = playing_state(seed);
            aim_at(&mut state, 35);
            let target = state.bricks[35].rect;
            tick(&mut state, &TickInput::default());
            state.power_ups.first().map(|p| (target, p.clone()))
        });
        let (target, power_up) = dropped.expect("some seed drops a power-up");

        // Spawned at the brick center, then fell once in the same tick
        let center = power_up.rect.center();
        assert!((center.x - target.center_x()).abs() < 1e-4);
        assert!((center.y - (target.center().y + POWER_UP_FALL_SPEED)).abs() < 1e-4);
        assert_eq!(power_up.rect.w, POWER_UP_WIDTH);
        assert_eq!(power_up.rect.h, POWER_UP_HEIGHT);
    }

    #[test]
    fn test_first_match_wins_on_double_overlap() {
        let mut state = playing_state(2);
        state.bricks = vec![
            Brick {
                rect: Rect::new(380.0, 200.0, 20.0, 20.0),
                color: [255, 0, 0],
            },
            Brick {
                rect: Rect::new(400.0, 200.0, 20.0, 20.0),
                color: [0, 255, 0],
            },
        ];
        state.ball.is_glued = false;
        state.ball.vel = Vec2::new(0.0, -1.0);
        state.ball.pos = Vec2::new(400.0, 225.0);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.bricks.len(), 1);
        assert_eq!(state.bricks[0].color, [0, 255, 0]);
        assert_eq!(state.score, BRICK_SCORE);
    }

    #[test]
    fn test_primary_loss_costs_a_life() {
        let mut state = playing_state(3);
        state.ball.is_glued = false;
        state.ball.pos = Vec2::new(400.0, SCREEN_HEIGHT + 20.0);
        state.ball.vel = Vec2::new(0.0, 1.0);
        state.extra_balls.push(Ball::new_extra(Vec2::new(100.0, 300.0), Vec2::new(1.0, -1.0)));
        state.paddle.activate_power_up(PowerUpKind::Grow);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.lives, START_LIVES - 1);
        assert_eq!(state.screen, Screen::Playing);
        assert!(state.ball.is_glued);
        assert!(state.extra_balls.is_empty());
        assert!(!state.paddle.is_grown);
        assert!(state.events.contains(&GameEvent::LifeLost));
    }

    #[test]
    fn test_extra_ball_loss_is_free() {
        let mut state = playing_state(4);
        state
            .extra_balls
            .push(Ball::new_extra(Vec2::new(400.0, SCREEN_HEIGHT + 20.0), Vec2::new(0.0, 1.0)));

        tick(&mut state, &TickInput::default());

        assert!(state.extra_balls.is_empty());
        assert_eq!(state.lives, START_LIVES);
        assert!(!state.events.contains(&GameEvent::LifeLost));
    }

    #[test]
    fn test_last_life_goes_to_game_over_and_stays() {
        let mut state = playing_state(5);
        state.lives = 1;
        state.score = 120;
        state.ball.is_glued = false;
        state.ball.pos = Vec2::new(400.0, SCREEN_HEIGHT + 20.0);
        state.ball.vel = Vec2::new(0.0, 1.0);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.lives, 0);
        assert_eq!(state.screen, Screen::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver));

        let idle = TickInput {
            left: true,
            action_held: true,
            fire: true,
            ..Default::default()
        };
        for _ in 0..100 {
            tick(&mut state, &idle);
            assert_eq!(state.screen, Screen::GameOver);
        }

        let restart = TickInput {
            action: true,
            ..Default::default()
        };
        tick(&mut state, &restart);
        assert_eq!(state.screen, Screen::TitleScreen);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, START_LIVES);
        assert_eq!(state.level_index, 0);
        assert_eq!(state.bricks.len(), 40);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_clearing_level_one_advances_to_level_two() {
        let mut state = playing_state(6);
        state.extra_balls.push(Ball::new_extra(Vec2::new(700.0, 400.0), Vec2::new(0.0, 1.0)));
        assert_eq!(state.bricks.len(), LEVELS[0].rows * LEVELS[0].cols);

        for destroyed in 1..=40 {
            aim_at(&mut state, 0);
            tick(&mut state, &TickInput::default());
            assert_eq!(state.score, destroyed * BRICK_SCORE);
        }

        assert_eq!(state.score, 400);
        assert_eq!(state.level_index, 1);
        assert_eq!(state.bricks.len(), LEVELS[1].rows * LEVELS[1].cols);
        assert!(state.ball.is_glued);
        assert!(state.extra_balls.is_empty());
        assert_eq!(state.message.as_ref().map(|m| m.text.as_str()), Some("Level 2"));
        assert_eq!(state.message.as_ref().map(|m| m.ticks), Some(LEVEL_MESSAGE_TICKS));
        assert!(state.events.contains(&GameEvent::LevelStarted(2)));
    }

    #[test]
    fn test_clearing_last_level_wins() {
        let mut state = playing_state(7);
        state.level_index = LEVELS.len() - 1;
        state.bricks.truncate(1);
        aim_at(&mut state, 0);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.screen, Screen::YouWin);
        assert!(state.events.contains(&GameEvent::Won));

        // Fireworks start on the win screen
        tick(&mut state, &TickInput::default());
        assert_eq!(state.fireworks.len(), 1);
        for _ in 0..600 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.screen, Screen::YouWin);
        assert!(!state.fireworks.is_empty());
    }

    #[test]
    fn test_extra_life_power_up() {
        let mut state = playing_state(8);
        let center = state.paddle.rect.center();
        state.power_ups.push(PowerUp::new(center, PowerUpKind::ExtraLife));
        let paddle_before = state.paddle.clone();

        tick(&mut state, &TickInput::default());

        assert_eq!(state.lives, START_LIVES + 1);
        assert!(state.power_ups.is_empty());
        assert_eq!(state.paddle.has_laser, paddle_before.has_laser);
        assert_eq!(state.paddle.is_glued, paddle_before.is_glued);
        assert_eq!(state.paddle.is_grown, paddle_before.is_grown);
        assert_eq!(state.paddle.is_shrunk, paddle_before.is_shrunk);
        assert!(!state.ball.is_slowed);
        let message = state.message.as_ref().expect("pickup message");
        assert_eq!(message.text, "Extra Life!");
        assert_eq!(message.ticks, POWER_UP_MESSAGE_TICKS);
    }

    #[test]
    fn test_multi_power_up_spawns_two_balls() {
        let mut state = playing_state(9);
        let center = state.paddle.rect.center();
        state.power_ups.push(PowerUp::new(center, PowerUpKind::Multi));

        tick(&mut state, &TickInput::default());

        assert_eq!(state.extra_balls.len(), 2);
        for ball in &state.extra_balls {
            assert_eq!(ball.pos, state.ball.pos);
            assert_eq!(ball.vel.y, -MULTI_BALL_SPEED);
            assert_eq!(ball.vel.x.abs(), MULTI_BALL_SPEED);
            assert!(!ball.is_glued);
        }
    }

    #[test]
    fn test_slow_power_up_targets_primary_ball() {
        let mut state = playing_state(10);
        let center = state.paddle.rect.center();
        state.power_ups.push(PowerUp::new(center, PowerUpKind::Slow));
        tick(&mut state, &TickInput::default());
        assert!(state.ball.is_slowed);
    }

    #[test]
    fn test_missed_power_up_falls_off_screen() {
        let mut state = playing_state(11);
        state
            .power_ups
            .push(PowerUp::new(Vec2::new(20.0, SCREEN_HEIGHT), PowerUpKind::Grow));
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.power_ups.is_empty());
        assert!(!state.paddle.is_grown);
    }

    #[test]
    fn test_laser_fire_and_brick_hit() {
        let mut state = playing_state(12);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };

        // No laser yet - nothing fires
        tick(&mut state, &fire);
        assert!(state.lasers.is_empty());

        state.paddle.activate_power_up(PowerUpKind::Laser);
        tick(&mut state, &fire);
        assert_eq!(state.lasers.len(), 2);
        assert!(state.events.contains(&GameEvent::LaserFired));

        // A bolt right under a brick destroys it and disappears
        state.lasers.clear();
        let target = state.bricks[35].rect;
        state.lasers.push(Laser::new(target.center_x(), target.bottom() + 5.0));
        let before = state.bricks.len();
        let score = state.score;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.bricks.len(), before - 1);
        assert_eq!(state.score, score + BRICK_SCORE);
        assert!(state.lasers.is_empty());
    }

    #[test]
    fn test_lasers_leave_screen() {
        let mut state = playing_state(13);
        state.bricks.truncate(1);
        state.bricks[0].rect = Rect::new(0.0, 50.0, 20.0, 20.0);
        state.lasers.push(Laser::new(600.0, 100.0));
        for _ in 0..20 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.lasers.is_empty());
        assert_eq!(state.bricks.len(), 1);
    }

    #[test]
    fn test_message_expires() {
        let mut state = playing_state(14);
        state.show_message("Hello", 3);
        for _ in 0..2 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.message.is_some());
        tick(&mut state, &TickInput::default());
        assert!(state.message.is_none());
    }

    #[test]
    fn test_mute_toggle() {
        let mut state = GameState::new(15);
        let mute = TickInput {
            toggle_mute: true,
            ..Default::default()
        };
        tick(&mut state, &mute);
        assert!(state.muted);
        tick(&mut state, &mute);
        assert!(!state.muted);
    }

    #[test]
    fn test_bounce_emits_particles() {
        let mut state = playing_state(16);
        state.ball.is_glued = false;
        state.ball.pos = Vec2::new(BALL_RADIUS + 1.0, 300.0);
        state.ball.vel = Vec2::new(-3.0, 1.0);
        tick(&mut state, &TickInput::default());
        assert!(state.events.contains(&GameEvent::Bounce));
        assert_eq!(state.particles.len(), BOUNCE_PARTICLES);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        for _ in 0..2000 {
            tick(&mut state1, &input);
            tick(&mut state2, &input);
        }

        let json1 = serde_json::to_string(&state1).expect("serialize");
        let json2 = serde_json::to_string(&state2).expect("serialize");
        assert_eq!(json1, json2);
        assert_eq!(state1.time_ticks, 2000);
    }

    #[test]
    fn test_autopilot_plays() {
        let mut state = GameState::new(2468);
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state, &input);
        }
        assert_ne!(state.screen, Screen::TitleScreen);
        assert!(state.score > 0 || state.lives < START_LIVES);
    }
}
