//! Turns a [`GameState`] into colored triangles in screen coordinates

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::color_to_rgba;
use crate::sim::{Ball, Firework, GameState, Paddle, Screen};

const BALL_SEGMENTS: u32 = 20;
const PARTICLE_SEGMENTS: u32 = 6;

/// Build the full frame for the current screen
///
/// Game objects are only drawn while playing and fireworks only on the win
/// screen. Particles show on every screen.
pub fn build_scene(state: &GameState) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(4096);

    match state.screen {
        Screen::Playing => push_playfield(&mut vertices, state),
        Screen::YouWin => {
            for firework in &state.fireworks {
                push_firework(&mut vertices, firework);
            }
        }
        Screen::TitleScreen | Screen::GameOver => {}
    }

    for particle in &state.particles {
        let color = color_to_rgba(particle.color, 1.0);
        vertices.extend(shapes::circle(particle.pos, particle.size, color, PARTICLE_SEGMENTS));
    }

    vertices
}

/// Paddle color reflects its active power-up
pub fn paddle_color(paddle: &Paddle) -> [f32; 4] {
    if paddle.has_laser {
        colors::PADDLE_LASER
    } else if paddle.is_glued {
        colors::PADDLE_STICKY
    } else {
        colors::PADDLE
    }
}

fn push_playfield(vertices: &mut Vec<Vertex>, state: &GameState) {
    for brick in &state.bricks {
        vertices.extend(shapes::rect(&brick.rect, color_to_rgba(brick.color, 1.0)));
    }
    for power_up in &state.power_ups {
        vertices.extend(shapes::rect(&power_up.rect, color_to_rgba(power_up.kind.color(), 1.0)));
    }
    for laser in &state.lasers {
        vertices.extend(shapes::rect(&laser.rect, colors::LASER));
    }

    vertices.extend(shapes::rect(&state.paddle.rect, paddle_color(&state.paddle)));

    push_ball(vertices, &state.ball);
    for ball in &state.extra_balls {
        push_ball(vertices, ball);
    }
}

fn push_ball(vertices: &mut Vec<Vertex>, ball: &Ball) {
    vertices.extend(shapes::circle(ball.pos, ball.radius, colors::BALL, BALL_SEGMENTS));
    if ball.is_slowed {
        vertices.extend(shapes::ring(
            ball.pos,
            ball.radius + 1.0,
            ball.radius + 3.0,
            colors::SLOW_RING,
            BALL_SEGMENTS,
        ));
    }
}

fn push_firework(vertices: &mut Vec<Vertex>, firework: &Firework) {
    let color = color_to_rgba(firework.color, 1.0);
    if !firework.exploded {
        vertices.extend(shapes::circle(firework.pos, 3.0, color, PARTICLE_SEGMENTS));
        return;
    }
    for spark in &firework.sparks {
        vertices.extend(shapes::circle(spark.pos, spark.size, color, PARTICLE_SEGMENTS));
    }
}
