//! Level table and brick wall generation

use super::entities::Brick;
use super::geometry::Rect;
use crate::Color;
use crate::consts::{BRICK_HEIGHT, BRICK_PADDING, WALL_START_Y};

const RED: Color = [178, 34, 34];
const ORANGE: Color = [255, 165, 0];
const GOLD: Color = [255, 215, 0];
const GREEN: Color = [50, 205, 50];
const SKY_BLUE: Color = [0, 191, 255];
const VIOLET: Color = [138, 43, 226];

/// Grid dimensions and row palette for one level
#[derive(Debug, Clone, Copy)]
pub struct LevelDef {
    pub rows: usize,
    pub cols: usize,
    /// Row `r` uses `palette[r % palette.len()]`
    pub palette: &'static [Color],
}

/// Levels in play order
pub const LEVELS: [LevelDef; 3] = [
    LevelDef {
        rows: 4,
        cols: 10,
        palette: &[RED, ORANGE, GOLD, GREEN],
    },
    LevelDef {
        rows: 6,
        cols: 12,
        palette: &[RED, ORANGE, GOLD, GREEN, SKY_BLUE],
    },
    LevelDef {
        rows: 8,
        cols: 14,
        palette: &[RED, ORANGE, GOLD, GREEN, SKY_BLUE, VIOLET],
    },
];

/// Brick width tier: wider columns need narrower bricks to fit the screen
pub fn brick_width_for_cols(cols: usize) -> f32 {
    match cols {
        0..=10 => 75.0,
        11..=12 => 55.0,
        _ => 45.0,
    }
}

/// Build the brick wall for `level_index`
///
/// The caller validates the index against [`LEVELS`].
pub fn create_brick_wall(level_index: usize) -> Vec<Brick> {
    let level = &LEVELS[level_index];
    let width = brick_width_for_cols(level.cols);

    let mut bricks = Vec::with_capacity(level.rows * level.cols);
    for row in 0..level.rows {
        let color = level.palette[row % level.palette.len()];
        let y = row as f32 * (BRICK_HEIGHT + BRICK_PADDING) + WALL_START_Y;
        for col in 0..level.cols {
            let x = col as f32 * (width + BRICK_PADDING) + BRICK_PADDING;
            bricks.push(Brick {
                rect: Rect::new(x, y, width, BRICK_HEIGHT),
                color,
            });
        }
    }
    bricks
}
