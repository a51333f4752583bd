//! Collision detection against the block layout
//!
//! Everything in the world is an axis-aligned box: characters are centered
//! squares, blocks and walls are grid-aligned squares/rectangles. Boxes only
//! collide when their interiors overlap, so neighbours sharing an edge are fine.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::block::Block;

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Square of edge `size` centered on `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        Self {
            min: center - Vec2::splat(size / 2.0),
            size: Vec2::splat(size),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// True when the two rectangles share a non-empty area
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }

    /// True when the rectangle lies entirely inside `[0, width] x [0, height]`
    #[inline]
    pub fn inside_bounds(&self, width: f32, height: f32) -> bool {
        let max = self.max();
        self.min.x >= 0.0 && self.min.y >= 0.0 && max.x <= width && max.y <= height
    }
}

/// A static wall segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub rect: Rect,
}

impl Wall {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
        }
    }
}

/// Borrowed view of everything that blocks movement
///
/// Kept separate from the character list so a character can be moved while
/// the layout is being read.
#[derive(Debug, Clone, Copy)]
pub struct Obstacles<'a> {
    pub walls: &'a [Wall],
    pub blocks: &'a [Block],
    pub width: f32,
    pub height: f32,
}

impl<'a> Obstacles<'a> {
    pub fn new(walls: &'a [Wall], blocks: &'a [Block], width: f32, height: f32) -> Self {
        Self {
            walls,
            blocks,
            width,
            height,
        }
    }

    /// Does the box hit a wall or a blocking block?
    pub fn hits_layout(&self, rect: &Rect) -> bool {
        self.walls.iter().any(|w| rect.intersects(&w.rect))
            || self
                .blocks
                .iter()
                .any(|b| b.blocks_movement() && rect.intersects(&b.rect()))
    }

    /// Full character test: layout plus world bounds
    pub fn blocks(&self, rect: &Rect) -> bool {
        self.hits_layout(rect) || !rect.inside_bounds(self.width, self.height)
    }

    /// Would a character of `size` centered at `pos` be blocked after moving by `delta`?
    pub fn check_move(&self, pos: Vec2, size: f32, delta: Vec2) -> bool {
        self.blocks(&Rect::centered(pos + delta, size))
    }
}
