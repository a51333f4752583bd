//! Straight-line projectiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Obstacles, Rect};
use crate::consts::{BULLET_SIZE, BULLET_SPEED};

/// A bullet entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    /// Travel direction (radians), fixed at creation
    pub angle: f32,
    /// Units per tick
    pub speed: f32,
    pub size: f32,
    pub active: bool,
}

impl Bullet {
    pub fn new(id: u32, pos: Vec2, angle: f32) -> Self {
        Self {
            id,
            pos,
            angle,
            speed: BULLET_SPEED,
            size: BULLET_SIZE,
            active: true,
        }
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        Vec2::new(self.angle.cos(), self.angle.sin()) * self.speed
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }

    /// Advance one tick
    pub fn update(&mut self) {
        if self.active {
            self.pos += self.velocity();
        }
    }

    pub fn out_of_bounds(&self, width: f32, height: f32) -> bool {
        self.pos.x < 0.0 || self.pos.x > width || self.pos.y < 0.0 || self.pos.y > height
    }
}

/// Move every bullet and drop the ones that left the world or hit something solid
///
/// Walls stop bullets, and so do blocking blocks (placed walls, fences,
/// closed doors). Characters are not hit.
pub fn update_bullets(bullets: &mut Vec<Bullet>, obstacles: &Obstacles) {
    for bullet in bullets.iter_mut() {
        bullet.update();
        if bullet.out_of_bounds(obstacles.width, obstacles.height)
            || obstacles.hits_layout(&bullet.rect())
        {
            bullet.active = false;
        }
    }
    bullets.retain(|b| b.active);
}
