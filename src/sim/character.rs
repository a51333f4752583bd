//! Characters (the warden and rabbits) and how they move

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Obstacles, Rect};
use super::item::Equipment;
use super::rabbit::Rabbit;
use crate::consts::{CHARACTER_SIZE, RABBIT_SPEED, STARTING_CARROTS, STARTING_MONEY, WARDEN_SPEED};

/// The warden's stockpile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub carrots: u32,
    pub money: u32,
    pub rabbit_meat: u32,
    pub rabbit_poop: u32,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            carrots: STARTING_CARROTS,
            money: STARTING_MONEY,
            rabbit_meat: 0,
            rabbit_poop: 0,
        }
    }
}

/// Character variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CharacterKind {
    /// Player-controlled
    Warden(Resources),
    /// Autonomous
    Rabbit(Rabbit),
}

/// A character entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: u32,
    pub kind: CharacterKind,
    /// Center of the character's box
    pub pos: Vec2,
    pub size: f32,
    /// Units per tick
    pub speed: f32,
    pub held_item: Option<Equipment>,
    /// Facing (radians)
    pub aim_angle: f32,
    /// Last non-zero movement delta
    pub last_move: Vec2,
    pub animation_frame: u32,
    pub frame_count: u64,
}

impl Character {
    fn new(id: u32, pos: Vec2, speed: f32, kind: CharacterKind) -> Self {
        Self {
            id,
            kind,
            pos,
            size: CHARACTER_SIZE,
            speed,
            held_item: None,
            aim_angle: 0.0,
            last_move: Vec2::ZERO,
            animation_frame: 0,
            frame_count: 0,
        }
    }

    pub fn warden(id: u32, pos: Vec2) -> Self {
        Self::new(id, pos, WARDEN_SPEED, CharacterKind::Warden(Resources::default()))
    }

    pub fn rabbit(id: u32, pos: Vec2, rabbit: Rabbit) -> Self {
        Self::new(id, pos, RABBIT_SPEED, CharacterKind::Rabbit(rabbit))
    }

    #[inline]
    pub fn is_warden(&self) -> bool {
        matches!(self.kind, CharacterKind::Warden(_))
    }

    pub fn as_rabbit(&self) -> Option<&Rabbit> {
        match &self.kind {
            CharacterKind::Rabbit(r) => Some(r),
            CharacterKind::Warden(_) => None,
        }
    }

    pub fn as_rabbit_mut(&mut self) -> Option<&mut Rabbit> {
        match &mut self.kind {
            CharacterKind::Rabbit(r) => Some(r),
            CharacterKind::Warden(_) => None,
        }
    }

    pub fn resources(&self) -> Option<&Resources> {
        match &self.kind {
            CharacterKind::Warden(res) => Some(res),
            CharacterKind::Rabbit(_) => None,
        }
    }

    pub fn resources_mut(&mut self) -> Option<&mut Resources> {
        match &mut self.kind {
            CharacterKind::Warden(res) => Some(res),
            CharacterKind::Rabbit(_) => None,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }

    /// Apply a displacement with no collision check
    pub fn move_by(&mut self, delta: Vec2) {
        if delta == Vec2::ZERO {
            return;
        }
        self.pos += delta;
        self.last_move = delta;
        self.animation_frame = self.animation_frame.wrapping_add(1);
    }

    /// Face towards a world point
    pub fn aim_at(&mut self, target: Vec2) {
        let d = target - self.pos;
        if d != Vec2::ZERO {
            self.aim_angle = d.y.atan2(d.x);
        }
    }

    pub fn equip(&mut self, equipment: Option<Equipment>) {
        self.held_item = equipment;
    }

    /// Keyboard-style step: x first, then y from the new position
    ///
    /// `dir` components are expected in -1..=1. Each axis is applied only if
    /// it leaves the character unobstructed.
    pub fn walk(&mut self, dir: Vec2, obstacles: &Obstacles) -> bool {
        let mut moved = false;
        let dx = Vec2::new(dir.x * self.speed, 0.0);
        if dx.x != 0.0 && !obstacles.check_move(self.pos, self.size, dx) {
            self.move_by(dx);
            moved = true;
        }
        let dy = Vec2::new(0.0, dir.y * self.speed);
        if dy.y != 0.0 && !obstacles.check_move(self.pos, self.size, dy) {
            self.move_by(dy);
            moved = true;
        }
        moved
    }

    /// Step towards `target` at the current speed, sliding along obstacles
    ///
    /// Tries the full step first; when that is blocked tries the x component
    /// alone, then the y component alone from wherever that left us. Sleeping
    /// rabbits don't move. Returns whether any movement happened.
    pub fn move_towards(&mut self, target: Vec2, obstacles: &Obstacles) -> bool {
        if self.as_rabbit().is_some_and(Rabbit::is_sleeping) {
            return false;
        }

        let to = target - self.pos;
        let dist = to.length();
        if dist < 1.0 {
            return false;
        }
        let step = to / dist * self.speed.min(dist);

        if !obstacles.check_move(self.pos, self.size, step) {
            self.move_by(step);
            return true;
        }

        let mut moved = false;
        if step.x.abs() > 0.1 {
            let sx = Vec2::new(step.x, 0.0);
            if !obstacles.check_move(self.pos, self.size, sx) {
                self.move_by(sx);
                moved = true;
            }
        }
        if step.y.abs() > 0.1 {
            let sy = Vec2::new(0.0, step.y);
            if !obstacles.check_move(self.pos, self.size, sy) {
                self.move_by(sy);
                moved = true;
            }
        }
        moved
    }
}
