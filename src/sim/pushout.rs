//! Clearing a doorway when a door swings shut
//!
//! Anything standing in the door cell is moved to the nearest free cell on
//! rings around the door. Bullets caught in the cell are destroyed.

use glam::Vec2;

use super::block::Block;
use super::collision::{Obstacles, Rect};
use super::world::World;
use crate::consts::BLOCK_SIZE;
use crate::{polar_to_cartesian, snap_to_grid};

/// Ring radii searched around the door center
const SEARCH_RADII: [f32; 3] = [BLOCK_SIZE, BLOCK_SIZE * 2.0, BLOCK_SIZE * 3.0];
/// Compass directions per ring
const SEARCH_DIRECTIONS: u32 = 8;

/// Where to put something found in `door`'s cell at `from`
///
/// Returns the center of the first in-bounds cell on the search rings that
/// is clear of walls and blocking blocks (the door itself excluded). With no
/// free cell, pushes directly away from the door center by two cells, or one
/// cell north when `from` is the center.
pub fn free_spot(obstacles: &Obstacles, door: &Block, from: Vec2) -> Vec2 {
    let center = door.interaction_point();

    for radius in SEARCH_RADII {
        for step in 0..SEARCH_DIRECTIONS {
            let angle = (step as f32 * 45.0).to_radians();
            let cell = snap_to_grid(center + polar_to_cartesian(radius, angle));
            let rect = Rect::new(cell.x, cell.y, BLOCK_SIZE, BLOCK_SIZE);
            if !rect.inside_bounds(obstacles.width, obstacles.height) {
                continue;
            }
            let blocked = obstacles.walls.iter().any(|w| rect.intersects(&w.rect))
                || obstacles
                    .blocks
                    .iter()
                    .any(|b| b.id != door.id && b.blocks_movement() && rect.intersects(&b.rect()));
            if !blocked {
                return rect.center();
            }
        }
    }

    let away = from - center;
    if away == Vec2::ZERO {
        center - Vec2::new(0.0, BLOCK_SIZE)
    } else {
        center + away.normalize() * BLOCK_SIZE * 2.0
    }
}

/// Relocate characters and ground items out of a door that just closed
pub(crate) fn clear_doorway(world: &mut World, door_id: u32) {
    let Some(door) = world.block(door_id).cloned() else {
        return;
    };
    let door_rect = door.rect();

    let World {
        walls,
        blocks,
        characters,
        items,
        bullets,
        width,
        height,
        ..
    } = world;
    let obstacles = Obstacles::new(walls, blocks, *width, *height);

    for character in characters
        .iter_mut()
        .filter(|c| c.rect().intersects(&door_rect))
    {
        let to = free_spot(&obstacles, &door, character.pos);
        log::debug!(
            "Door #{} pushed character #{} to ({:.0}, {:.0})",
            door_id,
            character.id,
            to.x,
            to.y
        );
        character.pos = to;
    }

    for item in items
        .iter_mut()
        .filter(|i| i.on_ground() && i.rect().intersects(&door_rect))
    {
        item.pos = free_spot(&obstacles, &door, item.pos);
    }

    bullets.retain(|b| !b.rect().intersects(&door_rect));
}
