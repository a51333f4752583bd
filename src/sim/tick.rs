//! Fixed timestep simulation tick
//!
//! Advances the world deterministically: warden input, bullets, farm
//! growth, rabbit AI, then item pickup.

use glam::Vec2;

use super::behavior;
use super::bullet::update_bullets;
use super::collision::Obstacles;
use super::item::Equipment;
use super::world::World;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement intents (W/A/S/D or arrows)
    pub move_up: bool,
    pub move_down: bool,
    pub move_left: bool,
    pub move_right: bool,
    /// Pointer position in world coordinates; the warden faces it
    pub aim_at: Option<Vec2>,
    /// Primary action at a world point (place the held block or use the held item)
    pub primary_at: Option<Vec2>,
    /// Remove the block under a world point
    pub remove_at: Option<Vec2>,
    /// Toggle a nearby door, or harvest a nearby ready farm
    pub interact: bool,
    /// Select hotbar slot by index (0-based)
    pub select_slot: Option<usize>,
    /// Hotbar scroll: positive = next slot, negative = previous
    pub cycle_slot: i32,
}

impl TickInput {
    /// Unit-per-axis movement direction from the four intents
    pub fn move_dir(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i32 - neg as i32) as f32;
        Vec2::new(
            axis(self.move_left, self.move_right),
            axis(self.move_up, self.move_down),
        )
    }
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    update_warden(world, input);

    let obstacles = Obstacles::new(&world.walls, &world.blocks, world.width, world.height);
    update_bullets(&mut world.bullets, &obstacles);

    for block in world.blocks.iter_mut() {
        block.update_growth(dt);
    }

    behavior::update_rabbits(world, dt);

    pickup_items(world);

    world.time_ticks += 1;
}

fn update_warden(world: &mut World, input: &TickInput) {
    let Some(index) = world.characters.iter().position(|c| c.is_warden()) else {
        return;
    };
    world.characters[index].frame_count += 1;

    let dir = input.move_dir();
    if dir != Vec2::ZERO {
        world.walk_character(index, dir);
    }

    if let Some(aim) = input.aim_at {
        world.characters[index].aim_at(aim);
    }

    let mut reselected = false;
    if let Some(slot) = input.select_slot {
        reselected |= world.hotbar.select(slot);
    }
    if input.cycle_slot > 0 {
        world.hotbar.select_next();
        reselected = true;
    } else if input.cycle_slot < 0 {
        world.hotbar.select_prev();
        reselected = true;
    }
    if reselected {
        world.equip_selected();
    }

    if let Some(at) = input.primary_at {
        primary_action(world, index, at);
    }

    if let Some(at) = input.remove_at {
        world.remove_block(at);
    }

    if input.interact {
        interact(world, index);
    }
}

/// Place the held block, or use the held item
fn primary_action(world: &mut World, index: usize, at: Vec2) {
    let warden = &world.characters[index];
    let Some(held) = warden.held_item else {
        return;
    };
    if let Some(kind) = held.block_kind() {
        let placer = warden.id;
        world.place_block(at, kind, Some(placer));
    } else if let Some(item_id) = held.item_id() {
        let (origin, aim, frame) = (warden.pos, warden.aim_angle, warden.frame_count);
        let bullet_id = world.next_entity_id();
        let bullet = world
            .item_mut(item_id)
            .and_then(|item| item.use_item(origin, aim, frame, bullet_id));
        if let Some(bullet) = bullet {
            world.bullets.push(bullet);
        }
    }
}

/// Doors take precedence over farms
fn interact(world: &mut World, index: usize) {
    let pos = world.characters[index].pos;
    if let Some(door) = world.nearby_door(pos, DOOR_REACH).map(|d| d.pos) {
        world.toggle_door(door);
    } else if let Some(farm) = world.nearby_harvestable_farm(pos, HARVEST_REACH).map(|b| b.id) {
        world.harvest_farm(farm);
    }
}

/// Pick up at most one nearby ground item into the first free hotbar slot
fn pickup_items(world: &mut World) {
    let Some(warden) = world.warden() else {
        return;
    };
    let (warden_id, warden_pos) = (warden.id, warden.pos);

    let Some(slot) = world.hotbar.first_empty() else {
        return;
    };
    let Some(item) = world
        .items
        .iter_mut()
        .find(|i| i.on_ground() && i.pos.distance(warden_pos) < PICKUP_RANGE)
    else {
        return;
    };

    item.held_by = Some(warden_id);
    let item_id = item.id;
    world.hotbar.set_slot(slot, Some(Equipment::Item(item_id)));
    world.hotbar.select(slot);
    world.equip_selected();
    log::debug!("Picked up item #{} into slot {}", item_id, slot + 1);
}
