//! World state and spatial queries
//!
//! The world owns every entity collection and is the only place entities are
//! created or destroyed. Iteration order is insertion order, which together
//! with the seeded RNG keeps runs reproducible.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::block::{Block, BlockKind};
use super::bullet::Bullet;
use super::character::{Character, Resources};
use super::collision::{Obstacles, Rect, Wall};
use super::item::{Equipment, Hotbar, Item, ItemKind};
use super::pushout;
use super::rabbit::Rabbit;
use crate::Tuning;
use crate::consts::*;
use crate::snap_to_grid;

/// Something the warden can interact with near a point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Interactive {
    Door(u32),
    Item(u32),
    Farm(u32),
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub width: f32,
    pub height: f32,
    pub walls: Vec<Wall>,
    pub blocks: Vec<Block>,
    pub characters: Vec<Character>,
    pub items: Vec<Item>,
    pub bullets: Vec<Bullet>,
    /// The warden's equipment slots
    pub hotbar: Hotbar,
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl World {
    /// Create the starting colony with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create the starting colony: warden, six rabbits, troughs, fountains,
    /// scattered keys and the default hotbar
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut world = Self::empty(seed, tuning);

        let warden_id = world.spawn_warden(Vec2::new(WARDEN_START.0, WARDEN_START.1));

        for (x, y) in [
            (150.0, 150.0),
            (370.0, 150.0),
            (590.0, 150.0),
            (150.0, 370.0),
            (370.0, 370.0),
            (590.0, 370.0),
        ] {
            let rabbit = world.random_rabbit();
            world.spawn_rabbit(Vec2::new(x, y), rabbit);
        }

        for (x, y) in [(300.0, 300.0), (700.0, 300.0), (1100.0, 300.0)] {
            world.insert_block(Vec2::new(x, y), BlockKind::Food);
        }
        for (x, y) in [(500.0, 500.0), (900.0, 500.0)] {
            world.insert_block(Vec2::new(x, y), BlockKind::Water);
        }

        for (x, y) in [(500.0, 300.0), (800.0, 400.0), (1200.0, 600.0)] {
            world.spawn_item(ItemKind::Key, Vec2::new(x, y));
        }

        // Starting loadout: the warden carries a shotgun and a key
        let warden_pos = Vec2::new(WARDEN_START.0, WARDEN_START.1);
        let shotgun = world.spawn_item(ItemKind::shotgun(), warden_pos);
        let key = world.spawn_item(ItemKind::Key, warden_pos);
        for id in [shotgun, key] {
            if let Some(item) = world.item_mut(id) {
                item.held_by = Some(warden_id);
            }
        }

        let loadout = [
            Some(Equipment::Item(shotgun)),
            Some(Equipment::Item(key)),
            Some(Equipment::Block(BlockKind::Wall)),
            Some(Equipment::Block(BlockKind::Door)),
            Some(Equipment::Block(BlockKind::Food)),
            Some(Equipment::Block(BlockKind::Water)),
            Some(Equipment::Block(BlockKind::Farm)),
            Some(Equipment::Block(BlockKind::Fence)),
            None,
        ];
        for (i, equipment) in loadout.into_iter().enumerate() {
            world.hotbar.set_slot(i, equipment);
        }
        world.equip_selected();

        log::info!(
            "World created: seed={} rabbits={} blocks={}",
            seed,
            world.rabbit_count(),
            world.blocks.len()
        );
        world
    }

    /// Bare world: no walls, entities or equipment
    pub fn empty(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            walls: Vec::new(),
            blocks: Vec::new(),
            characters: Vec::new(),
            items: Vec::new(),
            bullets: Vec::new(),
            hotbar: Hotbar::default(),
            tuning,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Rabbit with full health and needs drawn from 50-100
    pub fn random_rabbit(&mut self) -> Rabbit {
        let food = self.rng.random_range(50.0..100.0);
        let water = self.rng.random_range(50.0..100.0);
        let sleep = self.rng.random_range(50.0..100.0);
        Rabbit::with_needs(food, water, sleep)
    }

    pub fn spawn_warden(&mut self, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.characters.push(Character::warden(id, pos));
        id
    }

    pub fn spawn_rabbit(&mut self, pos: Vec2, rabbit: Rabbit) -> u32 {
        let id = self.next_entity_id();
        self.characters.push(Character::rabbit(id, pos, rabbit));
        id
    }

    pub fn spawn_item(&mut self, kind: ItemKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.items.push(Item::new(id, kind, pos));
        id
    }

    pub fn add_wall(&mut self, wall: Wall) {
        self.walls.push(wall);
    }

    /// Insert a block at a grid-snapped cell without any placement checks
    pub fn insert_block(&mut self, pos: Vec2, kind: BlockKind) -> u32 {
        let id = self.next_entity_id();
        let pos = snap_to_grid(pos);
        let block = match kind {
            BlockKind::Farm => Block::new_farm(
                id,
                pos,
                self.tuning.farm_seed_time,
                self.tuning.farm_growth_time,
            ),
            _ => Block::new(id, pos, kind),
        };
        self.blocks.push(block);
        id
    }

    // --- Lookups ---

    pub fn warden(&self) -> Option<&Character> {
        self.characters.iter().find(|c| c.is_warden())
    }

    pub fn warden_mut(&mut self) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.is_warden())
    }

    pub fn warden_resources(&self) -> Option<&Resources> {
        self.warden().and_then(Character::resources)
    }

    pub fn character(&self, id: u32) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn character_index(&self, id: u32) -> Option<usize> {
        self.characters.iter().position(|c| c.id == id)
    }

    pub fn block(&self, id: u32) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn item_mut(&mut self, id: u32) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    pub fn rabbit_count(&self) -> usize {
        self.characters.iter().filter(|c| c.as_rabbit().is_some()).count()
    }

    /// Borrowed view of the static layout for collision tests
    pub fn obstacles(&self) -> Obstacles<'_> {
        Obstacles::new(&self.walls, &self.blocks, self.width, self.height)
    }

    /// Would `character` be blocked after moving by `delta`?
    pub fn check_collision(&self, character: &Character, delta: Vec2) -> bool {
        self.obstacles()
            .check_move(character.pos, character.size, delta)
    }

    /// Step the character at `index` towards `target`, sliding along obstacles
    pub fn move_character_towards(&mut self, index: usize, target: Vec2) -> bool {
        let obstacles = Obstacles::new(&self.walls, &self.blocks, self.width, self.height);
        self.characters
            .get_mut(index)
            .is_some_and(|c| c.move_towards(target, &obstacles))
    }

    /// Step the character at `index` along a key-style direction
    pub fn walk_character(&mut self, index: usize, dir: Vec2) -> bool {
        let obstacles = Obstacles::new(&self.walls, &self.blocks, self.width, self.height);
        self.characters
            .get_mut(index)
            .is_some_and(|c| c.walk(dir, &obstacles))
    }

    // --- Facility searches ---

    /// Nearest block matching `filter`, with its center distance from `pos`
    fn nearest_block(&self, pos: Vec2, filter: impl Fn(&Block) -> bool) -> Option<(&Block, f32)> {
        let mut best: Option<(&Block, f32)> = None;
        for block in self.blocks.iter().filter(|&b| filter(b)) {
            let dist = block.interaction_point().distance(pos);
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((block, dist));
            }
        }
        best
    }

    /// Searches used by rabbits: the center must be strictly closer than `max_dist`
    fn find_nearest(&self, pos: Vec2, max_dist: f32, filter: impl Fn(&Block) -> bool) -> Option<&Block> {
        self.nearest_block(pos, filter)
            .filter(|(_, d)| *d < max_dist)
            .map(|(b, _)| b)
    }

    /// Warden reach checks: the center may be exactly `max_dist` away
    fn find_within(&self, pos: Vec2, max_dist: f32, filter: impl Fn(&Block) -> bool) -> Option<&Block> {
        self.nearest_block(pos, filter)
            .filter(|(_, d)| *d <= max_dist)
            .map(|(b, _)| b)
    }

    pub fn find_nearest_food_block(&self, pos: Vec2, max_dist: f32) -> Option<&Block> {
        self.find_nearest(pos, max_dist, |b| b.kind == BlockKind::Food)
    }

    pub fn find_nearest_water_block(&self, pos: Vec2, max_dist: f32) -> Option<&Block> {
        self.find_nearest(pos, max_dist, |b| b.kind == BlockKind::Water)
    }

    pub fn find_nearest_harvestable_farm(&self, pos: Vec2, max_dist: f32) -> Option<&Block> {
        self.find_nearest(pos, max_dist, Block::is_harvestable)
    }

    /// Close enough to use the block
    pub fn is_at_facility(&self, character: &Character, block: &Block) -> bool {
        block.interaction_point().distance(character.pos) < INTERACT_RANGE
    }

    /// Nearest door whose center lies within `max_dist`
    pub fn nearby_door(&self, pos: Vec2, max_dist: f32) -> Option<&Block> {
        self.find_within(pos, max_dist, |b| b.kind == BlockKind::Door)
    }

    /// Nearest ready farm whose center lies within `max_dist`
    pub fn nearby_harvestable_farm(&self, pos: Vec2, max_dist: f32) -> Option<&Block> {
        self.find_within(pos, max_dist, Block::is_harvestable)
    }

    /// Doors, ground items and ready farms the warden could act on from `pos`
    pub fn interactive_objects_near(&self, pos: Vec2, max_dist: f32) -> Vec<Interactive> {
        let mut found = Vec::new();
        if let Some(door) = self.nearby_door(pos, max_dist) {
            found.push(Interactive::Door(door.id));
        }
        found.extend(
            self.items
                .iter()
                .filter(|i| i.on_ground() && i.pos.distance(pos) <= max_dist)
                .map(|i| Interactive::Item(i.id)),
        );
        found.extend(
            self.blocks
                .iter()
                .filter(|b| b.is_harvestable() && b.interaction_point().distance(pos) <= max_dist)
                .map(|b| Interactive::Farm(b.id)),
        );
        found
    }

    // --- Block editing ---

    /// Place a block on the grid cell under `pos`
    ///
    /// Farms cost the placer one carrot, taken only when placement succeeds.
    /// Rejected when the cell is outside the world or overlaps a block or a
    /// character.
    pub fn place_block(&mut self, pos: Vec2, kind: BlockKind, placer: Option<u32>) -> bool {
        let cell = snap_to_grid(pos);
        let rect = Rect::new(cell.x, cell.y, BLOCK_SIZE, BLOCK_SIZE);

        if !rect.inside_bounds(self.width, self.height) {
            return false;
        }

        let cost = kind.carrot_cost();
        if cost > 0 {
            let carrots = placer
                .and_then(|id| self.character(id))
                .and_then(Character::resources)
                .map_or(0, |r| r.carrots);
            if carrots < cost {
                return false;
            }
        }

        if self.blocks.iter().any(|b| rect.intersects(&b.rect()))
            || self.characters.iter().any(|c| rect.intersects(&c.rect()))
        {
            return false;
        }

        if cost > 0 {
            if let Some(res) = placer
                .and_then(|id| self.characters.iter_mut().find(|c| c.id == id))
                .and_then(Character::resources_mut)
            {
                res.carrots -= cost;
            }
        }

        let id = self.insert_block(cell, kind);
        log::debug!("Placed {} #{} at ({}, {})", kind.as_str(), id, cell.x, cell.y);
        true
    }

    /// Remove the block occupying the cell under `pos`
    pub fn remove_block(&mut self, pos: Vec2) -> bool {
        let cell = snap_to_grid(pos);
        let Some(index) = self.blocks.iter().position(|b| b.pos == cell) else {
            return false;
        };
        let block = self.blocks.remove(index);
        log::debug!("Removed {} #{}", block.kind.as_str(), block.id);
        true
    }

    /// Open or close the door in the cell under `pos`
    ///
    /// Closing pushes anything standing in the doorway out to a free cell.
    pub fn toggle_door(&mut self, pos: Vec2) -> bool {
        let cell = snap_to_grid(pos);
        let Some(door) = self
            .blocks
            .iter_mut()
            .find(|b| b.kind == BlockKind::Door && b.pos == cell)
        else {
            return false;
        };

        door.is_open = !door.is_open;
        let closed = !door.is_open;
        let door_id = door.id;
        log::debug!("Door #{} {}", door_id, if closed { "closed" } else { "opened" });

        if closed {
            pushout::clear_doorway(self, door_id);
        }
        true
    }

    /// Harvest a ready farm, crediting the warden with 1-5 carrots
    ///
    /// Returns the number of carrots gained (None if nothing was harvested).
    pub fn harvest_farm(&mut self, block_id: u32) -> Option<u32> {
        let block = self.blocks.iter_mut().find(|b| b.id == block_id)?;
        if !block.harvest() {
            return None;
        }
        let min = self.tuning.harvest_min_carrots;
        let max = self.tuning.harvest_max_carrots.max(min);
        let carrots = self.rng.random_range(min..=max);
        if let Some(res) = self.warden_mut().and_then(Character::resources_mut) {
            res.carrots += carrots;
        }
        log::info!("Harvested farm #{} for {} carrots", block_id, carrots);
        Some(carrots)
    }

    /// Select a hotbar slot's equipment into the warden's hands
    pub fn equip_selected(&mut self) {
        let equipment = self.hotbar.selected_equipment();
        if let Some(warden) = self.warden_mut() {
            warden.equip(equipment);
        }
    }

    // --- Read-only view ---

    pub fn snapshot(&self) -> WorldSnapshot<'_> {
        WorldSnapshot {
            time_ticks: self.time_ticks,
            width: self.width,
            height: self.height,
            walls: &self.walls,
            blocks: &self.blocks,
            characters: &self.characters,
            items: &self.items,
            bullets: &self.bullets,
            hotbar: &self.hotbar,
            warden: self.warden_resources(),
        }
    }

    /// Snapshot as JSON (None if serialization fails)
    pub fn to_json(&self) -> Option<String> {
        match serde_json::to_string(&self.snapshot()) {
            Ok(json) => Some(json),
            Err(e) => {
                log::warn!("Failed to serialize world snapshot: {}", e);
                None
            }
        }
    }
}

/// Read-only view of the world for a presentation layer
#[derive(Debug, Serialize)]
pub struct WorldSnapshot<'a> {
    pub time_ticks: u64,
    pub width: f32,
    pub height: f32,
    pub walls: &'a [Wall],
    pub blocks: &'a [Block],
    pub characters: &'a [Character],
    pub items: &'a [Item],
    pub bullets: &'a [Bullet],
    pub hotbar: &'a Hotbar,
    pub warden: Option<&'a Resources>,
}
