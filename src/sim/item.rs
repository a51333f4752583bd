//! Items, equipment and the warden's hotbar slots

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::block::BlockKind;
use super::bullet::Bullet;
use super::collision::Rect;
use crate::consts::{HOTBAR_SLOTS, ITEM_SIZE, MUZZLE_OFFSET};
use crate::polar_to_cartesian;

/// Item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Fires bullets along the holder's aim
    Shotgun {
        /// Frame the gun last fired (drives the muzzle flash)
        last_fired_frame: Option<u64>,
    },
    Key,
}

impl ItemKind {
    pub fn shotgun() -> Self {
        ItemKind::Shotgun {
            last_fired_frame: None,
        }
    }
}

/// A usable item, on the ground or held by a character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub kind: ItemKind,
    pub pos: Vec2,
    /// Holding character id (None = lying on the ground)
    pub held_by: Option<u32>,
}

impl Item {
    pub fn new(id: u32, kind: ItemKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            held_by: None,
        }
    }

    #[inline]
    pub fn on_ground(&self) -> bool {
        self.held_by.is_none()
    }

    /// Footprint used when a door closes on the item
    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, ITEM_SIZE)
    }

    /// Use the item from `origin` aiming along `aim_angle`
    ///
    /// Returns a bullet for the caller to spawn when the item shoots.
    pub fn use_item(
        &mut self,
        origin: Vec2,
        aim_angle: f32,
        frame: u64,
        bullet_id: u32,
    ) -> Option<Bullet> {
        match &mut self.kind {
            ItemKind::Shotgun { last_fired_frame } => {
                *last_fired_frame = Some(frame);
                let muzzle = origin + polar_to_cartesian(MUZZLE_OFFSET, aim_angle);
                Some(Bullet::new(bullet_id, muzzle, aim_angle))
            }
            ItemKind::Key => None,
        }
    }
}

/// What a character can hold: a block template to place, or an item to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Equipment {
    Block(BlockKind),
    Item(u32),
}

impl Equipment {
    pub fn block_kind(&self) -> Option<BlockKind> {
        match self {
            Equipment::Block(kind) => Some(*kind),
            Equipment::Item(_) => None,
        }
    }

    pub fn item_id(&self) -> Option<u32> {
        match self {
            Equipment::Item(id) => Some(*id),
            Equipment::Block(_) => None,
        }
    }
}

/// Nine equipment slots with one selected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotbar {
    pub slots: [Option<Equipment>; HOTBAR_SLOTS],
    pub selected: usize,
}

impl Default for Hotbar {
    fn default() -> Self {
        Self {
            slots: [None; HOTBAR_SLOTS],
            selected: 0,
        }
    }
}

impl Hotbar {
    pub fn set_slot(&mut self, index: usize, equipment: Option<Equipment>) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = equipment;
        }
    }

    pub fn selected_equipment(&self) -> Option<Equipment> {
        self.slots.get(self.selected).copied().flatten()
    }

    /// Select a slot by index (out of range is ignored)
    pub fn select(&mut self, index: usize) -> bool {
        if index < HOTBAR_SLOTS {
            self.selected = index;
            true
        } else {
            false
        }
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % HOTBAR_SLOTS;
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + HOTBAR_SLOTS - 1) % HOTBAR_SLOTS;
    }

    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }
}
