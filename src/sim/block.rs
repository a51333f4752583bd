//! Placeable grid blocks and the farm growth state machine

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::BLOCK_SIZE;

/// Block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Concrete wall
    Wall,
    /// Blocks while closed, passable while open
    Door,
    /// Feeding trough (facility)
    Food,
    /// Water fountain (facility)
    Water,
    /// Carrot plot, grows through four stages
    Farm,
    Fence,
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Wall => "wall",
            BlockKind::Door => "door",
            BlockKind::Food => "food",
            BlockKind::Water => "water",
            BlockKind::Farm => "farm",
            BlockKind::Fence => "fence",
        }
    }

    /// Carrots consumed by placing one of these
    pub fn carrot_cost(&self) -> u32 {
        match self {
            BlockKind::Farm => 1,
            _ => 0,
        }
    }
}

/// Farm growth stage 3 - ready to harvest or be eaten
pub const FARM_READY_STAGE: u8 = 3;

/// Growth state of a farm plot
///
/// Stage 0 is freshly tilled soil; after the seed time it becomes planted
/// (1), then growing (2), then ready (3) as the growth timer fills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmPlot {
    pub growth_stage: u8,
    pub growth_timer: f32,
    pub growth_time: f32,
    pub seed_time: f32,
}

impl Default for FarmPlot {
    fn default() -> Self {
        Self::new(1.0, 10.0)
    }
}

impl FarmPlot {
    pub fn new(seed_time: f32, growth_time: f32) -> Self {
        Self {
            growth_stage: 0,
            growth_timer: 0.0,
            growth_time,
            seed_time,
        }
    }

    /// Advance growth by `dt` seconds
    pub fn update_growth(&mut self, dt: f32) {
        self.growth_timer += dt;

        if self.growth_stage == 0 {
            if self.growth_timer >= self.seed_time {
                self.growth_stage = 1;
                self.growth_timer = 0.0;
            }
            return;
        }

        let progress = self.growth_timer / self.growth_time;
        self.growth_stage = if progress < 0.33 {
            1
        } else if progress < 0.66 {
            2
        } else {
            FARM_READY_STAGE
        };
    }

    #[inline]
    pub fn is_harvestable(&self) -> bool {
        self.growth_stage == FARM_READY_STAGE
    }

    /// Reset a ready plot to bare soil. Returns whether anything was harvested.
    pub fn harvest(&mut self) -> bool {
        if !self.is_harvestable() {
            return false;
        }
        self.growth_stage = 0;
        self.growth_timer = 0.0;
        true
    }
}

/// A placed block occupying exactly one grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    /// Top-left corner, grid-aligned
    pub pos: Vec2,
    pub kind: BlockKind,
    pub size: f32,
    /// Doors only
    pub is_open: bool,
    /// Farms only
    pub farm: Option<FarmPlot>,
}

impl Block {
    pub fn new(id: u32, pos: Vec2, kind: BlockKind) -> Self {
        Self {
            id,
            pos,
            kind,
            size: BLOCK_SIZE,
            is_open: false,
            farm: (kind == BlockKind::Farm).then(FarmPlot::default),
        }
    }

    /// Farm with explicit timing (from tuning)
    pub fn new_farm(id: u32, pos: Vec2, seed_time: f32, growth_time: f32) -> Self {
        Self {
            farm: Some(FarmPlot::new(seed_time, growth_time)),
            ..Self::new(id, pos, BlockKind::Farm)
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }

    /// Where a character stands to use this block (its center)
    #[inline]
    pub fn interaction_point(&self) -> Vec2 {
        self.rect().center()
    }

    /// Open doors, food, water and farms can be walked over
    pub fn blocks_movement(&self) -> bool {
        match self.kind {
            BlockKind::Door => !self.is_open,
            BlockKind::Food | BlockKind::Water | BlockKind::Farm => false,
            BlockKind::Wall | BlockKind::Fence => true,
        }
    }

    pub fn is_harvestable(&self) -> bool {
        self.farm.as_ref().is_some_and(FarmPlot::is_harvestable)
    }

    pub fn growth_stage(&self) -> Option<u8> {
        self.farm.as_ref().map(|f| f.growth_stage)
    }

    pub fn update_growth(&mut self, dt: f32) {
        if let Some(farm) = self.farm.as_mut() {
            farm.update_growth(dt);
        }
    }

    pub fn harvest(&mut self) -> bool {
        self.farm.as_mut().is_some_and(FarmPlot::harvest)
    }
}
