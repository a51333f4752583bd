//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order, ids never reused)
//! - No rendering or platform dependencies

pub mod behavior;
pub mod block;
mod breeding;
pub mod bullet;
pub mod character;
pub mod collision;
pub mod item;
pub mod pushout;
pub mod rabbit;
pub mod tick;
pub mod world;

#[cfg(test)]
mod proptests;

pub use block::{Block, BlockKind, FARM_READY_STAGE, FarmPlot};
pub use bullet::{Bullet, update_bullets};
pub use character::{Character, CharacterKind, Resources};
pub use collision::{Obstacles, Rect, Wall};
pub use item::{Equipment, Hotbar, Item, ItemKind};
pub use rabbit::{Action, FinishedAction, Meal, Rabbit};
pub use tick::{TickInput, tick};
pub use world::{Interactive, World, WorldSnapshot};
