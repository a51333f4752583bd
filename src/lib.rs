//! Rabbit Prison - A top-down colony simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world, rabbits, blocks, movement, bullets)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, input wiring and window bootstrapping are not part of this
//! crate: a presentation layer feeds [`sim::TickInput`] in and reads
//! [`sim::WorldSnapshot`] out.

pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 2000.0;
    pub const WORLD_HEIGHT: f32 = 2000.0;
    /// Keep-out margin used when clamping wander targets and sleep spots
    pub const WORLD_MARGIN: f32 = 50.0;

    /// Grid cell / block edge length
    pub const BLOCK_SIZE: f32 = 50.0;

    /// Character defaults (speeds are per tick, not per second)
    pub const CHARACTER_SIZE: f32 = 20.0;
    pub const WARDEN_SPEED: f32 = 3.0;
    pub const RABBIT_SPEED: f32 = 1.0;
    pub const WARDEN_START: (f32, f32) = (1000.0, 500.0);
    pub const STARTING_CARROTS: u32 = 10;
    pub const STARTING_MONEY: u32 = 100;

    /// Distance at which a rabbit can use a facility or reach a partner
    pub const INTERACT_RANGE: f32 = 30.0;
    /// Distance at which the warden picks up ground items
    pub const PICKUP_RANGE: f32 = 30.0;
    /// Warden reach for doors
    pub const DOOR_REACH: f32 = 40.0;
    /// Warden reach for farms and highlighted objects
    pub const HARVEST_REACH: f32 = 50.0;

    /// Bullet defaults
    pub const BULLET_SPEED: f32 = 15.0;
    pub const BULLET_SIZE: f32 = 3.0;
    /// Muzzle distance from the holder's center (barrel + receiver + tip)
    pub const MUZZLE_OFFSET: f32 = 42.0;

    /// Ground item footprint used by the door push-out
    pub const ITEM_SIZE: f32 = 10.0;

    /// Hotbar slot count
    pub const HOTBAR_SLOTS: usize = 9;
}

/// Snap a world point down to the top-left corner of its grid cell
#[inline]
pub fn snap_to_grid(p: Vec2) -> Vec2 {
    (p / consts::BLOCK_SIZE).floor() * consts::BLOCK_SIZE
}

/// Clamp a point into the world, keeping `margin` away from every edge
#[inline]
pub fn clamp_to_world(p: Vec2, width: f32, height: f32, margin: f32) -> Vec2 {
    Vec2::new(
        p.x.clamp(margin, width - margin),
        p.y.clamp(margin, height - margin),
    )
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
