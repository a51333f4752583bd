//! Rabbit needs: decay, restore, timed actions and speed penalties

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Upper bound for health and every need
pub const NEED_MAX: f32 = 100.0;

/// Timers within this of zero have run out (absorbs `dt` rounding drift)
const TIMER_EPSILON: f32 = 1e-4;

/// Where a meal comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Meal {
    /// A food block; the block survives
    Trough,
    /// A ready farm; the farm is eaten up when the meal finishes
    Farm,
}

/// What the rabbit is busy doing (at most one thing at a time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Idle,
    Eating(Meal),
    Drinking,
    Sleeping,
}

/// An action whose timer ran out during this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishedAction {
    pub action: Action,
    /// Block the rabbit was using, if any
    pub facility: Option<u32>,
}

/// Per-rabbit AI state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rabbit {
    pub health: f32,
    pub food_level: f32,
    pub water_level: f32,
    pub sleep_level: f32,

    pub action: Action,
    /// Seconds left in the current action
    pub action_timer: f32,
    /// Block id being used by the current action
    pub target_facility: Option<u32>,

    // Wandering
    pub random_target: Option<Vec2>,
    pub is_waiting: bool,
    pub wait_timer: f32,

    // Breeding
    pub is_breeding: bool,
    pub breeding_cooldown: f32,
    /// Partner rabbit id; only trusted after checking it still exists
    pub breeding_partner: Option<u32>,
}

impl Default for Rabbit {
    fn default() -> Self {
        Self::with_needs(NEED_MAX, NEED_MAX, NEED_MAX)
    }
}

impl Rabbit {
    pub fn with_needs(food: f32, water: f32, sleep: f32) -> Self {
        Self {
            health: NEED_MAX,
            food_level: food.clamp(0.0, NEED_MAX),
            water_level: water.clamp(0.0, NEED_MAX),
            sleep_level: sleep.clamp(0.0, NEED_MAX),
            action: Action::Idle,
            action_timer: 0.0,
            target_facility: None,
            random_target: None,
            is_waiting: false,
            wait_timer: 0.0,
            is_breeding: false,
            breeding_cooldown: 0.0,
            breeding_partner: None,
        }
    }

    #[inline]
    pub fn is_eating(&self) -> bool {
        matches!(self.action, Action::Eating(_))
    }

    #[inline]
    pub fn is_drinking(&self) -> bool {
        self.action == Action::Drinking
    }

    #[inline]
    pub fn is_sleeping(&self) -> bool {
        self.action == Action::Sleeping
    }

    /// Eating, drinking or sleeping - the rabbit stays put
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.action != Action::Idle
    }

    /// Run down the breeding cooldown
    pub fn cool_down(&mut self, dt: f32) {
        self.breeding_cooldown = (self.breeding_cooldown - dt).max(0.0);
    }

    /// Decay and restore needs, then run down the action timer
    ///
    /// Returns the action that completed this tick, so callers can react to
    /// the exact frame a meal ends.
    pub fn update_needs(&mut self, dt: f32, tuning: &Tuning) -> Option<FinishedAction> {
        self.food_level = if self.is_eating() {
            (self.food_level + tuning.food_restore * dt).min(NEED_MAX)
        } else {
            (self.food_level - tuning.food_decay * dt).max(0.0)
        };
        self.water_level = if self.is_drinking() {
            (self.water_level + tuning.water_restore * dt).min(NEED_MAX)
        } else {
            (self.water_level - tuning.water_decay * dt).max(0.0)
        };
        self.sleep_level = if self.is_sleeping() {
            (self.sleep_level + tuning.sleep_restore * dt).min(NEED_MAX)
        } else {
            (self.sleep_level - tuning.sleep_decay * dt).max(0.0)
        };

        if self.action == Action::Idle {
            return None;
        }

        self.action_timer -= dt;
        if self.action_timer > TIMER_EPSILON {
            return None;
        }

        if self.is_sleeping() && self.sleep_level < NEED_MAX {
            // Sleep until rested, not for a fixed time
            self.action_timer = (NEED_MAX - self.sleep_level) / tuning.sleep_restore;
            return None;
        }

        let finished = FinishedAction {
            action: self.action,
            facility: self.target_facility.take(),
        };
        self.action = Action::Idle;
        self.action_timer = 0.0;
        Some(finished)
    }

    pub fn start_eating(&mut self, facility: u32, duration: f32) {
        self.begin(Action::Eating(Meal::Trough), Some(facility), duration);
    }

    pub fn start_farm_meal(&mut self, farm: u32, duration: f32) {
        self.begin(Action::Eating(Meal::Farm), Some(farm), duration);
    }

    pub fn start_drinking(&mut self, facility: u32, duration: f32) {
        self.begin(Action::Drinking, Some(facility), duration);
    }

    /// Lie down; the timer covers at least the time needed to fully rest
    pub fn start_sleeping(&mut self, tuning: &Tuning) {
        let needed = (NEED_MAX - self.sleep_level) / tuning.sleep_restore;
        self.begin(
            Action::Sleeping,
            None,
            tuning.min_sleep_duration.max(needed),
        );
    }

    fn begin(&mut self, action: Action, facility: Option<u32>, duration: f32) {
        self.action = action;
        self.action_timer = duration;
        self.target_facility = facility;
        self.clear_wander();
    }

    /// Drop any wander target and stop waiting
    pub fn clear_wander(&mut self) {
        self.random_target = None;
        self.is_waiting = false;
    }

    pub fn restore_food(&mut self, amount: f32) {
        self.food_level = (self.food_level + amount).min(NEED_MAX);
    }

    /// Movement multiplier from hunger and thirst
    pub fn speed_factor(&self, tuning: &Tuning) -> f32 {
        if self.food_level < tuning.starving_below || self.water_level < tuning.starving_below {
            tuning.crawl_speed_factor
        } else if self.food_level < tuning.hungry_below || self.water_level < tuning.thirsty_below
        {
            tuning.slow_speed_factor
        } else {
            1.0
        }
    }

    /// Healthy, fed, rested and off cooldown
    pub fn can_start_breeding(&self, tuning: &Tuning) -> bool {
        !self.is_breeding
            && self.health >= NEED_MAX
            && self.food_level >= tuning.breed_min_food
            && self.breeding_cooldown <= 0.0
            && self.sleep_level >= tuning.breed_min_sleep
    }

    /// Leave breeding mode after a successful mating
    pub fn finish_breeding(&mut self, cooldown: f32) {
        self.is_breeding = false;
        self.breeding_partner = None;
        self.breeding_cooldown = cooldown;
    }
}
