//! Game balance tuning
//!
//! Every rate, threshold and duration the rabbit AI and farms use. Defaults
//! are the shipped balance; a JSON document can override any subset of them.

use serde::{Deserialize, Serialize};

/// Balance knobs for needs, behavior, breeding and farming
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Need decay (points per second) ===
    pub food_decay: f32,
    pub water_decay: f32,
    pub sleep_decay: f32,

    // === Need restore while acting (points per second) ===
    pub food_restore: f32,
    pub water_restore: f32,
    pub sleep_restore: f32,

    // === Thresholds ===
    /// Below this the rabbit looks for food and slows down
    pub hungry_below: f32,
    /// Below this the rabbit looks for water and slows down
    pub thirsty_below: f32,
    /// Below this the rabbit looks for a sleep spot
    pub tired_below: f32,
    /// Below this (food or water) the rabbit crawls
    pub starving_below: f32,

    // === Action durations (seconds) ===
    pub eat_duration: f32,
    pub drink_duration: f32,
    pub farm_eat_duration: f32,
    /// Minimum sleep; rabbits keep sleeping until fully rested anyway
    pub min_sleep_duration: f32,
    /// Flat food bonus when a farm meal completes
    pub farm_meal_food: f32,

    // === Facility search ===
    pub facility_search_radius: f32,
    /// How far a sleep spot is pushed away from the warden
    pub sleep_flee_factor: f32,
    pub sleep_spot_reach: f32,

    // === Movement speed multipliers ===
    pub slow_speed_factor: f32,
    pub crawl_speed_factor: f32,

    // === Wandering ===
    pub wander_min_distance: f32,
    pub wander_max_distance: f32,
    pub wander_min_wait: f32,
    pub wander_max_wait: f32,
    pub wander_arrive_distance: f32,

    // === Breeding ===
    /// Per-tick chance an eligible rabbit starts looking for a mate
    pub breed_chance: f32,
    pub breed_min_food: f32,
    pub breed_min_sleep: f32,
    pub breed_cooldown: f32,

    // === Farming ===
    pub farm_seed_time: f32,
    pub farm_growth_time: f32,
    pub harvest_min_carrots: u32,
    pub harvest_max_carrots: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            food_decay: 0.5,
            water_decay: 0.8,
            sleep_decay: 0.3,

            food_restore: 25.0,
            water_restore: 50.0,
            sleep_restore: 20.0,

            hungry_below: 30.0,
            thirsty_below: 30.0,
            tired_below: 20.0,
            starving_below: 10.0,

            eat_duration: 2.0,
            drink_duration: 1.0,
            farm_eat_duration: 3.0,
            min_sleep_duration: 5.0,
            farm_meal_food: 30.0,

            facility_search_radius: 500.0,
            sleep_flee_factor: 0.3,
            sleep_spot_reach: 20.0,

            slow_speed_factor: 0.75,
            crawl_speed_factor: 0.5,

            wander_min_distance: 50.0,
            wander_max_distance: 150.0,
            wander_min_wait: 1.0,
            wander_max_wait: 3.0,
            wander_arrive_distance: 15.0,

            breed_chance: 0.05,
            breed_min_food: 75.0,
            breed_min_sleep: 20.0,
            breed_cooldown: 30.0,

            farm_seed_time: 1.0,
            farm_growth_time: 10.0,
            harvest_min_carrots: 1,
            harvest_max_carrots: 5,
        }
    }
}

impl Tuning {
    /// Parse a JSON override document; missing fields keep their defaults
    ///
    /// Only an object of named fields is accepted.
    pub fn from_json(json: &str) -> Option<Self> {
        let value = match serde_json::from_str::<serde_json::Value>(json) {
            Ok(value) if value.is_object() => value,
            Ok(_) => {
                log::warn!("Ignoring tuning JSON: expected an object of named fields");
                return None;
            }
            Err(e) => {
                log::warn!("Ignoring invalid tuning JSON: {}", e);
                return None;
            }
        };
        match serde_json::from_value::<Tuning>(value) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                Some(tuning)
            }
            Err(e) => {
                log::warn!("Ignoring invalid tuning JSON: {}", e);
                None
            }
        }
    }

    /// Parse a JSON override document, falling back to defaults
    pub fn from_json_or_default(json: &str) -> Self {
        Self::from_json(json).unwrap_or_default()
    }

    /// Serialize the current balance (handy for dumping a template file)
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
