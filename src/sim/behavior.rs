//! Rabbit decision making
//!
//! Each tick a rabbit works down a fixed priority list and stops at the
//! first thing it decides to do:
//! running action > breeding > ready farm > food > water > sleep > wander.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::block::BlockKind;
use super::breeding;
use super::rabbit::{Action, FinishedAction, Meal, Rabbit};
use super::world::World;
use crate::consts::{RABBIT_SPEED, WORLD_MARGIN};
use crate::{Tuning, clamp_to_world, polar_to_cartesian};

/// Uniform draw from `[lo, hi)`, tolerating an empty range
fn random_between(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    lo + (hi - lo) * rng.random::<f32>()
}

/// Run the AI for every rabbit alive at the start of the tick
///
/// Rabbits born during this pass are appended to the character list and
/// get their first update next tick. Breeding cooldowns all run down before
/// anyone acts, so both parents of a litter end the tick on a full cooldown.
pub fn update_rabbits(world: &mut World, dt: f32) {
    let warden_pos = world.warden().map(|w| w.pos);
    for rabbit in world.characters.iter_mut().filter_map(|c| c.as_rabbit_mut()) {
        rabbit.cool_down(dt);
    }
    let count = world.characters.len();
    for index in 0..count {
        update_rabbit(world, index, warden_pos, dt);
    }
}

fn update_rabbit(world: &mut World, index: usize, warden_pos: Option<Vec2>, dt: f32) {
    let tuning = world.tuning;
    let Some(character) = world.characters.get_mut(index) else {
        return;
    };
    let Some(rabbit) = character.as_rabbit_mut() else {
        return;
    };

    let finished = rabbit.update_needs(dt, &tuning);
    let speed = RABBIT_SPEED * rabbit.speed_factor(&tuning);
    let busy = rabbit.is_busy();
    let breeding = rabbit.is_breeding;
    character.speed = speed;

    if let Some(FinishedAction {
        action: Action::Eating(Meal::Farm),
        facility: Some(farm_id),
    }) = finished
    {
        finish_farm_meal(world, index, farm_id);
    }

    if busy {
        return;
    }

    if breeding {
        breeding::continue_breeding(world, index);
        return;
    }

    // Matchmaking takes over next tick
    if try_start_breeding(world, index, &tuning) {
        return;
    }
    decide(world, index, warden_pos, dt, &tuning);
}

/// The meal is over: the farm is eaten up and the rabbit gets its bonus
///
/// If the farm vanished mid-meal (removed by the warden or finished by
/// another rabbit) there is no bonus.
fn finish_farm_meal(world: &mut World, index: usize, farm_id: u32) {
    let Some(block_index) = world
        .blocks
        .iter()
        .position(|b| b.id == farm_id && b.kind == BlockKind::Farm)
    else {
        return;
    };
    world.blocks.remove(block_index);

    let bonus = world.tuning.farm_meal_food;
    if let Some(character) = world.characters.get_mut(index) {
        if let Some(rabbit) = character.as_rabbit_mut() {
            rabbit.restore_food(bonus);
        }
        log::debug!("Rabbit #{} ate farm #{}", character.id, farm_id);
    }
}

/// Roll for breeding; true when the rabbit switched into breeding mode
fn try_start_breeding(world: &mut World, index: usize, tuning: &Tuning) -> bool {
    let eligible = world.characters[index]
        .as_rabbit()
        .is_some_and(|r| r.can_start_breeding(tuning));
    if !eligible || world.rng.random::<f32>() >= tuning.breed_chance {
        return false;
    }
    let Some(rabbit) = world.characters[index].as_rabbit_mut() else {
        return false;
    };
    rabbit.is_breeding = true;
    log::debug!("Rabbit #{} is looking for a mate", world.characters[index].id);
    true
}

/// Facility-seeking, sleeping and wandering for an idle rabbit
fn decide(world: &mut World, index: usize, warden_pos: Option<Vec2>, dt: f32, tuning: &Tuning) {
    let character = &world.characters[index];
    let pos = character.pos;
    let Some(rabbit) = character.as_rabbit() else {
        return;
    };
    let (food, water, sleep) = (rabbit.food_level, rabbit.water_level, rabbit.sleep_level);

    let mut target: Option<Vec2> = None;
    let mut seeking = false;

    // A ready farm beats the trough, whatever the hunger level
    if let Some(farm) = world.find_nearest_harvestable_farm(pos, tuning.facility_search_radius) {
        let farm_id = farm.id;
        if world.is_at_facility(character, farm) {
            start(world, index, |r| r.start_farm_meal(farm_id, tuning.farm_eat_duration));
            return;
        }
        target = Some(farm.interaction_point());
        seeking = true;
    } else if food < tuning.hungry_below {
        if let Some(block) = world.find_nearest_food_block(pos, tuning.facility_search_radius) {
            let block_id = block.id;
            if world.is_at_facility(character, block) {
                start(world, index, |r| r.start_eating(block_id, tuning.eat_duration));
                return;
            }
            target = Some(block.interaction_point());
            seeking = true;
        }
    }

    if water < tuning.thirsty_below {
        if let Some(block) = world.find_nearest_water_block(pos, tuning.facility_search_radius) {
            let block_id = block.id;
            if world.is_at_facility(character, block) {
                start(world, index, |r| r.start_drinking(block_id, tuning.drink_duration));
                return;
            }
            target = Some(block.interaction_point());
            seeking = true;
        }
    }

    if sleep < tuning.tired_below && !seeking {
        // Bed down further away from the warden
        let spot = warden_pos.map_or(pos, |w| pos + (pos - w) * tuning.sleep_flee_factor);
        let spot = clamp_to_world(spot, world.width, world.height, WORLD_MARGIN);
        if spot.distance(pos) < tuning.sleep_spot_reach {
            start(world, index, |r| r.start_sleeping(tuning));
            return;
        }
        target = Some(spot);
    }

    if target.is_some() {
        if let Some(rabbit) = world.characters[index].as_rabbit_mut() {
            rabbit.clear_wander();
        }
    }

    if !seeking && sleep >= tuning.tired_below {
        wander(world, index, dt, tuning);
    } else if let Some(target) = target {
        world.move_character_towards(index, target);
    }
}

fn start(world: &mut World, index: usize, begin: impl FnOnce(&mut Rabbit)) {
    if let Some(rabbit) = world.characters[index].as_rabbit_mut() {
        begin(rabbit);
    }
}

/// Idle roaming: walk to a nearby random point, pause, repeat
fn wander(world: &mut World, index: usize, dt: f32, tuning: &Tuning) {
    let (width, height) = (world.width, world.height);
    let pos = world.characters[index].pos;
    let rng = &mut world.rng;
    let Some(rabbit) = world.characters[index].as_rabbit_mut() else {
        return;
    };

    let pick = |rng: &mut Pcg32| {
        let angle = random_between(rng, 0.0, TAU);
        let dist = random_between(rng, tuning.wander_min_distance, tuning.wander_max_distance);
        clamp_to_world(pos + polar_to_cartesian(dist, angle), width, height, WORLD_MARGIN)
    };

    if rabbit.is_waiting {
        rabbit.wait_timer -= dt;
        if rabbit.wait_timer <= 0.0 {
            rabbit.is_waiting = false;
            rabbit.random_target = Some(pick(rng));
        }
        return;
    }

    let target = match rabbit.random_target {
        Some(t) => t,
        None => {
            let t = pick(rng);
            rabbit.random_target = Some(t);
            t
        }
    };

    if target.distance(pos) < tuning.wander_arrive_distance {
        rabbit.is_waiting = true;
        rabbit.wait_timer = random_between(rng, tuning.wander_min_wait, tuning.wander_max_wait);
        rabbit.random_target = None;
        return;
    }

    world.move_character_towards(index, target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::block::FARM_READY_STAGE;
    use crate::sim::rabbit::Rabbit;

    fn world() -> World {
        World::empty(11, Tuning::default())
    }

    fn rabbit_at(world: &World, index: usize) -> &Rabbit {
        world.characters[index].as_rabbit().expect("rabbit")
    }

    fn ready_farm(world: &mut World, at: Vec2) -> u32 {
        let id = world.insert_block(at, BlockKind::Farm);
        if let Some(plot) = world.blocks.iter_mut().find(|b| b.id == id).and_then(|b| b.farm.as_mut()) {
            plot.growth_stage = FARM_READY_STAGE;
            plot.growth_timer = 8.0;
        }
        id
    }

    #[test]
    fn test_hungry_rabbit_walks_to_food() {
        let mut world = world();
        world.insert_block(Vec2::new(525.0, 500.0), BlockKind::Food);
        // Food block snaps to (500, 500), center (525, 525): 40 units away
        world.spawn_rabbit(Vec2::new(485.0, 525.0), Rabbit::with_needs(20.0, 80.0, 80.0));

        let before = world.characters[0].pos.distance(Vec2::new(525.0, 525.0));
        update_rabbits(&mut world, SIM_DT);
        let after = world.characters[0].pos.distance(Vec2::new(525.0, 525.0));
        assert!(after < before);
        // Hunger slows the rabbit down
        assert_eq!(world.characters[0].speed, 0.75);
    }

    #[test]
    fn test_rabbit_at_trough_starts_eating() {
        let mut world = world();
        let food = world.insert_block(Vec2::new(500.0, 500.0), BlockKind::Food);
        world.spawn_rabbit(Vec2::new(520.0, 520.0), Rabbit::with_needs(20.0, 80.0, 80.0));

        update_rabbits(&mut world, SIM_DT);
        let r = rabbit_at(&world, 0);
        assert_eq!(r.action, Action::Eating(Meal::Trough));
        assert_eq!(r.target_facility, Some(food));
        assert_eq!(world.characters[0].pos, Vec2::new(520.0, 520.0));
    }

    #[test]
    fn test_ready_farm_preempts_food() {
        let mut world = world();
        world.insert_block(Vec2::new(600.0, 500.0), BlockKind::Food);
        ready_farm(&mut world, Vec2::new(400.0, 500.0));
        // Food is closer, but the farm wins even though the rabbit is only hungry
        world.spawn_rabbit(Vec2::new(550.0, 525.0), Rabbit::with_needs(20.0, 80.0, 80.0));

        update_rabbits(&mut world, SIM_DT);
        assert!(world.characters[0].pos.x < 550.0);

        // Standing on it: the farm meal starts even with a full belly
        let mut world = World::empty(11, Tuning::default());
        let farm2 = ready_farm(&mut world, Vec2::new(400.0, 500.0));
        world.spawn_rabbit(Vec2::new(425.0, 525.0), Rabbit::default());
        update_rabbits(&mut world, SIM_DT);
        let r = rabbit_at(&world, 0);
        assert_eq!(r.action, Action::Eating(Meal::Farm));
        assert_eq!(r.target_facility, Some(farm2));
    }

    #[test]
    fn test_farm_meal_removes_farm_and_feeds() {
        let mut world = world();
        ready_farm(&mut world, Vec2::new(400.0, 500.0));
        world.spawn_rabbit(Vec2::new(425.0, 525.0), Rabbit::with_needs(40.0, 100.0, 100.0));

        update_rabbits(&mut world, SIM_DT);
        assert!(rabbit_at(&world, 0).is_eating());

        let mut ticks = 0;
        while rabbit_at(&world, 0).is_eating() && ticks < 600 {
            update_rabbits(&mut world, SIM_DT);
            ticks += 1;
        }
        assert!(world.blocks.is_empty());
        // 40 + 3 s at 25/s capped at 100, then +30 capped again
        assert_eq!(rabbit_at(&world, 0).food_level, 100.0);
    }

    #[test]
    fn test_vanished_farm_gives_no_bonus() {
        let mut world = world();
        let farm = ready_farm(&mut world, Vec2::new(400.0, 500.0));
        world.spawn_rabbit(Vec2::new(425.0, 525.0), Rabbit::with_needs(10.0, 100.0, 100.0));
        update_rabbits(&mut world, SIM_DT);
        assert!(rabbit_at(&world, 0).is_eating());

        world.blocks.retain(|b| b.id != farm);
        if let Some(r) = world.characters[0].as_rabbit_mut() {
            r.action_timer = SIM_DT / 2.0;
        }
        let food_before = rabbit_at(&world, 0).food_level;
        update_rabbits(&mut world, SIM_DT);
        let r = rabbit_at(&world, 0);
        assert!(!r.is_eating());
        assert!(r.food_level < food_before + 1.0);
    }

    #[test]
    fn test_thirst_overrides_food_target() {
        let mut world = world();
        world.insert_block(Vec2::new(800.0, 500.0), BlockKind::Food);
        world.insert_block(Vec2::new(200.0, 500.0), BlockKind::Water);
        world.spawn_rabbit(Vec2::new(525.0, 525.0), Rabbit::with_needs(20.0, 20.0, 80.0));

        update_rabbits(&mut world, SIM_DT);
        assert!(world.characters[0].pos.x < 525.0);
    }

    #[test]
    fn test_tired_rabbit_sleeps_near_warden() {
        let mut world = world();
        world.spawn_warden(Vec2::new(1000.0, 1000.0));
        // 30 units from the warden: the sleep spot is 9 units away
        world.spawn_rabbit(Vec2::new(1030.0, 1000.0), Rabbit::with_needs(80.0, 80.0, 10.0));

        update_rabbits(&mut world, SIM_DT);
        assert!(rabbit_at(&world, 1).is_sleeping());
    }

    #[test]
    fn test_tired_rabbit_flees_warden() {
        let mut world = world();
        world.spawn_warden(Vec2::new(1000.0, 1000.0));
        world.spawn_rabbit(Vec2::new(1200.0, 1000.0), Rabbit::with_needs(80.0, 80.0, 10.0));

        update_rabbits(&mut world, SIM_DT);
        assert!(!rabbit_at(&world, 1).is_sleeping());
        assert!(world.characters[1].pos.x > 1200.0);
    }

    #[test]
    fn test_busy_rabbit_does_not_move() {
        let mut world = world();
        let mut rabbit = Rabbit::with_needs(80.0, 80.0, 80.0);
        rabbit.start_drinking(1, 1.0);
        world.spawn_rabbit(Vec2::new(300.0, 300.0), rabbit);

        for _ in 0..30 {
            update_rabbits(&mut world, SIM_DT);
        }
        assert_eq!(world.characters[0].pos, Vec2::new(300.0, 300.0));
    }

    #[test]
    fn test_wander_picks_target_and_waits() {
        let mut world = world();
        world.spawn_rabbit(Vec2::new(1000.0, 1000.0), Rabbit::with_needs(60.0, 80.0, 80.0));

        update_rabbits(&mut world, SIM_DT);
        let target = rabbit_at(&world, 0).random_target.expect("wander target");
        let d = target.distance(Vec2::new(1000.0, 1000.0));
        assert!((50.0..=150.0).contains(&d));

        // Drop the target onto the rabbit: it arrives and starts waiting
        let pos = world.characters[0].pos;
        if let Some(r) = world.characters[0].as_rabbit_mut() {
            r.random_target = Some(pos);
        }
        update_rabbits(&mut world, SIM_DT);
        let r = rabbit_at(&world, 0);
        assert!(r.is_waiting);
        assert!(r.random_target.is_none());
        assert!((1.0..=3.0).contains(&r.wait_timer));
    }

    #[test]
    fn test_newborn_waits_for_next_tick() {
        let mut world = world();
        for x in [100.0, 110.0] {
            let rabbit = Rabbit {
                is_breeding: true,
                ..Rabbit::with_needs(90.0, 90.0, 90.0)
            };
            world.spawn_rabbit(Vec2::new(x, 100.0), rabbit);
        }

        update_rabbits(&mut world, SIM_DT);
        assert_eq!(world.rabbit_count(), 3);
        // The second parent acted after the birth but keeps a full cooldown
        assert_eq!(rabbit_at(&world, 0).breeding_cooldown, 30.0);
        assert_eq!(rabbit_at(&world, 1).breeding_cooldown, 30.0);

        // The second parent went on to wander; the child has not acted yet
        assert!(rabbit_at(&world, 1).random_target.is_some());
        let child = rabbit_at(&world, 2);
        assert!(child.random_target.is_none());
        assert_eq!(child.action, Action::Idle);
    }

    fn eager_breeders() -> World {
        World::empty(
            11,
            Tuning {
                breed_chance: 1.0,
                ..Tuning::default()
            },
        )
    }

    #[test]
    fn test_eligible_rabbit_enters_breeding() {
        let mut world = eager_breeders();
        world.spawn_rabbit(Vec2::new(1000.0, 1000.0), Rabbit::with_needs(90.0, 90.0, 90.0));

        update_rabbits(&mut world, SIM_DT);
        let r = rabbit_at(&world, 0);
        assert!(r.is_breeding);
        assert!(r.random_target.is_none());
        assert_eq!(world.characters[0].pos, Vec2::new(1000.0, 1000.0));
    }

    #[test]
    fn test_new_breeder_skips_facilities() {
        let mut world = eager_breeders();
        world.insert_block(Vec2::new(500.0, 500.0), BlockKind::Water);
        // Thirsty and standing on the water, but breeding wins this tick
        world.spawn_rabbit(Vec2::new(525.0, 525.0), Rabbit::with_needs(90.0, 25.0, 90.0));

        for _ in 0..2 {
            update_rabbits(&mut world, SIM_DT);
            let r = rabbit_at(&world, 0);
            assert!(r.is_breeding);
            assert!(!r.is_busy());
        }
    }

    #[test]
    fn test_breeding_gate_rejects_ineligible() {
        let mut cooling = Rabbit::with_needs(90.0, 90.0, 90.0);
        cooling.breeding_cooldown = 5.0;
        let candidates = [
            Rabbit::with_needs(70.0, 90.0, 90.0),
            Rabbit::with_needs(90.0, 90.0, 10.0),
            cooling,
        ];
        for rabbit in candidates {
            let mut world = eager_breeders();
            world.spawn_rabbit(Vec2::new(1000.0, 1000.0), rabbit);
            update_rabbits(&mut world, SIM_DT);
            assert!(!rabbit_at(&world, 0).is_breeding);
        }

        // Eligible, but the dice never roll in its favour
        let mut world = World::empty(
            11,
            Tuning {
                breed_chance: 0.0,
                ..Tuning::default()
            },
        );
        world.spawn_rabbit(Vec2::new(1000.0, 1000.0), Rabbit::with_needs(90.0, 90.0, 90.0));
        for _ in 0..120 {
            update_rabbits(&mut world, SIM_DT);
        }
        assert!(!rabbit_at(&world, 0).is_breeding);
    }

    #[test]
    fn test_eligible_pair_has_one_litter() {
        let mut world = eager_breeders();
        let a = world.spawn_rabbit(Vec2::new(100.0, 100.0), Rabbit::with_needs(90.0, 90.0, 90.0));
        let b = world.spawn_rabbit(Vec2::new(200.0, 100.0), Rabbit::with_needs(90.0, 90.0, 90.0));

        let mut ticks = 0;
        while world.rabbit_count() < 3 && ticks < 600 {
            update_rabbits(&mut world, SIM_DT);
            ticks += 1;
        }
        assert_eq!(world.rabbit_count(), 3);

        // The parents walked towards each other at the same speed
        let child = world.characters[2].pos;
        assert_eq!(child.y, 100.0);
        assert!((child.x - 150.0).abs() <= 1.0);
        for id in [a, b] {
            let r = world.character(id).and_then(|c| c.as_rabbit()).expect("parent");
            assert!(!r.is_breeding);
            assert_eq!(r.breeding_cooldown, 30.0);
        }

        // Both parents are on cooldown, so no second litter
        for _ in 0..120 {
            update_rabbits(&mut world, SIM_DT);
        }
        assert_eq!(world.rabbit_count(), 3);
    }
}
