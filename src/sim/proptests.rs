//! Property tests for simulation invariants

use glam::Vec2;
use proptest::prelude::*;

use super::block::{Block, BlockKind};
use super::character::Character;
use super::collision::Obstacles;
use super::rabbit::{NEED_MAX, Rabbit};
use super::tick::{TickInput, tick};
use super::world::World;
use crate::Tuning;
use crate::consts::{BLOCK_SIZE, SIM_DT};

fn block_kind() -> impl Strategy<Value = BlockKind> {
    prop_oneof![
        Just(BlockKind::Wall),
        Just(BlockKind::Door),
        Just(BlockKind::Food),
        Just(BlockKind::Water),
        Just(BlockKind::Farm),
        Just(BlockKind::Fence),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn needs_stay_in_bounds(
        food in 0.0f32..=100.0,
        water in 0.0f32..=100.0,
        sleep in 0.0f32..=100.0,
        action in 0u8..4,
        ticks in 1u32..2000,
    ) {
        let tuning = Tuning::default();
        let mut rabbit = Rabbit::with_needs(food, water, sleep);
        match action {
            1 => rabbit.start_eating(1, tuning.eat_duration),
            2 => rabbit.start_drinking(1, tuning.drink_duration),
            3 => rabbit.start_sleeping(&tuning),
            _ => {}
        }
        for _ in 0..ticks {
            rabbit.update_needs(SIM_DT, &tuning);
            for level in [rabbit.food_level, rabbit.water_level, rabbit.sleep_level] {
                prop_assert!((0.0..=NEED_MAX).contains(&level));
            }
            let active = [rabbit.is_eating(), rabbit.is_drinking(), rabbit.is_sleeping()];
            prop_assert!(active.iter().filter(|a| **a).count() <= 1);
        }
    }

    #[test]
    fn movement_never_enters_obstacles(
        cells in prop::collection::vec((0u8..12, 0u8..12, block_kind()), 0..30),
        start in (30.0f32..570.0, 30.0f32..570.0),
        targets in prop::collection::vec((-100.0f32..700.0, -100.0f32..700.0), 1..6),
    ) {
        let blocks: Vec<Block> = cells
            .iter()
            .enumerate()
            .map(|(i, (cx, cy, kind))| {
                let pos = Vec2::new(*cx as f32, *cy as f32) * BLOCK_SIZE;
                Block::new(i as u32 + 1, pos, *kind)
            })
            .collect();
        let obstacles = Obstacles::new(&[], &blocks, 600.0, 600.0);

        let mut rabbit = Character::rabbit(0, Vec2::new(start.0, start.1), Rabbit::default());
        prop_assume!(!obstacles.blocks(&rabbit.rect()));

        for (tx, ty) in targets {
            for _ in 0..200 {
                rabbit.move_towards(Vec2::new(tx, ty), &obstacles);
                prop_assert!(!obstacles.blocks(&rabbit.rect()));
            }
        }
    }

    #[test]
    fn placed_blocks_never_overlap(
        placements in prop::collection::vec((0.0f32..2000.0, 0.0f32..2000.0, block_kind()), 1..40),
    ) {
        let mut world = World::empty(1, Tuning::default());
        let warden = world.spawn_warden(Vec2::new(1000.0, 1000.0));

        for (x, y, kind) in placements {
            let carrots = world.warden_resources().map_or(0, |r| r.carrots);
            let placed = world.place_block(Vec2::new(x, y), kind, Some(warden));
            let after = world.warden_resources().map_or(0, |r| r.carrots);
            if placed && kind == BlockKind::Farm {
                prop_assert_eq!(after, carrots - 1);
            } else {
                prop_assert_eq!(after, carrots);
            }
        }

        for (i, a) in world.blocks.iter().enumerate() {
            prop_assert!(a.rect().inside_bounds(world.width, world.height));
            prop_assert_eq!(a.pos, crate::snap_to_grid(a.pos));
            for b in world.blocks.iter().skip(i + 1) {
                prop_assert!(!a.rect().intersects(&b.rect()));
            }
            for c in &world.characters {
                prop_assert!(!a.rect().intersects(&c.rect()));
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn colony_run_keeps_invariants(seed in any::<u64>()) {
        let mut world = World::new(seed);
        let input = TickInput::default();
        for _ in 0..300 {
            tick(&mut world, &input, SIM_DT);
        }

        let obstacles = world.obstacles();
        for c in &world.characters {
            prop_assert!(c.rect().inside_bounds(world.width, world.height));
            prop_assert!(!obstacles.hits_layout(&c.rect()));
            if let Some(r) = c.as_rabbit() {
                for level in [r.food_level, r.water_level, r.sleep_level] {
                    prop_assert!((0.0..=NEED_MAX).contains(&level));
                }
                // Partners are mutual whenever both sides still exist
                if let Some(p) = r.breeding_partner {
                    if let Some(partner) = world.character(p).and_then(|pc| pc.as_rabbit()) {
                        if partner.is_breeding && r.is_breeding {
                            prop_assert!(partner.breeding_partner.is_none_or(|q| q == c.id));
                        }
                    }
                }
            }
        }
    }
}
