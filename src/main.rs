//! Rabbit Prison entry point
//!
//! Headless native runner: builds a colony, drives the warden through a short
//! scripted session and reports how the warren is doing.
//!
//! Usage: `rabbit-prison [tuning.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use rabbit_prison::Tuning;
    use rabbit_prison::consts::SIM_DT;
    use rabbit_prison::sim::{TickInput, World, tick};

    env_logger::init();
    log::info!("Rabbit Prison (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Failed to read tuning file {}: {}", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };
    let seed = args
        .next()
        .and_then(|s| match s.parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(e) => {
                log::warn!("Ignoring invalid seed {:?}: {}", s, e);
                None
            }
        })
        .unwrap_or(0xB0A7);

    let mut world = World::with_tuning(seed, tuning);
    log::info!("Game initialized with seed: {}", seed);

    for (second, input) in script().into_iter().enumerate() {
        // One-shot actions fire once; movement and aim are held for a second
        let held = TickInput {
            primary_at: None,
            remove_at: None,
            interact: false,
            select_slot: None,
            cycle_slot: 0,
            ..input.clone()
        };
        tick(&mut world, &input, SIM_DT);
        for _ in 1..60 {
            tick(&mut world, &held, SIM_DT);
        }
        if second % 10 == 9 {
            report(&world);
        }
    }

    // Let the colony run on its own for a few minutes
    let idle = TickInput::default();
    for minute in 1..=3 {
        for _ in 0..60 * 60 {
            tick(&mut world, &idle, SIM_DT);
        }
        log::info!("Unattended minute {}", minute);
        report(&world);
    }

    if let Some(json) = world.to_json() {
        log::debug!("Final snapshot: {}", json);
    }

    /// Warden session: fence a plot with a door and a farm, walk through
    /// the door, then fire a shot
    fn script() -> Vec<TickInput> {
        let at = |x: f32, y: f32| Some(Vec2::new(x, y));
        let walk = |dx: i32, dy: i32| TickInput {
            move_left: dx < 0,
            move_right: dx > 0,
            move_up: dy < 0,
            move_down: dy > 0,
            ..Default::default()
        };
        let place = |slot: usize, x: f32, y: f32| TickInput {
            select_slot: Some(slot),
            primary_at: at(x, y),
            ..Default::default()
        };
        let interact = TickInput {
            interact: true,
            ..Default::default()
        };

        let mut steps = vec![walk(-1, 0), place(6, 860.0, 620.0), place(3, 810.0, 560.0)];
        for x in [700.0, 750.0, 900.0, 950.0] {
            steps.push(place(7, x, 560.0));
        }
        // Bump into the closed door, open it, walk through
        steps.push(walk(0, 1));
        steps.push(interact);
        steps.push(walk(0, 1));
        steps.extend(std::iter::repeat_n(TickInput::default(), 10));
        steps.push(TickInput {
            select_slot: Some(0),
            aim_at: at(760.0, 900.0),
            primary_at: at(760.0, 900.0),
            ..Default::default()
        });
        steps.extend(std::iter::repeat_n(TickInput::default(), 12));
        steps
    }

    fn report(world: &World) {
        let rabbits: Vec<_> = world
            .characters
            .iter()
            .filter_map(|c| c.as_rabbit())
            .collect();
        let n = rabbits.len().max(1) as f32;
        let avg = |f: fn(&rabbit_prison::sim::Rabbit) -> f32| {
            rabbits.iter().map(|r| f(r)).sum::<f32>() / n
        };
        let resources = world.warden_resources();
        log::info!(
            "t={:.0}s rabbits={} food={:.1} water={:.1} sleep={:.1} busy={} breeding={} blocks={} carrots={}",
            world.time_ticks as f32 * SIM_DT,
            rabbits.len(),
            avg(|r| r.food_level),
            avg(|r| r.water_level),
            avg(|r| r.sleep_level),
            rabbits.iter().filter(|r| r.is_busy()).count(),
            rabbits.iter().filter(|r| r.is_breeding).count(),
            world.blocks.len(),
            resources.map_or(0, |r| r.carrots),
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation core has no browser entry point; a wasm host drives `sim::tick` directly
}
