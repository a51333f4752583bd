//! Breeding matchmaking
//!
//! Partners are referenced by id and re-validated every tick, so a partner
//! that disappeared or paired up elsewhere is simply dropped.

use super::world::World;
use crate::consts::INTERACT_RANGE;

/// Can `candidate` be (or remain) `me`'s partner?
fn is_available_partner(world: &World, me: u32, candidate: u32) -> bool {
    candidate != me
        && world
            .character(candidate)
            .and_then(|c| c.as_rabbit())
            .is_some_and(|r| r.is_breeding && r.breeding_partner.is_none_or(|p| p == me))
}

/// Nearest other breeding rabbit that is free or already waiting for `me`
fn find_mate(world: &World, index: usize) -> Option<u32> {
    let me = world.characters.get(index)?;
    world
        .characters
        .iter()
        .filter(|c| is_available_partner(world, me.id, c.id))
        .map(|c| (c.id, c.pos.distance(me.pos)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

fn set_partner(world: &mut World, index: usize, partner: Option<u32>) {
    if let Some(r) = world.characters.get_mut(index).and_then(|c| c.as_rabbit_mut()) {
        r.breeding_partner = partner;
    }
}

/// One breeding step for the rabbit at `index`
///
/// Validates or finds a partner, walks towards it, and once the two are
/// close enough ends breeding for both and spawns a child between them.
pub(crate) fn continue_breeding(world: &mut World, index: usize) {
    let Some(me) = world.characters.get(index) else {
        return;
    };
    let (my_id, my_pos) = (me.id, me.pos);

    let current = me
        .as_rabbit()
        .and_then(|r| r.breeding_partner)
        .filter(|&p| is_available_partner(world, my_id, p));

    let partner_id = match current {
        Some(p) => p,
        None => {
            set_partner(world, index, None);
            let Some(p) = find_mate(world, index) else {
                return;
            };
            set_partner(world, index, Some(p));
            if let Some(j) = world.character_index(p) {
                set_partner(world, j, Some(my_id));
            }
            log::debug!("Rabbits #{} and #{} paired up", my_id, p);
            p
        }
    };

    let Some(j) = world.character_index(partner_id) else {
        return;
    };
    let partner_pos = world.characters[j].pos;

    if my_pos.distance(partner_pos) >= INTERACT_RANGE {
        world.move_character_towards(index, partner_pos);
        return;
    }

    let cooldown = world.tuning.breed_cooldown;
    for k in [index, j] {
        if let Some(r) = world.characters[k].as_rabbit_mut() {
            r.finish_breeding(cooldown);
        }
    }

    let child = world.random_rabbit();
    let child_id = world.spawn_rabbit((my_pos + partner_pos) / 2.0, child);
    log::info!(
        "Rabbit #{} born to #{} and #{} ({} rabbits)",
        child_id,
        my_id,
        partner_id,
        world.rabbit_count()
    );
}
