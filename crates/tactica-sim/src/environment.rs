//! Once-per-turn environment step: smoke drift, fire spread and door resets.

use glam::IVec3;
use tactica_core::constants::{FIREPROOF, FIRE_SPREAD_STD_DEV};
use tactica_core::types::{DamageType, Position, TurnContext};
use tactica_world::Battlefield;

use crate::blockage::{horizontal_blockage, vertical_blockage};
use crate::lighting::calculate_terrain_lighting;
use crate::rng::RandomSource;

/// Spread smoke and fire for a new turn and apply their effects to occupants.
///
/// All smoke drifts the same way this turn. A burning tile may ignite its eight
/// neighbours on the same level. Terrain lighting is recomputed whenever
/// anything was burning at the start of the step.
pub fn prepare_new_turn(bf: &mut Battlefield, rng: &mut dyn RandomSource, ctx: &TurnContext) {
    let mut on_fire = Vec::new();
    let mut smoky = Vec::new();
    for tile in bf.grid.tiles() {
        if tile.fire() > 0 {
            on_fire.push(tile.position());
        }
        if tile.smoke() > 0 {
            smoky.push(tile.position());
        }
    }

    let drift = IVec3::new(rng.generate(-1, 1), rng.generate(-1, 1), 0);
    for &pos in &smoky {
        spread_smoke(bf, pos, drift);
    }
    for &pos in &on_fire {
        spread_fire(bf, pos, rng);
    }

    log::debug!(
        "new turn: {} smoking tiles drift {}, {} burning",
        smoky.len(),
        drift,
        on_fire.len()
    );
    if !on_fire.is_empty() {
        calculate_terrain_lighting(bf, ctx);
    }
}

fn smoke_at(bf: &Battlefield, pos: Position) -> Option<i32> {
    bf.tile(pos).map(|t| t.smoke())
}

fn add_smoke(bf: &mut Battlefield, pos: Position, amount: i32) {
    if let Some(tile) = bf.tile_mut(pos) {
        tile.add_smoke(amount);
    }
}

fn spread_smoke(bf: &mut Battlefield, pos: Position, drift: IVec3) {
    let Some(tile) = bf.tile(pos) else {
        return;
    };
    let (smoke, occupant) = (tile.smoke(), tile.unit());
    if let Some(unit) = occupant.and_then(|id| bf.unit_mut(id)) {
        unit.stun(smoke / 5 + 1);
    }

    let kind = DamageType::Smoke;
    let near = pos + drift;
    let far = near + drift;
    let near_open = smoke_at(bf, near).is_some() && horizontal_blockage(bf, pos, near, kind) == 0;
    if near_open && smoke_at(bf, near) == Some(0) {
        add_smoke(bf, near, smoke / 2);
    }
    if near_open && smoke_at(bf, far) == Some(0) && horizontal_blockage(bf, near, far, kind) == 0 {
        add_smoke(bf, far, smoke / 4);
    }

    let up = pos + IVec3::Z;
    if smoke_at(bf, up) == Some(0) && vertical_blockage(bf, pos, up, kind) == 0 {
        add_smoke(bf, up, smoke / 2);
    }

    if let Some(tile) = bf.tile_mut(pos) {
        tile.decay_smoke();
    }
}

fn spread_fire(bf: &mut Battlefield, pos: Position, rng: &mut dyn RandomSource) {
    let occupant = bf.tile(pos).and_then(|t| t.unit());
    if let Some(unit) = occupant.and_then(|id| bf.unit_mut(id)) {
        unit.damage(IVec3::ZERO, rng.generate(1, 12));
        if rng.generate(0, 2) == 1 {
            unit.set_fire(rng.generate(1, 5));
        }
    }

    for dx in -1..=1 {
        for dy in -1..=1 {
            let next = pos + IVec3::new(dx, dy, 0);
            let Some(tile) = bf.tile(next) else {
                continue;
            };
            if tile.fire() != 0 || horizontal_blockage(bf, pos, next, DamageType::Smoke) != 0 {
                continue;
            }
            let flammability = tile.flammability(&bf.parts);
            if flammability >= FIREPROOF {
                continue;
            }
            let threshold = rng.box_muller(0.0, FIRE_SPREAD_STD_DEV).abs();
            if f64::from(flammability) < threshold && rng.generate(0, flammability) < 2 {
                bf.ignite(next);
            }
        }
    }

    let parts = bf.parts.clone();
    if let Some(tile) = bf.tile_mut(pos) {
        tile.decay_fire(&parts);
    }
}

/// Shut every open or opening UFO door. Returns how many were closed.
pub fn close_ufo_doors(bf: &mut Battlefield) -> i32 {
    let parts = &bf.parts;
    bf.grid
        .tiles_mut()
        .iter_mut()
        .map(|tile| tile.close_ufo_door(parts))
        .sum()
}
