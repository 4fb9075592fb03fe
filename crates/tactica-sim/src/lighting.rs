//! Whole-grid light recomputation for the three light layers.

use glam::IVec3;
use tactica_core::constants::{
    AMBIENT_LAYER, DYNAMIC_LAYER, FIRE_LIGHT_POWER, MAX_LIGHT, PERSONAL_LIGHT_POWER,
    STATIC_LAYER, SUN_BLOCKED_PENALTY, SUN_SHADOW_MAX_SHADE,
};
use tactica_core::math::rounded_distance;
use tactica_core::types::{DamageType, Faction, Position, TilePart, TurnContext};
use tactica_world::Battlefield;

use crate::blockage::vertical_blockage;

/// Recompute sunlight on every tile.
///
/// By day a tile with any floor between it and the top of the map is darker.
pub fn calculate_sun_shading(bf: &mut Battlefield, ctx: &TurnContext) {
    let top = bf.grid.height() - 1;
    let base = MAX_LIGHT - ctx.global_shade;
    for index in 0..bf.grid.len() {
        let Some(pos) = bf.grid.position_of(index) else {
            continue;
        };
        let mut power = base;
        if ctx.global_shade <= SUN_SHADOW_MAX_SHADE {
            let sky = IVec3::new(pos.x, pos.y, top);
            if vertical_blockage(bf, sky, pos, DamageType::None) != 0 {
                power -= SUN_BLOCKED_PENALTY;
            }
        }
        if let Some(tile) = bf.grid.get_mut(pos) {
            tile.reset_light(AMBIENT_LAYER);
            tile.add_light(power, AMBIENT_LAYER);
        }
    }
}

/// Recompute terrain light sources and fires.
///
/// Daylight washes artificial light out entirely, so at global shade 0 the
/// layer is only cleared.
pub fn calculate_terrain_lighting(bf: &mut Battlefield, ctx: &TurnContext) {
    reset_layer(bf, STATIC_LAYER);
    if ctx.global_shade < 1 {
        return;
    }

    let mut sources: Vec<(Position, i32)> = Vec::new();
    for tile in bf.grid.tiles() {
        for slot in [TilePart::Floor, TilePart::Object] {
            if let Some(def) = tile.part_def(slot, &bf.parts) {
                if def.light_source > 0 {
                    sources.push((tile.position(), def.light_source));
                }
            }
        }
        if tile.fire() > 0 {
            sources.push((tile.position(), FIRE_LIGHT_POWER));
        }
    }

    log::debug!("terrain lighting: {} sources", sources.len());
    for (center, power) in sources {
        add_light(bf, center, power, STATIC_LAYER);
    }
}

/// Recompute the light carried by active player units. Same day rule as terrain light.
pub fn calculate_unit_lighting(bf: &mut Battlefield, ctx: &TurnContext) {
    reset_layer(bf, DYNAMIC_LAYER);
    if ctx.global_shade < 1 {
        return;
    }

    let carriers: Vec<Position> = bf
        .units
        .iter()
        .filter(|u| u.faction == Faction::Player && !u.is_out())
        .map(|u| u.position)
        .collect();
    for center in carriers {
        add_light(bf, center, PERSONAL_LIGHT_POWER, DYNAMIC_LAYER);
    }
}

/// Radiate light from a column: every level at horizontal distance `d` receives
/// `power - d`. Geometry is ignored.
pub fn add_light(bf: &mut Battlefield, center: Position, power: i32, layer: usize) {
    for x in 0..=power {
        for y in 0..=power {
            let value = power - rounded_distance(x, y);
            for z in 0..bf.grid.height() {
                for (dx, dy) in [(x, y), (-x, -y), (-x, y), (x, -y)] {
                    let pos = IVec3::new(center.x + dx, center.y + dy, z);
                    if let Some(tile) = bf.grid.get_mut(pos) {
                        tile.add_light(value, layer);
                    }
                }
            }
        }
    }
}

fn reset_layer(bf: &mut Battlefield, layer: usize) {
    for tile in bf.grid.tiles_mut() {
        tile.reset_light(layer);
    }
}
