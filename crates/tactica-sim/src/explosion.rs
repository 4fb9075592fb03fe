//! Explosions: direct voxel hits, area ray fans and chained detonation.

use std::collections::HashMap;

use glam::IVec3;
use tactica_core::constants::{
    EXPLOSION_ANGLE_STEP, EXPLOSION_DECAY_PER_STEP, EXPLOSION_SMOKE_MIN_TURNS,
    EXPLOSION_SMOKE_THRESHOLD,
};
use tactica_core::math::{tile_center_voxel, voxel_offset, voxel_to_tile};
use tactica_core::types::{DamageType, Position, TilePart, TurnContext, UnitId, VoxelHit};
use tactica_world::Battlefield;

use crate::blockage::horizontal_blockage;
use crate::fov::calculate_fov_area;
use crate::lighting::calculate_terrain_lighting;
use crate::rng::RandomSource;
use crate::voxel::voxel_check;

/// A tile reached by an area explosion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffectedTile {
    pub position: Position,
    /// Ray power when the tile was first reached.
    pub first_power: i32,
    /// Largest explosive marker deposited (high explosive only).
    pub deposit: i32,
}

/// Damage dealt to one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitHit {
    pub unit: UnitId,
    /// Rolled damage before armor.
    pub power: i32,
    /// Damage that got through.
    pub wound: i32,
}

/// What an explosion did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplosionReport {
    /// Voxel classification of a direct hit; None for area explosions.
    pub direct_hit: Option<VoxelHit>,
    /// Tiles reached by the fan in first-visit order.
    pub tiles: Vec<AffectedTile>,
    pub unit_hits: Vec<UnitHit>,
    /// Floors blown out from below.
    pub destroyed_floors: Vec<Position>,
    /// Tiles set on fire.
    pub ignited: Vec<Position>,
}

impl ExplosionReport {
    pub fn tile(&self, pos: Position) -> Option<&AffectedTile> {
        self.tiles.iter().find(|t| t.position == pos)
    }
}

/// Resolve an explosion centered on a voxel.
///
/// Armor-piercing and plasma damage resolve at the voxel itself. Everything
/// else radiates over the explosion's level in a fan of decaying rays, stopping
/// at `max_radius` tiles. Afterwards the active side's field of view and the
/// terrain lighting are recomputed.
#[allow(clippy::too_many_arguments)]
pub fn explode(
    bf: &mut Battlefield,
    center: Position,
    power: i32,
    kind: DamageType,
    max_radius: i32,
    source: Option<UnitId>,
    rng: &mut dyn RandomSource,
    ctx: &TurnContext,
) -> ExplosionReport {
    let mut report = ExplosionReport::default();
    if kind.is_direct_hit() {
        direct_hit(bf, center, power, kind, source, rng, &mut report);
    } else {
        area_blast(bf, center, power, kind, max_radius, rng, &mut report);
    }
    log::debug!(
        "{:?} explosion at {} (power {}): {} tiles, {} units hit, {} floors breached",
        kind,
        voxel_to_tile(center),
        power,
        report.tiles.len(),
        report.unit_hits.len(),
        report.destroyed_floors.len()
    );

    calculate_fov_area(bf, ctx);
    calculate_terrain_lighting(bf, ctx);
    report
}

fn direct_hit(
    bf: &mut Battlefield,
    center: Position,
    power: i32,
    kind: DamageType,
    source: Option<UnitId>,
    rng: &mut dyn RandomSource,
    report: &mut ExplosionReport,
) {
    let hit = voxel_check(bf, center, source);
    report.direct_hit = Some(hit);
    let pos = voxel_to_tile(center);
    match hit {
        VoxelHit::Part(slot) => {
            let rolled = rng.generate(power / 4, power * 3 / 4);
            bf.damage_part(pos, slot, rolled);
        }
        VoxelHit::Unit => {
            let rolled = rng.generate(0, power * 2);
            let offset = voxel_offset(center) - IVec3::new(8, 8, 0);
            let Some(id) = bf.unit_at(pos) else {
                return;
            };
            if let Some(wound) = damage_unit(bf, id, offset, rolled, report) {
                // Conventional rounds also stun.
                if kind == DamageType::ArmorPiercing {
                    let stun = rng.generate(0, rolled / 4);
                    if let Some(unit) = bf.unit_mut(id) {
                        unit.stun(stun);
                    }
                }
                log::trace!("direct hit on unit {} for {}", id, wound);
            }
        }
        VoxelHit::Empty | VoxelHit::OutOfBounds => {}
    }
}

fn area_blast(
    bf: &mut Battlefield,
    center: Position,
    power: i32,
    kind: DamageType,
    max_radius: i32,
    rng: &mut dyn RandomSource,
    report: &mut ExplosionReport,
) {
    let ct = voxel_to_tile(center);
    let power = if kind == DamageType::Incendiary {
        power / 2
    } else {
        power
    };
    let (cx, cy) = (ct.x as f64 + 0.5, ct.y as f64 + 0.5);
    let mut visited: HashMap<Position, usize> = HashMap::new();

    for te in (0..=360).step_by(EXPLOSION_ANGLE_STEP as usize) {
        let (sin_te, cos_te) = (te as f64).to_radians().sin_cos();
        let mut origin = ct;
        let mut budget = power + 1;
        let mut l = 0;
        while budget > 0 && l <= max_radius {
            let dest = IVec3::new(
                (cx + l as f64 * cos_te).floor() as i32,
                (cy + l as f64 * sin_te).floor() as i32,
                ct.z,
            );
            if !bf.grid.in_bounds(dest) {
                break;
            }
            budget -= horizontal_blockage(bf, origin, dest, kind);

            if budget > 0 {
                let deposit = if kind == DamageType::HighExplosive {
                    if let Some(tile) = bf.tile_mut(dest) {
                        tile.set_explosive(budget / 2);
                    }
                    budget / 2
                } else {
                    0
                };
                match visited.get(&dest) {
                    Some(&index) => {
                        let entry = &mut report.tiles[index];
                        entry.deposit = entry.deposit.max(deposit);
                    }
                    None => {
                        visited.insert(dest, report.tiles.len());
                        report.tiles.push(AffectedTile {
                            position: dest,
                            first_power: budget,
                            deposit,
                        });
                        first_visit(bf, dest, budget, kind, rng, report);
                    }
                }
            }
            budget -= EXPLOSION_DECAY_PER_STEP;
            origin = dest;
            l += 1;
        }
    }

    if kind == DamageType::HighExplosive {
        for tile in &report.tiles {
            bf.detonate(tile.position);
        }
    }
}

/// Effects applied once per tile, with the ray's power on arrival.
fn first_visit(
    bf: &mut Battlefield,
    dest: Position,
    budget: i32,
    kind: DamageType,
    rng: &mut dyn RandomSource,
    report: &mut ExplosionReport,
) {
    match kind {
        DamageType::HighExplosive => {
            if let Some(id) = bf.unit_at(dest) {
                let rolled = rng.generate_f64(budget as f64 / 2.0, budget as f64 * 1.5) as i32;
                damage_unit(bf, id, IVec3::ZERO, rolled, report);
            }

            let above = dest + IVec3::Z;
            let breach = bf
                .part_def(above, TilePart::Floor)
                .is_some_and(|floor| budget / 2 >= floor.armor);
            if breach {
                bf.destroy_part(above, TilePart::Floor);
                report.destroyed_floors.push(above);
            }
            if let Some(id) = bf.unit_at(above) {
                let rolled = rng.generate_f64(0.0, budget as f64 / 4.0) as i32;
                damage_unit(bf, id, IVec3::ZERO, rolled, report);
            }

            let below = dest - IVec3::Z;
            let open_floor = bf.tile(dest).is_some_and(|t| !t.has_part(TilePart::Floor));
            if open_floor {
                if let Some(id) = bf.unit_at(below) {
                    let rolled = rng.generate_f64(0.0, budget as f64 / 4.0) as i32;
                    damage_unit(bf, id, IVec3::ZERO, rolled, report);
                }
            }
        }
        DamageType::Smoke => {
            if bf.tile(dest).is_some_and(|t| t.smoke() < EXPLOSION_SMOKE_THRESHOLD) {
                // Always lasts between 10 and 20 turns.
                let extra = rng.generate(
                    (budget / 10).min(EXPLOSION_SMOKE_MIN_TURNS),
                    EXPLOSION_SMOKE_MIN_TURNS,
                );
                if let Some(tile) = bf.tile_mut(dest) {
                    tile.add_smoke(EXPLOSION_SMOKE_MIN_TURNS + extra);
                }
            }
        }
        DamageType::Incendiary => {
            if bf.tile(dest).is_some_and(|t| t.fire() == 0) && bf.ignite(dest) {
                report.ignited.push(dest);
            }
            if let Some(id) = bf.unit_at(dest) {
                let rolled = rng.generate(0, budget / 3);
                damage_unit(bf, id, IVec3::ZERO, rolled, report);
                let turns = rng.generate(1, 5);
                if let Some(unit) = bf.unit_mut(id) {
                    unit.set_fire(turns);
                }
            }
        }
        DamageType::None | DamageType::ArmorPiercing | DamageType::Plasma => {}
    }
}

fn damage_unit(
    bf: &mut Battlefield,
    id: UnitId,
    offset: IVec3,
    power: i32,
    report: &mut ExplosionReport,
) -> Option<i32> {
    let unit = bf.unit_mut(id)?;
    let wound = unit.damage(offset, power);
    report.unit_hits.push(UnitHit {
        unit: id,
        power,
        wound,
    });
    Some(wound)
}

/// First tile, in grid order, still carrying a pending explosive marker.
pub fn check_for_chained_explosions(bf: &Battlefield) -> Option<Position> {
    bf.grid
        .tiles()
        .iter()
        .find(|t| t.explosive() > 0)
        .map(|t| t.position())
}

/// Detonate pending markers until none remain. Each marker explodes as high
/// explosive from its tile center with a radius of a tenth of its power.
/// Returns how many chained explosions went off.
pub fn resolve_chained_explosions(
    bf: &mut Battlefield,
    rng: &mut dyn RandomSource,
    ctx: &TurnContext,
) -> usize {
    let mut count = 0;
    for _ in 0..bf.grid.len() {
        let Some(pos) = check_for_chained_explosions(bf) else {
            break;
        };
        let power = bf.tile_mut(pos).map_or(0, |t| t.take_explosive());
        explode(
            bf,
            tile_center_voxel(pos),
            power,
            DamageType::HighExplosive,
            power / 10,
            None,
            rng,
            ctx,
        );
        count += 1;
    }
    if count > 0 {
        log::debug!("{} chained explosions", count);
    }
    count
}
