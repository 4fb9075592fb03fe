//! Field of view: angular ray fan from an observer, fog-of-war discovery and
//! opposing unit sightings.

use std::collections::HashSet;

use glam::IVec3;
use tactica_core::constants::{
    FOV_HORIZONTAL_STEP, FOV_MAX_PITCH, FOV_MIN_PITCH, FOV_VERTICAL_STEP, HAZE_SHADE_LIMIT,
    MAX_VIEW_DISTANCE, SILHOUETTE_SCAN_STEP, VISIBLE_SHADE_LIMIT,
};
use tactica_core::math::{tile_base_voxel, voxel_to_tile};
use tactica_core::types::{
    DamageType, DiscoveryChannel, Faction, Position, TurnContext, UnitId, VoxelHit,
};
use tactica_world::unit::Unit;
use tactica_world::Battlefield;

use crate::blockage::{horizontal_blockage, vertical_blockage};
use crate::geometry::{calculate_line, TrackMode};

/// Horizontal cone per facing, in degrees, both ends inclusive.
const START_ANGLE: [i32; 8] = [45, 0, -45, 270, 225, 180, 135, 90];
const END_ANGLE: [i32; 8] = [135, 90, 45, 360, 315, 270, 225, 180];

/// Results of one fan, applied once the grid is no longer borrowed.
#[derive(Debug, Default)]
struct Sightings {
    units: Vec<UnitId>,
    discovered: Vec<(Position, DiscoveryChannel)>,
}

/// Recompute what one unit sees. Returns true when the visible set gained
/// opposing units compared with the previous pass.
pub fn calculate_fov(bf: &mut Battlefield, observer: UnitId) -> bool {
    let Some(unit) = bf.unit(observer) else {
        return false;
    };
    let previous = unit.visible_checksum();
    let sightings = scan(bf, unit);

    for (pos, channel) in sightings.discovered {
        if let Some(tile) = bf.tile_mut(pos) {
            tile.set_discovered(channel, true);
        }
    }
    let Some(unit) = bf.unit_mut(observer) else {
        return false;
    };
    unit.clear_visible();
    for id in sightings.units {
        unit.add_visible(id);
    }
    unit.visible_checksum() > previous
}

/// Recompute the field of view of every active unit of the side to move.
pub fn calculate_fov_area(bf: &mut Battlefield, ctx: &TurnContext) {
    let observers: Vec<UnitId> = bf
        .units
        .iter()
        .filter(|u| u.faction == ctx.active_side && !u.is_out())
        .map(|u| u.id)
        .collect();
    for id in observers {
        calculate_fov(bf, id);
    }
}

/// Check the occupant of `pos` against the observer's line of sight, and record
/// it as visible when any sample of its silhouette can be seen.
pub fn check_for_visible_units(bf: &mut Battlefield, observer: UnitId, pos: Position) -> bool {
    let sighted = bf
        .unit(observer)
        .and_then(|unit| sighted_unit(bf, unit, pos));
    match (sighted, bf.unit_mut(observer)) {
        (Some(target), Some(unit)) => {
            unit.add_visible(target);
            true
        }
        _ => false,
    }
}

fn scan(bf: &Battlefield, unit: &Unit) -> Sightings {
    let pos = unit.position;
    let is_player = unit.faction == Faction::Player;
    let facing = unit.direction.index() as usize;
    let mut sightings = Sightings::default();
    if is_player {
        sightings.discovered.push((pos, DiscoveryChannel::Tile));
    }

    let (cx, cy, cz) = (
        pos.x as f64 + 0.5,
        pos.y as f64 + 0.5,
        pos.z as f64 * 2.0 + 1.5,
    );
    // Nothing to look down at from the lowest level.
    let min_pitch = if pos.z == 0 { 0 } else { FOV_MIN_PITCH };
    let mut seen_tiles: HashSet<Position> = HashSet::new();

    for fi in (min_pitch..=FOV_MAX_PITCH).step_by(FOV_VERTICAL_STEP as usize) {
        let (sin_fi, cos_fi) = (fi as f64).to_radians().sin_cos();
        for te in (START_ANGLE[facing]..=END_ANGLE[facing]).step_by(FOV_HORIZONTAL_STEP as usize) {
            let (sin_te, cos_te) = (te as f64).to_radians().sin_cos();
            let mut origin = pos;
            let mut object_view = MAX_VIEW_DISTANCE;
            let mut unit_view = MAX_VIEW_DISTANCE;
            let mut l = 0.0;
            while object_view > 0 {
                l += 1.0;
                let dest = IVec3::new(
                    (cx + l * cos_te * cos_fi).floor() as i32,
                    (cy + l * sin_te * cos_fi).floor() as i32,
                    ((cz + l * sin_fi) / 2.0).floor() as i32,
                );
                object_view -= 1;
                let Some(tile) = bf.tile(dest) else {
                    break;
                };
                object_view -= horizontal_blockage(bf, origin, dest, DamageType::None);
                object_view -= vertical_blockage(bf, origin, dest, DamageType::None);

                let shade = tile.shade();
                if object_view > 0 && shade < VISIBLE_SHADE_LIMIT && seen_tiles.insert(dest) {
                    if unit_view > 0 {
                        if let Some(id) = sighted_unit(bf, unit, dest) {
                            sightings.units.push(id);
                        }
                    }
                    if is_player {
                        // Walls bounding the tile to the east and south come into view too.
                        sightings.discovered.extend([
                            (dest, DiscoveryChannel::Tile),
                            (dest + IVec3::X, DiscoveryChannel::WestWall),
                            (dest - IVec3::Y, DiscoveryChannel::NorthWall),
                        ]);
                    }
                }
                if shade > HAZE_SHADE_LIMIT {
                    object_view -= 1;
                }
                // Smoke hides units, not terrain.
                unit_view -= tile.smoke() / 3;
                origin = dest;
            }
        }
    }
    sightings
}

/// Whether `observer` cares about spotting `target` at all.
fn is_opponent(observer: Faction, target: Faction) -> bool {
    match observer {
        Faction::Player => target == Faction::Hostile,
        Faction::Hostile => target != Faction::Hostile,
        Faction::Neutral => true,
    }
}

/// Scan the silhouette of the occupant of `pos` top to bottom from the
/// observer's eye; the first clear sample (or one stopping on the target
/// itself) means it is seen.
fn sighted_unit(bf: &Battlefield, observer: &Unit, pos: Position) -> Option<UnitId> {
    let target = bf.unit(bf.unit_at(pos)?)?;
    if target.id == observer.id || target.is_out() || !is_opponent(observer.faction, target.faction)
    {
        return None;
    }
    let level = |p: Position| bf.tile(p).map_or(0, |t| t.terrain_level(&bf.parts));

    let mut eye = tile_base_voxel(observer.position);
    eye.z += observer.height() - level(observer.position);

    let mut aim = tile_base_voxel(target.position);
    let bottom = aim.z - level(target.position);
    let top = bottom + target.height();

    let mut z = top;
    while z > bottom {
        aim.z = z;
        let trace = calculate_line(bf, eye, aim, TrackMode::Impact, Some(observer.id));
        let seen = match trace.hit {
            VoxelHit::Empty => true,
            VoxelHit::Unit => trace.impact().map(voxel_to_tile) == Some(target.position),
            _ => false,
        };
        if seen {
            return Some(target.id);
        }
        z -= SILHOUETTE_SCAN_STEP;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_harness::*;
    use tactica_core::direction::Direction;
    use tactica_core::types::TilePart;

    fn at(x: i32, y: i32) -> Position {
        IVec3::new(x, y, 0)
    }

    fn lit_field() -> Battlefield {
        let mut bf = open_ground(20, 20, 1);
        daylight(&mut bf);
        bf
    }

    #[test]
    fn test_new_sighting_reported_once() {
        let mut bf = lit_field();
        let watcher = spawn(&mut bf, Faction::Player, at(2, 10), Direction::East);
        // Behind the watcher, outside the cone.
        let alien = spawn(&mut bf, Faction::Hostile, at(0, 10), Direction::West);

        assert!(!calculate_fov(&mut bf, watcher));
        assert!(!bf.unit(watcher).unwrap().sees(alien));

        bf.move_unit(alien, at(10, 10)).unwrap();
        assert!(calculate_fov(&mut bf, watcher));
        assert!(bf.unit(watcher).unwrap().sees(alien));
        assert!(!calculate_fov(&mut bf, watcher));
        assert!(bf.unit(watcher).unwrap().sees(alien));
    }

    #[test]
    fn test_wall_hides_unit() {
        let mut bf = lit_field();
        place(&mut bf, at(6, 10), TilePart::WestWall, BRICK_WEST);
        let watcher = spawn(&mut bf, Faction::Player, at(2, 10), Direction::East);
        let alien = spawn(&mut bf, Faction::Hostile, at(10, 10), Direction::West);
        assert!(!calculate_fov(&mut bf, watcher));
        assert!(!bf.unit(watcher).unwrap().sees(alien));
        // The wall itself was seen from its west side; what lies behind was not.
        let tile = bf.tile(at(5, 10)).unwrap();
        assert!(tile.is_discovered(DiscoveryChannel::Tile));
        assert!(bf.tile(at(6, 10)).unwrap().is_discovered(DiscoveryChannel::WestWall));
        assert!(!bf.tile(at(8, 10)).unwrap().is_discovered(DiscoveryChannel::Tile));
    }

    #[test]
    fn test_player_discovers_tiles_and_bounding_walls() {
        let mut bf = lit_field();
        let watcher = spawn(&mut bf, Faction::Player, at(2, 10), Direction::East);
        calculate_fov(&mut bf, watcher);
        let discovered = |x, y, channel| bf.tile(at(x, y)).unwrap().is_discovered(channel);
        assert!(discovered(2, 10, DiscoveryChannel::Tile));
        assert!(discovered(5, 10, DiscoveryChannel::Tile));
        assert!(discovered(6, 10, DiscoveryChannel::WestWall));
        assert!(discovered(5, 9, DiscoveryChannel::NorthWall));
        // Out of the cone.
        assert!(!discovered(0, 10, DiscoveryChannel::Tile));
    }

    #[test]
    fn test_hostile_observer_sees_but_discovers_nothing() {
        let mut bf = lit_field();
        let alien = spawn(&mut bf, Faction::Hostile, at(2, 10), Direction::East);
        let soldier = spawn(&mut bf, Faction::Player, at(9, 10), Direction::West);
        let civilian = spawn(&mut bf, Faction::Neutral, at(9, 12), Direction::West);
        let other_alien = spawn(&mut bf, Faction::Hostile, at(9, 8), Direction::West);
        assert!(calculate_fov(&mut bf, alien));
        let unit = bf.unit(alien).unwrap();
        assert!(unit.sees(soldier));
        assert!(unit.sees(civilian));
        assert!(!unit.sees(other_alien));
        assert!(bf
            .grid
            .tiles()
            .iter()
            .all(|t| !t.is_discovered(DiscoveryChannel::Tile)));
    }

    #[test]
    fn test_darkness_hides_everything_but_own_tile() {
        let mut bf = open_ground(20, 20, 1);
        let watcher = spawn(&mut bf, Faction::Player, at(2, 10), Direction::East);
        let alien = spawn(&mut bf, Faction::Hostile, at(5, 10), Direction::West);
        assert!(!calculate_fov(&mut bf, watcher));
        assert!(!bf.unit(watcher).unwrap().sees(alien));
        let discovered: Vec<Position> = bf
            .grid
            .tiles()
            .iter()
            .filter(|t| t.is_discovered(DiscoveryChannel::Tile))
            .map(|t| t.position())
            .collect();
        assert_eq!(discovered, vec![at(2, 10)]);
    }

    #[test]
    fn test_smoke_hides_units_but_not_terrain() {
        let mut bf = lit_field();
        for tile in bf.grid.tiles_mut() {
            tile.add_smoke(20);
        }
        let watcher = spawn(&mut bf, Faction::Player, at(2, 10), Direction::East);
        let alien = spawn(&mut bf, Faction::Hostile, at(10, 10), Direction::West);
        assert!(!calculate_fov(&mut bf, watcher));
        assert!(!bf.unit(watcher).unwrap().sees(alien));
        assert!(bf.tile(at(10, 10)).unwrap().is_discovered(DiscoveryChannel::Tile));
    }

    #[test]
    fn test_lost_sight_clears_visible_set() {
        let mut bf = lit_field();
        let watcher = spawn(&mut bf, Faction::Player, at(2, 10), Direction::East);
        let alien = spawn(&mut bf, Faction::Hostile, at(8, 10), Direction::West);
        assert!(calculate_fov(&mut bf, watcher));
        bf.unit_mut(watcher).unwrap().direction = Direction::West;
        assert!(!calculate_fov(&mut bf, watcher));
        assert!(bf.unit(watcher).unwrap().visible_units().is_empty());
        assert!(!bf.unit(watcher).unwrap().sees(alien));
    }

    #[test]
    fn test_check_for_visible_units_direct() {
        let mut bf = lit_field();
        let watcher = spawn(&mut bf, Faction::Player, at(2, 2), Direction::North);
        let alien = spawn(&mut bf, Faction::Hostile, at(2, 6), Direction::South);
        let buddy = spawn(&mut bf, Faction::Player, at(4, 6), Direction::South);
        assert!(check_for_visible_units(&mut bf, watcher, at(2, 6)));
        assert!(bf.unit(watcher).unwrap().sees(alien));
        assert!(!check_for_visible_units(&mut bf, watcher, at(4, 6)));
        assert!(!bf.unit(watcher).unwrap().sees(buddy));
        assert!(!check_for_visible_units(&mut bf, watcher, at(9, 9)));
    }

    #[test]
    fn test_area_fov_covers_active_side_only() {
        let mut bf = lit_field();
        let a = spawn(&mut bf, Faction::Player, at(2, 10), Direction::East);
        let b = spawn(&mut bf, Faction::Player, at(2, 4), Direction::East);
        let alien = spawn(&mut bf, Faction::Hostile, at(7, 7), Direction::West);
        calculate_fov_area(&mut bf, &TurnContext::new(0, Faction::Player));
        assert!(bf.unit(a).unwrap().sees(alien));
        assert!(bf.unit(b).unwrap().sees(alien));
        assert!(bf.unit(alien).unwrap().visible_units().is_empty());
    }
}
