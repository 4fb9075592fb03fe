//! Unit-driven terrain interaction: doors and dropped items.

use glam::IVec3;
use tactica_core::direction::Direction;
use tactica_core::types::{DoorOutcome, ItemId, Position, TilePart, TurnContext, UnitId};
use tactica_world::Battlefield;

use crate::fov::calculate_fov_area;

/// Open the door the unit is facing. Only the four cardinal facings reach a door.
///
/// A UFO door that starts opening pulls the two panels beside it along the same
/// wall with it. Opening anything refreshes the active side's field of view.
pub fn unit_opens_door(bf: &mut Battlefield, unit: UnitId, ctx: &TurnContext) -> DoorOutcome {
    let Some((pos, facing)) = bf.unit(unit).map(|u| (u.position, u.direction)) else {
        return DoorOutcome::NoDoor;
    };
    let x = IVec3::X;
    let y = IVec3::Y;
    // Door tile and slot, then the tiles of the neighbouring panels.
    let (door, slot, panels) = match facing {
        Direction::North => (pos, TilePart::NorthWall, [pos + x, pos - x]),
        Direction::East => (pos + x, TilePart::WestWall, [pos + x - y, pos + x + y]),
        Direction::South => (pos - y, TilePart::NorthWall, [pos + x - y, pos - x - y]),
        Direction::West => (pos, TilePart::WestWall, [pos - y, pos + y]),
        _ => return DoorOutcome::NoDoor,
    };

    let outcome = bf.open_door(door, slot);
    if outcome == DoorOutcome::UfoOpening {
        for panel in panels {
            bf.open_door(panel, slot);
        }
    }
    log::debug!("unit {} at {} opens door: {:?}", unit, pos, outcome);
    if matches!(outcome, DoorOutcome::Opened | DoorOutcome::UfoOpening) {
        calculate_fov_area(bf, ctx);
    }
    outcome
}

/// Drop an item into a tile column. It falls through missing floors until it
/// rests on a floor or reaches the bottom level. Returns where it landed.
pub fn spawn_item(bf: &mut Battlefield, pos: Position, item: ItemId) -> Option<Position> {
    bf.tile(pos)?;
    let mut landing = pos;
    while landing.z > 0
        && bf
            .tile(landing)
            .is_some_and(|t| !t.has_part(TilePart::Floor))
    {
        landing.z -= 1;
    }
    bf.tile_mut(landing)?.add_item(item);
    Some(landing)
}
