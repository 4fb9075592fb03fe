//! Attenuation of directional effects crossing tile boundaries.

use glam::IVec3;
use tactica_core::constants::{FLOOR_BLOCKAGE, FLOOR_HE_BLOCKAGE};
use tactica_core::direction::Direction;
use tactica_core::types::{DamageType, Position, TilePart};
use tactica_world::Battlefield;

const NORTH: IVec3 = IVec3::new(0, 1, 0);
const EAST: IVec3 = IVec3::new(1, 0, 0);
const SOUTH: IVec3 = IVec3::new(0, -1, 0);
const WEST: IVec3 = IVec3::new(-1, 0, 0);

/// How much one part of a tile blocks an energy type. Missing tiles and parts block nothing.
///
/// A present floor blocks 15 against high explosive and 255 against everything
/// else; other parts use their own table, and an open UFO door blocks nothing.
pub fn blockage(bf: &Battlefield, pos: Position, slot: TilePart, kind: DamageType) -> i32 {
    let Some(tile) = bf.tile(pos) else {
        return 0;
    };
    if slot == TilePart::Floor && tile.has_part(TilePart::Floor) {
        return if kind == DamageType::HighExplosive {
            FLOOR_HE_BLOCKAGE
        } else {
            FLOOR_BLOCKAGE
        };
    }
    if tile.is_ufo_door_open(slot, &bf.parts) {
        return 0;
    }
    tile.part_def(slot, &bf.parts)
        .map_or(0, |def| def.block(kind))
}

/// Blockage between tiles on different levels: the floors of every level crossed,
/// taken in the start tile's column.
pub fn vertical_blockage(bf: &Battlefield, start: Position, end: Position, kind: DamageType) -> i32 {
    if bf.tile(start).is_none() || bf.tile(end).is_none() {
        return 0;
    }
    let floor_at = |z: i32| blockage(bf, IVec3::new(start.x, start.y, z), TilePart::Floor, kind);
    if end.z < start.z {
        (end.z + 1..=start.z).map(floor_at).sum()
    } else if end.z > start.z {
        (start.z + 1..=end.z).map(floor_at).sum()
    } else {
        0
    }
}

/// Blockage between horizontally adjacent tiles.
///
/// Cardinal steps test the shared wall. Diagonal steps average the walls on each
/// side of the corner and the objects of the two flanking tiles, with integer
/// halving of each pair. The start tile's own object always adds on top.
/// Non-adjacent or identical tiles report 0.
pub fn horizontal_blockage(
    bf: &Battlefield,
    start: Position,
    end: Position,
    kind: DamageType,
) -> i32 {
    if bf.tile(start).is_none() || bf.tile(end).is_none() {
        return 0;
    }
    let Some(direction) = Direction::from_vector(end - start) else {
        return 0;
    };
    let b = |pos: Position, slot: TilePart| blockage(bf, pos, slot, kind);
    use TilePart::{NorthWall, Object, WestWall};

    let block = match direction {
        Direction::North => b(start, NorthWall),
        Direction::NorthEast => {
            (b(start, NorthWall) + b(end, WestWall)) / 2
                + (b(start + EAST, WestWall) + b(start + EAST, NorthWall)) / 2
                + (b(start + NORTH, Object) + b(start + EAST, Object)) / 2
        }
        Direction::East => b(end, WestWall),
        Direction::SouthEast => {
            (b(end, WestWall) + b(end, NorthWall)) / 2
                + (b(start + EAST, WestWall) + b(start + SOUTH, NorthWall)) / 2
                + (b(start + SOUTH, Object) + b(start + EAST, Object)) / 2
        }
        Direction::South => b(end, NorthWall),
        Direction::SouthWest => {
            (b(end, NorthWall) + b(start, WestWall)) / 2
                + (b(start + SOUTH, WestWall) + b(start + SOUTH, NorthWall)) / 2
                + (b(start + SOUTH, Object) + b(start + WEST, Object)) / 2
        }
        Direction::West => b(start, WestWall),
        Direction::NorthWest => {
            (b(start, WestWall) + b(start, NorthWall)) / 2
                + (b(start + NORTH, WestWall) + b(start + WEST, NorthWall)) / 2
                + (b(start + NORTH, Object) + b(start + WEST, Object)) / 2
        }
    };
    block + b(start, Object)
}
