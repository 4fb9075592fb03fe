use std::sync::Arc;

use glam::IVec3;
use tactica_core::direction::Direction;
use tactica_core::error::WorldError;
use tactica_core::loft::LoftTable;
use tactica_core::terrain::TerrainPartTable;
use tactica_core::types::{Faction, PartId, TilePart};
use tactica_world::unit::{Unit, UnitBody, Weapon};
use tactica_world::Battlefield;

// Part ids of the shipped urban and UFO sets.
const GRASS: PartId = PartId(1);
const CONCRETE: PartId = PartId(2);
const BRICK_NORTH: PartId = PartId(3);
const BRICK_WEST: PartId = PartId(4);
const DOOR_NORTH: PartId = PartId(5);
const FUEL_DRUM: PartId = PartId(8);
const STREET_LAMP: PartId = PartId(9);
const HEDGE: PartId = PartId(10);
const ALLOY_FLOOR: PartId = PartId(20);
const HULL_NORTH: PartId = PartId(21);
const HULL_WEST: PartId = PartId(22);
const UFO_DOOR_NORTH: PartId = PartId(23);

const BODY_LOFT: u16 = 1;
/// Side length of one house block, walls included.
const BLOCK: i32 = 8;

/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: &'static str,
    pub width: i32,
    pub length: i32,
    pub height: i32,
    pub soldiers: i32,
    pub aliens: i32,
    /// Global shade the scene is played at (0 day, 15 darkest night).
    pub global_shade: i32,
    pub with_ufo: bool,
}

/// Return the standard suite of benchmark scenes, from a small daylight
/// skirmish to a full-size night map.
pub fn standard_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig {
            name: "skirmish",
            width: 20,
            length: 20,
            height: 2,
            soldiers: 4,
            aliens: 4,
            global_shade: 0,
            with_ufo: false,
        },
        SceneConfig {
            name: "town",
            width: 40,
            length: 40,
            height: 4,
            soldiers: 8,
            aliens: 8,
            global_shade: 4,
            with_ufo: false,
        },
        SceneConfig {
            name: "crash-site",
            width: 50,
            length: 50,
            height: 4,
            soldiers: 10,
            aliens: 12,
            global_shade: 9,
            with_ufo: true,
        },
        SceneConfig {
            name: "night-terror",
            width: 60,
            length: 60,
            height: 4,
            soldiers: 14,
            aliens: 16,
            global_shade: 15,
            with_ufo: true,
        },
    ]
}

/// Build the battlefield for a scene: a concrete street grid of walled houses
/// on grass, lamps at the crossings, fuel drums by the doors and optionally a
/// UFO hull in the middle. Soldiers start along the south edge, aliens along
/// the north edge.
pub fn build_battlefield(
    config: &SceneConfig,
    parts: Arc<TerrainPartTable>,
    lofts: Arc<LoftTable>,
) -> Result<Battlefield, WorldError> {
    let mut bf = Battlefield::new(config.width, config.length, config.height, parts, lofts)?;

    for x in 0..config.width {
        for y in 0..config.length {
            let street = x % BLOCK == 0 || y % BLOCK == 0;
            let floor = if street { CONCRETE } else { GRASS };
            bf.set_part(IVec3::new(x, y, 0), TilePart::Floor, Some(floor))?;
        }
    }

    for bx in (0..config.width - BLOCK).step_by(BLOCK as usize) {
        for by in (BLOCK..config.length - BLOCK).step_by(BLOCK as usize) {
            build_house(&mut bf, IVec3::new(bx + 2, by + 2, 0), config.height > 1)?;
            bf.set_part(IVec3::new(bx, by, 0), TilePart::Object, Some(STREET_LAMP))?;
        }
    }

    if config.with_ufo {
        build_ufo(&mut bf, IVec3::new(config.width / 2 - 3, config.length / 2 - 3, 0))?;
    }

    for i in 0..config.soldiers {
        let pos = IVec3::new((i * 3 + 1) % config.width, i / (config.width / 3).max(1), 0);
        bf.spawn_unit(trooper(Faction::Player, pos, Direction::North))?;
    }
    for i in 0..config.aliens {
        let row = config.length - 1 - i / (config.width / 3).max(1);
        let pos = IVec3::new((i * 3 + 2) % config.width, row, 0);
        bf.spawn_unit(trooper(Faction::Hostile, pos, Direction::South))?;
    }

    Ok(bf)
}

/// A 4x4 brick house with a door on its south side, a hedge and a fuel drum
/// outside, and a concrete roof when the map has a second level.
fn build_house(bf: &mut Battlefield, corner: IVec3, roofed: bool) -> Result<(), WorldError> {
    let size = 4;
    for i in 0..size {
        bf.set_part(corner + IVec3::new(i, size - 1, 0), TilePart::NorthWall, Some(BRICK_NORTH))?;
        bf.set_part(corner + IVec3::new(i, -1, 0), TilePart::NorthWall, Some(BRICK_NORTH))?;
        bf.set_part(corner + IVec3::new(0, i, 0), TilePart::WestWall, Some(BRICK_WEST))?;
        bf.set_part(corner + IVec3::new(size, i, 0), TilePart::WestWall, Some(BRICK_WEST))?;
        if roofed {
            for j in 0..size {
                bf.set_part(corner + IVec3::new(i, j, 1), TilePart::Floor, Some(CONCRETE))?;
            }
        }
    }
    bf.set_part(corner + IVec3::new(1, -1, 0), TilePart::NorthWall, Some(DOOR_NORTH))?;
    bf.set_part(corner + IVec3::new(-1, 0, 0), TilePart::Object, Some(HEDGE))?;
    bf.set_part(corner + IVec3::new(2, -1, 0), TilePart::Object, Some(FUEL_DRUM))?;
    Ok(())
}

/// A 6x6 alloy hull with a three-panel sliding door on its south side. Whatever
/// stood on the landing site is flattened.
fn build_ufo(bf: &mut Battlefield, corner: IVec3) -> Result<(), WorldError> {
    let size = 6;
    for x in 0..size {
        for y in 0..size {
            let pos = corner + IVec3::new(x, y, 0);
            bf.set_part(pos, TilePart::Floor, Some(ALLOY_FLOOR))?;
            for slot in [TilePart::NorthWall, TilePart::WestWall, TilePart::Object] {
                bf.set_part(pos, slot, None)?;
            }
        }
    }
    for i in 0..size {
        let south = if (2..=4).contains(&i) { UFO_DOOR_NORTH } else { HULL_NORTH };
        bf.set_part(corner + IVec3::new(i, -1, 0), TilePart::NorthWall, Some(south))?;
        bf.set_part(corner + IVec3::new(i, size - 1, 0), TilePart::NorthWall, Some(HULL_NORTH))?;
        bf.set_part(corner + IVec3::new(0, i, 0), TilePart::WestWall, Some(HULL_WEST))?;
        bf.set_part(corner + IVec3::new(size, i, 0), TilePart::WestWall, Some(HULL_WEST))?;
    }
    Ok(())
}

fn trooper(faction: Faction, pos: IVec3, facing: Direction) -> Unit {
    Unit::new(faction, pos)
        .with_direction(facing)
        .with_body(UnitBody {
            stand_height: 22,
            kneel_height: 14,
            loft: BODY_LOFT,
        })
        .with_weapon(Weapon::new("Rifle", 25, Some(20)))
}
