//! Small battlefields and scripted random sources for simulation tests.

use std::collections::VecDeque;
use std::sync::Arc;

use glam::IVec3;
use tactica_core::constants::LOFT_ROWS;
use tactica_core::direction::Direction;
use tactica_core::loft::LoftTable;
use tactica_core::terrain::{Blockage, DoorKind, TerrainPartDef, TerrainPartTable};
use tactica_core::types::{Faction, PartId, Position, TilePart, UnitId};
use tactica_world::unit::{Unit, UnitBody};
use tactica_world::Battlefield;

use crate::rng::RandomSource;

pub const LOFT_FULL: u16 = 1;
pub const LOFT_NORTH_WALL: u16 = 2;
pub const LOFT_WEST_WALL: u16 = 3;
pub const LOFT_POST: u16 = 4;

pub const DIRT: PartId = PartId(0);
pub const BRICK_NORTH: PartId = PartId(1);
pub const BRICK_WEST: PartId = PartId(2);
pub const CRATE: PartId = PartId(3);
pub const FUEL_DRUM: PartId = PartId(4);
pub const UFO_NORTH: PartId = PartId(5);
pub const UFO_WEST: PartId = PartId(6);
pub const LAMP: PartId = PartId(7);
pub const GRASS: PartId = PartId(8);
pub const DOOR_NORTH: PartId = PartId(9);
pub const DOOR_NORTH_OPEN: PartId = PartId(10);
/// Low walls and a bush with odd blockage values, for truncation checks.
pub const FENCE_NORTH: PartId = PartId(11);
pub const FENCE_WEST: PartId = PartId(12);
pub const BUSH: PartId = PartId(13);
pub const DOOR_WEST: PartId = PartId(14);
pub const DOOR_WEST_OPEN: PartId = PartId(15);

pub fn lofts() -> LoftTable {
    let mut table = LoftTable::new();
    table.set(LOFT_FULL, [0xFFFF; LOFT_ROWS]);
    let mut north = [0u16; LOFT_ROWS];
    north[0] = 0xFFFF;
    north[1] = 0xFFFF;
    table.set(LOFT_NORTH_WALL, north);
    table.set(LOFT_WEST_WALL, [0xC000; LOFT_ROWS]);
    let mut post = [0u16; LOFT_ROWS];
    for row in post.iter_mut().take(10).skip(6) {
        *row = 0x03C0;
    }
    table.set(LOFT_POST, post);
    table
}

fn wall(id: PartId, name: &str, loft: u16) -> TerrainPartDef {
    let mut part = TerrainPartDef::new(id.0, name);
    part.blockage = Blockage {
        high_explosive: 40,
        ..Blockage::uniform(255)
    };
    part.armor = 50;
    part.loft = [loft; 12];
    part
}

pub fn parts() -> TerrainPartTable {
    let mut dirt = TerrainPartDef::new(DIRT.0, "Dirt");
    dirt.armor = 50;
    dirt.loft[0] = LOFT_FULL;

    let mut crate_part = TerrainPartDef::new(CRATE.0, "Crate");
    crate_part.blockage = Blockage::uniform(4);
    crate_part.armor = 30;
    crate_part.loft = [LOFT_POST, LOFT_POST, LOFT_POST, LOFT_POST, 0, 0, 0, 0, 0, 0, 0, 0];

    let mut drum = TerrainPartDef::new(FUEL_DRUM.0, "Fuel drum");
    drum.armor = 10;
    drum.explosive = 50;
    drum.loft[0] = LOFT_POST;
    drum.loft[1] = LOFT_POST;

    let mut ufo_north = wall(UFO_NORTH, "Ufo door north", LOFT_NORTH_WALL);
    ufo_north.door = DoorKind::Ufo;
    let mut ufo_west = wall(UFO_WEST, "Ufo door west", LOFT_WEST_WALL);
    ufo_west.door = DoorKind::Ufo;

    let mut lamp = TerrainPartDef::new(LAMP.0, "Lamp");
    lamp.light_source = 8;

    let mut grass = TerrainPartDef::new(GRASS.0, "Grass");
    grass.armor = 10;
    grass.flammability = 0;
    grass.fuel = 2;
    grass.loft[0] = LOFT_FULL;
    grass.die_part = Some(DIRT);

    let mut door_north = wall(DOOR_NORTH, "Door north", LOFT_NORTH_WALL);
    door_north.door = DoorKind::Hinged {
        open_part: DOOR_NORTH_OPEN,
    };
    let door_north_open = TerrainPartDef::new(DOOR_NORTH_OPEN.0, "Door north (open)");
    let mut door_west = wall(DOOR_WEST, "Door west", LOFT_WEST_WALL);
    door_west.door = DoorKind::Hinged {
        open_part: DOOR_WEST_OPEN,
    };
    let door_west_open = TerrainPartDef::new(DOOR_WEST_OPEN.0, "Door west (open)");

    let mut fence_north = TerrainPartDef::new(FENCE_NORTH.0, "Fence north");
    fence_north.blockage = Blockage::uniform(5);
    let mut fence_west = TerrainPartDef::new(FENCE_WEST.0, "Fence west");
    fence_west.blockage = Blockage::uniform(3);
    let mut bush = TerrainPartDef::new(BUSH.0, "Bush");
    bush.blockage = Blockage::uniform(7);

    TerrainPartTable::from_parts(vec![
        dirt,
        wall(BRICK_NORTH, "Brick north", LOFT_NORTH_WALL),
        wall(BRICK_WEST, "Brick west", LOFT_WEST_WALL),
        crate_part,
        drum,
        ufo_north,
        ufo_west,
        lamp,
        grass,
        door_north,
        door_north_open,
        fence_north,
        fence_west,
        bush,
        door_west,
        door_west_open,
    ])
}

/// Empty battlefield (no parts anywhere).
pub fn battlefield(width: i32, length: i32, height: i32) -> Battlefield {
    Battlefield::new(width, length, height, Arc::new(parts()), Arc::new(lofts()))
        .expect("test grid dimensions are non-zero")
}

/// Battlefield with a dirt floor on every tile of level 0.
pub fn open_ground(width: i32, length: i32, height: i32) -> Battlefield {
    let mut bf = battlefield(width, length, height);
    for x in 0..width {
        for y in 0..length {
            place(&mut bf, IVec3::new(x, y, 0), TilePart::Floor, DIRT);
        }
    }
    bf
}

pub fn place(bf: &mut Battlefield, pos: Position, slot: TilePart, part: PartId) {
    bf.set_part(pos, slot, Some(part))
        .expect("test part placed inside the grid");
}

/// Give every tile full ambient light so that everything is visible.
pub fn daylight(bf: &mut Battlefield) {
    for tile in bf.grid.tiles_mut() {
        tile.add_light(15, 0);
    }
}

/// Unit whose whole body loft is solid, so line traces can hit it.
pub fn soldier(faction: Faction, pos: Position, facing: Direction) -> Unit {
    Unit::new(faction, pos)
        .with_direction(facing)
        .with_body(UnitBody {
            stand_height: 22,
            kneel_height: 14,
            loft: LOFT_FULL,
        })
}

pub fn spawn(bf: &mut Battlefield, faction: Faction, pos: Position, facing: Direction) -> UnitId {
    bf.spawn_unit(soldier(faction, pos, facing))
        .expect("test unit placed on a free tile")
}

/// Always answers the lower (or upper) bound.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom {
    pub high: bool,
}

impl FixedRandom {
    pub fn low() -> Self {
        Self { high: false }
    }

    pub fn high() -> Self {
        Self { high: true }
    }
}

impl RandomSource for FixedRandom {
    fn generate(&mut self, min: i32, max: i32) -> i32 {
        if self.high {
            min.max(max)
        } else {
            min.min(max)
        }
    }

    fn generate_f64(&mut self, min: f64, max: f64) -> f64 {
        if self.high {
            min.max(max)
        } else {
            min.min(max)
        }
    }

    fn box_muller(&mut self, mean: f64, std_dev: f64) -> f64 {
        if self.high {
            mean + std_dev * 3.0
        } else {
            mean
        }
    }
}

/// Replays scripted values, clamped into the requested range.
/// Falls back to the lower bound (or the mean) once a script runs out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    ints: VecDeque<i32>,
    floats: VecDeque<f64>,
    normals: VecDeque<f64>,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ints(mut self, values: &[i32]) -> Self {
        self.ints.extend(values);
        self
    }

    pub fn floats(mut self, values: &[f64]) -> Self {
        self.floats.extend(values);
        self
    }

    pub fn normals(mut self, values: &[f64]) -> Self {
        self.normals.extend(values);
        self
    }
}

impl RandomSource for ScriptedRandom {
    fn generate(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = (min.min(max), min.max(max));
        self.ints.pop_front().map_or(lo, |v| v.clamp(lo, hi))
    }

    fn generate_f64(&mut self, min: f64, max: f64) -> f64 {
        let (lo, hi) = (min.min(max), min.max(max));
        self.floats.pop_front().map_or(lo, |v| v.clamp(lo, hi))
    }

    fn box_muller(&mut self, mean: f64, _std_dev: f64) -> f64 {
        self.normals.pop_front().unwrap_or(mean)
    }
}
