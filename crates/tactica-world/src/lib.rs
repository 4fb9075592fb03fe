pub mod grid;
pub mod tile;
pub mod unit;

use std::sync::Arc;

use grid::TileGrid;
use tactica_core::error::WorldError;
use tactica_core::loft::LoftTable;
use tactica_core::terrain::{TerrainPartDef, TerrainPartTable};
use tactica_core::types::{DoorOutcome, PartId, Position, TilePart, UnitId};
use tile::Tile;
use unit::{Unit, Weapon};

/// Primary public struct for the tactica-world crate.
/// Owns the tile grid and the unit roster; shares the read-only part and loft tables.
#[derive(Debug, Clone)]
pub struct Battlefield {
    pub grid: TileGrid,
    /// Indexed by `UnitId`.
    pub units: Vec<Unit>,
    pub parts: Arc<TerrainPartTable>,
    pub lofts: Arc<LoftTable>,
}

impl Battlefield {
    pub fn new(
        width: i32,
        length: i32,
        height: i32,
        parts: Arc<TerrainPartTable>,
        lofts: Arc<LoftTable>,
    ) -> Result<Self, WorldError> {
        let grid = TileGrid::new(width, length, height)?;
        log::debug!(
            "battlefield {}x{}x{} with {} terrain parts, {} lofts",
            width,
            length,
            height,
            parts.len(),
            lofts.len()
        );
        Ok(Self {
            grid,
            units: Vec::new(),
            parts,
            lofts,
        })
    }

    // --- Tiles ---

    pub fn tile(&self, pos: Position) -> Option<&Tile> {
        self.grid.get(pos)
    }

    pub fn tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        self.grid.get_mut(pos)
    }

    /// Descriptor of the part in a tile slot.
    pub fn part_def(&self, pos: Position, slot: TilePart) -> Option<&TerrainPartDef> {
        self.tile(pos)?.part_def(slot, &self.parts)
    }

    pub fn set_part(
        &mut self,
        pos: Position,
        slot: TilePart,
        part: Option<PartId>,
    ) -> Result<(), WorldError> {
        let tile = self.grid.get_mut(pos).ok_or(WorldError::OutOfBounds(pos))?;
        tile.set_part(slot, part);
        Ok(())
    }

    /// Apply terrain damage to a part. Returns true when it was destroyed.
    pub fn damage_part(&mut self, pos: Position, slot: TilePart, power: i32) -> bool {
        match self.grid.get_mut(pos) {
            Some(tile) => tile.damage(slot, power, &self.parts),
            None => false,
        }
    }

    pub fn destroy_part(&mut self, pos: Position, slot: TilePart) {
        if let Some(tile) = self.grid.get_mut(pos) {
            tile.destroy(slot, &self.parts);
        }
    }

    pub fn ignite(&mut self, pos: Position) -> bool {
        match self.grid.get_mut(pos) {
            Some(tile) => tile.ignite(&self.parts),
            None => false,
        }
    }

    pub fn open_door(&mut self, pos: Position, slot: TilePart) -> DoorOutcome {
        match self.grid.get_mut(pos) {
            Some(tile) => tile.open_door(slot, &self.parts),
            None => DoorOutcome::NoDoor,
        }
    }

    /// Finalise pending explosive power on a tile. Returns the consumed power.
    pub fn detonate(&mut self, pos: Position) -> i32 {
        match self.grid.get_mut(pos) {
            Some(tile) => tile.detonate(&self.parts),
            None => 0,
        }
    }

    /// Step every UFO door animation one frame.
    pub fn advance_door_frames(&mut self) {
        for tile in self.grid.tiles_mut() {
            tile.advance_door_frames(&self.parts);
        }
    }

    // --- Units ---

    /// Add a unit to the roster and place it on its tile. The unit's id is overwritten.
    pub fn spawn_unit(&mut self, mut unit: Unit) -> Result<UnitId, WorldError> {
        let pos = unit.position;
        let tile = self.grid.get_mut(pos).ok_or(WorldError::OutOfBounds(pos))?;
        if let Some(occupant) = tile.unit() {
            return Err(WorldError::TileOccupied {
                position: pos,
                occupant,
            });
        }
        let id = UnitId(self.units.len() as u32);
        tile.set_unit(Some(id));
        unit.id = id;
        log::trace!("spawned unit {} ({:?}) at {}", id, unit.faction, pos);
        self.units.push(unit);
        Ok(id)
    }

    /// Relocate a unit, keeping tile occupancy consistent.
    pub fn move_unit(&mut self, id: UnitId, to: Position) -> Result<(), WorldError> {
        let from = self.unit(id).ok_or(WorldError::UnknownUnit(id))?.position;
        if from == to {
            return Ok(());
        }
        let target = self.grid.get_mut(to).ok_or(WorldError::OutOfBounds(to))?;
        if let Some(occupant) = target.unit() {
            return Err(WorldError::TileOccupied {
                position: to,
                occupant,
            });
        }
        target.set_unit(Some(id));
        if let Some(source) = self.grid.get_mut(from) {
            source.set_unit(None);
        }
        self.units[id.index()].position = to;
        Ok(())
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.index())
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.index())
    }

    /// Occupant of a tile.
    pub fn unit_at(&self, pos: Position) -> Option<UnitId> {
        self.tile(pos)?.unit()
    }

    pub fn main_hand_weapon(&self, id: UnitId) -> Option<&Weapon> {
        self.unit(id)?.main_hand.as_ref()
    }

    pub fn unit_ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.units.iter().map(|u| u.id)
    }
}
