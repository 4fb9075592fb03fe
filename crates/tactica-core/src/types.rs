use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Tile coordinate, or voxel coordinate when scaled by the voxel subdivision.
pub type Position = IVec3;

/// Newtype for unit identifiers. Equal to the unit's index in the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u32);

impl UnitId {
    /// Roster index of this unit.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Newtype for item identifiers (items themselves are owned elsewhere).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub u32);

/// Index into the terrain-part table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartId(pub u16);

/// Side a unit fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Hostile,
    Neutral,
}

/// The four part slots of a tile, in collision-check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TilePart {
    Floor = 0,
    NorthWall = 1,
    WestWall = 2,
    Object = 3,
}

/// All part slots in the fixed order used by collision and detonation.
pub const ALL_PARTS: [TilePart; 4] = [
    TilePart::Floor,
    TilePart::NorthWall,
    TilePart::WestWall,
    TilePart::Object,
];

impl TilePart {
    /// Slot index 0–3.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Visibility channels of the discovered flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DiscoveryChannel {
    /// The tile's west wall has been seen.
    WestWall = 0,
    /// The tile's north wall has been seen.
    NorthWall = 1,
    /// The tile's floor and contents have been seen.
    Tile = 2,
}

/// Energy classification of a directional effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    /// Pure vision / light.
    None,
    /// Conventional kinetic rounds.
    ArmorPiercing,
    Plasma,
    Incendiary,
    Smoke,
    HighExplosive,
}

impl DamageType {
    /// Direct-hit types resolve at a single voxel instead of radiating.
    pub fn is_direct_hit(self) -> bool {
        matches!(self, DamageType::ArmorPiercing | DamageType::Plasma)
    }
}

/// Per-tick simulation inputs that used to be mission-wide globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnContext {
    /// 0 = full day, 15 = darkest night.
    pub global_shade: i32,
    /// Faction whose turn it is.
    pub active_side: Faction,
    /// Debug mode lets every time-unit expense succeed.
    pub debug_mode: bool,
}

impl TurnContext {
    pub fn new(global_shade: i32, active_side: Faction) -> Self {
        Self {
            global_shade,
            active_side,
            debug_mode: false,
        }
    }
}

/// Outcome of a voxel probe or trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoxelHit {
    /// Nothing solid at this voxel.
    Empty,
    /// A tile part was hit.
    Part(TilePart),
    /// A unit's body was hit.
    Unit,
    /// The voxel lies outside the grid.
    OutOfBounds,
}

impl VoxelHit {
    /// Classic numeric code: 0–3 part, 4 unit, 5 out of map, -1 nothing.
    pub fn code(self) -> i32 {
        match self {
            VoxelHit::Empty => -1,
            VoxelHit::Part(part) => part as i32,
            VoxelHit::Unit => 4,
            VoxelHit::OutOfBounds => 5,
        }
    }

    pub fn is_hit(self) -> bool {
        self != VoxelHit::Empty
    }
}

/// Result of a unit trying to open a door in front of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorOutcome {
    /// No door; the way is free (or the UFO door is already fully open).
    NoDoor,
    /// A hinged door swung open; the unit may walk through.
    Opened,
    /// A UFO door started opening; the unit must wait.
    UfoOpening,
    /// A UFO door is still animating open.
    UfoStillOpening,
}
