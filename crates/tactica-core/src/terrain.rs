use serde::{Deserialize, Serialize};

use crate::constants::{FIREPROOF, LOFT_SLICES};
use crate::types::{DamageType, PartId};

/// How much of each energy type a part absorbs when an effect crosses it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blockage {
    /// Vision and light.
    #[serde(default)]
    pub vision: i32,
    #[serde(default)]
    pub armor_piercing: i32,
    #[serde(default)]
    pub plasma: i32,
    #[serde(default)]
    pub incendiary: i32,
    #[serde(default)]
    pub smoke: i32,
    #[serde(default)]
    pub high_explosive: i32,
}

impl Blockage {
    /// Same value against every energy type.
    pub fn uniform(value: i32) -> Self {
        Self {
            vision: value,
            armor_piercing: value,
            plasma: value,
            incendiary: value,
            smoke: value,
            high_explosive: value,
        }
    }

    pub fn get(&self, kind: DamageType) -> i32 {
        match kind {
            DamageType::None => self.vision,
            DamageType::ArmorPiercing => self.armor_piercing,
            DamageType::Plasma => self.plasma,
            DamageType::Incendiary => self.incendiary,
            DamageType::Smoke => self.smoke,
            DamageType::HighExplosive => self.high_explosive,
        }
    }
}

/// Door behaviour of a part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorKind {
    #[default]
    None,
    /// Swings open by swapping to an alternate part.
    Hinged { open_part: PartId },
    /// Slides open over several animation frames; stays logically present.
    Ufo,
}

/// A shared, read-only terrain part (floor, wall or object) loaded from RON data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainPartDef {
    /// Stable part ID; index into the part table.
    pub id: u16,
    /// Human-readable name for debug display.
    pub name: String,
    /// Absorption per energy type.
    #[serde(default)]
    pub blockage: Blockage,
    /// Damage needed to destroy the part.
    #[serde(default)]
    pub armor: i32,
    /// 0 = burns readily, 255 = fireproof.
    #[serde(default = "default_flammability")]
    pub flammability: i32,
    /// Turns a fire lasts on this part once ignited.
    #[serde(default)]
    pub fuel: i32,
    /// Light radius emitted by the part (0 = dark).
    #[serde(default)]
    pub light_source: i32,
    /// Explosive rating; a destroyed part with a rating leaves a pending detonation.
    #[serde(default)]
    pub explosive: i32,
    /// Height offset of the standing surface in voxels (negative raises).
    #[serde(default)]
    pub terrain_level: i32,
    /// Loft bitmap id for each two-voxel slice, bottom to top.
    #[serde(default)]
    pub loft: [u16; LOFT_SLICES],
    /// Part that replaces this one when it is destroyed.
    #[serde(default)]
    pub die_part: Option<PartId>,
    #[serde(default)]
    pub door: DoorKind,
}

fn default_flammability() -> i32 {
    FIREPROOF
}

impl TerrainPartDef {
    /// A part with no collision, blockage or special behaviour.
    pub fn new(id: u16, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            blockage: Blockage::default(),
            armor: 0,
            flammability: FIREPROOF,
            fuel: 0,
            light_source: 0,
            explosive: 0,
            terrain_level: 0,
            loft: [0; LOFT_SLICES],
            die_part: None,
            door: DoorKind::None,
        }
    }

    /// Blockage of this part against one energy type.
    pub fn block(&self, kind: DamageType) -> i32 {
        self.blockage.get(kind)
    }

    /// Loft id of the slice containing a voxel's vertical offset (0–23).
    pub fn loft_id(&self, voxel_z_offset: i32) -> u16 {
        let slice = (voxel_z_offset / 2).clamp(0, LOFT_SLICES as i32 - 1) as usize;
        self.loft[slice]
    }

    pub fn is_flammable(&self) -> bool {
        self.flammability < FIREPROOF
    }

    pub fn is_ufo_door(&self) -> bool {
        self.door == DoorKind::Ufo
    }
}

/// Collection of terrain part definitions indexed by ID.
#[derive(Debug, Clone, Default)]
pub struct TerrainPartTable {
    pub parts: Vec<TerrainPartDef>,
}

impl TerrainPartTable {
    /// Build a table, placing every part at the slot of its ID.
    /// Gaps are left empty; a later duplicate ID replaces an earlier one.
    pub fn from_parts(parts: Vec<TerrainPartDef>) -> Self {
        let len = parts.iter().map(|p| p.id as usize + 1).max().unwrap_or(0);
        let mut slots: Vec<Option<TerrainPartDef>> = vec![None; len];
        for part in parts {
            let id = part.id as usize;
            slots[id] = Some(part);
        }
        let parts = slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| slot.unwrap_or_else(|| TerrainPartDef::new(i as u16, "<unused>")))
            .collect();
        Self { parts }
    }

    /// Look up a part by ID. Returns None if not found.
    pub fn get(&self, id: PartId) -> Option<&TerrainPartDef> {
        self.parts.get(id.0 as usize)
    }

    /// Look up a part by its debug name.
    pub fn find(&self, name: &str) -> Option<PartId> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| PartId(p.id))
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}
