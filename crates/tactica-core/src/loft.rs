//! Voxel collision masks ("lofts").
//!
//! A loft is a 16×16 bitmap describing which voxels of one horizontal slice
//! are solid. Row `y` is a 16-bit mask whose bit `x` is set when the voxel is
//! solid. Parts reference a loft per two-voxel slice; unit bodies reference a
//! single loft used for every height below the unit's current height.

use serde::{Deserialize, Serialize};

use crate::constants::LOFT_ROWS;

/// Loft 0 is reserved as the empty bitmap.
pub const EMPTY_LOFT: u16 = 0;

/// A single loft bitmap as stored in data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoftDef {
    pub id: u16,
    pub rows: [u16; LOFT_ROWS],
}

/// Flattened, process-wide table of loft rows: `masks[id * 16 + row]`.
#[derive(Debug, Clone)]
pub struct LoftTable {
    masks: Vec<u16>,
}

impl Default for LoftTable {
    fn default() -> Self {
        Self::new()
    }
}

impl LoftTable {
    /// A table holding only the empty loft.
    pub fn new() -> Self {
        Self {
            masks: vec![0; LOFT_ROWS],
        }
    }

    /// Wrap a raw row array. Length is padded to a whole number of lofts.
    pub fn from_masks(mut masks: Vec<u16>) -> Self {
        let rem = masks.len() % LOFT_ROWS;
        if rem != 0 {
            masks.resize(masks.len() + LOFT_ROWS - rem, 0);
        }
        if masks.is_empty() {
            masks.resize(LOFT_ROWS, 0);
        }
        Self { masks }
    }

    /// Build from loft definitions; missing ids stay empty.
    pub fn from_defs(defs: &[LoftDef]) -> Self {
        let count = defs.iter().map(|d| d.id as usize + 1).max().unwrap_or(1);
        let mut masks = vec![0u16; count * LOFT_ROWS];
        for def in defs {
            let base = def.id as usize * LOFT_ROWS;
            masks[base..base + LOFT_ROWS].copy_from_slice(&def.rows);
        }
        Self { masks }
    }

    /// Insert or replace a loft, growing the table as needed.
    pub fn set(&mut self, id: u16, rows: [u16; LOFT_ROWS]) {
        let base = id as usize * LOFT_ROWS;
        if self.masks.len() < base + LOFT_ROWS {
            self.masks.resize(base + LOFT_ROWS, 0);
        }
        self.masks[base..base + LOFT_ROWS].copy_from_slice(&rows);
    }

    /// Number of lofts in the table.
    pub fn len(&self) -> usize {
        self.masks.len() / LOFT_ROWS
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    pub fn contains(&self, id: u16) -> bool {
        (id as usize) < self.len()
    }

    /// Mask of one row; unknown ids read as empty.
    pub fn row(&self, id: u16, row: usize) -> u16 {
        self.masks
            .get(id as usize * LOFT_ROWS + row)
            .copied()
            .unwrap_or(0)
    }

    /// Whether voxel `(x, y)` of a loft is solid.
    pub fn is_solid(&self, id: u16, x: usize, y: usize) -> bool {
        x < 16 && y < LOFT_ROWS && self.row(id, y) & (1 << x) != 0
    }
}
