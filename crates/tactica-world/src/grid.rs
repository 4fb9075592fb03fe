use glam::IVec3;
use tactica_core::error::WorldError;
use tactica_core::types::Position;

use crate::tile::Tile;

/// Dense 3D array of tiles, allocated once for the whole mission.
/// Linear index = z * length * width + y * width + x.
#[derive(Debug, Clone)]
pub struct TileGrid {
    width: i32,
    length: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn new(width: i32, length: i32, height: i32) -> Result<Self, WorldError> {
        if width <= 0 || length <= 0 || height <= 0 {
            return Err(WorldError::EmptyGrid {
                width,
                length,
                height,
            });
        }
        let mut tiles = Vec::with_capacity((width * length * height) as usize);
        for z in 0..height {
            for y in 0..length {
                for x in 0..width {
                    tiles.push(Tile::new(IVec3::new(x, y, z)));
                }
            }
        }
        Ok(Self {
            width,
            length,
            height,
            tiles,
        })
    }

    /// Size along x.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Size along y.
    pub fn length(&self) -> i32 {
        self.length
    }

    /// Number of levels.
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn dimensions(&self) -> IVec3 {
        IVec3::new(self.width, self.length, self.height)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.z >= 0
            && pos.x < self.width
            && pos.y < self.length
            && pos.z < self.height
    }

    /// Linear index of a position, or None outside the grid.
    pub fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos).then(|| {
            (pos.z * self.length * self.width + pos.y * self.width + pos.x) as usize
        })
    }

    /// Inverse of `index`.
    pub fn position_of(&self, index: usize) -> Option<Position> {
        if index >= self.tiles.len() {
            return None;
        }
        let i = index as i32;
        let layer = self.width * self.length;
        Some(IVec3::new(i % self.width, (i % layer) / self.width, i / layer))
    }

    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.index(pos).map(|i| &self.tiles[i])
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        self.index(pos).map(move |i| &mut self.tiles[i])
    }

    pub fn get_index(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }
}
