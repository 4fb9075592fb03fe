use glam::IVec3;

use crate::constants::{VOXELS_X, VOXELS_Y, VOXELS_Z};

/// Voxel subdivision of one tile as a vector.
pub const VOXELS_PER_TILE: IVec3 = IVec3::new(VOXELS_X, VOXELS_Y, VOXELS_Z);

/// Tile containing a voxel. Floor division, so negative voxels map to negative tiles.
pub fn voxel_to_tile(voxel: IVec3) -> IVec3 {
    voxel.div_euclid(VOXELS_PER_TILE)
}

/// Offset of a voxel inside its tile, each component in `0..subdivision`.
pub fn voxel_offset(voxel: IVec3) -> IVec3 {
    voxel.rem_euclid(VOXELS_PER_TILE)
}

/// Voxel at the horizontal centre of a tile, at the bottom of its level.
pub fn tile_base_voxel(tile: IVec3) -> IVec3 {
    IVec3::new(
        tile.x * VOXELS_X + VOXELS_X / 2,
        tile.y * VOXELS_Y + VOXELS_Y / 2,
        tile.z * VOXELS_Z,
    )
}

/// Voxel at the centre of a tile.
pub fn tile_center_voxel(tile: IVec3) -> IVec3 {
    tile_base_voxel(tile) + IVec3::new(0, 0, VOXELS_Z / 2)
}

/// Horizontal Euclidean distance rounded to the nearest integer.
pub fn rounded_distance(dx: i32, dy: i32) -> i32 {
    let (dx, dy) = (dx as f64, dy as f64);
    (dx * dx + dy * dy).sqrt().round() as i32
}

/// Horizontal rounded distance between two tile positions.
pub fn tile_distance(a: IVec3, b: IVec3) -> i32 {
    rounded_distance(a.x - b.x, a.y - b.y)
}
