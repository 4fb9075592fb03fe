use tactica_core::constants::VOXELS_X;
use tactica_core::math::{voxel_offset, voxel_to_tile};
use tactica_core::types::{Position, UnitId, VoxelHit, ALL_PARTS};
use tactica_world::Battlefield;

/// Classify what occupies a voxel.
///
/// The occupant's body is tested first (below its current height, unless it is
/// `exclude`), then the four parts in slot order. Open UFO doors are transparent.
pub fn voxel_check(bf: &Battlefield, voxel: Position, exclude: Option<UnitId>) -> VoxelHit {
    let Some(tile) = bf.tile(voxel_to_tile(voxel)) else {
        return VoxelHit::OutOfBounds;
    };
    let offset = voxel_offset(voxel);
    // Loft bit 15 is the western edge, row 0 the northern edge.
    let bit = (VOXELS_X - 1 - offset.x) as usize;
    let row = (VOXELS_X - 1 - offset.y) as usize;

    if let Some(unit) = tile
        .unit()
        .filter(|&id| Some(id) != exclude)
        .and_then(|id| bf.unit(id))
    {
        if offset.z < unit.height() && bf.lofts.is_solid(unit.body.loft, bit, row) {
            return VoxelHit::Unit;
        }
    }

    for slot in ALL_PARTS {
        if tile.is_ufo_door_open(slot, &bf.parts) {
            continue;
        }
        if let Some(def) = tile.part_def(slot, &bf.parts) {
            if bf.lofts.is_solid(def.loft_id(offset.z), bit, row) {
                return VoxelHit::Part(slot);
            }
        }
    }
    VoxelHit::Empty
}
