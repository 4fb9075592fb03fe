//! Line and parabola tracing through the voxel lattice.

use glam::IVec3;
use tactica_core::constants::PARABOLA_START_STEP;
use tactica_core::types::{Position, UnitId, VoxelHit};
use tactica_world::Battlefield;

use crate::voxel::voxel_check;

/// Which sampled voxels a trace hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackMode {
    /// Only the classification.
    HitOnly,
    /// The voxel where the trace stopped, if it hit something.
    Impact,
    /// Every visited voxel, for trajectory display.
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trajectory {
    pub hit: VoxelHit,
    pub voxels: Vec<Position>,
}

impl Trajectory {
    /// Impact voxel when the trace hit something and it was recorded.
    pub fn impact(&self) -> Option<Position> {
        if self.hit.is_hit() {
            self.voxels.last().copied()
        } else {
            None
        }
    }
}

/// All voxels of the 3D Bresenham line from `origin` to `target`, both included.
///
/// The line is always rasterised from the lexicographically smaller endpoint,
/// so swapping the endpoints yields the same voxels in reverse order.
pub fn line_voxels(origin: Position, target: Position) -> Vec<Position> {
    let reversed = target.to_array() < origin.to_array();
    let (start, end) = if reversed {
        (target, origin)
    } else {
        (origin, target)
    };
    let mut voxels = bresenham(start, end);
    if reversed {
        voxels.reverse();
    }
    voxels
}

fn bresenham(start: IVec3, end: IVec3) -> Vec<IVec3> {
    let mut p0 = start.to_array();
    let mut p1 = end.to_array();

    // Fold the octant so x is the driving axis.
    let swap_xy = (p1[1] - p0[1]).abs() > (p1[0] - p0[0]).abs();
    if swap_xy {
        p0.swap(0, 1);
        p1.swap(0, 1);
    }
    let swap_xz = (p1[2] - p0[2]).abs() > (p1[0] - p0[0]).abs();
    if swap_xz {
        p0.swap(0, 2);
        p1.swap(0, 2);
    }

    let delta_x = (p1[0] - p0[0]).abs();
    let delta_y = (p1[1] - p0[1]).abs();
    let delta_z = (p1[2] - p0[2]).abs();
    let step = |a: i32, b: i32| if a > b { -1 } else { 1 };
    let (step_x, step_y, step_z) = (step(p0[0], p1[0]), step(p0[1], p1[1]), step(p0[2], p1[2]));

    let mut drift_xy = delta_x / 2;
    let mut drift_xz = delta_x / 2;
    let (mut x, mut y, mut z) = (p0[0], p0[1], p0[2]);
    let mut voxels = Vec::with_capacity(delta_x as usize + 1);
    loop {
        let mut c = [x, y, z];
        if swap_xz {
            c.swap(0, 2);
        }
        if swap_xy {
            c.swap(0, 1);
        }
        voxels.push(IVec3::from_array(c));
        if x == p1[0] {
            break;
        }

        drift_xy -= delta_y;
        drift_xz -= delta_z;
        if drift_xy < 0 {
            y += step_y;
            drift_xy += delta_x;
        }
        if drift_xz < 0 {
            z += step_z;
            drift_xz += delta_x;
        }
        x += step_x;
    }
    voxels
}

fn record(mode: TrackMode, voxels: &mut Vec<Position>, voxel: Position, hit: VoxelHit) {
    match mode {
        TrackMode::Full => voxels.push(voxel),
        TrackMode::Impact if hit.is_hit() => voxels.push(voxel),
        _ => {}
    }
}

/// Trace a straight line, stopping at the first occupied voxel.
/// The terminal voxel itself is not tested.
pub fn calculate_line(
    bf: &Battlefield,
    origin: Position,
    target: Position,
    mode: TrackMode,
    exclude: Option<UnitId>,
) -> Trajectory {
    let line = line_voxels(origin, target);
    let mut voxels = Vec::new();
    for &voxel in &line[..line.len().saturating_sub(1)] {
        let hit = voxel_check(bf, voxel, exclude);
        record(mode, &mut voxels, voxel, hit);
        if hit.is_hit() {
            return Trajectory { hit, voxels };
        }
    }
    Trajectory {
        hit: VoxelHit::Empty,
        voxels,
    }
}

/// Trace a lofted throw.
///
/// `curvature` sets the apex height (1.0 almost flat, 3.0 lobbed over a fence);
/// `accuracy` scales both launch angles (1.0 = no deviation). Sampling starts
/// a few voxels out from the thrower and ends at the first collision or when
/// the arc reaches the ground.
pub fn calculate_parabola(
    bf: &Battlefield,
    origin: Position,
    target: Position,
    mode: TrackMode,
    exclude: Option<UnitId>,
    curvature: f64,
    accuracy: f64,
) -> Trajectory {
    let mut voxels = Vec::new();
    let delta = (target - origin).as_dvec3();
    let ro = delta.length();
    if ro == 0.0 {
        return Trajectory {
            hit: VoxelHit::Empty,
            voxels,
        };
    }

    let fi = (delta.z / ro).acos() * accuracy;
    let te = delta.y.atan2(delta.x) * accuracy;
    let apex = ro.sqrt() * curvature;
    let bend = 4.0 * apex / ro / ro;
    let o = origin.as_dvec3();

    let mut z = origin.z;
    let mut i = PARABOLA_START_STEP as f64;
    while z > 0 {
        let x = (o.x + i * te.cos() * fi.sin()) as i32;
        let y = (o.y + i * te.sin() * fi.sin()) as i32;
        z = (o.z + i * fi.cos() - bend * (i - ro / 2.0) * (i - ro / 2.0) + apex) as i32;
        // Below-ground samples land on the ground voxel.
        let voxel = IVec3::new(x, y, z.max(0));
        let hit = voxel_check(bf, voxel, exclude);
        record(mode, &mut voxels, voxel, hit);
        if hit.is_hit() {
            return Trajectory { hit, voxels };
        }
        i += 1.0;
    }
    Trajectory {
        hit: VoxelHit::Empty,
        voxels,
    }
}
