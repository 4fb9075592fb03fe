pub mod blockage;
pub mod environment;
pub mod explosion;
pub mod fov;
pub mod geometry;
pub mod interaction;
pub mod lighting;
pub mod reaction;
pub mod rng;
pub mod voxel;

#[cfg(test)]
mod test_harness;

pub use environment::{close_ufo_doors, prepare_new_turn};
pub use explosion::{
    check_for_chained_explosions, explode, resolve_chained_explosions, ExplosionReport,
};
pub use fov::{calculate_fov, calculate_fov_area, check_for_visible_units};
pub use geometry::{calculate_line, calculate_parabola, TrackMode, Trajectory};
pub use interaction::{spawn_item, unit_opens_door};
pub use lighting::{calculate_sun_shading, calculate_terrain_lighting, calculate_unit_lighting};
pub use reaction::{check_reaction_fire, BattleAction};
pub use rng::{RandomSource, SeededRandom};
pub use voxel::voxel_check;
