//! Single source of truth for simulation constants.
//! Terrain-part values live in RON data; everything tuned in code lives here.

/// Voxels per tile along x.
pub const VOXELS_X: i32 = 16;

/// Voxels per tile along y.
pub const VOXELS_Y: i32 = 16;

/// Voxels per tile along z (one level).
pub const VOXELS_Z: i32 = 24;

/// Rows in a single loft bitmap (one u16 mask per voxel row).
pub const LOFT_ROWS: usize = 16;

/// Loft slices per terrain part. Each slice covers two voxel layers.
pub const LOFT_SLICES: usize = 12;

/// Brightest light value a tile can hold; shade is `MAX_LIGHT - light`.
pub const MAX_LIGHT: i32 = 15;

/// Number of independent light layers (ambient, static, dynamic).
pub const LIGHT_LAYERS: usize = 3;

/// Sunlight layer.
pub const AMBIENT_LAYER: usize = 0;

/// Terrain light sources and fires.
pub const STATIC_LAYER: usize = 1;

/// Light carried by units.
pub const DYNAMIC_LAYER: usize = 2;

/// Ambient penalty applied to tiles with a floor somewhere above them by day.
pub const SUN_BLOCKED_PENALTY: i32 = 2;

/// Sun only casts indoor shadow while the global shade is at or below this.
pub const SUN_SHADOW_MAX_SHADE: i32 = 5;

/// Light power of a burning tile.
pub const FIRE_LIGHT_POWER: i32 = 15;

/// Light power carried by every active player unit.
pub const PERSONAL_LIGHT_POWER: i32 = 15;

/// Blockage value of a floor against HE (explosion chaining through floors).
pub const FLOOR_HE_BLOCKAGE: i32 = 15;

/// Blockage value of a floor against everything except HE.
pub const FLOOR_BLOCKAGE: i32 = 255;

/// Flammability of a fireproof part (and of a tile with no parts).
pub const FIREPROOF: i32 = 255;

/// Starting view budget, in tiles, of every FOV ray.
pub const MAX_VIEW_DISTANCE: i32 = 20;

/// Tiles darker than this shade are never seen.
pub const VISIBLE_SHADE_LIMIT: i32 = 10;

/// Tiles darker than this shade cost one extra unit of view distance.
pub const HAZE_SHADE_LIMIT: i32 = 7;

/// Horizontal FOV sampling step in degrees.
pub const FOV_HORIZONTAL_STEP: i32 = 3;

/// Vertical FOV sampling step in degrees.
pub const FOV_VERTICAL_STEP: i32 = 6;

/// Lowest vertical FOV angle (straight down).
pub const FOV_MIN_PITCH: i32 = -90;

/// Highest vertical FOV angle.
pub const FOV_MAX_PITCH: i32 = 60;

/// Vertical sampling step, in voxels, when scanning a target silhouette.
pub const SILHOUETTE_SCAN_STEP: i32 = 2;

/// Units further away than this (rounded Euclidean, exclusive) never react.
pub const REACTION_RANGE: i32 = 19;

/// Area explosions lose this much power per tile travelled.
pub const EXPLOSION_DECAY_PER_STEP: i32 = 10;

/// Angular step of the explosion ray fan in degrees.
pub const EXPLOSION_ANGLE_STEP: i32 = 3;

/// Explosions only add smoke to tiles thinner than this.
pub const EXPLOSION_SMOKE_THRESHOLD: i32 = 10;

/// Smoke deposited by an explosion always lasts at least this many turns.
pub const EXPLOSION_SMOKE_MIN_TURNS: i32 = 10;

/// Upper bound on the smoke level of a single tile.
pub const MAX_SMOKE: i32 = 20;

/// First parabola sample, in voxels, skipping the thrower's own silhouette.
pub const PARABOLA_START_STEP: i32 = 8;

/// Spread of the folded normal draw used for fire spreading.
pub const FIRE_SPREAD_STD_DEV: f64 = 126.0;

/// Last animation frame of a UFO door; at this frame it is fully open.
pub const UFO_DOOR_OPEN_FRAME: u8 = 7;
