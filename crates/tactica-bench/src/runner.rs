use std::sync::Arc;
use std::time::Instant;

use glam::IVec3;
use tactica_core::loft::LoftTable;
use tactica_core::math::tile_center_voxel;
use tactica_core::terrain::TerrainPartTable;
use tactica_core::types::{DamageType, Faction, TurnContext, UnitId};
use tactica_rules::LoadError;
use tactica_sim::{
    calculate_fov_area, calculate_line, calculate_parabola, calculate_sun_shading,
    calculate_terrain_lighting, calculate_unit_lighting, check_reaction_fire, close_ufo_doors,
    explode, prepare_new_turn, resolve_chained_explosions, unit_opens_door, BattleAction,
    RandomSource, SeededRandom, TrackMode,
};
use tactica_world::Battlefield;
use thiserror::Error;

use crate::scenes::SceneConfig;

const URBAN_PARTS: &str = include_str!("../../../data/terrain/urban.ron");
const UFO_PARTS: &str = include_str!("../../../data/terrain/ufo.ron");
const LOFTS: &str = include_str!("../../../data/lofts.ron");

const SEED: u64 = 0x7AC7_1CA5;
const GRENADE_POWER: i32 = 60;
const GRENADE_RADIUS: i32 = 6;

/// Measured operations, in the order they run each turn.
const OPERATIONS: [&str; 6] = [
    "lighting",
    "fov",
    "doors",
    "reaction",
    "trajectories",
    "explosion",
];
const ENVIRONMENT: &str = "environment";

#[derive(Debug, Error)]
pub enum BenchError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    World(#[from] tactica_core::error::WorldError),
}

/// Timing data for a single benchmark run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Mean cost of one operation per turn.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct OperationTiming {
    pub name: String,
    pub mean_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub tile_count: usize,
    pub unit_count: usize,
    pub turn_count: u32,
    /// Whole-turn timings.
    pub timings: TimingSeries,
    pub operations: Vec<OperationTiming>,
    pub reaction_shots: u32,
    pub chained_explosions: usize,
    pub units_standing: usize,
}

/// Plays scripted turns on the standard scenes and times the core operations.
pub struct BenchmarkRunner {
    parts: Arc<TerrainPartTable>,
    lofts: Arc<LoftTable>,
    turn_count: u32,
}

impl BenchmarkRunner {
    /// Load and validate the shipped terrain data.
    pub fn new(turn_count: u32) -> Result<Self, BenchError> {
        let (data, problems) = tactica_rules::load_terrain(&[URBAN_PARTS, UFO_PARTS], LOFTS)?;
        if !problems.is_empty() {
            log::warn!("{} terrain data problems, results may be skewed", problems.len());
        }
        Ok(Self {
            parts: Arc::new(data.parts),
            lofts: Arc::new(data.lofts),
            turn_count,
        })
    }

    /// Run a single benchmark scene and return timing results.
    pub fn run_scene(&self, config: &SceneConfig) -> Result<BenchmarkResult, BenchError> {
        log::info!(
            "Running scene '{}' ({}x{}x{}, {} units)...",
            config.name,
            config.width,
            config.length,
            config.height,
            config.soldiers + config.aliens
        );

        let mut bf =
            crate::scenes::build_battlefield(config, self.parts.clone(), self.lofts.clone())?;
        let mut rng = SeededRandom::new(SEED);

        let opening = TurnContext::new(config.global_shade, Faction::Player);
        calculate_sun_shading(&mut bf, &opening);
        calculate_terrain_lighting(&mut bf, &opening);
        calculate_unit_lighting(&mut bf, &opening);

        let mut turn_times = Vec::with_capacity(self.turn_count as usize);
        let mut op_totals = [0.0f64; OPERATIONS.len() + 1];
        let mut reaction_shots = 0;
        let mut chained_explosions = 0;

        for turn in 0..self.turn_count {
            let side = if turn % 2 == 0 {
                Faction::Player
            } else {
                Faction::Hostile
            };
            let ctx = TurnContext::new(config.global_shade, side);
            let turn_start = Instant::now();

            timed(&mut op_totals[0], || {
                calculate_sun_shading(&mut bf, &ctx);
                calculate_terrain_lighting(&mut bf, &ctx);
                calculate_unit_lighting(&mut bf, &ctx);
            });
            timed(&mut op_totals[1], || calculate_fov_area(&mut bf, &ctx));

            let actors = active_units(&bf, side);
            timed(&mut op_totals[2], || {
                for &id in &actors {
                    unit_opens_door(&mut bf, id, &ctx);
                }
            });
            timed(&mut op_totals[3], || {
                for &id in &actors {
                    let mut action = BattleAction::default();
                    if check_reaction_fire(&mut bf, id, &mut action, None, false, &mut rng, &ctx) {
                        reaction_shots += 1;
                    }
                }
            });
            timed(&mut op_totals[4], || trace_shots(&bf, &actors));
            timed(&mut op_totals[5], || {
                let target = IVec3::new(
                    rng.generate(0, config.width - 1),
                    rng.generate(0, config.length - 1),
                    0,
                );
                explode(
                    &mut bf,
                    tile_center_voxel(target),
                    GRENADE_POWER,
                    DamageType::HighExplosive,
                    GRENADE_RADIUS,
                    None,
                    &mut rng,
                    &ctx,
                );
                chained_explosions += resolve_chained_explosions(&mut bf, &mut rng, &ctx);
            });
            timed(&mut op_totals[OPERATIONS.len()], || {
                prepare_new_turn(&mut bf, &mut rng, &ctx);
                bf.advance_door_frames();
                if side == Faction::Hostile {
                    close_ufo_doors(&mut bf);
                }
            });

            turn_times.push(turn_start.elapsed().as_secs_f64() * 1000.0);
        }

        let turns = f64::from(self.turn_count.max(1));
        let operations = OPERATIONS
            .iter()
            .chain(std::iter::once(&ENVIRONMENT))
            .zip(op_totals)
            .map(|(name, total)| OperationTiming {
                name: (*name).to_string(),
                mean_ms: total / turns,
            })
            .collect();

        let units_standing = bf.units.iter().filter(|u| !u.is_out()).count();
        log::info!(
            "  {} reaction shots, {} chained explosions, {} units standing",
            reaction_shots,
            chained_explosions,
            units_standing
        );

        Ok(BenchmarkResult {
            scene_name: config.name.to_string(),
            tile_count: bf.grid.len(),
            unit_count: bf.units.len(),
            turn_count: self.turn_count,
            timings: compute_timings(&turn_times),
            operations,
            reaction_shots,
            chained_explosions,
            units_standing,
        })
    }
}

/// Run one operation, adding its wall time in milliseconds to `total`.
fn timed(total: &mut f64, op: impl FnOnce()) {
    let start = Instant::now();
    op();
    *total += start.elapsed().as_secs_f64() * 1000.0;
}

fn active_units(bf: &Battlefield, side: Faction) -> Vec<UnitId> {
    bf.units
        .iter()
        .filter(|u| u.faction == side && !u.is_out())
        .map(|u| u.id)
        .collect()
}

/// Aimed shots and grenade lobs from every actor at the first opponent it sees.
fn trace_shots(bf: &Battlefield, actors: &[UnitId]) {
    for &id in actors {
        let Some(shooter) = bf.unit(id) else {
            continue;
        };
        let Some(target) = shooter.visible_units().first().and_then(|&t| bf.unit(t)) else {
            continue;
        };
        let origin = tile_center_voxel(shooter.position);
        let aim = tile_center_voxel(target.position);
        let shot = calculate_line(bf, origin, aim, TrackMode::Impact, Some(id));
        let lob = calculate_parabola(bf, origin, aim, TrackMode::Impact, Some(id), 2.0, 1.0);
        log::trace!("unit {} shot {:?}, lob {:?}", id, shot.hit, lob.hit);
    }
}

/// Compute timing statistics from a list of turn times in milliseconds.
fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let p95_idx = ((n as f64) * 0.95).ceil() as usize;
    let p99_idx = ((n as f64) * 0.99).ceil() as usize;

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: sorted[p95_idx.min(n - 1)],
        p99_ms: sorted[p99_idx.min(n - 1)],
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenes::standard_scenes;

    #[test]
    fn test_timings_of_known_series() {
        let t = compute_timings(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(t.mean_ms, 2.5);
        assert_eq!(t.median_ms, 2.5);
        assert_eq!(t.min_ms, 1.0);
        assert_eq!(t.max_ms, 4.0);
        assert_eq!(t.p95_ms, 4.0);
        assert_eq!(compute_timings(&[]).max_ms, 0.0);
    }

    #[test]
    fn test_skirmish_runs_a_few_turns() {
        let runner = BenchmarkRunner::new(4).unwrap();
        let scenes = standard_scenes();
        let result = runner.run_scene(&scenes[0]).unwrap();
        assert_eq!(result.scene_name, "skirmish");
        assert_eq!(result.turn_count, 4);
        assert_eq!(result.tile_count, 20 * 20 * 2);
        assert_eq!(result.operations.len(), OPERATIONS.len() + 1);
        assert!(result.units_standing <= result.unit_count);
    }
}
