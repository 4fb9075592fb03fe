use std::path::Path;

use crate::runner::BenchmarkResult;

/// A complete baseline containing results from all scenes.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Baseline {
    pub timestamp: String,
    pub results: Vec<BenchmarkResult>,
}

/// Load a baseline from a JSON file. Returns None if the file doesn't exist or
/// does not parse.
pub fn load_baseline(path: &Path) -> Option<Baseline> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(baseline) => Some(baseline),
        Err(e) => {
            log::warn!("Ignoring unreadable baseline {}: {e}", path.display());
            None
        }
    }
}

/// Save a baseline to a JSON file.
pub fn save_baseline(path: &Path, baseline: &Baseline) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(baseline).map_err(std::io::Error::other)?;
    std::fs::write(path, json)
}

/// Compare current results against a baseline. Returns a list of regressions
/// (scene name, percent change) where the threshold is exceeded.
pub fn compare(
    current: &[BenchmarkResult],
    baseline: &Baseline,
    threshold_pct: f64,
) -> Vec<(String, f64)> {
    let mut regressions = Vec::new();

    for result in current {
        if let Some(base) = baseline
            .results
            .iter()
            .find(|b| b.scene_name == result.scene_name)
        {
            if base.timings.mean_ms <= 0.0 {
                continue;
            }
            let pct_change =
                (result.timings.mean_ms - base.timings.mean_ms) / base.timings.mean_ms * 100.0;
            if pct_change > threshold_pct {
                regressions.push((result.scene_name.clone(), pct_change));
            }
        }
    }

    regressions
}

/// Format results as a markdown summary table.
pub fn format_markdown(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    out.push_str("| Scene | Tiles | Units | Turns | Mean (ms) | Median (ms) | P95 (ms) | P99 (ms) | Min (ms) | Max (ms) |\n");
    out.push_str("|-------|-------|-------|-------|-----------|-------------|----------|----------|----------|----------|\n");

    for r in results {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} |\n",
            r.scene_name,
            r.tile_count,
            r.unit_count,
            r.turn_count,
            r.timings.mean_ms,
            r.timings.median_ms,
            r.timings.p95_ms,
            r.timings.p99_ms,
            r.timings.min_ms,
            r.timings.max_ms,
        ));
    }

    out
}

/// Format the per-operation breakdown, one column per operation.
pub fn format_operations(results: &[BenchmarkResult]) -> String {
    let Some(first) = results.first() else {
        return String::new();
    };
    let names: Vec<&str> = first.operations.iter().map(|o| o.name.as_str()).collect();

    let mut out = format!("| Scene | {} |\n", names.join(" | "));
    out.push_str(&format!("|-------|{}\n", "---|".repeat(names.len())));
    for r in results {
        let cells: Vec<String> = r
            .operations
            .iter()
            .map(|o| format!("{:.3}", o.mean_ms))
            .collect();
        out.push_str(&format!("| {} | {} |\n", r.scene_name, cells.join(" | ")));
    }
    out
}

/// Format a comparison report showing regressions.
pub fn format_comparison(regressions: &[(String, f64)], threshold_pct: f64) -> String {
    if regressions.is_empty() {
        return format!(
            "All scenes within {:.0}% threshold. No regressions detected.\n",
            threshold_pct
        );
    }

    let mut out = String::new();
    out.push_str(&format!(
        "REGRESSIONS DETECTED (>{:.0}% threshold):\n",
        threshold_pct
    ));
    for (scene, pct) in regressions {
        out.push_str(&format!("  - {}: +{:.1}%\n", scene, pct));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{OperationTiming, TimingSeries};

    fn result(name: &str, mean_ms: f64) -> BenchmarkResult {
        BenchmarkResult {
            scene_name: name.to_string(),
            tile_count: 800,
            unit_count: 8,
            turn_count: 10,
            timings: TimingSeries {
                mean_ms,
                median_ms: mean_ms,
                p95_ms: mean_ms,
                p99_ms: mean_ms,
                min_ms: mean_ms,
                max_ms: mean_ms,
            },
            operations: vec![
                OperationTiming {
                    name: "fov".to_string(),
                    mean_ms: mean_ms / 2.0,
                },
                OperationTiming {
                    name: "explosion".to_string(),
                    mean_ms: mean_ms / 2.0,
                },
            ],
            reaction_shots: 0,
            chained_explosions: 0,
            units_standing: 8,
        }
    }

    #[test]
    fn test_compare_flags_only_slower_scenes() {
        let baseline = Baseline {
            timestamp: "t".to_string(),
            results: vec![result("town", 10.0), result("skirmish", 2.0), result("idle", 0.0)],
        };
        let current = [result("town", 12.0), result("skirmish", 2.1), result("idle", 1.0)];
        let regressions = compare(&current, &baseline, 10.0);
        assert_eq!(regressions.len(), 1);
        assert_eq!(regressions[0].0, "town");
        assert!((regressions[0].1 - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_baseline_survives_json() {
        let baseline = Baseline {
            timestamp: "bench-1".to_string(),
            results: vec![result("town", 3.5)],
        };
        let dir = std::env::temp_dir().join(format!("tactica-bench-{}", std::process::id()));
        let path = dir.join("baseline.json");
        save_baseline(&path, &baseline).unwrap();
        let loaded = load_baseline(&path).unwrap();
        assert_eq!(loaded.results[0].scene_name, "town");
        assert_eq!(loaded.results[0].operations.len(), 2);
        std::fs::remove_dir_all(dir).unwrap();
        assert!(load_baseline(&path).is_none());
    }

    #[test]
    fn test_markdown_tables() {
        let results = [result("town", 3.5)];
        let table = format_markdown(&results);
        assert!(table.contains("| town | 800 | 8 | 10 | 3.500 |"));
        let ops = format_operations(&results);
        assert!(ops.starts_with("| Scene | fov | explosion |"));
        assert!(ops.contains("| town | 1.750 | 1.750 |"));
        assert!(format_operations(&[]).is_empty());
    }
}
