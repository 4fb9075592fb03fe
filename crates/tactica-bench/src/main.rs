use std::path::PathBuf;
use std::process;

use tactica_bench::report;
use tactica_bench::runner::BenchmarkRunner;
use tactica_bench::scenes;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut turn_count = 40u32;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--baseline" => {
                baseline_path = Some(PathBuf::from(value(&args, &mut i)));
            }
            "--output" => {
                output_path = Some(PathBuf::from(value(&args, &mut i)));
            }
            "--regression-threshold" => {
                regression_threshold = parse(value(&args, &mut i), "--regression-threshold");
            }
            "--turns" => {
                turn_count = parse(value(&args, &mut i), "--turns");
            }
            "--help" | "-h" => {
                eprintln!("Usage: bench-runner [OPTIONS]");
                eprintln!("  --baseline <path>              Load baseline JSON for comparison");
                eprintln!("  --output <path>                Save current results as JSON baseline");
                eprintln!(
                    "  --regression-threshold <pct>   Regression threshold percentage (default: 10)"
                );
                eprintln!("  --turns <n>                    Turns per scene (default: 40)");
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                process::exit(1);
            }
        }
        i += 1;
    }

    log::info!("Loading terrain data...");
    let runner = match BenchmarkRunner::new(turn_count) {
        Ok(runner) => runner,
        Err(e) => {
            log::error!("{e}");
            process::exit(1);
        }
    };

    let mut results = Vec::new();
    for config in &scenes::standard_scenes() {
        match runner.run_scene(config) {
            Ok(result) => results.push(result),
            Err(e) => {
                log::error!("Scene '{}' failed: {e}", config.name);
                process::exit(1);
            }
        }
    }

    println!("\n## Benchmark Results\n");
    println!("{}", report::format_markdown(&results));
    println!("### Per-operation mean (ms per turn)\n");
    println!("{}", report::format_operations(&results));

    if let Some(ref path) = output_path {
        let baseline = report::Baseline {
            timestamp: run_label(),
            results: results.clone(),
        };
        if let Err(e) = report::save_baseline(path, &baseline) {
            log::error!("Failed to save baseline to {}: {e}", path.display());
            process::exit(1);
        }
        log::info!("Saved baseline to {}", path.display());
    }

    if let Some(ref path) = baseline_path {
        if let Some(baseline) = report::load_baseline(path) {
            let regressions = report::compare(&results, &baseline, regression_threshold);
            println!(
                "{}",
                report::format_comparison(&regressions, regression_threshold)
            );
            if !regressions.is_empty() {
                eprintln!(
                    "ERROR: {} regressions detected, exiting with code 1",
                    regressions.len()
                );
                process::exit(1);
            }
        } else {
            log::warn!("Baseline file not found: {}", path.display());
        }
    }

    log::info!("Benchmark complete.");
}

/// Consume the value following a flag.
fn value<'a>(args: &'a [String], i: &mut usize) -> &'a str {
    *i += 1;
    match args.get(*i) {
        Some(v) => v,
        None => {
            eprintln!("Missing value for {}", args[*i - 1]);
            process::exit(1);
        }
    }
}

fn parse<T: std::str::FromStr>(raw: &str, flag: &str) -> T {
    match raw.parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Invalid {flag} value: {raw}");
            process::exit(1);
        }
    }
}

/// Run label without pulling in a date-time dependency.
fn run_label() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    format!("bench-{secs}")
}
