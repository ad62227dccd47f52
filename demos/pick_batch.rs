//! Example: detect arrivals in several text traces in parallel
//!
//! Each file holds one sample per line.
//!
//! Usage:
//!   cargo run --release --example pick_batch -- [--jobs N] [--fs HZ] [--threshold T] [--refine] [--json] <file1> <file2> ...
//!
//! Notes:
//! - Parallelism is across files; refinement additionally fans out per event.

use arrival_picker::{
    detect_all, DetectionConfig, PickingError, Record, RecordFactory, SignalSource, StaLta,
};
use std::env;
use std::time::Instant;

/// Plain-text trace, one floating-point sample per line
struct TextTrace {
    path: String,
}

impl SignalSource for TextTrace {
    fn read(&self) -> arrival_picker::Result<Vec<f64>> {
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| PickingError::SourceError(format!("{}: {}", self.path, e)))?;
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(|line| {
                line.parse::<f64>().map_err(|e| {
                    PickingError::SourceError(format!("{}: bad sample '{}': {}", self.path, line, e))
                })
            })
            .collect()
    }

    fn identifier(&self) -> &str {
        &self.path
    }
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1).max(1))
        .unwrap_or(1)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();
    let mut json = false;
    let mut jobs: Option<usize> = None;
    let mut factory = RecordFactory::default();
    let mut config = DetectionConfig::default();
    let mut paths: Vec<String> = Vec::new();

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--refine" => config.refine = true,
            "--jobs" => {
                let v = args.first().ok_or("--jobs requires a value")?.parse::<usize>()?;
                args.remove(0);
                jobs = Some(std::cmp::max(1, v));
            }
            "--fs" => {
                factory.fs = args.first().ok_or("--fs requires a value")?.parse::<f64>()?;
                args.remove(0);
            }
            "--threshold" => {
                let t = args.first().ok_or("--threshold requires a value")?.parse::<f64>()?;
                args.remove(0);
                config.threshold = Some(t);
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: pick_batch [--jobs N] [--fs HZ] [--threshold T] [--refine] [--json] <file1> ...\n\
                     \n\
                     --jobs N       Parallel workers (default: CPU-1)\n\
                     --fs HZ        Sample rate of the traces (default: 50)\n\
                     --threshold T  Detection mode threshold (default: picking mode)\n\
                     --refine       Apply AR-AIC refinement\n\
                     --json         Emit one JSON object per line (JSONL)\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.is_empty() {
        eprintln!("ERROR: Provide at least one trace file. Use --help for usage.");
        std::process::exit(2);
    }

    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!("Batch: {} files, jobs={}", paths.len(), jobs);

    let mut records: Vec<Record> = Vec::new();
    for path in &paths {
        match factory.create_record(&TextTrace { path: path.clone() }) {
            Ok(record) => records.push(record),
            Err(e) => eprintln!("SKIP {}: {}", path, e),
        }
    }

    let t0 = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
    let alg = StaLta::default();
    let results = pool.install(|| detect_all(&mut records, &alg, &config));

    for (record, result) in records.iter().zip(results) {
        match result {
            Ok(_) if json => {
                for event in record.events() {
                    let mut line = serde_json::to_value(event)?;
                    line["file"] = serde_json::Value::from(record.source.as_str());
                    line["time_seconds"] = serde_json::Value::from(event.time_seconds(record.fs()));
                    println!("{}", line);
                }
            }
            Ok(n) => {
                println!("{} ({}): {} events", record.label, record.source, n);
                for event in record.events() {
                    println!("  {:>10.2} s  {}", event.time_seconds(record.fs()), event.method);
                }
            }
            Err(e) => eprintln!("FAIL {}: {}", record.source, e),
        }
    }

    eprintln!("Done in {:.2} s", t0.elapsed().as_secs_f64());
    Ok(())
}
