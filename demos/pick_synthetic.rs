//! Example: detect and refine arrivals in a synthetic trace
//!
//! Usage:
//!   RUST_LOG=debug cargo run --example pick_synthetic

use arrival_picker::{DetectionConfig, Record, Signal, StaLta, StaLtaConfig};

fn noise(n: usize, seed: u64, amplitude: f64) -> Vec<f64> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (((state >> 33) as f64 / (1u64 << 31) as f64) * 2.0 - 1.0) * amplitude
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    // Ten minutes at 50 Hz with arrivals at 120 s and 400 s
    let fs = 50.0;
    let mut samples = noise(30_000, 1, 0.02);
    for (seed, onset) in [(2u64, 6_000usize), (3, 20_000)] {
        let burst = noise(samples.len(), seed, 1.0);
        for i in onset..samples.len() {
            samples[i] += burst[i] * (-((i - onset) as f64) / 200.0).exp();
        }
    }

    let mut record = Record::new(Signal::new(samples, fs)?)
        .with_label("synthetic")
        .with_description("two decaying wave trains in white noise");

    let alg = StaLta::new(StaLtaConfig {
        sta_seconds: 1.0,
        lta_seconds: 60.0,
    });
    let config = DetectionConfig::detection(10.0).with_refinement(5.0);

    let events = record.detect(&alg, &config)?;

    println!("Detected {} events:", events.len());
    for event in events {
        println!(
            "  {:>8.2} s  cf={:>8.2}  {}  {}/{}",
            event.time_seconds(fs),
            event.cf_value,
            event.method,
            event.mode,
            event.status
        );
    }

    if let Some(meta) = record.last_detection() {
        println!("{}", serde_json::to_string_pretty(meta)?);
    }

    Ok(())
}
