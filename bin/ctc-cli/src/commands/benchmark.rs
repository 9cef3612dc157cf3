// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `ctc-rt benchmark` command: time sequential vs row-parallel decoding.
//!
//! Builds a deterministic synthetic score tensor and prints a comparison
//! table of latency and timestep throughput for each execution mode.

use anyhow::Context;
use ctc_decoder::{BatchDecoder, DecoderConfig, MAX_TOTAL_ELEMENTS};
use std::time::{Duration, Instant};
use tensor_core::{Shape, Tensor};

struct BenchResult {
    mode: &'static str,
    threads: usize,
    mean: Duration,
    steps_per_sec: f64,
    labels: usize,
}

pub async fn execute(
    config: DecoderConfig,
    batch: usize,
    timestep: usize,
    classes: usize,
    iters: usize,
) -> anyhow::Result<()> {
    anyhow::ensure!(iters > 0, "--iters must be at least 1");

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              ctc-rt · Benchmark Suite                ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let scores = synthetic_scores(batch, timestep, classes)?;
    // Varying lengths so rows do uneven work.
    let lengths: Vec<i64> = (0..batch)
        .map(|b| (timestep - (b % 4) * timestep / 8).max(1) as i64)
        .collect();

    println!("  Scores:     {}", scores.shape());
    println!("  Iterations: {iters}");
    println!();

    println!(
        "  {:<12} {:>8} {:>12} {:>14} {:>8}",
        "Mode", "Threads", "Mean", "Steps/s", "Labels",
    );
    println!("  {}", "-".repeat(58));

    let modes = [("sequential", usize::MAX), ("parallel", 0)];
    let mut results = Vec::with_capacity(modes.len());
    for (mode, parallel_threshold) in modes {
        let decoder = BatchDecoder::new(DecoderConfig {
            parallel_threshold,
            ..config.clone()
        })?;
        let result = run_single(&decoder, &scores, &lengths, mode, iters)?;
        println!(
            "  {:<12} {:>8} {:>10.3}ms {:>14.0} {:>8}",
            result.mode,
            result.threads,
            result.mean.as_secs_f64() * 1000.0,
            result.steps_per_sec,
            result.labels,
        );
        results.push(result);
    }
    println!();

    if let [seq, par] = results.as_slice() {
        if par.mean > Duration::ZERO {
            println!(
                "  Parallel speed-up: {:.2}x",
                seq.mean.as_secs_f64() / par.mean.as_secs_f64()
            );
        }
        if seq.labels != par.labels {
            tracing::warn!(
                "label totals differ: sequential {} vs parallel {}",
                seq.labels,
                par.labels
            );
        }
    }
    println!();
    Ok(())
}

fn run_single(
    decoder: &BatchDecoder,
    scores: &Tensor,
    lengths: &[i64],
    mode: &'static str,
    iters: usize,
) -> anyhow::Result<BenchResult> {
    // Warm-up (also spins up the thread pool).
    let warm = decoder.decode(&scores.view(), lengths)?;

    let divisor = u32::try_from(iters).context("--iters must fit in a u32")?;
    let start = Instant::now();
    for _ in 0..iters {
        decoder.decode(&scores.view(), lengths)?;
    }
    let mean = start.elapsed() / divisor;
    let steps = warm.report.metrics.timesteps as f64;

    Ok(BenchResult {
        mode,
        threads: warm.report.metrics.threads,
        mean,
        steps_per_sec: if mean > Duration::ZERO {
            steps / mean.as_secs_f64()
        } else {
            0.0
        },
        labels: warm.report.metrics.labels_emitted,
    })
}

/// Deterministic pseudo-random scores in `[0, 1)`.
fn synthetic_scores(batch: usize, timestep: usize, classes: usize) -> anyhow::Result<Tensor> {
    let total = batch
        .checked_mul(timestep)
        .and_then(|n| n.checked_mul(classes))
        .with_context(|| format!("{batch} x {timestep} x {classes} scores overflow usize"))?;
    anyhow::ensure!(
        total <= MAX_TOTAL_ELEMENTS,
        "{total} scores exceed the decoder limit of {MAX_TOTAL_ELEMENTS}"
    );

    let mut state: u32 = 0x9E37_79B9;
    let values: Vec<f32> = (0..total)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 8) as f32 / (1u32 << 24) as f32
        })
        .collect();
    Ok(Tensor::from_f32_vec(
        Shape::sequence(batch, timestep, classes),
        values,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_scores_shape() {
        let t = synthetic_scores(2, 3, 4).unwrap();
        assert_eq!(t.shape(), &Shape::sequence(2, 3, 4));
        assert!(t.as_f32_slice().iter().all(|&x| (0.0..1.0).contains(&x)));
    }

    #[test]
    fn test_synthetic_scores_overflow_is_an_error() {
        assert!(synthetic_scores(usize::MAX, 2, 2).is_err());
        assert!(synthetic_scores(MAX_TOTAL_ELEMENTS, 2, 1).is_err());
    }

    #[test]
    fn test_iters_beyond_u32_is_an_error() {
        if usize::BITS <= 32 {
            return;
        }
        let scores = synthetic_scores(1, 2, 3).unwrap();
        let decoder = BatchDecoder::new(DecoderConfig::default()).unwrap();
        let iters = u32::MAX as usize + 1;
        let err = run_single(&decoder, &scores, &[2], "sequential", iters)
            .err()
            .unwrap();
        assert!(err.to_string().contains("--iters"));
    }
}
