// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `ctc-rt inspect` command: display score dimensions and argmax paths.
//!
//! Shows what the decoder will see before collapsing: the blank index, the
//! output width, and the raw per-timestep argmax for each row.

use super::ScoreFile;
use ctc_decoder::DecodeInput;
use std::path::PathBuf;
use tensor_core::reduce_max;

pub async fn execute(input: PathBuf) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              ctc-rt · Score Inspector                ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let file = ScoreFile::read(&input).await?;
    let scores = file.to_tensor()?;
    let view = scores.view();
    let validated = DecodeInput::validate(&view, &file.sequence_length)?;
    let dims = validated.dims;

    // ── Summary ────────────────────────────────────────────────
    println!("  File:        {}", input.display());
    println!("  Batch:       {}", dims.batch);
    println!("  Timesteps:   {}", dims.timestep);
    println!("  Classes:     {} (blank = {})", dims.class_num, dims.blank_index());
    println!("  Output:      {}", validated.output_shape());
    println!();

    // ── Per-Row Argmax Paths ───────────────────────────────────
    println!("  {:<5} {:>6}  {}", "Row", "Steps", "Argmax path (_ = blank)");
    println!("  {}", "-".repeat(60));
    for b in 0..dims.batch {
        let steps = validated.lengths.get(b);
        let mut path = Vec::with_capacity(steps);
        for frame in validated.row_scores(b).chunks_exact(dims.class_num).take(steps) {
            let (_, label) = reduce_max(frame, dims.class_num)?;
            path.push(if label == dims.blank_index() {
                "_".to_string()
            } else {
                label.to_string()
            });
        }
        println!(
            "  {:<5} {:>6}  {}",
            b,
            steps,
            super::truncate(&path.join(" "), 80)
        );
    }
    println!();
    Ok(())
}
