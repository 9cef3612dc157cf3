// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `ctc-rt decode` command: decode a score file and print the output rows.

use super::ScoreFile;
use ctc_decoder::{BatchDecoder, DecodeMetrics, DecoderConfig};
use std::path::PathBuf;

#[derive(serde::Serialize)]
struct DecodeJson<'a> {
    shape: &'a [usize],
    output: Vec<&'a [f32]>,
    emitted_counts: &'a [usize],
    metrics: &'a DecodeMetrics,
}

pub async fn execute(input: PathBuf, config: DecoderConfig, json: bool) -> anyhow::Result<()> {
    let file = ScoreFile::read(&input).await?;
    let scores = file.to_tensor()?;

    let decoder = BatchDecoder::new(config)?;
    let result = decoder.decode(&scores.view(), &file.sequence_length)?;
    let output = &result.output;
    let batch = output.shape().dim(0).unwrap_or(0);
    let rows: Vec<&[f32]> = (0..batch).filter_map(|b| output.row(b)).collect();

    if json {
        let doc = DecodeJson {
            shape: output.shape().dims(),
            output: rows,
            emitted_counts: &result.report.emitted_counts,
            metrics: &result.report.metrics,
        };
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║              ctc-rt · Greedy Decoder                 ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  Input:   {}", input.display());
    println!("  Scores:  {}", scores.shape());
    println!("  Output:  {}", output.shape());
    println!(
        "  Merge:   {}   Default: {}",
        decoder.config().merge_repeated,
        decoder.config().default_value
    );
    println!();

    println!("  {:<5} {:>6}  {}", "Row", "Count", "Labels | defaults | count");
    println!("  {}", "-".repeat(60));
    for (b, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|v| format!("{v}")).collect();
        println!(
            "  {:<5} {:>6}  [{}]",
            b,
            result.report.emitted_counts[b],
            super::truncate(&cells.join(", "), 80),
        );
    }
    println!();
    println!("  {}", result.report.metrics.summary());
    Ok(())
}
