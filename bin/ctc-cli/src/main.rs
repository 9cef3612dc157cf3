// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # ctc-rt
//!
//! Command-line interface for the CTC greedy decoder.
//!
//! ## Usage
//! ```bash
//! # Decode a batch of scores
//! ctc-rt decode --input scores.json
//!
//! # Keep repeats, emit JSON
//! ctc-rt decode --input scores.json --no-merge --json
//!
//! # Show dimensions and per-row argmax paths
//! ctc-rt inspect --input scores.json
//!
//! # Time sequential vs parallel decoding on synthetic scores
//! ctc-rt benchmark --batch 64 --timestep 200 --classes 512
//! ```
//!
//! Input files are JSON:
//! `{ "scores": [[[f32; class_num]; timestep]; batch], "sequence_length": [i64; batch] }`.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ctc-rt",
    about = "Greedy CTC decoding of per-timestep class scores",
    version,
    author
)]
struct Cli {
    /// Path to a TOML decoder configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a score file and print the packed output rows.
    Decode {
        /// JSON file with `scores` and `sequence_length`.
        #[arg(short, long)]
        input: PathBuf,

        /// Keep consecutive repeated labels.
        #[arg(long)]
        no_merge: bool,

        /// Value for output slots without a label.
        #[arg(long, allow_hyphen_values = true)]
        default_value: Option<f32>,

        /// Print the result as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Print dimensions, blank index and argmax paths of a score file.
    Inspect {
        /// JSON file with `scores` and `sequence_length`.
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Benchmark decoding on synthetic scores.
    Benchmark {
        #[arg(long, default_value_t = 32)]
        batch: usize,

        #[arg(long, default_value_t = 200)]
        timestep: usize,

        /// Classes per timestep, blank included.
        #[arg(long, default_value_t = 512)]
        classes: usize,

        /// Timed iterations per mode.
        #[arg(long, default_value_t = 20)]
        iters: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Decode {
            input,
            no_merge,
            default_value,
            json,
        } => {
            let mut config = config;
            if no_merge {
                config.merge_repeated = false;
            }
            if let Some(value) = default_value {
                config.default_value = value;
            }
            commands::decode::execute(input, config, json).await
        }
        Commands::Inspect { input } => commands::inspect::execute(input).await,
        Commands::Benchmark {
            batch,
            timestep,
            classes,
            iters,
        } => commands::benchmark::execute(config, batch, timestep, classes, iters).await,
    }
}
