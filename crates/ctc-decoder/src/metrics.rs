// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Decode profiling metrics.
//!
//! [`DecodeMetrics`] aggregates per-row counts and wall-clock time for one
//! batch decode.

use std::time::Duration;

/// Aggregate metrics for a batch decode.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct DecodeMetrics {
    /// Number of batch rows decoded.
    pub rows: usize,
    /// Total timesteps processed across all rows.
    pub timesteps: usize,
    /// Total labels emitted across all rows.
    pub labels_emitted: usize,
    /// Rows whose labels run straight into the count slot.
    pub saturated_rows: usize,
    /// Whether rows were decoded on the thread pool.
    pub parallel: bool,
    /// Worker threads available to the decode.
    pub threads: usize,
    /// Wall-clock time of the decode.
    pub duration: Duration,
}

impl DecodeMetrics {
    /// Creates an empty metrics container.
    pub fn new(parallel: bool, threads: usize) -> Self {
        Self {
            parallel,
            threads,
            ..Default::default()
        }
    }

    /// Records one decoded row.
    pub fn record_row(&mut self, steps: usize, emitted: usize, saturated: bool) {
        self.rows += 1;
        self.timesteps += steps;
        self.labels_emitted += emitted;
        if saturated {
            self.saturated_rows += 1;
        }
    }

    pub fn finalise(&mut self, total: Duration) {
        self.duration = total;
    }

    /// Timesteps decoded per second.
    pub fn timesteps_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs <= 0.0 || self.timesteps == 0 {
            return 0.0;
        }
        self.timesteps as f64 / secs
    }

    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "Decode: {:.3}ms total, {} rows, {} timesteps, {} labels, \
             {} saturated rows, {} ({} threads), {:.0} steps/s",
            self.duration.as_secs_f64() * 1000.0,
            self.rows,
            self.timesteps,
            self.labels_emitted,
            self.saturated_rows,
            if self.parallel { "parallel" } else { "sequential" },
            self.threads,
            self.timesteps_per_second(),
        )
    }
}
