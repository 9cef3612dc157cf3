// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # ctc-decoder
//!
//! Greedy CTC (Connectionist Temporal Classification) decoding over a
//! `[batch, timestep, class_num]` score tensor.
//!
//! For every row the decoder picks the best class per valid timestep
//! (leftmost index on ties), drops the blank class (`class_num - 1`),
//! optionally merges consecutive repeats, and packs the labels into a row of
//! width `max(sequence_length) + 1` whose last slot holds the label count.
//!
//! # Pipeline
//! ```text
//! scores ─► mask_scores ─► reduce_max ─► DecodeState ─► OutputPacker ─► output[row]
//! ```
//! Rows are independent and are decoded on a `rayon` pool once the batch
//! reaches [`DecoderConfig::parallel_threshold`].

mod config;
mod decoder;
mod error;
mod input;
mod metrics;
mod packer;
mod state;

pub use config::DecoderConfig;
pub use decoder::{decode, BatchDecoder, DecodeOutput, DecodeReport};
pub use error::CtcError;
pub use input::{DecodeInput, ScoreDims, SequenceLengths, MAX_CLASS_NUM, MAX_TOTAL_ELEMENTS};
pub use metrics::DecodeMetrics;
pub use packer::{OutputPacker, PackedRow};
pub use state::{decode_row, DecodeState, PrevLabel, RowParams};
