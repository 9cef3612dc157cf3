// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-row greedy decode state machine.
//!
//! ```text
//! for t in 0..sequence_length[b]:
//!     label = argmax(scores[b, t])          (leftmost on ties)
//!     emit  = label != blank
//!             && (!merge_repeated || previous != Class(label))
//!     previous = Class(label)               (always, blanks included)
//! ```
//!
//! Because `previous` is overwritten on blank steps too, a blank between
//! two equal labels keeps both of them.

use tensor_core::{mask_scores, reduce_max, TensorError};

/// Label seen at the previous timestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrevLabel {
    /// No timestep processed yet; compares unequal to every class.
    #[default]
    None,
    /// Class index (blank included) chosen at the previous timestep.
    Class(usize),
}

/// Transient decode state for a single batch row.
#[derive(Debug, Clone, Default)]
pub struct DecodeState {
    previous: PrevLabel,
    emitted: Vec<usize>,
}

impl DecodeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state whose label buffer can hold `steps` labels without reallocating.
    pub fn with_capacity(steps: usize) -> Self {
        Self {
            previous: PrevLabel::None,
            emitted: Vec::with_capacity(steps),
        }
    }

    /// Advances one timestep with the argmax `label`. Returns `true` if it was emitted.
    pub fn step(&mut self, label: usize, blank: usize, merge_repeated: bool) -> bool {
        let repeated = merge_repeated && self.previous == PrevLabel::Class(label);
        let emit = label != blank && !repeated;
        if emit {
            self.emitted.push(label);
        }
        self.previous = PrevLabel::Class(label);
        emit
    }

    pub fn previous(&self) -> PrevLabel {
        self.previous
    }

    /// Labels emitted so far, in timestep order.
    pub fn emitted(&self) -> &[usize] {
        &self.emitted
    }

    pub fn emitted_count(&self) -> usize {
        self.emitted.len()
    }
}

/// Geometry and flags needed to decode one row.
#[derive(Debug, Clone, Copy)]
pub struct RowParams {
    /// Classes per timestep; the last one is blank.
    pub class_num: usize,
    /// Padded reduction width (`>= class_num`).
    pub width: usize,
    pub merge_repeated: bool,
}

/// Decodes the first `steps` timesteps of a `[timestep * class_num]` score row.
///
/// `scratch` is reused for the padded copy of each timestep's scores.
pub fn decode_row(
    scores: &[f32],
    steps: usize,
    params: &RowParams,
    scratch: &mut Vec<f32>,
) -> Result<DecodeState, TensorError> {
    let blank = params.class_num - 1;
    let mut state = DecodeState::with_capacity(steps);
    for frame in scores.chunks_exact(params.class_num).take(steps) {
        mask_scores(frame, params.width, scratch)?;
        let (_, label) = reduce_max(scratch, params.width)?;
        debug_assert!(label < params.class_num, "padding slot {label} selected");
        state.step(label, blank, params.merge_repeated);
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLANK: usize = 3;

    fn run(labels: &[usize], merge: bool) -> Vec<usize> {
        let mut state = DecodeState::new();
        for &l in labels {
            state.step(l, BLANK, merge);
        }
        state.emitted().to_vec()
    }

    /// One-hot score row for a fixed argmax path.
    fn one_hot(path: &[usize], class_num: usize) -> Vec<f32> {
        let mut scores = vec![0.0f32; path.len() * class_num];
        for (t, &label) in path.iter().enumerate() {
            scores[t * class_num + label] = 1.0;
        }
        scores
    }

    #[test]
    fn test_initial_state() {
        let s = DecodeState::new();
        assert_eq!(s.previous(), PrevLabel::None);
        assert_eq!(s.emitted_count(), 0);
    }

    #[test]
    fn test_merge_with_blank_reset() {
        assert_eq!(run(&[0, 0, 1, 3, 1], true), vec![0, 1, 1]);
    }

    #[test]
    fn test_no_merge_drops_only_blanks() {
        assert_eq!(run(&[0, 0, 1, 3, 1], false), vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_first_label_is_never_suppressed() {
        // Class 0 first: the initial state must not compare equal to it.
        assert_eq!(run(&[0], true), vec![0]);
    }

    #[test]
    fn test_previous_updated_on_blank_and_suppressed_steps() {
        let mut s = DecodeState::new();
        assert!(s.step(2, BLANK, true));
        assert!(!s.step(2, BLANK, true));
        assert_eq!(s.previous(), PrevLabel::Class(2));
        assert!(!s.step(BLANK, BLANK, true));
        assert_eq!(s.previous(), PrevLabel::Class(BLANK));
        assert!(s.step(2, BLANK, true));
        assert_eq!(s.emitted(), &[2, 2]);
    }

    #[test]
    fn test_all_blank() {
        assert!(run(&[3, 3, 3], true).is_empty());
    }

    #[test]
    fn test_decode_row_respects_steps() {
        let scores = one_hot(&[0, 0, 1, 3, 1], 4);
        let params = RowParams {
            class_num: 4,
            width: 8,
            merge_repeated: true,
        };
        let mut scratch = Vec::new();
        let full = decode_row(&scores, 5, &params, &mut scratch).unwrap();
        assert_eq!(full.emitted(), &[0, 1, 1]);

        let partial = decode_row(&scores, 3, &params, &mut scratch).unwrap();
        assert_eq!(partial.emitted(), &[0, 1]);
    }

    #[test]
    fn test_decode_row_width_not_observable() {
        let scores = vec![
            0.5, 0.9, 0.9, 0.1, // tie between 1 and 2
            0.2, 0.2, 0.2, 0.2, // all tied, class 0
            0.0, 0.0, 0.0, 1.0, // blank
        ];
        let mut scratch = Vec::new();
        let mut results = Vec::new();
        for width in [4, 5, 8, 64] {
            let params = RowParams {
                class_num: 4,
                width,
                merge_repeated: false,
            };
            results.push(decode_row(&scores, 3, &params, &mut scratch).unwrap().emitted().to_vec());
        }
        assert!(results.iter().all(|r| r == &[1, 0]));
    }
}
