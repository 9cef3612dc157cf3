// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: end-to-end batch decoding and its output contract.

use ctc_decoder::{decode, BatchDecoder, CtcError, DecoderConfig, MAX_CLASS_NUM};
use proptest::prelude::*;
use tensor_core::{reduce_max, DType, Shape, Tensor};

// ── Helpers ────────────────────────────────────────────────────

/// Per-timestep argmax path of row `b`, computed independently of the decoder.
fn argmax_path(values: &[f32], timestep: usize, class_num: usize, b: usize, steps: usize) -> Vec<usize> {
    (0..steps)
        .map(|t| {
            let start = (b * timestep + t) * class_num;
            reduce_max(&values[start..start + class_num], class_num).unwrap().1
        })
        .collect()
}

/// Reference collapse: optional repeat merge, then blank removal.
fn collapse(path: &[usize], blank: usize, merge: bool) -> Vec<usize> {
    let mut out = Vec::new();
    let mut prev: Option<usize> = None;
    for &label in path {
        if label != blank && !(merge && prev == Some(label)) {
            out.push(label);
        }
        prev = Some(label);
    }
    out
}

/// Random batch: scores drawn from a tiny integer range so ties are common.
fn batch_strategy() -> impl Strategy<Value = (usize, usize, usize, Vec<f32>, Vec<i64>)> {
    (1usize..5, 1usize..9, 1usize..7).prop_flat_map(|(batch, timestep, class_num)| {
        (
            Just(batch),
            Just(timestep),
            Just(class_num),
            prop::collection::vec((0i8..3).prop_map(f32::from), batch * timestep * class_num),
            prop::collection::vec(1..=timestep as i64, batch),
        )
    })
}

// ── Documented scenarios ───────────────────────────────────────

#[test]
fn test_scenario_a_and_b() {
    // Argmax path [0, 0, 1, blank, 1] with class_num = 4.
    let scores = Tensor::from_f32(
        Shape::sequence(1, 5, 4),
        &[
            0.7, 0.1, 0.1, 0.1, //
            0.6, 0.2, 0.1, 0.1, //
            0.1, 0.8, 0.0, 0.1, //
            0.1, 0.1, 0.1, 0.7, //
            0.2, 0.5, 0.2, 0.1, //
        ],
    )
    .unwrap();

    let merged = decode(&scores.view(), &[5], true, 0.0).unwrap();
    assert_eq!(merged.as_f32_slice(), &[0.0, 1.0, 1.0, 0.0, 0.0, 3.0]);

    let unmerged = decode(&scores.view(), &[5], false, 0.0).unwrap();
    assert_eq!(unmerged.as_f32_slice(), &[0.0, 0.0, 1.0, 1.0, 0.0, 4.0]);
}

#[test]
fn test_blank_separates_equal_labels_when_merging() {
    // Argmax path [0, blank, 0] with class_num = 2.
    let scores = Tensor::from_f32(Shape::sequence(1, 3, 2), &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0]).unwrap();
    let out = decode(&scores.view(), &[3], true, 0.0).unwrap();
    assert_eq!(out.as_f32_slice(), &[0.0, 0.0, 0.0, 2.0]);
}

#[test]
fn test_scenario_c_tie_break_through_decoder() {
    let scores = Tensor::from_f32(Shape::sequence(1, 1, 4), &[0.5, 0.9, 0.9, 0.1]).unwrap();
    let out = decode(&scores.view(), &[1], true, 0.0).unwrap();
    assert_eq!(out.as_f32_slice(), &[1.0, 1.0]);
}

#[test]
fn test_wide_class_dimension_tie() {
    // Ties spread across many reduction blocks still resolve leftmost.
    let class_num = MAX_CLASS_NUM;
    let mut values = vec![0.0f32; class_num];
    for idx in [1500, 700, 1999] {
        values[idx] = 3.0;
    }
    let scores = Tensor::from_f32(Shape::sequence(1, 1, class_num), &values).unwrap();
    let out = decode(&scores.view(), &[1], true, 0.0).unwrap();
    assert_eq!(out.as_f32_slice(), &[700.0, 1.0]);
}

#[test]
fn test_single_class_is_all_blank() {
    let scores = Tensor::from_f32(Shape::sequence(2, 3, 1), &[1.0; 6]).unwrap();
    let out = decode(&scores.view(), &[3, 1], true, -1.0).unwrap();
    assert_eq!(out.as_f32_slice(), &[-1.0, -1.0, -1.0, 0.0, -1.0, -1.0, -1.0, 0.0]);
}

#[test]
fn test_lane_width_does_not_change_results() {
    let values: Vec<f32> = (0..3 * 7 * 11).map(|i| ((i * 37) % 13) as f32).collect();
    let scores = Tensor::from_f32(Shape::sequence(3, 7, 11), &values).unwrap();
    let lengths = [7, 4, 1];

    let outputs: Vec<Tensor> = [1usize, 3, 8, 64, 4096]
        .iter()
        .map(|&lane_width| {
            BatchDecoder::new(DecoderConfig {
                lane_width,
                ..Default::default()
            })
            .unwrap()
            .decode(&scores.view(), &lengths)
            .unwrap()
            .output
        })
        .collect();
    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_negative_infinity_scores() {
    let ninf = f32::NEG_INFINITY;
    let scores = Tensor::from_f32(Shape::sequence(1, 2, 3), &[ninf, ninf, ninf, ninf, 0.0, ninf]).unwrap();
    let out = decode(&scores.view(), &[2], false, 0.0).unwrap();
    assert_eq!(out.as_f32_slice(), &[0.0, 1.0, 2.0]);
}

// ── Error paths ────────────────────────────────────────────────

#[test]
fn test_rank_error() {
    let scores = Tensor::zeros(Shape::matrix(2, 3), DType::F32);
    let err = decode(&scores.view(), &[1, 1], true, 0.0).unwrap_err();
    assert!(matches!(err, CtcError::ShapeError(_)));
}

#[test]
fn test_sequence_length_errors() {
    let scores = Tensor::zeros(Shape::sequence(2, 3, 4), DType::F32);
    let cases: [&[i64]; 4] = [&[1], &[1, 0], &[4, 1], &[1, 2, 3]];
    for lengths in cases {
        let err = decode(&scores.view(), lengths, true, 0.0).unwrap_err();
        assert!(matches!(err, CtcError::ShapeError(_)), "{lengths:?}: {err}");
    }
}

#[test]
fn test_capacity_error() {
    let scores = Tensor::zeros(Shape::sequence(1, 1, MAX_CLASS_NUM + 1), DType::F32);
    let err = decode(&scores.view(), &[1], true, 0.0).unwrap_err();
    assert!(matches!(err, CtcError::CapacityExceeded { .. }));
}

#[test]
fn test_dtype_error() {
    let scores = Tensor::zeros(Shape::sequence(1, 2, 3), DType::BF16);
    let err = decode(&scores.view(), &[2], true, 0.0).unwrap_err();
    assert!(matches!(err, CtcError::UnsupportedDType { .. }));
}

#[test]
fn test_nan_error() {
    let scores = Tensor::from_f32(Shape::sequence(1, 1, 2), &[f32::NAN, 1.0]).unwrap();
    let err = decode(&scores.view(), &[1], true, 0.0).unwrap_err();
    assert!(matches!(err, CtcError::DomainError(_)));
}

// ── Properties ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn output_contract_holds(
        (batch, timestep, class_num, values, lengths) in batch_strategy(),
        merge in any::<bool>(),
    ) {
        let scores = Tensor::from_f32(Shape::sequence(batch, timestep, class_num), &values).unwrap();
        let decoder = BatchDecoder::new(DecoderConfig {
            merge_repeated: merge,
            default_value: -7.0,
            parallel_threshold: 2,
            ..Default::default()
        }).unwrap();
        let out = decoder.decode(&scores.view(), &lengths).unwrap();

        let blank = class_num - 1;
        let max_len = *lengths.iter().max().unwrap() as usize + 1;
        prop_assert_eq!(out.output.shape(), &Shape::matrix(batch, max_len));

        for b in 0..batch {
            let steps = lengths[b] as usize;
            let row = out.output.row(b).unwrap();
            let count = out.report.emitted_counts[b];
            let path = argmax_path(&values, timestep, class_num, b, steps);
            let expected = collapse(&path, blank, merge);

            // Count bound and slot overwrite.
            prop_assert!(count <= steps);
            prop_assert_eq!(count, expected.len());
            prop_assert_eq!(row[max_len - 1], count as f32);

            // Labels, then defaults.
            let labels: Vec<usize> = row[..count].iter().map(|&x| x as usize).collect();
            prop_assert_eq!(&labels, &expected);
            prop_assert!(row[count..max_len - 1].iter().all(|&x| x == -7.0));

            // No blanks. When merging, a label is emitted only where the
            // argmax path changes class, so a blank between equal labels keeps both.
            prop_assert!(labels.iter().all(|&l| l != blank));
            if merge {
                let changes: Vec<usize> = path
                    .iter()
                    .enumerate()
                    .filter(|&(t, &l)| l != blank && (t == 0 || path[t - 1] != l))
                    .map(|(_, &l)| l)
                    .collect();
                prop_assert_eq!(&labels, &changes);
            } else {
                let no_blanks: Vec<usize> = path.iter().copied().filter(|&l| l != blank).collect();
                prop_assert_eq!(&labels, &no_blanks);
            }
        }
    }

    #[test]
    fn parallel_and_sequential_agree(
        (batch, timestep, class_num, values, lengths) in batch_strategy(),
    ) {
        let scores = Tensor::from_f32(Shape::sequence(batch, timestep, class_num), &values).unwrap();
        let run = |parallel_threshold| {
            BatchDecoder::new(DecoderConfig { parallel_threshold, ..Default::default() })
                .unwrap()
                .decode(&scores.view(), &lengths)
                .unwrap()
                .output
        };
        prop_assert_eq!(run(0), run(usize::MAX));
    }
}
