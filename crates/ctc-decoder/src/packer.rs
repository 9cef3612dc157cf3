// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Output row encoding.
//!
//! A row of width `max_output_len` is laid out as
//!
//! ```text
//! [ label_0 .. label_{n-1} | default_value .. | n ]
//!                                               ^ last slot, always the count
//! ```
//!
//! The count is written last and overwrites whatever the label/default pass
//! left in the final slot. Consumers depend on this exact layout.

use crate::CtcError;

/// What [`OutputPacker::pack`] wrote into a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedRow {
    pub emitted_count: usize,
    /// `true` when labels reached the final slot and one was replaced by the count.
    pub label_overwritten: bool,
    /// `true` when no default-value slot separates the labels from the count.
    pub saturated: bool,
}

/// Writes emitted labels, defaults and the count into an output row.
#[derive(Debug, Clone, Copy)]
pub struct OutputPacker {
    default_value: f32,
}

impl OutputPacker {
    pub fn new(default_value: f32) -> Self {
        Self { default_value }
    }

    /// Fills every slot of `row` exactly once (the last slot twice).
    ///
    /// # Errors
    /// Returns [`CtcError::Internal`] if `row` is empty or shorter than `emitted`.
    pub fn pack(&self, emitted: &[usize], row: &mut [f32]) -> Result<PackedRow, CtcError> {
        let count = emitted.len();
        let Some(last) = row.len().checked_sub(1) else {
            return Err(CtcError::Internal("cannot pack into an empty output row".into()));
        };
        if count > row.len() {
            return Err(CtcError::Internal(format!(
                "{count} labels do not fit an output row of width {}",
                row.len()
            )));
        }

        let (labels, rest) = row.split_at_mut(count);
        for (slot, &label) in labels.iter_mut().zip(emitted) {
            *slot = label as f32;
        }
        rest.fill(self.default_value);
        row[last] = count as f32;

        Ok(PackedRow {
            emitted_count: count,
            label_overwritten: count > last,
            saturated: count >= last,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_defaults_then_count() {
        let mut row = [f32::NAN; 6];
        let packed = OutputPacker::new(0.0).pack(&[0, 1, 1], &mut row).unwrap();
        assert_eq!(row, [0.0, 1.0, 1.0, 0.0, 0.0, 3.0]);
        assert_eq!(packed.emitted_count, 3);
        assert!(!packed.saturated);
    }

    #[test]
    fn test_custom_default_value() {
        let mut row = [0.0; 4];
        OutputPacker::new(-1.0).pack(&[2], &mut row).unwrap();
        assert_eq!(row, [2.0, -1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_no_labels() {
        let mut row = [9.0; 3];
        OutputPacker::new(0.5).pack(&[], &mut row).unwrap();
        assert_eq!(row, [0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_saturated_row_has_no_default_gap() {
        let mut row = [9.0; 4];
        let packed = OutputPacker::new(0.0).pack(&[2, 0, 1], &mut row).unwrap();
        assert_eq!(row, [2.0, 0.0, 1.0, 3.0]);
        assert!(packed.saturated);
        assert!(!packed.label_overwritten);
    }

    #[test]
    fn test_count_overwrites_label_in_last_slot() {
        let mut row = [9.0; 3];
        let packed = OutputPacker::new(0.0).pack(&[4, 5, 6], &mut row).unwrap();
        assert_eq!(row, [4.0, 5.0, 3.0]);
        assert!(packed.label_overwritten);
    }

    #[test]
    fn test_rejects_bad_rows() {
        let packer = OutputPacker::new(0.0);
        assert!(matches!(packer.pack(&[], &mut []), Err(CtcError::Internal(_))));
        assert!(matches!(
            packer.pack(&[1, 2, 3], &mut [0.0; 2]),
            Err(CtcError::Internal(_))
        ));
    }
}
