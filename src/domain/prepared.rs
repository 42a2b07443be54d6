// ============================================================
// Layer 3: Prepared Splits
// ============================================================
// What the trainer receives: per split, normalized samples in
// [0, 1], the integer labels, and the one-hot targets built from
// them. Row i of every field describes the same image.

use ndarray::{Array2, Array3, ArrayView1, Axis};

use crate::domain::split::SplitKind;

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSplit {
    /// [N, H, W], values in [0, 1]
    pub samples: Array3<f32>,
    pub labels:  Vec<usize>,
    /// [N, num_classes]
    pub targets: Array2<f32>,
}

impl PreparedSplit {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn num_classes(&self) -> usize {
        self.targets.len_of(Axis(1))
    }

    pub fn sample_shape(&self) -> [usize; 2] {
        let (_, h, w) = self.samples.dim();
        [h, w]
    }

    /// One-hot row of item `index`
    pub fn target(&self, index: usize) -> ArrayView1<'_, f32> {
        self.targets.row(index)
    }

    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.num_classes()];
        for &label in &self.labels {
            if let Some(c) = counts.get_mut(label) {
                *c += 1;
            }
        }
        counts
    }
}

/// All three splits plus the facts shared between them.
#[derive(Debug, Clone)]
pub struct PreparedSplits {
    pub train:        PreparedSplit,
    pub validation:   PreparedSplit,
    pub test:         PreparedSplit,
    pub num_classes:  usize,
    /// Divisor that was applied to the raw pixels
    pub pixel_scale:  f32,
    pub sample_shape: [usize; 2],
}

impl PreparedSplits {
    pub fn get(&self, kind: SplitKind) -> &PreparedSplit {
        match kind {
            SplitKind::Train      => &self.train,
            SplitKind::Validation => &self.validation,
            SplitKind::Test       => &self.test,
        }
    }

    pub fn total_len(&self) -> usize {
        self.train.len() + self.validation.len() + self.test.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn tiny() -> PreparedSplit {
        PreparedSplit {
            samples: Array3::from_elem((3, 2, 4), 0.5),
            labels:  vec![1, 0, 1],
            targets: array![[0.0, 1.0], [1.0, 0.0], [0.0, 1.0]],
        }
    }

    #[test]
    fn test_counts_and_shape() {
        let split = tiny();
        assert_eq!(split.num_classes(), 2);
        assert_eq!(split.class_counts(), vec![1, 2]);
        assert_eq!(split.sample_shape(), [2, 4]);
        assert_eq!(split.target(1), array![1.0, 0.0]);
    }
}
