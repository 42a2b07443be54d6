// ============================================================
// Layer 3: Labeled Dataset
// ============================================================
// The in-memory dataset every later stage works on:
//
//   samples: [N, H, W] f32 array, one image per row of axis 0
//   labels:  N class indices, positionally aligned with samples
//
// The constructor is the only way in, so a LabeledDataset
// always has exactly one label per sample.

use std::ops::Range;

use ndarray::{s, Array3, ArrayView2, ArrayView3, Axis};

use crate::domain::error::{PipelineError, PipelineResult};

/// Samples and their class labels, aligned by index.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledDataset {
    samples: Array3<f32>,
    labels:  Vec<usize>,
}

impl LabeledDataset {
    /// Pair `samples` (axis 0 = sample axis) with `labels`.
    pub fn new(samples: Array3<f32>, labels: Vec<usize>) -> PipelineResult<Self> {
        let n = samples.len_of(Axis(0));
        if n != labels.len() {
            return Err(PipelineError::LengthMismatch {
                samples: n,
                labels:  labels.len(),
            });
        }
        Ok(Self { samples, labels })
    }

    /// An empty dataset whose samples would be `height x width`.
    pub fn empty(height: usize, width: usize) -> Self {
        Self {
            samples: Array3::zeros((0, height, width)),
            labels:  Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// [H, W] of every sample
    pub fn sample_shape(&self) -> [usize; 2] {
        let (_, h, w) = self.samples.dim();
        [h, w]
    }

    pub fn samples(&self) -> ArrayView3<'_, f32> {
        self.samples.view()
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn sample(&self, index: usize) -> Option<(ArrayView2<'_, f32>, usize)> {
        let label = *self.labels.get(index)?;
        Some((self.samples.index_axis(Axis(0), index), label))
    }

    /// Reorder samples and labels with the same index permutation:
    /// item `i` of the result is item `permutation[i]` of `self`.
    ///
    /// Panics if an index is out of bounds, like slice indexing.
    pub fn permuted(&self, permutation: &[usize]) -> Self {
        Self {
            samples: self.samples.select(Axis(0), permutation),
            labels:  permutation.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// Copy out the contiguous items in `range`.
    pub fn slice(&self, range: Range<usize>) -> Self {
        Self {
            samples: self.samples.slice(s![range.clone(), .., ..]).to_owned(),
            labels:  self.labels[range].to_vec(),
        }
    }

    /// Number of samples per class index, `num_classes` long.
    /// Labels beyond `num_classes` are not counted.
    pub fn class_counts(&self, num_classes: usize) -> Vec<usize> {
        let mut counts = vec![0usize; num_classes];
        for &label in &self.labels {
            if let Some(c) = counts.get_mut(label) {
                *c += 1;
            }
        }
        counts
    }
}
