// ============================================================
// Layer 4: Sample Preprocessor
// ============================================================
// Turns a raw split into what a classifier expects:
//
//   1. Scale pixels into [0, 1] by dividing by the pixel scale
//      (255 for 8-bit clips, or the dataset maximum)
//   2. One-hot encode the integer labels:
//        label 1 of 3 classes → [0.0, 1.0, 0.0]
//
// The scale is resolved once on the full dataset before splitting
// so train, validation and test are divided by the same value.

use ndarray::{Array2, Array3, ArrayView3};

use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::layout::PixelScale;
use crate::domain::prepared::PreparedSplit;
use crate::domain::sample::LabeledDataset;

#[derive(Debug, Clone)]
pub struct Preprocessor {
    scale:       PixelScale,
    num_classes: usize,
}

impl Preprocessor {
    pub fn new(scale: PixelScale, num_classes: usize) -> Self {
        Self { scale, num_classes }
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// The divisor to use for `dataset`.
    pub fn resolve_scale(&self, dataset: &LabeledDataset) -> PipelineResult<f32> {
        match self.scale {
            PixelScale::Fixed(v) if v.is_finite() && v > 0.0 => Ok(v),
            PixelScale::Fixed(v) => Err(PipelineError::InvalidScale(v)),
            PixelScale::DatasetMax => {
                let max = dataset.samples().fold(f32::NEG_INFINITY, |m, &v| m.max(v));
                // All-zero or empty data: leave values as they are
                Ok(if max > 0.0 { max } else { 1.0 })
            }
        }
    }

    /// Normalize samples and attach one-hot targets.
    pub fn prepare(&self, split: &LabeledDataset, scale: f32) -> PipelineResult<PreparedSplit> {
        let samples = normalize(split.samples(), scale)?;
        let targets = one_hot(split.labels(), self.num_classes)?;
        Ok(PreparedSplit {
            samples,
            labels: split.labels().to_vec(),
            targets,
        })
    }
}

/// Divide by `scale` and clamp into [0, 1].
pub fn normalize(samples: ArrayView3<'_, f32>, scale: f32) -> PipelineResult<Array3<f32>> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(PipelineError::InvalidScale(scale));
    }
    Ok(samples.mapv(|v| (v / scale).clamp(0.0, 1.0)))
}

/// [N, num_classes] matrix with a single 1.0 per row.
pub fn one_hot(labels: &[usize], num_classes: usize) -> PipelineResult<Array2<f32>> {
    let mut out = Array2::zeros((labels.len(), num_classes));
    for (row, &label) in labels.iter().enumerate() {
        if label >= num_classes {
            return Err(PipelineError::LabelOutOfRange { label, num_classes });
        }
        out[[row, label]] = 1.0;
    }
    Ok(out)
}
