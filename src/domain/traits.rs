// ============================================================
// Layer 3: Core Traits
// ============================================================
// The seam between "where samples come from" and the rest of the
// pipeline. ClassFolderLoader reads safetensors files from disk;
// tests and other front ends can supply their own source and the
// pipeline code does not change.

use ndarray::Array3;

use crate::domain::error::PipelineResult;
use crate::domain::sample::LabeledDataset;

// ─── SampleSource ─────────────────────────────────────────────────────────────
/// Anything that can produce the samples of one class.
pub trait SampleSource {
    /// Every sample of `class`, stacked along axis 0 as [n, H, W].
    fn load_class(&self, class: &str) -> PipelineResult<Array3<f32>>;

    /// Load `classes` in order and label each sample with the
    /// position of its class in that list. Not shuffled.
    fn load_labeled(&self, classes: &[String]) -> PipelineResult<LabeledDataset>;
}
