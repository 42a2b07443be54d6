// ============================================================
// Layer 3: Pipeline Errors
// ============================================================
// Every way the preparation pipeline can fail before the data
// reaches the trainer. None of these are retried: they all point
// at a misconfigured data root or a broken payload file.
//
// The application and CLI layers wrap these in anyhow::Error
// with extra context; the data layer returns them directly so
// tests can match on the exact kind.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The data root or a class directory does not exist
    #[error("directory '{}' does not exist", .0.display())]
    MissingDirectory(PathBuf),

    /// A class directory produced no samples
    #[error("class '{class}' in '{}' contains no samples", dir.display())]
    EmptyClass { class: String, dir: PathBuf },

    /// A sample's [H, W] differs from the first sample loaded
    #[error(
        "sample shape {found:?} in '{}' does not match {expected:?}",
        path.display()
    )]
    ShapeMismatch {
        path:     PathBuf,
        expected: [usize; 2],
        found:    [usize; 2],
    },

    /// Samples and labels disagree on the number of items
    #[error("{samples} samples but {labels} labels")]
    LengthMismatch { samples: usize, labels: usize },

    /// Nothing left to split
    #[error("dataset is empty, nothing to split")]
    EmptyDataset,

    /// The payload file has no tensor under the configured key
    #[error("'{}' has no tensor named '{key}'", path.display())]
    MissingKey { path: PathBuf, key: String },

    #[error("'{}' stores unsupported dtype {dtype}", path.display())]
    UnsupportedDtype { path: PathBuf, dtype: String },

    /// Rank, byte length or values of a payload are unusable
    #[error("invalid payload in '{}': {reason}", path.display())]
    InvalidPayload { path: PathBuf, reason: String },

    /// A class name that is empty or listed twice
    #[error("invalid class '{class}': {reason}")]
    InvalidClass { class: String, reason: &'static str },

    #[error("invalid split bounds: train_end={train_end}, validation_end={validation_end}")]
    InvalidSplit { train_end: f64, validation_end: f64 },

    /// Pixel scale must be a positive, finite divisor
    #[error("invalid pixel scale {0}")]
    InvalidScale(f32),

    #[error("label {label} is out of range for {num_classes} classes")]
    LabelOutOfRange { label: usize, num_classes: usize },

    #[error("cannot read '{}'", path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode safetensors file '{}': {message}", path.display())]
    Decode { path: PathBuf, message: String },
}

pub type PipelineResult<T> = Result<T, PipelineError>;
