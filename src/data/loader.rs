// ============================================================
// Layer 4: Class Folder Loader
// ============================================================
// Loads labelled samples from a directory with one subdirectory
// per class:
//
//   data/clips/
//     class0/  a.safetensors  b.safetensors  ...   → label 0
//     class1/  c.safetensors  ...                  → label 1
//
// Each file holds one tensor under `key`. A 2D tensor is a single
// [H, W] sample; a 3D tensor holds several samples along the
// configured sample axis. Files are visited in sorted path order
// so two runs over the same directory load identical datasets.
//
// All samples across all classes must share the same [H, W].
// The first sample loaded fixes the expected shape.

use std::{
    fs,
    path::{Path, PathBuf},
};

use ndarray::{concatenate, Array3, ArrayD, Axis, Ix2, Ix3};

use crate::data::payload;
use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::layout::SampleAxis;
use crate::domain::sample::LabeledDataset;
use crate::domain::traits::SampleSource;

pub const DEFAULT_KEY: &str = "regions";
pub const DEFAULT_EXTENSION: &str = "safetensors";

/// Loads class subdirectories of `root`.
#[derive(Debug, Clone)]
pub struct ClassFolderLoader {
    root:        PathBuf,
    key:         String,
    extension:   String,
    sample_axis: SampleAxis,
}

impl ClassFolderLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root:        root.into(),
            key:         DEFAULT_KEY.to_string(),
            extension:   DEFAULT_EXTENSION.to_string(),
            sample_axis: SampleAxis::default(),
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_sample_axis(mut self, axis: SampleAxis) -> Self {
        self.sample_axis = axis;
        self
    }

    /// Payload files of `class`, sorted by path.
    pub fn class_files(&self, class: &str) -> PipelineResult<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(PipelineError::MissingDirectory(self.root.clone()));
        }
        let dir = self.root.join(class);
        if !dir.is_dir() {
            return Err(PipelineError::MissingDirectory(dir));
        }

        let io_err = |source| PipelineError::Io { path: dir.clone(), source };
        let mut files = Vec::new();
        for entry in fs::read_dir(&dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case(&self.extension))
                .unwrap_or(false);
            if matches && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Load one class, checking every sample against `expected`
    /// and setting it from the first sample if still unset.
    fn load_class_checked(
        &self,
        class:    &str,
        expected: &mut Option<[usize; 2]>,
    ) -> PipelineResult<Array3<f32>> {
        let dir   = self.root.join(class);
        let files = self.class_files(class)?;

        let mut parts = Vec::with_capacity(files.len());
        for path in &files {
            let raw     = payload::read_f32(path, &self.key)?;
            let samples = self.to_samples(path, raw)?;
            let (n, h, w) = samples.dim();
            if n == 0 {
                tracing::debug!("'{}' holds no samples", path.display());
                continue;
            }

            match *expected {
                None => *expected = Some([h, w]),
                Some(shape) if shape != [h, w] => {
                    return Err(PipelineError::ShapeMismatch {
                        path:     path.clone(),
                        expected: shape,
                        found:    [h, w],
                    })
                }
                Some(_) => {}
            }

            tracing::debug!("Loaded '{}': {} samples of {}x{}", path.display(), n, h, w);
            parts.push(samples);
        }

        if parts.is_empty() {
            return Err(PipelineError::EmptyClass {
                class: class.to_string(),
                dir,
            });
        }

        let views: Vec<_> = parts.iter().map(|p| p.view()).collect();
        let stacked = concatenate(Axis(0), &views).map_err(|e| PipelineError::InvalidPayload {
            path:   dir.clone(),
            reason: e.to_string(),
        })?;

        tracing::info!(
            "Class '{}': {} samples from {} files",
            class,
            stacked.len_of(Axis(0)),
            files.len()
        );
        Ok(stacked)
    }

    /// Bring a payload into [n, H, W] order.
    fn to_samples(&self, path: &Path, raw: ArrayD<f32>) -> PipelineResult<Array3<f32>> {
        let rank_error = |ndim: usize| PipelineError::InvalidPayload {
            path:   path.to_path_buf(),
            reason: format!("expected a 2D or 3D tensor, found {ndim}D"),
        };

        match raw.ndim() {
            2 => {
                let single = raw
                    .into_dimensionality::<Ix2>()
                    .map_err(|_| rank_error(2))?;
                Ok(single.insert_axis(Axis(0)))
            }
            3 => {
                let stack = raw
                    .into_dimensionality::<Ix3>()
                    .map_err(|_| rank_error(3))?;
                Ok(match self.sample_axis {
                    SampleAxis::First => stack,
                    SampleAxis::Last  => stack.permuted_axes([2, 0, 1]),
                })
            }
            ndim => Err(rank_error(ndim)),
        }
    }
}

impl SampleSource for ClassFolderLoader {
    fn load_class(&self, class: &str) -> PipelineResult<Array3<f32>> {
        self.load_class_checked(class, &mut None)
    }

    fn load_labeled(&self, classes: &[String]) -> PipelineResult<LabeledDataset> {
        let mut expected = None;
        let mut per_class = Vec::with_capacity(classes.len());
        let mut labels = Vec::new();

        for (label, class) in classes.iter().enumerate() {
            let samples = self.load_class_checked(class, &mut expected)?;
            labels.extend(std::iter::repeat(label).take(samples.len_of(Axis(0))));
            per_class.push(samples);
        }

        let samples = match expected {
            Some(_) => {
                let views: Vec<_> = per_class.iter().map(|c| c.view()).collect();
                concatenate(Axis(0), &views).map_err(|e| PipelineError::InvalidPayload {
                    path:   self.root.clone(),
                    reason: e.to_string(),
                })?
            }
            // No classes requested
            None => return Err(PipelineError::EmptyDataset),
        };

        LabeledDataset::new(samples, labels)
    }
}
