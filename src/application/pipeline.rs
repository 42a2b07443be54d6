// ============================================================
// Layer 2: Preparation Pipeline
// ============================================================
// The whole data path as one explicit function of a config:
//
//   Step 1: Load every class directory       (data::loader)
//   Step 2: Shuffle samples + labels once    (data::shuffle)
//   Step 3: Split 70 / 20 / 10               (data::splitter)
//   Step 4: Normalize + one-hot each split   (data::preprocessor)
//
// The random seed lives in the config, so a test (or a rerun)
// with the same seed sees exactly the same splits.

use serde::{Deserialize, Serialize};

use crate::data::{
    loader::{ClassFolderLoader, DEFAULT_EXTENSION, DEFAULT_KEY},
    preprocessor::Preprocessor,
    shuffle::{rng_from_seed, shuffle_together},
    splitter::split_dataset,
};
use crate::domain::{
    error::{PipelineError, PipelineResult},
    layout::{PixelScale, SampleAxis},
    prepared::PreparedSplits,
    split::SplitBounds,
    traits::SampleSource,
};

// ─── Pipeline Configuration ──────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding one subdirectory per class
    pub data_root:   String,
    /// Class subdirectories; label = position in this list
    pub classes:     Vec<String>,
    /// Tensor name inside each payload file
    pub key:         String,
    pub extension:   String,
    pub sample_axis: SampleAxis,
    pub bounds:      SplitBounds,
    /// None = seed from the OS
    pub seed:        Option<u64>,
    pub pixel_scale: PixelScale,
    /// Width of the one-hot targets; None = number of classes
    pub num_classes: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_root:   "data/clips".to_string(),
            classes:     vec!["class0".to_string(), "class1".to_string()],
            key:         DEFAULT_KEY.to_string(),
            extension:   DEFAULT_EXTENSION.to_string(),
            sample_axis: SampleAxis::default(),
            bounds:      SplitBounds::default(),
            seed:        None,
            pixel_scale: PixelScale::default(),
            num_classes: None,
        }
    }
}

impl PipelineConfig {
    pub fn num_classes(&self) -> usize {
        self.num_classes.unwrap_or(self.classes.len())
    }

    /// A loader pointed at `data_root` with this config's payload options.
    pub fn loader(&self) -> ClassFolderLoader {
        ClassFolderLoader::new(&self.data_root)
            .with_key(&self.key)
            .with_extension(&self.extension)
            .with_sample_axis(self.sample_axis)
    }

    /// Reject configs that cannot produce valid targets or splits
    /// before touching the filesystem.
    pub fn validate(&self) -> PipelineResult<()> {
        self.bounds.validate()?;
        if self.classes.is_empty() {
            return Err(PipelineError::EmptyDataset);
        }
        for (i, class) in self.classes.iter().enumerate() {
            if class.trim().is_empty() {
                return Err(PipelineError::InvalidClass {
                    class:  class.clone(),
                    reason: "class name is empty",
                });
            }
            if self.classes[..i].contains(class) {
                return Err(PipelineError::InvalidClass {
                    class:  class.clone(),
                    reason: "class is listed more than once",
                });
            }
        }
        let num_classes = self.num_classes();
        if num_classes < self.classes.len() {
            return Err(PipelineError::LabelOutOfRange {
                label: self.classes.len() - 1,
                num_classes,
            });
        }
        Ok(())
    }
}

/// Load, shuffle, split and preprocess the data under `cfg.data_root`.
pub fn run_pipeline(cfg: &PipelineConfig) -> PipelineResult<PreparedSplits> {
    run_with_source(cfg, &cfg.loader())
}

/// Same as [`run_pipeline`] but with samples coming from `source`.
pub fn run_with_source<S: SampleSource + ?Sized>(
    cfg:    &PipelineConfig,
    source: &S,
) -> PipelineResult<PreparedSplits> {
    cfg.validate()?;

    // ── Step 1: Load ─────────────────────────────────────────────────────────
    let dataset = source.load_labeled(&cfg.classes)?;
    tracing::info!(
        "Loaded {} samples of {:?} across {} classes",
        dataset.len(),
        dataset.sample_shape(),
        cfg.classes.len()
    );

    // ── Step 2: Shuffle ──────────────────────────────────────────────────────
    let mut rng = rng_from_seed(cfg.seed);
    let (shuffled, _) = shuffle_together(&dataset, &mut rng);

    // ── Step 3: Split ────────────────────────────────────────────────────────
    let splits = split_dataset(&shuffled, &cfg.bounds)?;
    tracing::info!(
        "Split: {} train, {} validation, {} test",
        splits.train.len(),
        splits.validation.len(),
        splits.test.len()
    );

    // ── Step 4: Preprocess ───────────────────────────────────────────────────
    let preprocessor = Preprocessor::new(cfg.pixel_scale, cfg.num_classes());
    let scale = preprocessor.resolve_scale(&shuffled)?;
    tracing::debug!("Pixel scale: {}", scale);

    Ok(PreparedSplits {
        train:        preprocessor.prepare(&splits.train, scale)?,
        validation:   preprocessor.prepare(&splits.validation, scale)?,
        test:         preprocessor.prepare(&splits.test, scale)?,
        num_classes:  preprocessor.num_classes(),
        pixel_scale:  scale,
        sample_shape: shuffled.sample_shape(),
    })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample::LabeledDataset;
    use ndarray::{concatenate, Array3, Axis};

    /// In-memory source: class i has counts[i] samples filled with
    /// 10 * (i + 1) plus the sample index within the class.
    struct FakeSource {
        counts: Vec<usize>,
    }

    impl SampleSource for FakeSource {
        fn load_class(&self, class: &str) -> PipelineResult<Array3<f32>> {
            let i: usize = class.trim_start_matches("class").parse().unwrap();
            let n = self.counts[i];
            Ok(Array3::from_shape_fn((n, 4, 4), |(k, _, _)| (10 * (i + 1) + k) as f32))
        }

        fn load_labeled(&self, classes: &[String]) -> PipelineResult<LabeledDataset> {
            let parts: Vec<_> = classes.iter().map(|c| self.load_class(c)).collect::<Result<_, _>>()?;
            let labels = parts
                .iter()
                .enumerate()
                .flat_map(|(l, p)| std::iter::repeat(l).take(p.len_of(Axis(0))))
                .collect();
            let views: Vec<_> = parts.iter().map(|p| p.view()).collect();
            LabeledDataset::new(concatenate(Axis(0), &views).unwrap(), labels)
        }
    }

    fn config(seed: u64) -> PipelineConfig {
        PipelineConfig { seed: Some(seed), ..PipelineConfig::default() }
    }

    #[test]
    fn test_pipeline_sizes_and_alignment() {
        let source = FakeSource { counts: vec![50, 50] };
        let out    = run_with_source(&config(3), &source).unwrap();

        assert_eq!(out.train.len(), 70);
        assert_eq!(out.validation.len(), 20);
        assert_eq!(out.test.len(), 10);
        assert_eq!(out.total_len(), 100);
        assert_eq!(out.num_classes, 2);
        assert_eq!(out.sample_shape, [4, 4]);

        for split in [&out.train, &out.validation, &out.test] {
            assert_eq!(split.samples.len_of(Axis(0)), split.labels.len());
            assert_eq!(split.targets.len_of(Axis(0)), split.labels.len());
            for (i, &label) in split.labels.iter().enumerate() {
                assert_eq!(split.target(i)[label], 1.0);
                // Class 0 pixels are 10..60, class 1 pixels are 20..70;
                // only class 1 reaches 60 or more.
                let px = split.samples[[i, 0, 0]] * 255.0;
                if px >= 60.0 {
                    assert_eq!(label, 1);
                }
            }
        }

        let counts: usize = [&out.train, &out.validation, &out.test]
            .iter()
            .map(|s| s.class_counts()[1])
            .sum();
        assert_eq!(counts, 50);
    }

    #[test]
    fn test_same_seed_same_splits() {
        let source = FakeSource { counts: vec![12, 9] };
        let a = run_with_source(&config(11), &source).unwrap();
        let b = run_with_source(&config(11), &source).unwrap();
        assert_eq!(a.train, b.train);
        assert_eq!(a.test, b.test);
    }

    #[test]
    fn test_num_classes_too_small() {
        let cfg = PipelineConfig { num_classes: Some(1), ..config(0) };
        let err = run_with_source(&cfg, &FakeSource { counts: vec![3, 3] }).unwrap_err();
        assert!(matches!(err, PipelineError::LabelOutOfRange { label: 1, num_classes: 1 }));
    }

    #[test]
    fn test_rejects_empty_and_duplicate_classes() {
        let source = FakeSource { counts: vec![3, 3] };

        let cfg = PipelineConfig { classes: vec!["class0".into(), "".into()], ..config(0) };
        assert!(matches!(
            run_with_source(&cfg, &source),
            Err(PipelineError::InvalidClass { ref class, .. }) if class.is_empty()
        ));

        let cfg = PipelineConfig { classes: vec!["class0".into(), "class0".into()], ..config(0) };
        assert!(matches!(
            run_with_source(&cfg, &source),
            Err(PipelineError::InvalidClass { ref class, .. }) if class == "class0"
        ));
    }

    #[test]
    fn test_wider_one_hot() {
        // Targets may be wider than the class list, e.g. a 10-way head
        let cfg = PipelineConfig { num_classes: Some(10), ..config(0) };
        let out = run_with_source(&cfg, &FakeSource { counts: vec![5, 5] }).unwrap();
        assert_eq!(out.train.targets.dim(), (7, 10));
    }

    #[test]
    fn test_missing_root_reports_directory() {
        let cfg = PipelineConfig {
            data_root: "/definitely/not/here".to_string(),
            ..config(0)
        };
        assert!(matches!(run_pipeline(&cfg), Err(PipelineError::MissingDirectory(_))));
    }
}
