// ============================================================
// Layer 2: InspectUseCase
// ============================================================
// Loads the class folders exactly as `prepare` would, but only
// reports what it found: files and samples per class and the
// common sample shape. Nothing is shuffled or written.

use anyhow::{Context, Result};

use crate::application::pipeline::PipelineConfig;
use crate::domain::traits::SampleSource;

/// What one class directory contributed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInventory {
    pub class:   String,
    pub label:   usize,
    pub files:   usize,
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inventory {
    pub classes:      Vec<ClassInventory>,
    pub sample_shape: [usize; 2],
}

impl Inventory {
    pub fn total_samples(&self) -> usize {
        self.classes.iter().map(|c| c.samples).sum()
    }
}

pub struct InspectUseCase {
    config: PipelineConfig,
}

impl InspectUseCase {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<Inventory> {
        let cfg = &self.config;
        cfg.validate()?;
        let loader = cfg.loader();

        let dataset = loader
            .load_labeled(&cfg.classes)
            .with_context(|| format!("Cannot load samples from '{}'", cfg.data_root))?;
        let counts = dataset.class_counts(cfg.classes.len());

        let mut classes = Vec::with_capacity(cfg.classes.len());
        for (label, class) in cfg.classes.iter().enumerate() {
            let files = loader.class_files(class)?.len();
            tracing::info!(
                "Class '{}' (label {}): {} files, {} samples",
                class,
                label,
                files,
                counts[label]
            );
            classes.push(ClassInventory {
                class: class.clone(),
                label,
                files,
                samples: counts[label],
            });
        }

        Ok(Inventory {
            classes,
            sample_shape: dataset.sample_shape(),
        })
    }
}
