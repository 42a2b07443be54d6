// ============================================================
// Layer 2: PrepareUseCase
// ============================================================
// Runs the preparation pipeline and leaves everything a trainer
// needs in the output directory:
//
//   Step 1: Load, shuffle, split, preprocess    (pipeline.rs)
//   Step 2: Save the three splits, then config  (Layer 6 - infra)
//   Step 3: Write the per-class summary         (Layer 6 - infra)
//   Step 4: Build one training batch to check   (Layer 4 - data)
//           the tensors the trainer will see

use anyhow::{Context, Result};
use burn::backend::{ndarray::NdArrayDevice, NdArray};
use serde::{Deserialize, Serialize};

use crate::application::pipeline::{run_pipeline, PipelineConfig};
use crate::data::{batcher::build_loader, dataset::ImageDataset};
use crate::domain::{layout::ChannelLayout, prepared::PreparedSplits, split::SplitKind};
use crate::infra::{
    report::{SplitReport, SplitSummary},
    split_store::SplitStore,
};

// ─── Preparation Configuration ───────────────────────────────────────────────
// Serialisable so the store can record exactly how a set of
// splits was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepareConfig {
    #[serde(flatten)]
    pub pipeline:   PipelineConfig,
    pub output_dir: String,
    pub layout:     ChannelLayout,
    pub batch_size: usize,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            pipeline:   PipelineConfig::default(),
            output_dir: "prepared".to_string(),
            layout:     ChannelLayout::default(),
            batch_size: 32,
        }
    }
}

// ─── PrepareUseCase ──────────────────────────────────────────────────────────
pub struct PrepareUseCase {
    config: PrepareConfig,
}

impl PrepareUseCase {
    pub fn new(config: PrepareConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<PreparedSplits> {
        let cfg = &self.config;

        // ── Step 1: Pipeline ─────────────────────────────────────────────────
        tracing::info!("Preparing samples from '{}'", cfg.pipeline.data_root);
        let splits = run_pipeline(&cfg.pipeline)
            .with_context(|| format!("Cannot prepare data from '{}'", cfg.pipeline.data_root))?;

        // ── Step 2: Persist ──────────────────────────────────────────────────
        // The config goes last: its presence marks a complete run.
        let store = SplitStore::new(&cfg.output_dir)?;
        for kind in SplitKind::ALL {
            store.save_split(kind, splits.get(kind))?;
        }
        store.save_config(cfg)?;

        // ── Step 3: Summary ──────────────────────────────────────────────────
        let rows: Vec<SplitSummary> = SplitKind::ALL
            .iter()
            .map(|&kind| SplitSummary::from_split(kind, splits.get(kind)))
            .collect();
        SplitReport::new(&cfg.output_dir)?.write(&rows)?;

        // ── Step 4: Hand-off check ───────────────────────────────────────────
        self.check_first_batch(&splits);

        tracing::info!("Prepared splits written to '{}'", cfg.output_dir);
        Ok(splits)
    }

    /// Pull the first training batch through burn's DataLoader on
    /// the CPU backend and log its tensor shapes.
    fn check_first_batch(&self, splits: &PreparedSplits) {
        if splits.train.is_empty() {
            tracing::warn!("Training split is empty, skipping batch check");
            return;
        }

        let device = NdArrayDevice::default();
        let loader = build_loader::<NdArray>(
            ImageDataset::new(splits.train.clone()),
            self.config.layout,
            self.config.batch_size,
            self.config.pipeline.seed,
            &device,
        );

        let first = loader.iter().next();
        if let Some(batch) = first {
            tracing::info!(
                "First training batch: images {:?}, targets {:?}, labels {:?}",
                batch.images.dims(),
                batch.targets.dims(),
                batch.labels.dims()
            );
        }
    }
}
