// ============================================================
// Layer 6: Split Store
// ============================================================
// Persists prepared splits so a trainer can pick them up without
// re-reading the class folders.
//
// Output directory layout:
//   prepared/
//     train.safetensors        ← images [N,H,W] f32, targets [N,C] f32,
//     validation.safetensors      labels [N] i64
//     test.safetensors
//     prepare_config.json      ← the exact config of the run
//     summary.csv              ← written by SplitReport

use anyhow::{bail, Context, Result};
use ndarray::{Ix2, Ix3};
use std::{fs, path::PathBuf};

use crate::application::prepare_use_case::PrepareConfig;
use crate::data::payload::{self, RawTensor};
use crate::domain::{prepared::PreparedSplit, split::SplitKind};

const IMAGES: &str = "images";
const TARGETS: &str = "targets";
const LABELS: &str = "labels";
const CONFIG_FILE: &str = "prepare_config.json";

pub struct SplitStore {
    dir: PathBuf,
}

impl SplitStore {
    /// Open (and create if needed) the output directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn split_path(&self, kind: SplitKind) -> PathBuf {
        self.dir.join(format!("{}.safetensors", kind.name()))
    }

    pub fn save_split(&self, kind: SplitKind, split: &PreparedSplit) -> Result<()> {
        let path   = self.split_path(kind);
        let labels = split.labels.iter().map(|&l| l as i64).collect::<Vec<_>>();

        payload::write_tensors(
            &path,
            &[
                (IMAGES, RawTensor::from_f32(split.samples.view().into_dyn())),
                (TARGETS, RawTensor::from_f32(split.targets.view().into_dyn())),
                (LABELS, RawTensor::from_i64(&labels)),
            ],
        )
        .with_context(|| format!("Failed to save {kind} split"))?;

        tracing::debug!("Saved {} split ({} items) to '{}'", kind, split.len(), path.display());
        Ok(())
    }

    pub fn load_split(&self, kind: SplitKind) -> Result<PreparedSplit> {
        let path = self.split_path(kind);
        let ctx  = || format!("Cannot load {kind} split from '{}'", path.display());

        let samples = payload::read_f32(&path, IMAGES)
            .with_context(ctx)?
            .into_dimensionality::<Ix3>()
            .with_context(ctx)?;
        let targets = payload::read_f32(&path, TARGETS)
            .with_context(ctx)?
            .into_dimensionality::<Ix2>()
            .with_context(ctx)?;
        let labels = payload::read_i64(&path, LABELS)
            .with_context(ctx)?
            .into_iter()
            .map(usize::try_from)
            .collect::<Result<Vec<_>, _>>()
            .with_context(ctx)?;

        if samples.len_of(ndarray::Axis(0)) != labels.len()
            || targets.len_of(ndarray::Axis(0)) != labels.len()
        {
            bail!("{}: images, targets and labels disagree on length", ctx());
        }

        Ok(PreparedSplit { samples, labels, targets })
    }

    /// Save the run configuration as pretty JSON.
    pub fn save_config(&self, cfg: &PrepareConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved prepare config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<PrepareConfig> {
        let path = self.dir.join(CONFIG_FILE);
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. Has 'prepare' been run?",
                path.display()
            )
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    #[test]
    fn test_split_round_trip() {
        let dir   = tempfile::tempdir().unwrap();
        let store = SplitStore::new(dir.path().join("prepared")).unwrap();
        let split = PreparedSplit {
            samples: Array3::from_shape_fn((2, 3, 3), |(i, r, c)| (i * 9 + r * 3 + c) as f32 / 18.0),
            labels:  vec![1, 0],
            targets: array![[0.0, 1.0], [1.0, 0.0]],
        };

        store.save_split(SplitKind::Validation, &split).unwrap();
        assert!(store.split_path(SplitKind::Validation).ends_with("validation.safetensors"));

        let back = store.load_split(SplitKind::Validation).unwrap();
        assert_eq!(back, split);
    }

    #[test]
    fn test_config_round_trip() {
        let dir   = tempfile::tempdir().unwrap();
        let store = SplitStore::new(dir.path()).unwrap();
        let mut cfg = PrepareConfig::default();
        cfg.pipeline.seed = Some(1234);

        store.save_config(&cfg).unwrap();
        assert_eq!(store.load_config().unwrap(), cfg);
    }

    #[test]
    fn test_missing_split_is_an_error() {
        let dir   = tempfile::tempdir().unwrap();
        let store = SplitStore::new(dir.path()).unwrap();
        assert!(store.load_split(SplitKind::Test).is_err());
        assert!(store.load_config().is_err());
    }
}
