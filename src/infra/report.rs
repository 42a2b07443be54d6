// ============================================================
// Layer 6: Split Report
// ============================================================
// Records how many samples of each class ended up in each split,
// both in the log and in a CSV next to the prepared data.
//
// Example summary.csv for two classes:
//   split,samples,class_0,class_1
//   train,70,34,36
//   validation,20,11,9
//   test,10,5,5
//
// A strongly skewed row usually means the shuffle was skipped or
// one class directory is much smaller than the other.

use anyhow::{Context, Result};
use std::{
    fs::{self, File},
    io::Write,
    path::PathBuf,
};

use crate::domain::{prepared::PreparedSplit, split::SplitKind};

/// Sample and per-class counts of one split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSummary {
    pub split:        String,
    pub samples:      usize,
    pub class_counts: Vec<usize>,
}

impl SplitSummary {
    pub fn from_split(kind: SplitKind, split: &PreparedSplit) -> Self {
        Self {
            split:        kind.name().to_string(),
            samples:      split.len(),
            class_counts: split.class_counts(),
        }
    }

    fn csv_row(&self) -> String {
        let mut row = format!("{},{}", self.split, self.samples);
        for count in &self.class_counts {
            row.push(',');
            row.push_str(&count.to_string());
        }
        row
    }
}

/// Writes split summaries to `summary.csv`.
pub struct SplitReport {
    csv_path: PathBuf,
}

impl SplitReport {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { csv_path: dir.join("summary.csv") })
    }

    /// Replace the CSV with `rows`, one line per split.
    pub fn write(&self, rows: &[SplitSummary]) -> Result<()> {
        let num_classes = rows.iter().map(|r| r.class_counts.len()).max().unwrap_or(0);

        let mut f = File::create(&self.csv_path)
            .with_context(|| format!("Cannot create '{}'", self.csv_path.display()))?;

        let mut header = String::from("split,samples");
        for c in 0..num_classes {
            header.push_str(&format!(",class_{c}"));
        }
        writeln!(f, "{header}")?;

        for row in rows {
            writeln!(f, "{}", row.csv_row())?;
            tracing::info!(
                "{:<10} {:>6} samples, per class {:?}",
                row.split,
                row.samples,
                row.class_counts
            );
        }

        tracing::debug!("Wrote split summary to '{}'", self.csv_path.display());
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
