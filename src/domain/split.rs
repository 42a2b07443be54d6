// ============================================================
// Layer 3: Split Types
// ============================================================
// A shuffled dataset is cut into three contiguous slices:
//
//   [0 .............. cut1 ......... cut2 ....... N)
//    └─── train ────┘ └─ validation ─┘ └── test ──┘
//
//   cut1 = floor(N * train_end)        (0.7 by default)
//   cut2 = floor(N * validation_end)   (0.9 by default)
//
// The bounds are stored as cumulative fractions rather than
// per-split ratios so 0.9 stays exactly 0.9 (0.7 + 0.2 is
// 0.8999999999999999 in f64, which would move cut2 by one).

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::sample::LabeledDataset;

/// The three partitions, in dataset order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitKind {
    Train,
    Validation,
    Test,
}

impl SplitKind {
    pub const ALL: [SplitKind; 3] = [SplitKind::Train, SplitKind::Validation, SplitKind::Test];

    pub fn name(self) -> &'static str {
        match self {
            SplitKind::Train      => "train",
            SplitKind::Validation => "validation",
            SplitKind::Test       => "test",
        }
    }
}

impl fmt::Display for SplitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fractions of the dataset at which train and validation end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitBounds {
    pub train_end:      f64,
    pub validation_end: f64,
}

impl Default for SplitBounds {
    fn default() -> Self {
        Self { train_end: 0.7, validation_end: 0.9 }
    }
}

impl SplitBounds {
    /// Requires 0 <= train_end <= validation_end <= 1.
    pub fn validate(&self) -> PipelineResult<()> {
        let ok = (0.0..=1.0).contains(&self.train_end)
            && (0.0..=1.0).contains(&self.validation_end)
            && self.train_end <= self.validation_end;
        if ok {
            Ok(())
        } else {
            Err(PipelineError::InvalidSplit {
                train_end:      self.train_end,
                validation_end: self.validation_end,
            })
        }
    }

    /// Cut points for a dataset of `n` items (integer truncation).
    pub fn cut_points(&self, n: usize) -> (usize, usize) {
        let cut = |fraction: f64| ((n as f64) * fraction).floor() as usize;
        // Clamp so hand-built, unvalidated bounds still give valid ranges
        let cut1 = cut(self.train_end).min(n);
        let cut2 = cut(self.validation_end).clamp(cut1, n);
        (cut1, cut2)
    }
}

/// Three contiguous index ranges covering 0..N exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitRanges {
    pub train:      Range<usize>,
    pub validation: Range<usize>,
    pub test:       Range<usize>,
}

impl SplitRanges {
    pub fn total(&self) -> usize {
        self.train.len() + self.validation.len() + self.test.len()
    }
}

/// The shuffled dataset after splitting.
#[derive(Debug, Clone)]
pub struct DatasetSplits {
    pub train:      LabeledDataset,
    pub validation: LabeledDataset,
    pub test:       LabeledDataset,
}

impl DatasetSplits {
    pub fn total_len(&self) -> usize {
        self.train.len() + self.validation.len() + self.test.len()
    }
}
