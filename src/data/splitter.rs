// ============================================================
// Layer 4: Train / Validation / Test Splitter
// ============================================================
// Cuts an already shuffled dataset into three contiguous slices:
//
//   train      = [0,    cut1)   cut1 = floor(N * 0.7)
//   validation = [cut1, cut2)   cut2 = floor(N * 0.9)
//   test       = [cut2, N)
//
// The ranges never overlap and always cover 0..N. Shuffling is a
// separate step (see shuffle.rs) so the split itself is a pure
// function of N and the bounds.

use crate::domain::error::{PipelineError, PipelineResult};
use crate::domain::sample::LabeledDataset;
use crate::domain::split::{DatasetSplits, SplitBounds, SplitRanges};

/// Index ranges for a dataset of `n` items. Total for every n,
/// including 0 (three empty ranges).
pub fn split_ranges(n: usize, bounds: &SplitBounds) -> SplitRanges {
    let (cut1, cut2) = bounds.cut_points(n);
    SplitRanges {
        train:      0..cut1,
        validation: cut1..cut2,
        test:       cut2..n,
    }
}

/// Split `dataset` into train, validation and test.
///
/// An empty dataset is an error: training on nothing is always a
/// configuration mistake.
pub fn split_dataset(dataset: &LabeledDataset, bounds: &SplitBounds) -> PipelineResult<DatasetSplits> {
    bounds.validate()?;
    if dataset.is_empty() {
        return Err(PipelineError::EmptyDataset);
    }

    let ranges = split_ranges(dataset.len(), bounds);
    let splits = DatasetSplits {
        train:      dataset.slice(ranges.train.clone()),
        validation: dataset.slice(ranges.validation.clone()),
        test:       dataset.slice(ranges.test.clone()),
    };

    let total = dataset.len();
    tracing::debug!(
        "Dataset split: {} train, {} validation, {} test ({}% / {}% / {}%)",
        splits.train.len(),
        splits.validation.len(),
        splits.test.len(),
        splits.train.len() * 100 / total,
        splits.validation.len() * 100 / total,
        splits.test.len() * 100 / total,
    );

    Ok(splits)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn dataset(n: usize) -> LabeledDataset {
        let samples = Array3::from_shape_fn((n, 2, 2), |(i, _, _)| i as f32);
        LabeledDataset::new(samples, vec![0; n]).unwrap()
    }

    #[test]
    fn test_hundred_items() {
        let r = split_ranges(100, &SplitBounds::default());
        assert_eq!(r.train, 0..70);
        assert_eq!(r.validation, 70..90);
        assert_eq!(r.test, 90..100);
    }

    #[test]
    fn test_three_items() {
        let r = split_ranges(3, &SplitBounds::default());
        assert_eq!(r.train.len(), 2);
        assert_eq!(r.validation.len(), 0);
        assert_eq!(r.test.len(), 1);
    }

    #[test]
    fn test_ranges_cover_every_n() {
        let bounds = SplitBounds::default();
        for n in 0..=257 {
            let r = split_ranges(n, &bounds);
            assert_eq!(r.total(), n, "n = {n}");
            assert_eq!(r.train.start, 0);
            assert_eq!(r.train.end, r.validation.start);
            assert_eq!(r.validation.end, r.test.start);
            assert_eq!(r.test.end, n);
        }
    }

    #[test]
    fn test_zero_items_gives_empty_ranges() {
        let r = split_ranges(0, &SplitBounds::default());
        assert!(r.train.is_empty() && r.validation.is_empty() && r.test.is_empty());
    }

    #[test]
    fn test_split_dataset_keeps_order_and_alignment() {
        let splits = split_dataset(&dataset(10), &SplitBounds::default()).unwrap();
        assert_eq!(splits.train.len(), 7);
        assert_eq!(splits.validation.len(), 2);
        assert_eq!(splits.test.len(), 1);
        assert_eq!(splits.total_len(), 10);

        for split in [&splits.train, &splits.validation, &splits.test] {
            assert_eq!(split.samples().len_of(ndarray::Axis(0)), split.labels().len());
        }
        // Validation starts right after train
        assert_eq!(splits.validation.sample(0).unwrap().0[[0, 0]], 7.0);
        assert_eq!(splits.test.sample(0).unwrap().0[[0, 0]], 9.0);
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        let err = split_dataset(&LabeledDataset::empty(2, 2), &SplitBounds::default()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyDataset));
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let bounds = SplitBounds { train_end: 0.95, validation_end: 0.9 };
        assert!(matches!(
            split_dataset(&dataset(10), &bounds),
            Err(PipelineError::InvalidSplit { .. })
        ));
    }
}
