use burn::data::dataset::Dataset;
use ndarray::{Array2, Axis};

use crate::domain::prepared::PreparedSplit;

/// One normalized image with its label and one-hot target.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageItem {
    /// [H, W], values in [0, 1]
    pub image:  Array2<f32>,
    pub label:  usize,
    pub target: Vec<f32>,
}

/// A prepared split exposed through burn's Dataset trait.
pub struct ImageDataset {
    split: PreparedSplit,
}

impl ImageDataset {
    pub fn new(split: PreparedSplit) -> Self { Self { split } }

    pub fn num_classes(&self) -> usize { self.split.num_classes() }
}

impl Dataset<ImageItem> for ImageDataset {
    fn get(&self, index: usize) -> Option<ImageItem> {
        let label = *self.split.labels.get(index)?;
        Some(ImageItem {
            image:  self.split.samples.index_axis(Axis(0), index).to_owned(),
            label,
            target: self.split.target(index).to_vec(),
        })
    }

    fn len(&self) -> usize {
        self.split.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    #[test]
    fn test_get_and_len() {
        let split = PreparedSplit {
            samples: Array3::from_shape_fn((2, 2, 2), |(i, _, _)| i as f32 * 0.5),
            labels:  vec![0, 1],
            targets: array![[1.0, 0.0], [0.0, 1.0]],
        };
        let ds = ImageDataset::new(split);

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.num_classes(), 2);
        let item = ds.get(1).unwrap();
        assert_eq!(item.label, 1);
        assert_eq!(item.target, vec![0.0, 1.0]);
        assert!(item.image.iter().all(|&v| v == 0.5));
        assert!(ds.get(2).is_none());
    }
}
