// ============================================================
// Layer 4: Image Batcher
// ============================================================
// Implements burn's Batcher trait so a prepared split can be fed
// straight to a DataLoader and on to whatever model the trainer
// builds.
//
//   Input:  Vec of N ImageItems, each [H, W] with a one-hot target
//   Output: ImageBatch with
//             images  [N, 1, H, W]  (or [N, H, W, 1])
//             targets [N, C]        one-hot, f32
//             labels  [N]           class indices
//
// All items of a split share [H, W]; the loader guarantees it.

use std::sync::Arc;

use burn::{
    data::{
        dataloader::{batcher::Batcher, DataLoader, DataLoaderBuilder},
        dataset::Dataset,
    },
    prelude::*,
    tensor::TensorData,
};

use crate::data::dataset::{ImageDataset, ImageItem};
use crate::domain::layout::ChannelLayout;

#[derive(Debug, Clone)]
pub struct ImageBatch<B: Backend> {
    pub images:  Tensor<B, 4>,
    pub targets: Tensor<B, 2>,
    pub labels:  Tensor<B, 1, Int>,
}

/// Stacks ImageItems in the configured channel layout.
#[derive(Clone, Debug, Default)]
pub struct ImageBatcher {
    layout: ChannelLayout,
}

impl ImageBatcher {
    pub fn new(layout: ChannelLayout) -> Self {
        Self { layout }
    }
}

impl<B: Backend> Batcher<B, ImageItem, ImageBatch<B>> for ImageBatcher {
    fn batch(&self, items: Vec<ImageItem>, device: &B::Device) -> ImageBatch<B> {
        let n = items.len();
        let (h, w) = items.first().map(|i| i.image.dim()).unwrap_or((0, 0));
        let num_classes = items.first().map(|i| i.target.len()).unwrap_or(0);

        // Flatten row-major: image 0 pixels, image 1 pixels, ...
        let pixels: Vec<f32> = items
            .iter()
            .flat_map(|item| item.image.iter().copied())
            .collect();
        let targets: Vec<f32> = items
            .iter()
            .flat_map(|item| item.target.iter().copied())
            .collect();
        let labels: Vec<i64> = items.iter().map(|item| item.label as i64).collect();

        let images = Tensor::<B, 4>::from_data(
            TensorData::new(pixels, self.layout.shape(n, h, w)),
            device,
        );
        let targets = Tensor::<B, 2>::from_data(TensorData::new(targets, [n, num_classes]), device);
        let labels = Tensor::<B, 1, Int>::from_data(TensorData::new(labels, [n]), device);

        ImageBatch { images, targets, labels }
    }
}

/// A DataLoader over one split, shuffled per epoch with `seed` if given.
pub fn build_loader<B: Backend>(
    dataset:    ImageDataset,
    layout:     ChannelLayout,
    batch_size: usize,
    seed:       Option<u64>,
    device:     &B::Device,
) -> Arc<dyn DataLoader<B, ImageBatch<B>>> {
    tracing::debug!(
        "Building loader over {} items, batch size {}",
        dataset.len(),
        batch_size
    );

    let builder = DataLoaderBuilder::<B, ImageItem, ImageBatch<B>>::new(ImageBatcher::new(layout))
        .batch_size(batch_size.max(1))
        .set_device(device.clone());

    match seed {
        Some(seed) => builder.shuffle(seed).build(dataset),
        None       => builder.build(dataset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use ndarray::Array2;

    type TestBackend = NdArray;

    fn item(fill: f32, label: usize) -> ImageItem {
        let mut target = vec![0.0; 2];
        target[label] = 1.0;
        ImageItem {
            image: Array2::from_elem((3, 4), fill),
            label,
            target,
        }
    }

    fn run(layout: ChannelLayout, items: Vec<ImageItem>) -> ImageBatch<TestBackend> {
        let device = Default::default();
        <ImageBatcher as Batcher<TestBackend, ImageItem, ImageBatch<TestBackend>>>::batch(
            &ImageBatcher::new(layout),
            items,
            &device,
        )
    }

    #[test]
    fn test_channels_first_batch() {
        let batch = run(ChannelLayout::ChannelsFirst, vec![item(0.25, 0), item(0.75, 1)]);

        assert_eq!(batch.images.dims(), [2, 1, 3, 4]);
        assert_eq!(batch.targets.dims(), [2, 2]);
        assert_eq!(batch.labels.dims(), [2]);

        let pixels = batch.images.into_data().to_vec::<f32>().unwrap();
        assert!(pixels[..12].iter().all(|&v| v == 0.25));
        assert!(pixels[12..].iter().all(|&v| v == 0.75));

        let targets = batch.targets.into_data().to_vec::<f32>().unwrap();
        assert_eq!(targets, vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_channels_last_batch() {
        let batch = run(ChannelLayout::ChannelsLast, vec![item(0.5, 1)]);
        assert_eq!(batch.images.dims(), [1, 3, 4, 1]);
    }

    #[test]
    fn test_loader_visits_every_item() {
        use crate::domain::prepared::PreparedSplit;
        use ndarray::Array3;

        let n = 10;
        let split = PreparedSplit {
            samples: Array3::zeros((n, 2, 2)),
            labels:  (0..n).map(|i| i % 2).collect(),
            targets: Array2::from_shape_fn((n, 2), |(i, c)| if i % 2 == c { 1.0 } else { 0.0 }),
        };
        let device = Default::default();
        let loader = build_loader::<TestBackend>(
            ImageDataset::new(split),
            ChannelLayout::ChannelsFirst,
            4,
            Some(42),
            &device,
        );

        let sizes: Vec<usize> = loader.iter().map(|b| b.images.dims()[0]).collect();
        assert_eq!(sizes.iter().sum::<usize>(), n);
        assert_eq!(sizes.len(), 3);
    }
}
