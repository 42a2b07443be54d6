// ============================================================
// Layer 4: Data Pipeline
// ============================================================
// Everything between the class folders on disk and the tensor
// batches the trainer consumes.
//
// The pipeline flows in this order:
//
//   <root>/class*/*.safetensors
//       │
//       ▼
//   ClassFolderLoader → reads payloads, labels samples by class
//       │
//       ▼
//   shuffle_together  → one permutation for samples AND labels
//       │
//       ▼
//   split_dataset     → 70% train / 20% validation / 10% test
//       │
//       ▼
//   Preprocessor      → scale into [0, 1], one-hot targets
//       │
//       ▼
//   ImageDataset      → implements burn's Dataset trait
//       │
//       ▼
//   ImageBatcher      → stacks items into [N, 1, H, W] tensors

/// Reads and writes named safetensors payloads
pub mod payload;

/// Loads class subdirectories into a labelled dataset
pub mod loader;

/// Shuffles samples and labels with a single permutation
pub mod shuffle;

/// Splits a shuffled dataset into train/validation/test
pub mod splitter;

/// Normalizes pixels and one-hot encodes labels
pub mod preprocessor;

/// Implements burn's Dataset trait for prepared images
pub mod dataset;

/// Implements burn's Batcher trait to create tensor batches
pub mod batcher;
