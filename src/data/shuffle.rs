// ============================================================
// Layer 4: Joint Shuffle
// ============================================================
// Loaded datasets are ordered by class (all 0s, then all 1s).
// Before splitting, samples and labels are reordered with ONE
// random permutation so each (sample, label) pair stays together
// and every split gets a mix of classes.
//
// A fixed seed gives the same permutation on every run; without
// one the generator is seeded from the OS.

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::domain::sample::LabeledDataset;

/// StdRng from `seed`, or from OS entropy when `None`.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None       => StdRng::from_entropy(),
    }
}

/// A uniformly random permutation of 0..n (Fisher-Yates).
pub fn permutation<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices
}

/// Shuffle samples and labels together.
///
/// Returns the shuffled dataset and the permutation used:
/// item `i` of the result is item `permutation[i]` of the input.
pub fn shuffle_together<R: Rng + ?Sized>(
    dataset: &LabeledDataset,
    rng:     &mut R,
) -> (LabeledDataset, Vec<usize>) {
    let perm     = permutation(dataset.len(), rng);
    let shuffled = dataset.permuted(&perm);

    tracing::debug!("Shuffled {} samples", shuffled.len());
    (shuffled, perm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn by_class(n0: usize, n1: usize) -> LabeledDataset {
        let n = n0 + n1;
        // Sample i carries its original index in every pixel
        let samples = Array3::from_shape_fn((n, 3, 3), |(i, _, _)| i as f32);
        let labels  = (0..n).map(|i| usize::from(i >= n0)).collect();
        LabeledDataset::new(samples, labels).unwrap()
    }

    #[test]
    fn test_permutation_is_complete() {
        let mut rng  = rng_from_seed(Some(7));
        let mut perm = permutation(50, &mut rng);
        perm.sort_unstable();
        assert_eq!(perm, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_pairing_follows_permutation() {
        let original   = by_class(5, 7);
        let mut rng    = rng_from_seed(Some(42));
        let (out, perm) = shuffle_together(&original, &mut rng);

        assert_eq!(out.len(), original.len());
        for (i, &src) in perm.iter().enumerate() {
            let (img, label)           = out.sample(i).unwrap();
            let (orig_img, orig_label) = original.sample(src).unwrap();
            assert_eq!(img, orig_img);
            assert_eq!(label, orig_label);
            // The pixel value still names the original index
            assert_eq!(img[[1, 1]] as usize, src);
        }
    }

    #[test]
    fn test_label_multiset_preserved() {
        let original = by_class(5, 7);
        let (out, _) = shuffle_together(&original, &mut rng_from_seed(Some(1)));
        assert_eq!(out.class_counts(2), vec![5, 7]);
    }

    #[test]
    fn test_same_seed_same_order() {
        let original = by_class(20, 20);
        let (a, pa)  = shuffle_together(&original, &mut rng_from_seed(Some(99)));
        let (b, pb)  = shuffle_together(&original, &mut rng_from_seed(Some(99)));
        assert_eq!(pa, pb);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_dataset() {
        let empty    = LabeledDataset::empty(4, 4);
        let (out, p) = shuffle_together(&empty, &mut rng_from_seed(Some(3)));
        assert!(out.is_empty());
        assert!(p.is_empty());
    }
}
