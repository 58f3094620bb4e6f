//! Rayon parallel iteration over strided views (`parallel` feature).

use rayon::iter::plumbing::{bridge_unindexed, Folder, UnindexedConsumer, UnindexedProducer};
use rayon::prelude::*;

use crate::view::StridedArrayView;

/// Splits the view along its largest axis until the pieces are single rows.
struct StridedProducer<'a, T, const N: usize> {
    view: StridedArrayView<'a, T, N>,
}

impl<T: Copy + Sync + Send, const N: usize> UnindexedProducer for StridedProducer<'_, T, N> {
    type Item = T;

    fn split(self) -> (Self, Option<Self>) {
        // Find the largest dimension to split on
        let dims = self.view.dims();
        let Some((axis, &size)) = dims.iter().enumerate().max_by_key(|&(_, &d)| d) else {
            return (self, None);
        };

        if size <= 1 {
            return (self, None);
        }

        let (left, right) = self.view.split_at(axis, size / 2);
        (
            StridedProducer { view: left },
            Some(StridedProducer { view: right }),
        )
    }

    fn fold_with<F>(self, folder: F) -> F
    where
        F: Folder<Self::Item>,
    {
        folder.consume_iter(self.view.iter())
    }
}

/// Parallel iterator over the elements of a [`StridedArrayView`].
///
/// Yields the same elements as [`StridedArrayView::iter`], in no particular
/// order.
pub struct ParStridedIter<'a, T, const N: usize> {
    view: StridedArrayView<'a, T, N>,
}

impl<T: Copy + Sync + Send, const N: usize> ParallelIterator for ParStridedIter<'_, T, N> {
    type Item = T;

    fn drive_unindexed<C>(self, consumer: C) -> C::Result
    where
        C: UnindexedConsumer<Self::Item>,
    {
        bridge_unindexed(StridedProducer { view: self.view }, consumer)
    }
}

impl<'a, T: Copy + Sync + Send, const N: usize> StridedArrayView<'a, T, N> {
    /// Returns a parallel iterator over the elements.
    ///
    /// # Example
    /// ```ignore
    /// use rayon::prelude::*;
    ///
    /// let sum: f64 = view.par_iter().sum();
    /// ```
    pub fn par_iter(&self) -> ParStridedIter<'a, T, N> {
        ParStridedIter { view: *self }
    }
}

impl<'a, T: Copy + Sync + Send, const N: usize> IntoParallelIterator
    for &'a StridedArrayView<'a, T, N>
{
    type Item = T;
    type Iter = ParStridedIter<'a, T, N>;

    fn into_par_iter(self) -> Self::Iter {
        self.par_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_par_iter_matches_serial() {
        let mut rng = StdRng::seed_from_u64(42);
        let data: Vec<f64> = (0..64 * 48).map(|_| rng.gen::<f64>()).collect();
        let view = StridedArrayView::<f64, 2>::row_major(&data, [64, 48]).unwrap();
        let view = view.reversed(0).t();

        let serial: f64 = view.iter().sum();
        let parallel: f64 = view.par_iter().sum();
        assert_relative_eq!(serial, parallel, epsilon = 1e-9);
        assert_eq!(view.par_iter().count(), 64 * 48);
    }

    #[test]
    fn test_par_iter_same_multiset() {
        let data: Vec<i64> = (0..30).collect();
        let view = StridedArrayView::<i64, 3>::row_major(&data, [2, 3, 5]).unwrap();
        let mut collected: Vec<i64> = view.permuted([2, 0, 1]).unwrap().par_iter().collect();
        collected.sort_unstable();
        assert_eq!(collected, data);
    }

    #[test]
    fn test_par_iter_broadcast_and_empty() {
        let data = [3.0f32];
        let view = StridedArrayView::<f32, 1>::row_major(&data, [1]).unwrap();
        let wide = view.as_column_matrix().broadcasted(0, 1).unwrap().broadcasted(1, 100).unwrap();
        assert!(wide.par_iter().all(|x| x == 3.0));

        let empty: [f32; 0] = [];
        let view = StridedArrayView::<f32, 2>::row_major(&empty, [0, 4]).unwrap();
        assert_eq!(view.par_iter().count(), 0);
    }
}
