//! Zero-copy casts between strided views and `faer` matrix views.
//!
//! faer parameterises a matrix as `(nrows, ncols)` plus a column-major
//! (outer = column, inner = row) stride pair. Strides are rewritten through
//! [`to_foreign`]/[`from_foreign`] with [`MemoryOrder::ColumnMajor`]; the
//! element pointer is passed through untouched, so negative and zero strides
//! survive in both directions.
//!
//! Mutable views never reach one element through two indices (checked when
//! they are built over a slice), which is what `MatMut` requires. Broadcast
//! views only ever cast to the shared `MatRef`.

use faer::col::{ColMut, ColRef};
use faer::mat::{Mat, MatMut, MatRef};
use faer::row::{RowMut, RowRef};

use crate::dispatch::{ShapeKind, StaticShape};
use crate::layout::{MemoryOrder, StridedLayout};
use crate::translate::{from_foreign, to_foreign, ForeignLayout};
use crate::view::{StridedArrayView, StridedArrayViewMut};

/// Native view → faer view.
///
/// Only implemented for one- and two-dimensional views.
pub trait ToFaer {
    type Output;

    fn into_faer(self) -> Self::Output;
}

/// faer view → native view.
pub trait FromFaer {
    type Output;

    fn into_strided(self) -> Self::Output;
}

/// Cast a native view to the matching faer view type.
///
/// One-dimensional views become [`ColRef`], two-dimensional views [`MatRef`].
pub fn to_faer<V: ToFaer>(view: V) -> V::Output {
    view.into_faer()
}

/// Cast a faer view to the matching native view type.
///
/// [`ColRef`] and [`RowRef`] become one-dimensional views. [`MatRef`] always
/// becomes two-dimensional, even when it has a single column at run time.
pub fn from_faer<F: FromFaer>(foreign: F) -> F::Output {
    foreign.into_strided()
}

fn faer_layout(layout: &StridedLayout<2>) -> ForeignLayout {
    to_foreign(layout, MemoryOrder::ColumnMajor)
}

fn native_layout(nrows: usize, ncols: usize, row_stride: isize, col_stride: isize) -> StridedLayout<2> {
    from_foreign(&ForeignLayout {
        rows: nrows,
        cols: ncols,
        outer_stride: col_stride,
        inner_stride: row_stride,
        order: MemoryOrder::ColumnMajor,
    })
}

impl<'a, T> ToFaer for StridedArrayView<'a, T, 1> {
    type Output = ColRef<'a, T>;

    fn into_faer(self) -> ColRef<'a, T> {
        // SAFETY: the view guarantees every reachable element is valid for 'a.
        unsafe { ColRef::from_raw_parts(self.as_ptr(), self.dim(0), self.stride(0)) }
    }
}

impl<'a, T> ToFaer for StridedArrayView<'a, T, 2> {
    type Output = MatRef<'a, T>;

    fn into_faer(self) -> MatRef<'a, T> {
        let f = faer_layout(self.layout());
        // SAFETY: the view guarantees every reachable element is valid for 'a.
        unsafe {
            MatRef::from_raw_parts(
                self.as_ptr(),
                f.rows,
                f.cols,
                f.inner_stride,
                f.outer_stride,
            )
        }
    }
}

impl<'a, T> ToFaer for StridedArrayViewMut<'a, T, 1> {
    type Output = ColMut<'a, T>;

    fn into_faer(mut self) -> ColMut<'a, T> {
        let (len, stride) = (self.dims()[0], self.strides()[0]);
        // SAFETY: the view is the only access path to its elements for 'a.
        unsafe { ColMut::from_raw_parts_mut(self.as_mut_ptr(), len, stride) }
    }
}

impl<'a, T> ToFaer for StridedArrayViewMut<'a, T, 2> {
    type Output = MatMut<'a, T>;

    fn into_faer(mut self) -> MatMut<'a, T> {
        let f = faer_layout(self.layout());
        // SAFETY: the view is the only access path to its elements for 'a.
        unsafe {
            MatMut::from_raw_parts_mut(
                self.as_mut_ptr(),
                f.rows,
                f.cols,
                f.inner_stride,
                f.outer_stride,
            )
        }
    }
}

impl<'a, T> FromFaer for ColRef<'a, T> {
    type Output = StridedArrayView<'a, T, 1>;

    fn into_strided(self) -> StridedArrayView<'a, T, 1> {
        let layout = StridedLayout::new([self.nrows()], [self.row_stride()]);
        // SAFETY: faer guarantees the column's elements are valid for 'a.
        unsafe { StridedArrayView::from_raw_parts(self.as_ptr(), layout) }
    }
}

impl<'a, T> FromFaer for RowRef<'a, T> {
    type Output = StridedArrayView<'a, T, 1>;

    fn into_strided(self) -> StridedArrayView<'a, T, 1> {
        let layout = StridedLayout::new([self.ncols()], [self.col_stride()]);
        // SAFETY: faer guarantees the row's elements are valid for 'a.
        unsafe { StridedArrayView::from_raw_parts(self.as_ptr(), layout) }
    }
}

impl<'a, T> FromFaer for MatRef<'a, T> {
    type Output = StridedArrayView<'a, T, 2>;

    fn into_strided(self) -> StridedArrayView<'a, T, 2> {
        let layout = native_layout(self.nrows(), self.ncols(), self.row_stride(), self.col_stride());
        // SAFETY: faer guarantees the matrix's elements are valid for 'a.
        unsafe { StridedArrayView::from_raw_parts(self.as_ptr(), layout) }
    }
}

impl<'a, T> FromFaer for ColMut<'a, T> {
    type Output = StridedArrayViewMut<'a, T, 1>;

    fn into_strided(mut self) -> StridedArrayViewMut<'a, T, 1> {
        let layout = StridedLayout::new([self.nrows()], [self.row_stride()]);
        // SAFETY: the consumed `ColMut` was the only access path for 'a.
        unsafe { StridedArrayViewMut::from_raw_parts(self.as_ptr_mut(), layout) }
    }
}

impl<'a, T> FromFaer for RowMut<'a, T> {
    type Output = StridedArrayViewMut<'a, T, 1>;

    fn into_strided(mut self) -> StridedArrayViewMut<'a, T, 1> {
        let layout = StridedLayout::new([self.ncols()], [self.col_stride()]);
        // SAFETY: the consumed `RowMut` was the only access path for 'a.
        unsafe { StridedArrayViewMut::from_raw_parts(self.as_ptr_mut(), layout) }
    }
}

impl<'a, T> FromFaer for MatMut<'a, T> {
    type Output = StridedArrayViewMut<'a, T, 2>;

    fn into_strided(mut self) -> StridedArrayViewMut<'a, T, 2> {
        let layout = native_layout(self.nrows(), self.ncols(), self.row_stride(), self.col_stride());
        // SAFETY: the consumed `MatMut` was the only access path for 'a.
        unsafe { StridedArrayViewMut::from_raw_parts(self.as_ptr_mut(), layout) }
    }
}

impl<T> StaticShape for ColRef<'_, T> {
    const KIND: ShapeKind = ShapeKind::KnownVector;
}

impl<T> StaticShape for RowRef<'_, T> {
    const KIND: ShapeKind = ShapeKind::KnownVector;
}

impl<T> StaticShape for MatRef<'_, T> {
    const KIND: ShapeKind = ShapeKind::KnownMatrix;
}

impl<T> StaticShape for ColMut<'_, T> {
    const KIND: ShapeKind = ShapeKind::KnownVector;
}

impl<T> StaticShape for RowMut<'_, T> {
    const KIND: ShapeKind = ShapeKind::KnownVector;
}

impl<T> StaticShape for MatMut<'_, T> {
    const KIND: ShapeKind = ShapeKind::KnownMatrix;
}

/// Copy a view into an owned, column-major faer matrix.
pub fn to_faer_mat<T: Copy>(view: &StridedArrayView<'_, T, 2>) -> Mat<T> {
    log::trace!(
        "materializing {}x{} strided view into faer::Mat",
        view.nrows(),
        view.ncols()
    );
    Mat::from_fn(view.nrows(), view.ncols(), |i, j| view.get([i, j]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence(n: usize) -> Vec<f32> {
        (0..n).map(|x| x as f32).collect()
    }

    #[test]
    fn test_row_major_view_to_mat_ref() {
        let data = sequence(20);
        let view = StridedArrayView::<f32, 2>::row_major(&data, [4, 5]).unwrap();
        let mat = to_faer(view);

        assert_eq!((mat.nrows(), mat.ncols()), (4, 5));
        assert_eq!(mat.row_stride(), 5);
        assert_eq!(mat.col_stride(), 1);
        assert_eq!(mat.as_ptr(), data.as_ptr());
        for i in 0..4 {
            for j in 0..5 {
                assert_eq!(mat[(i, j)], view.get([i, j]));
            }
        }
    }

    #[test]
    fn test_vector_view_to_col_ref() {
        let data = sequence(20);
        let view = StridedArrayView::<f32, 2>::row_major(&data, [4, 5]).unwrap();
        let col = to_faer(view.col(2));
        assert_eq!(col.nrows(), 4);
        assert_eq!(col.row_stride(), 5);
        assert_eq!(from_faer(col).to_vec(), vec![2.0, 7.0, 12.0, 17.0]);
    }

    #[test]
    fn test_reversed_view_keeps_negative_strides() {
        let data = sequence(20);
        let view = StridedArrayView::<f32, 2>::row_major(&data, [4, 5]).unwrap();
        let mat = to_faer(view.reversed(0).reversed(1));

        assert_eq!(mat.row_stride(), -5);
        assert_eq!(mat.col_stride(), -1);
        assert_eq!(mat[(0, 0)], 19.0);
        assert_eq!(mat[(3, 4)], 0.0);
    }

    #[test]
    fn test_round_trip_is_alias() {
        let data = sequence(20);
        let view = StridedArrayView::<f32, 2>::row_major(&data, [4, 5]).unwrap();
        let back = from_faer(to_faer(view.t()));

        assert_eq!(back.layout(), view.t().layout());
        assert_eq!(back.as_ptr(), view.as_ptr());
        assert_eq!(back.to_vec(), view.t().to_vec());
    }

    #[test]
    fn test_mat_ref_with_one_column_stays_matrix() {
        let m = Mat::from_fn(4, 1, |i, _| i as f64);
        let view: StridedArrayView<'_, f64, 2> = from_faer(m.as_ref());
        assert_eq!(view.dims(), &[4, 1]);
        assert_eq!(<MatRef<'_, f64> as StaticShape>::KIND, ShapeKind::KnownMatrix);
        assert_eq!(<RowRef<'_, f64> as StaticShape>::KIND, ShapeKind::KnownVector);
    }

    #[test]
    fn test_faer_row_to_view() {
        let m = Mat::from_fn(3, 4, |i, j| (10 * i + j) as f64);
        let row = from_faer(m.as_ref().row(1));
        assert_eq!(row.to_vec(), vec![10.0, 11.0, 12.0, 13.0]);
    }

    #[test]
    fn test_mutable_round_trip() {
        let mut data = vec![0.0f64; 6];
        {
            let view = StridedArrayViewMut::<f64, 2>::row_major(&mut data, [2, 3]).unwrap();
            let mut mat = to_faer(view);
            mat[(1, 2)] = 5.0;
            let mut back = from_faer(mat);
            back.set([0, 1], 1.0);
        }
        assert_eq!(data, vec![0.0, 1.0, 0.0, 0.0, 0.0, 5.0]);
    }

    #[test]
    fn test_empty_reversed_view_round_trip() {
        let data = sequence(6);
        let view = StridedArrayView::<f32, 2>::row_major(&data, [3, 2]).unwrap();
        let empty = view.block(1, 0, 0, 2).reversed(0);

        let mat = to_faer(empty);
        assert_eq!((mat.nrows(), mat.ncols()), (0, 2));
        let back = from_faer(mat);
        assert_eq!(back.layout(), empty.layout());
        assert!(back.to_vec().is_empty());

        let owned = to_faer_mat(&empty);
        assert_eq!((owned.nrows(), owned.ncols()), (0, 2));
    }

    #[test]
    fn test_to_faer_mat_materializes() {
        let data = sequence(5);
        let column = StridedArrayView::<f32, 1>::row_major(&data, [5]).unwrap();
        let wide = column.as_column_matrix().broadcasted(1, 3).unwrap();
        let owned = to_faer_mat(&wide);

        assert_eq!((owned.nrows(), owned.ncols()), (5, 3));
        for i in 0..5 {
            for j in 0..3 {
                assert_eq!(owned[(i, j)], i as f32);
            }
        }
    }
}
