//! Zero-copy casts between strided views and `ndarray` views.
//!
//! ndarray indexes `[row, col]` like the native views and stores one signed
//! stride per axis, so extents and strides carry over one-to-one. The only
//! translation needed is for negative strides on the way in: the view is
//! built from the lowest address with positive strides and the reversed
//! axes are then inverted, which puts the origin back where it was.

use ndarray::{
    Array, ArrayView, ArrayView1, ArrayView2, ArrayViewD, ArrayViewMut, ArrayViewMut1,
    ArrayViewMut2, Axis, Dimension, Ix1, Ix2, IxDyn, ShapeBuilder,
};

use crate::dispatch::{AnyArrayView, ShapeKind, StaticShape};
use crate::layout::StridedLayout;
use crate::view::{StridedArrayView, StridedArrayViewMut};
use crate::Result;

/// Native view → ndarray view.
///
/// Only implemented for one- and two-dimensional views.
pub trait ToNdarray {
    type Output;

    fn into_ndarray(self) -> Self::Output;
}

/// ndarray view → native view.
pub trait FromNdarray {
    type Output;

    fn into_strided(self) -> Self::Output;
}

/// Cast a native view to the matching ndarray view type.
pub fn to_ndarray<V: ToNdarray>(view: V) -> V::Output {
    view.into_ndarray()
}

/// Cast an ndarray view to the matching native view type.
///
/// `ArrayView1`/`ArrayView2` pick the rank at compile time; `ArrayViewD`
/// is dispatched at run time into an [`AnyArrayView`].
pub fn from_ndarray<A: FromNdarray>(array: A) -> A::Output {
    array.into_strided()
}

/// Copy a native view into an owned ndarray array (row-major).
pub fn to_ndarray_owned<'a, T, D, V>(view: V) -> Array<T, D>
where
    T: Clone + 'a,
    D: Dimension,
    V: ToNdarray<Output = ArrayView<'a, T, D>>,
{
    let array = view.into_ndarray();
    log::trace!(
        "materializing strided view of shape {:?} into ndarray::Array",
        array.shape()
    );
    array.to_owned()
}

/// Lowest-address pointer, absolute strides, and the axes to invert after
/// building an ndarray view with positive strides.
///
/// An empty view reaches no element, so it gets all-zero strides and no
/// inverted axes: ndarray checks the stride span of empty arrays against
/// their (empty) storage when copying them.
fn positive_strides<T, const N: usize>(
    ptr: *const T,
    layout: &StridedLayout<N>,
) -> (*const T, [usize; N], [bool; N]) {
    let mut origin = ptr;
    let mut strides = [0usize; N];
    let mut inverted = [false; N];
    if layout.is_empty() {
        return (origin, strides, inverted);
    }
    for axis in 0..N {
        let (dim, stride) = (layout.dim(axis), layout.stride(axis));
        if stride < 0 {
            origin = origin.wrapping_offset(stride * (dim as isize - 1));
            inverted[axis] = true;
        }
        strides[axis] = stride.unsigned_abs();
    }
    (origin, strides, inverted)
}

fn invert_axes<S, D>(array: &mut ndarray::ArrayBase<S, D>, inverted: &[bool])
where
    S: ndarray::RawData,
    D: Dimension,
{
    for (axis, &flip) in inverted.iter().enumerate() {
        if flip {
            array.invert_axis(Axis(axis));
        }
    }
}

impl<'a, T> ToNdarray for StridedArrayView<'a, T, 1> {
    type Output = ArrayView1<'a, T>;

    fn into_ndarray(self) -> ArrayView1<'a, T> {
        let (origin, [s0], inverted) = positive_strides(self.as_ptr(), self.layout());
        // SAFETY: the view guarantees every reachable element is valid for 'a;
        // `origin` is the lowest of them.
        let mut array = unsafe { ArrayView1::from_shape_ptr(self.dim(0).strides(s0), origin) };
        invert_axes(&mut array, &inverted);
        array
    }
}

impl<'a, T> ToNdarray for StridedArrayView<'a, T, 2> {
    type Output = ArrayView2<'a, T>;

    fn into_ndarray(self) -> ArrayView2<'a, T> {
        let (origin, [s0, s1], inverted) = positive_strides(self.as_ptr(), self.layout());
        let shape = (self.nrows(), self.ncols()).strides((s0, s1));
        // SAFETY: as for the 1-D cast.
        let mut array = unsafe { ArrayView2::from_shape_ptr(shape, origin) };
        invert_axes(&mut array, &inverted);
        array
    }
}

impl<'a, T> ToNdarray for StridedArrayViewMut<'a, T, 1> {
    type Output = ArrayViewMut1<'a, T>;

    fn into_ndarray(mut self) -> ArrayViewMut1<'a, T> {
        let len = self.dims()[0];
        let (origin, [s0], inverted) = positive_strides(self.as_mut_ptr() as *const T, self.layout());
        // SAFETY: the view is the only access path to its elements for 'a.
        let mut array =
            unsafe { ArrayViewMut1::from_shape_ptr(len.strides(s0), origin as *mut T) };
        invert_axes(&mut array, &inverted);
        array
    }
}

impl<'a, T> ToNdarray for StridedArrayViewMut<'a, T, 2> {
    type Output = ArrayViewMut2<'a, T>;

    fn into_ndarray(mut self) -> ArrayViewMut2<'a, T> {
        let [rows, cols] = *self.dims();
        let (origin, [s0, s1], inverted) =
            positive_strides(self.as_mut_ptr() as *const T, self.layout());
        // SAFETY: the view is the only access path to its elements for 'a.
        let mut array = unsafe {
            ArrayViewMut2::from_shape_ptr((rows, cols).strides((s0, s1)), origin as *mut T)
        };
        invert_axes(&mut array, &inverted);
        array
    }
}

impl<'a, T> FromNdarray for ArrayView1<'a, T> {
    type Output = StridedArrayView<'a, T, 1>;

    fn into_strided(self) -> StridedArrayView<'a, T, 1> {
        let layout = StridedLayout::new([self.len()], [self.strides()[0]]);
        // SAFETY: ndarray guarantees the view's elements are valid for 'a.
        unsafe { StridedArrayView::from_raw_parts(self.as_ptr(), layout) }
    }
}

impl<'a, T> FromNdarray for ArrayView2<'a, T> {
    type Output = StridedArrayView<'a, T, 2>;

    fn into_strided(self) -> StridedArrayView<'a, T, 2> {
        let (rows, cols) = self.dim();
        let strides = self.strides();
        let layout = StridedLayout::new([rows, cols], [strides[0], strides[1]]);
        // SAFETY: ndarray guarantees the view's elements are valid for 'a.
        unsafe { StridedArrayView::from_raw_parts(self.as_ptr(), layout) }
    }
}

impl<'a, T> FromNdarray for ArrayViewD<'a, T> {
    type Output = Result<AnyArrayView<'a, T>>;

    fn into_strided(self) -> Result<AnyArrayView<'a, T>> {
        // SAFETY: ndarray guarantees the view's elements are valid for 'a.
        unsafe { AnyArrayView::from_raw_parts(self.as_ptr(), self.shape(), self.strides()) }
    }
}

impl<'a, T> FromNdarray for ArrayViewMut1<'a, T> {
    type Output = StridedArrayViewMut<'a, T, 1>;

    fn into_strided(mut self) -> StridedArrayViewMut<'a, T, 1> {
        let layout = StridedLayout::new([self.len()], [self.strides()[0]]);
        // SAFETY: the consumed view was the only access path for 'a.
        unsafe { StridedArrayViewMut::from_raw_parts(self.as_mut_ptr(), layout) }
    }
}

impl<'a, T> FromNdarray for ArrayViewMut2<'a, T> {
    type Output = StridedArrayViewMut<'a, T, 2>;

    fn into_strided(mut self) -> StridedArrayViewMut<'a, T, 2> {
        let (rows, cols) = self.dim();
        let layout = StridedLayout::new([rows, cols], [self.strides()[0], self.strides()[1]]);
        // SAFETY: the consumed view was the only access path for 'a.
        unsafe { StridedArrayViewMut::from_raw_parts(self.as_mut_ptr(), layout) }
    }
}

impl<T> StaticShape for ArrayView<'_, T, Ix1> {
    const KIND: ShapeKind = ShapeKind::KnownVector;
}

impl<T> StaticShape for ArrayView<'_, T, Ix2> {
    const KIND: ShapeKind = ShapeKind::KnownMatrix;
}

impl<T> StaticShape for ArrayView<'_, T, IxDyn> {
    const KIND: ShapeKind = ShapeKind::Dynamic;
}

impl<T> StaticShape for ArrayViewMut<'_, T, Ix1> {
    const KIND: ShapeKind = ShapeKind::KnownVector;
}

impl<T> StaticShape for ArrayViewMut<'_, T, Ix2> {
    const KIND: ShapeKind = ShapeKind::KnownMatrix;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CastError;
    use ndarray::{s, Array2, ArrayD};

    fn sequence(n: usize) -> Vec<f32> {
        (0..n).map(|x| x as f32).collect()
    }

    #[test]
    fn test_row_major_view_to_ndarray() {
        let data = sequence(20);
        let view = StridedArrayView::<f32, 2>::row_major(&data, [4, 5]).unwrap();
        let array = to_ndarray(view);

        assert_eq!(array.shape(), &[4, 5]);
        assert_eq!(array.strides(), &[5, 1]);
        assert_eq!(array.as_ptr(), data.as_ptr());
        assert_eq!(array[[2, 3]], 13.0);
    }

    #[test]
    fn test_reversed_view_to_ndarray() {
        let data = sequence(20);
        let view = StridedArrayView::<f32, 2>::row_major(&data, [4, 5]).unwrap();
        let array = to_ndarray(view.reversed(0).reversed(1));

        assert_eq!(array.strides(), &[-5, -1]);
        assert_eq!(array[[0, 0]], 19.0);
        assert_eq!(array[[3, 4]], 0.0);
        assert_eq!(array[[1, 2]], view.get([2, 2]));
    }

    #[test]
    fn test_reversed_1d_to_ndarray() {
        let data = sequence(6);
        let view = StridedArrayView::<f32, 1>::row_major(&data, [6]).unwrap();
        let array = to_ndarray(view.reversed(0));
        assert_eq!(array.to_vec(), vec![5.0, 4.0, 3.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_broadcast_view_to_ndarray() {
        let data = sequence(5);
        let view = StridedArrayView::<f32, 1>::row_major(&data, [5]).unwrap();
        let wide = view.as_column_matrix().broadcasted(1, 10).unwrap();
        let array = to_ndarray(wide);

        assert_eq!(array.shape(), &[5, 10]);
        for ((i, _), &x) in array.indexed_iter() {
            assert_eq!(x, i as f32);
        }
    }

    #[test]
    fn test_ndarray_transposed_and_flipped_to_view() {
        let a = Array2::from_shape_fn((4, 5), |(i, j)| (5 * i + j) as f64);

        let t = from_ndarray(a.t());
        assert_eq!(t.dims(), &[5, 4]);
        assert_eq!(t.strides(), &[1, 5]);
        assert_eq!(t.get([4, 3]), 19.0);

        let flipped = from_ndarray(a.slice(s![..;-1, ..]));
        assert_eq!(flipped.strides(), &[-5, 1]);
        assert_eq!(flipped.get([0, 0]), a[[3, 0]]);
        assert_eq!(flipped.get([3, 4]), a[[0, 4]]);
    }

    #[test]
    fn test_dynamic_rank_dispatch() {
        let a = ArrayD::from_shape_fn(vec![3, 2], |ix| (ix[0] * 2 + ix[1]) as f32);
        let any = from_ndarray(a.view()).unwrap();
        assert_eq!(any.ndim(), 2);
        assert_eq!(any.get(&[2, 1]), Some(5.0));

        let v = ArrayD::from_shape_vec(vec![4], sequence(4)).unwrap();
        let any = from_ndarray(v.view()).unwrap();
        assert_eq!(any.into_vector().unwrap().to_vec(), sequence(4));

        let cube = ArrayD::<f32>::zeros(vec![2, 2, 2]);
        assert!(matches!(
            from_ndarray(cube.view()),
            Err(CastError::UnsupportedRank(3))
        ));
    }

    #[test]
    fn test_mutable_casts() {
        let mut data = vec![0.0f32; 6];
        {
            let view = StridedArrayViewMut::<f32, 2>::row_major(&mut data, [2, 3]).unwrap();
            let mut array = to_ndarray(view.reversed(1));
            array[[0, 0]] = 1.0;
            let mut back = from_ndarray(array);
            back.set([1, 2], 2.0);
        }
        assert_eq!(data, vec![0.0, 0.0, 1.0, 2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_empty_reversed_view_to_ndarray() {
        let data = sequence(6);
        let view = StridedArrayView::<f32, 2>::row_major(&data, [3, 2]).unwrap();
        let empty = view.block(1, 0, 0, 2).reversed(0);
        assert_eq!(empty.strides(), &[-2, 1]);

        let array = to_ndarray(empty);
        assert_eq!(array.shape(), &[0, 2]);
        assert_eq!(array.iter().count(), 0);

        let owned = to_ndarray_owned(empty);
        assert_eq!(owned.shape(), &[0, 2]);
        assert!(owned.is_empty());

        let column = view.col(1).slice(2..2).reversed(0);
        assert_eq!(to_ndarray_owned(column).len(), 0);
        let wide = view.block(0, 1, 3, 0).reversed(0).reversed(1);
        assert_eq!(to_ndarray_owned(wide).shape(), &[3, 0]);
    }

    #[test]
    fn test_empty_mutable_view_to_ndarray() {
        let mut data = sequence(6);
        let view = StridedArrayViewMut::<f32, 2>::new(&mut data, [0, 3], [-2, 1], 4).unwrap();
        let array = to_ndarray(view.reversed(1));
        assert_eq!(array.shape(), &[0, 3]);
    }

    #[test]
    fn test_to_ndarray_owned() {
        let data = sequence(20);
        let view = StridedArrayView::<f32, 2>::row_major(&data, [4, 5]).unwrap();
        let owned = to_ndarray_owned(view.block(1, 1, 2, 3).t());
        assert_eq!(owned.shape(), &[3, 2]);
        assert_eq!(owned[[2, 1]], 13.0);
        assert_eq!(
            <ArrayView2<'_, f32> as StaticShape>::KIND,
            ShapeKind::KnownMatrix
        );
    }
}
