//! Translation between native and foreign 2-D layout conventions.
//!
//! Native layouts index `[row, col]` and carry one stride per logical axis.
//! Dense matrix libraries instead describe a matrix as `(rows, cols)` plus an
//! (outer, inner) stride pair, where "inner" is the step along whichever axis
//! varies fastest in their storage order. Translating between the two only
//! reassigns strides; extents are never touched.

use crate::layout::{MemoryOrder, StridedLayout};

/// A 2-D layout in a foreign dense-matrix convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForeignLayout {
    pub rows: usize,
    pub cols: usize,
    /// Step between consecutive columns (column-major) or rows (row-major).
    pub outer_stride: isize,
    /// Step between consecutive elements inside one column (column-major)
    /// or one row (row-major).
    pub inner_stride: isize,
    pub order: MemoryOrder,
}

impl ForeignLayout {
    /// Stride between `[i, j]` and `[i + 1, j]`.
    #[inline]
    pub fn row_stride(&self) -> isize {
        match self.order {
            MemoryOrder::ColumnMajor => self.inner_stride,
            MemoryOrder::RowMajor => self.outer_stride,
        }
    }

    /// Stride between `[i, j]` and `[i, j + 1]`.
    #[inline]
    pub fn col_stride(&self) -> isize {
        match self.order {
            MemoryOrder::ColumnMajor => self.outer_stride,
            MemoryOrder::RowMajor => self.inner_stride,
        }
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

/// Describe a native 2-D layout in the foreign convention for `order`.
///
/// Extents stay `(rows, cols)` in both conventions. For a column-major
/// target the inner stride is the native row stride and the outer stride is
/// the native column stride, so the stride pair comes out swapped relative
/// to native axis order while the extents do not. Swapping the extents as
/// well would transpose the data without any error being reported.
///
/// Negative and zero strides pass through unchanged.
pub fn to_foreign(layout: &StridedLayout<2>, order: MemoryOrder) -> ForeignLayout {
    let [rows, cols] = *layout.dims();
    let [row_stride, col_stride] = *layout.strides();
    let (outer_stride, inner_stride) = match order {
        MemoryOrder::ColumnMajor => (col_stride, row_stride),
        MemoryOrder::RowMajor => (row_stride, col_stride),
    };
    let foreign = ForeignLayout {
        rows,
        cols,
        outer_stride,
        inner_stride,
        order,
    };
    debug_assert_eq!(
        [foreign.row_stride(), foreign.col_stride()],
        [row_stride, col_stride],
        "foreign layout does not address the same elements"
    );
    foreign
}

/// Inverse of [`to_foreign`].
pub fn from_foreign(foreign: &ForeignLayout) -> StridedLayout<2> {
    StridedLayout::new(
        [foreign.rows, foreign.cols],
        [foreign.row_stride(), foreign.col_stride()],
    )
}

/// Reverse the axis order of a layout.
///
/// For foreign types whose indexing convention is the mirror image of the
/// native one (`a[i, j, k]` natively is `a[k, j, i]` there). The result
/// addresses the same elements, with the index tuple reversed.
///
/// Never combine with [`to_foreign`]: each already accounts for the
/// convention difference, and applying both silently transposes.
pub fn reversed_axes<const N: usize>(layout: &StridedLayout<N>) -> StridedLayout<N> {
    let mut dims = *layout.dims();
    let mut strides = *layout.strides();
    dims.reverse();
    strides.reverse();
    StridedLayout::new(dims, strides)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_major_swaps_strides_not_extents() {
        let native = StridedLayout::contiguous([4, 5], MemoryOrder::RowMajor);
        let foreign = to_foreign(&native, MemoryOrder::ColumnMajor);

        assert_eq!((foreign.rows, foreign.cols), (4, 5));
        assert_eq!(foreign.inner_stride, 5);
        assert_eq!(foreign.outer_stride, 1);
        assert_eq!(foreign.row_stride(), 5);
        assert_eq!(foreign.col_stride(), 1);
    }

    #[test]
    fn test_row_major_keeps_order() {
        let native = StridedLayout::new([3, 2], [7, 2]);
        let foreign = to_foreign(&native, MemoryOrder::RowMajor);
        assert_eq!(foreign.outer_stride, 7);
        assert_eq!(foreign.inner_stride, 2);
        assert_eq!(from_foreign(&foreign), native);
    }

    #[test]
    fn test_round_trip_negative_and_zero_strides() {
        let layouts = [
            StridedLayout::new([4, 5], [-5, -1]),
            StridedLayout::new([4, 5], [5, -1]),
            StridedLayout::new([5, 10], [1, 0]),
            StridedLayout::new([0, 3], [3, 1]),
        ];
        for native in layouts {
            for order in [MemoryOrder::RowMajor, MemoryOrder::ColumnMajor] {
                let foreign = to_foreign(&native, order);
                assert_eq!(from_foreign(&foreign), native);
            }
        }
    }

    #[test]
    fn test_foreign_offsets_match_native() {
        let native = StridedLayout::new([3, 4], [-4, 1]);
        let foreign = to_foreign(&native, MemoryOrder::ColumnMajor);
        for i in 0..3 {
            for j in 0..4 {
                let foreign_offset =
                    i as isize * foreign.inner_stride + j as isize * foreign.outer_stride;
                assert_eq!(foreign_offset, native.element_offset(&[i, j]));
            }
        }
    }

    #[test]
    fn test_reversed_axes() {
        let native = StridedLayout::new([2, 3, 4], [12, 4, 1]);
        let reversed = reversed_axes(&native);
        assert_eq!(reversed.dims(), &[4, 3, 2]);
        assert_eq!(reversed.strides(), &[1, 4, 12]);
        assert_eq!(
            reversed.element_offset(&[3, 2, 1]),
            native.element_offset(&[1, 2, 3])
        );
        assert_eq!(reversed_axes(&reversed), native);
    }
}
