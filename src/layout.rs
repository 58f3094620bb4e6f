//! Shape/stride descriptors for strided views.
//!
//! A [`StridedLayout`] is pure geometry: how many elements each axis has and
//! how far apart (in elements) two consecutive indices along that axis are.
//! It knows nothing about the memory it describes.

use crate::{CastError, Result};

/// Element order of a dense buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryOrder {
    /// Last index varies fastest (C order).
    RowMajor,
    /// First index varies fastest (Fortran order).
    ColumnMajor,
}

impl MemoryOrder {
    /// Dense strides for `dims` in this order.
    pub fn contiguous_strides<const N: usize>(self, dims: &[usize; N]) -> [isize; N] {
        let mut strides = [0isize; N];
        if N == 0 {
            return strides;
        }
        match self {
            MemoryOrder::RowMajor => {
                strides[N - 1] = 1;
                for i in (0..N - 1).rev() {
                    strides[i] = strides[i + 1] * dims[i + 1] as isize;
                }
            }
            MemoryOrder::ColumnMajor => {
                strides[0] = 1;
                for i in 1..N {
                    strides[i] = strides[i - 1] * dims[i - 1] as isize;
                }
            }
        }
        strides
    }

    /// Detect whether `layout` is densely packed in one of the two orders.
    ///
    /// Row-major is reported when both apply (e.g. a 1×1 or 1-D layout).
    pub fn of<const N: usize>(layout: &StridedLayout<N>) -> Option<MemoryOrder> {
        if layout.is_contiguous(MemoryOrder::RowMajor) {
            Some(MemoryOrder::RowMajor)
        } else if layout.is_contiguous(MemoryOrder::ColumnMajor) {
            Some(MemoryOrder::ColumnMajor)
        } else {
            None
        }
    }
}

/// Compute column-major strides (first index varies fastest).
pub fn col_major_strides(dims: &[usize]) -> Vec<isize> {
    let rank = dims.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1isize; rank];
    for i in 1..rank {
        strides[i] = strides[i - 1] * dims[i - 1] as isize;
    }
    strides
}

/// Compute row-major strides (last index varies fastest).
pub fn row_major_strides(dims: &[usize]) -> Vec<isize> {
    let rank = dims.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1isize; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * dims[i + 1] as isize;
    }
    strides
}

/// Extents and element strides of an `N`-dimensional strided view.
///
/// Strides may be negative (reversed axis), zero (broadcast axis) or larger
/// than the dense stride (sub-block). Construction never validates anything;
/// checks happen where a layout meets actual memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StridedLayout<const N: usize> {
    dims: [usize; N],
    strides: [isize; N],
}

impl<const N: usize> StridedLayout<N> {
    #[inline]
    pub const fn new(dims: [usize; N], strides: [isize; N]) -> Self {
        Self { dims, strides }
    }

    /// Densely packed layout in the given order.
    pub fn contiguous(dims: [usize; N], order: MemoryOrder) -> Self {
        let strides = order.contiguous_strides(&dims);
        Self { dims, strides }
    }

    #[inline]
    pub fn dims(&self) -> &[usize; N] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[isize; N] {
        &self.strides
    }

    #[inline]
    pub fn dim(&self, axis: usize) -> usize {
        self.dims[axis]
    }

    #[inline]
    pub fn stride(&self, axis: usize) -> isize {
        self.strides[axis]
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        N
    }

    /// Total number of logical elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.contains(&0)
    }

    /// Offset of `indices` relative to index zero, in elements.
    ///
    /// No bounds checking is performed.
    #[inline]
    pub fn element_offset(&self, indices: &[usize; N]) -> isize {
        let mut offset = 0isize;
        for i in 0..N {
            offset += indices[i] as isize * self.strides[i];
        }
        offset
    }

    /// Reorder axes so that new axis `i` is old axis `perm[i]`.
    pub fn permuted(&self, perm: [usize; N]) -> Result<Self> {
        if !is_permutation(&perm) {
            return Err(CastError::InvalidPermutation(perm.to_vec()));
        }
        let mut dims = [0usize; N];
        let mut strides = [0isize; N];
        for i in 0..N {
            dims[i] = self.dims[perm[i]];
            strides[i] = self.strides[perm[i]];
        }
        Ok(Self { dims, strides })
    }

    /// Swap two axes.
    ///
    /// # Panics
    /// Panics if either axis is `>= N`.
    pub fn transposed(&self, a: usize, b: usize) -> Self {
        assert!(a < N && b < N, "axis out of range for rank {N}");
        let mut out = *self;
        out.dims.swap(a, b);
        out.strides.swap(a, b);
        out
    }

    /// Min and max element offset reachable from index zero.
    ///
    /// For non-negative strides the min is 0; negative strides (reversed
    /// axes) pull the min below zero. Empty layouts reach nothing and
    /// report `(0, 0)`.
    ///
    /// # Errors
    /// [`CastError::OffsetOverflow`] if an offset does not fit in `isize`.
    pub fn offset_range(&self) -> Result<(isize, isize)> {
        let mut min_offset = 0isize;
        let mut max_offset = 0isize;
        if self.is_empty() {
            return Ok((min_offset, max_offset));
        }
        for (&dim, &stride) in self.dims.iter().zip(self.strides.iter()) {
            if dim <= 1 {
                continue;
            }
            let end = isize::try_from(dim - 1)
                .ok()
                .and_then(|d| stride.checked_mul(d))
                .ok_or(CastError::OffsetOverflow)?;
            let bound = if end < 0 {
                &mut min_offset
            } else {
                &mut max_offset
            };
            *bound = bound.checked_add(end).ok_or(CastError::OffsetOverflow)?;
        }
        Ok((min_offset, max_offset))
    }

    /// Check that every index reachable from `offset` lies in `[0, len)`.
    pub(crate) fn validate_bounds(&self, len: usize, offset: usize) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        let offset = isize::try_from(offset).map_err(|_| CastError::OffsetOverflow)?;
        let (lo, hi) = self.offset_range()?;
        let min = offset.checked_add(lo).ok_or(CastError::OffsetOverflow)?;
        let max = offset.checked_add(hi).ok_or(CastError::OffsetOverflow)?;
        if min < 0 || max as usize >= len {
            return Err(CastError::OutOfBounds { min, max, len });
        }
        Ok(())
    }

    /// Whether no two distinct indices reach the same element.
    ///
    /// Axes with more than one element are walked from the smallest to the
    /// largest absolute stride; each stride must step past everything the
    /// smaller axes span. Zero strides on such axes always overlap. The test
    /// is conservative: some interleaved layouts that never collide are
    /// still reported as overlapping.
    pub fn is_injective(&self) -> bool {
        if self.is_empty() {
            return true;
        }
        let mut axes = [(0usize, 0usize); N];
        let mut count = 0;
        for (&dim, &stride) in self.dims.iter().zip(self.strides.iter()) {
            if dim > 1 {
                axes[count] = (stride.unsigned_abs(), dim);
                count += 1;
            }
        }
        let axes = &mut axes[..count];
        axes.sort_unstable();
        let mut span = 0usize;
        for &(stride, dim) in axes.iter() {
            if stride <= span {
                return false;
            }
            match stride.checked_mul(dim - 1).and_then(|s| span.checked_add(s)) {
                Some(next) => span = next,
                None => return false,
            }
        }
        true
    }

    /// Whether the layout is densely packed in `order`.
    ///
    /// Size-1 axes never break contiguity, whatever their stride.
    pub fn is_contiguous(&self, order: MemoryOrder) -> bool {
        let mut expected = 1isize;
        let mut check = |i: usize| {
            if self.dims[i] <= 1 {
                return true;
            }
            if self.strides[i] != expected {
                return false;
            }
            expected *= self.dims[i] as isize;
            true
        };
        match order {
            MemoryOrder::RowMajor => (0..N).rev().all(&mut check),
            MemoryOrder::ColumnMajor => (0..N).all(&mut check),
        }
    }
}

/// Inverse of `perm`: `layout.permuted(p)?.permuted(inverse_permutation(&p))`
/// gives back `layout`.
///
/// # Panics
/// Panics if `perm` is not a permutation of `0..N`.
pub fn inverse_permutation<const N: usize>(perm: &[usize; N]) -> [usize; N] {
    assert!(is_permutation(perm), "invalid permutation {perm:?}");
    let mut inv = [0usize; N];
    for (i, &p) in perm.iter().enumerate() {
        inv[p] = i;
    }
    inv
}

pub(crate) fn is_permutation<const N: usize>(perm: &[usize; N]) -> bool {
    let mut seen = [false; N];
    for &p in perm {
        if p >= N || seen[p] {
            return false;
        }
        seen[p] = true;
    }
    true
}
