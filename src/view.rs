//! Non-owning strided views.
//!
//! [`StridedArrayView`] and [`StridedArrayViewMut`] pair an element pointer
//! with a [`StridedLayout`]. They never own memory; every transform
//! (transpose, reverse, broadcast, slice) rewrites the descriptor and
//! returns a new view aliasing the same elements.

use std::marker::PhantomData;
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

use crate::layout::{MemoryOrder, StridedLayout};
use crate::{CastError, Result};

/// How much memory a view is known to sit in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataExtent {
    /// Built from a slice of this many elements; every reachable offset was
    /// validated against it at construction.
    Bounded(usize),
    /// Size unknown, trust the caller. Views cast from foreign expressions
    /// carry this marker and no memory bounds were ever checked for them.
    Unbounded,
}

// ============================================================================
// StridedArrayView
// ============================================================================

/// An immutable strided view over borrowed memory.
///
/// # Type Parameters
/// - `'a`: Lifetime of the underlying data
/// - `T`: Element type
/// - `N`: Number of dimensions (const generic)
///
/// Strides are in elements and may be negative or zero. Indexing follows
/// the usual row-major convention: `view.get([row, col])`.
pub struct StridedArrayView<'a, T, const N: usize> {
    ptr: *const T,
    layout: StridedLayout<N>,
    extent: DataExtent,
    _marker: PhantomData<&'a [T]>,
}

unsafe impl<T: Sync, const N: usize> Send for StridedArrayView<'_, T, N> {}
unsafe impl<T: Sync, const N: usize> Sync for StridedArrayView<'_, T, N> {}

impl<T, const N: usize> Clone for StridedArrayView<'_, T, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const N: usize> Copy for StridedArrayView<'_, T, N> {}

impl<T, const N: usize> std::fmt::Debug for StridedArrayView<'_, T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedArrayView")
            .field("dims", self.layout.dims())
            .field("strides", self.layout.strides())
            .field("extent", &self.extent)
            .finish()
    }
}

impl<'a, T, const N: usize> StridedArrayView<'a, T, N> {
    /// Create a new strided view.
    ///
    /// # Arguments
    /// - `data`: The underlying memory
    /// - `dims`: Size of each dimension
    /// - `strides`: Stride for each dimension (in elements, can be negative)
    /// - `offset`: Index into `data` of the element at index zero
    ///
    /// # Errors
    /// Returns an error if the view would access out-of-bounds memory.
    pub fn new(
        data: &'a [T],
        dims: [usize; N],
        strides: [isize; N],
        offset: usize,
    ) -> Result<Self> {
        Self::from_layout(data, StridedLayout::new(dims, strides), offset)
    }

    /// Create a view from an existing layout descriptor.
    pub fn from_layout(data: &'a [T], layout: StridedLayout<N>, offset: usize) -> Result<Self> {
        layout.validate_bounds(data.len(), offset)?;
        Ok(Self {
            ptr: data.as_ptr().wrapping_add(offset),
            layout,
            extent: DataExtent::Bounded(data.len()),
            _marker: PhantomData,
        })
    }

    /// Dense row-major view over the start of `data`.
    pub fn row_major(data: &'a [T], dims: [usize; N]) -> Result<Self> {
        Self::from_layout(data, StridedLayout::contiguous(dims, MemoryOrder::RowMajor), 0)
    }

    /// Dense column-major view over the start of `data`.
    pub fn col_major(data: &'a [T], dims: [usize; N]) -> Result<Self> {
        Self::from_layout(
            data,
            StridedLayout::contiguous(dims, MemoryOrder::ColumnMajor),
            0,
        )
    }

    /// Create a view over memory whose size is not known.
    ///
    /// The view is marked [`DataExtent::Unbounded`]: out-of-bounds checking
    /// is disabled for it and for every view derived from it.
    ///
    /// # Safety
    /// For every index within `layout.dims()`, `ptr + layout.element_offset(index)`
    /// must point to a valid, initialized `T` that stays alive and is not
    /// mutated through another path for `'a`.
    pub unsafe fn from_raw_parts(ptr: *const T, layout: StridedLayout<N>) -> Self {
        Self {
            ptr,
            layout,
            extent: DataExtent::Unbounded,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn dims(&self) -> &[usize; N] {
        self.layout.dims()
    }

    #[inline]
    pub fn strides(&self) -> &[isize; N] {
        self.layout.strides()
    }

    #[inline]
    pub fn layout(&self) -> &StridedLayout<N> {
        &self.layout
    }

    #[inline]
    pub fn extent(&self) -> DataExtent {
        self.extent
    }

    #[inline]
    pub fn dim(&self, axis: usize) -> usize {
        self.layout.dim(axis)
    }

    #[inline]
    pub fn stride(&self, axis: usize) -> isize {
        self.layout.stride(axis)
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        N
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// Raw pointer to the element at index zero.
    ///
    /// With negative strides this is not the lowest address the view reaches.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr
    }

    #[inline]
    fn with_layout(&self, ptr: *const T, layout: StridedLayout<N>) -> Self {
        Self {
            ptr,
            layout,
            extent: self.extent,
            _marker: PhantomData,
        }
    }

    /// Permute dimensions so that new axis `i` is old axis `perm[i]`.
    pub fn permuted(&self, perm: [usize; N]) -> Result<Self> {
        Ok(self.with_layout(self.ptr, self.layout.permuted(perm)?))
    }

    /// Swap two axes (zero-copy).
    ///
    /// # Panics
    /// Panics if either axis is out of range.
    pub fn transposed(&self, a: usize, b: usize) -> Self {
        self.with_layout(self.ptr, self.layout.transposed(a, b))
    }

    /// Reverse the order of elements along `axis` (zero-copy).
    ///
    /// The stride is negated and the origin moves to what was the last
    /// element along that axis.
    ///
    /// # Panics
    /// Panics if `axis` is out of range.
    pub fn reversed(&self, axis: usize) -> Self {
        let (ptr, layout) = reverse_axis(self.ptr, self.layout, axis);
        self.with_layout(ptr, layout)
    }

    /// Repeat the single element along `axis` `count` times (zero-copy).
    ///
    /// The stride of `axis` becomes zero, so every index along it maps to
    /// the same memory location.
    pub fn broadcasted(&self, axis: usize, count: usize) -> Result<Self> {
        if axis >= N {
            return Err(CastError::InvalidAxis { axis, rank: N });
        }
        let dim = self.layout.dim(axis);
        if dim != 1 {
            return Err(CastError::BroadcastNonUnit { axis, dim });
        }
        let mut dims = *self.layout.dims();
        let mut strides = *self.layout.strides();
        dims[axis] = count;
        strides[axis] = 0;
        Ok(self.with_layout(self.ptr, StridedLayout::new(dims, strides)))
    }

    /// Broadcast the view to a shape of equal or higher rank.
    ///
    /// Trailing axes of `new_dims` correspond to the view's axes; each must
    /// match or the view's extent must be 1. Leading axes are new and get
    /// stride 0.
    pub fn broadcast<const M: usize>(
        &self,
        new_dims: [usize; M],
    ) -> Result<StridedArrayView<'a, T, M>> {
        if M < N {
            return Err(CastError::RankMismatch(N, M));
        }
        let lead = M - N;
        let mut new_strides = [0isize; M];
        for i in 0..N {
            let old_dim = self.layout.dim(i);
            let new_dim = new_dims[lead + i];
            if old_dim == new_dim {
                new_strides[lead + i] = self.layout.stride(i);
            } else if old_dim != 1 {
                return Err(CastError::ShapeMismatch(
                    self.layout.dims().to_vec(),
                    new_dims.to_vec(),
                ));
            }
        }
        Ok(StridedArrayView {
            ptr: self.ptr,
            layout: StridedLayout::new(new_dims, new_strides),
            extent: self.extent,
            _marker: PhantomData,
        })
    }

    /// Split `axis` at `mid` into `[0, mid)` and `[mid, dim)`.
    ///
    /// # Panics
    /// Panics if `axis` is out of range or `mid` exceeds its extent.
    pub fn split_at(&self, axis: usize, mid: usize) -> (Self, Self) {
        assert!(axis < N, "axis {axis} out of range for rank {N}");
        let dim = self.layout.dim(axis);
        assert!(mid <= dim, "split point {mid} out of bounds for axis of size {dim}");
        let mut left_dims = *self.layout.dims();
        let mut right_dims = left_dims;
        left_dims[axis] = mid;
        right_dims[axis] = dim - mid;
        let strides = *self.layout.strides();
        let right_ptr = self
            .ptr
            .wrapping_offset(mid as isize * self.layout.stride(axis));
        (
            self.with_layout(self.ptr, StridedLayout::new(left_dims, strides)),
            self.with_layout(right_ptr, StridedLayout::new(right_dims, strides)),
        )
    }

    /// Check if the view is densely packed in row-major order.
    pub fn is_contiguous(&self) -> bool {
        self.layout.is_contiguous(MemoryOrder::RowMajor)
    }

    /// The elements as a slice, if the view is densely packed row-major.
    pub fn as_slice(&self) -> Option<&'a [T]> {
        if !self.is_contiguous() {
            return None;
        }
        if self.is_empty() {
            return Some(&[]);
        }
        // SAFETY: a dense row-major view reaches exactly `len` consecutive
        // elements starting at `ptr`.
        Some(unsafe { std::slice::from_raw_parts(self.ptr, self.len()) })
    }
}

impl<'a, T: Copy, const N: usize> StridedArrayView<'a, T, N> {
    /// Get the element at `indices`.
    ///
    /// # Panics
    /// Panics if an index is out of range for its axis.
    #[inline]
    pub fn get(&self, indices: [usize; N]) -> T {
        check_indices(&self.layout, &indices);
        unsafe { self.get_unchecked(indices) }
    }

    /// Get the element at `indices` without checking them.
    ///
    /// # Safety
    /// Every index must be within its axis extent.
    #[inline]
    pub unsafe fn get_unchecked(&self, indices: [usize; N]) -> T {
        *self.ptr.offset(self.layout.element_offset(&indices))
    }

    /// Iterate over elements in row-major logical order.
    pub fn iter(&self) -> StridedIter<'a, T, N> {
        StridedIter {
            ptr: self.ptr,
            layout: self.layout,
            indices: [0; N],
            remaining: self.len(),
            _marker: PhantomData,
        }
    }

    /// Iterate over `(indices, value)` pairs in row-major logical order.
    pub fn enumerate(&self) -> StridedEnumerate<'a, T, N> {
        StridedEnumerate { inner: self.iter() }
    }

    /// Copy the elements out in row-major logical order.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

// 1D-specific operations
impl<'a, T> StridedArrayView<'a, T, 1> {
    /// Slice the view along its single dimension.
    pub fn slice<I: SliceIndex>(&self, index: I) -> StridedArrayView<'a, T, 1> {
        let (origin, len, stride) = slice_axis(self.layout.dim(0), self.layout.stride(0), &index);
        self.with_layout(
            self.ptr.wrapping_offset(origin),
            StridedLayout::new([len], [stride]),
        )
    }

    /// View the sequence as an `n × 1` matrix, ready for
    /// [`broadcasted(1, count)`](Self::broadcasted).
    pub fn as_column_matrix(&self) -> StridedArrayView<'a, T, 2> {
        StridedArrayView {
            ptr: self.ptr,
            layout: StridedLayout::new([self.layout.dim(0), 1], [self.layout.stride(0), 0]),
            extent: self.extent,
            _marker: PhantomData,
        }
    }
}

// 2D-specific operations
impl<'a, T> StridedArrayView<'a, T, 2> {
    /// Transpose a 2D view (swap dimensions).
    #[inline]
    pub fn t(&self) -> Self {
        self.transposed(0, 1)
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.layout.dim(0)
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.layout.dim(1)
    }

    /// Slice the view along both dimensions.
    pub fn slice<I0: SliceIndex, I1: SliceIndex>(&self, idx0: I0, idx1: I1) -> Self {
        let (o0, len0, s0) = slice_axis(self.layout.dim(0), self.layout.stride(0), &idx0);
        let (o1, len1, s1) = slice_axis(self.layout.dim(1), self.layout.stride(1), &idx1);
        self.with_layout(
            self.ptr.wrapping_offset(o0).wrapping_offset(o1),
            StridedLayout::new([len0, len1], [s0, s1]),
        )
    }

    /// Sub-block starting at `(row_start, col_start)` with the given extents.
    pub fn block(&self, row_start: usize, col_start: usize, nrows: usize, ncols: usize) -> Self {
        self.slice(row_start..row_start + nrows, col_start..col_start + ncols)
    }

    /// Select a single row.
    ///
    /// # Panics
    /// Panics if `row` is out of range.
    pub fn row(&self, row: usize) -> StridedArrayView<'a, T, 1> {
        assert!(row < self.nrows(), "row index out of bounds");
        StridedArrayView {
            ptr: self
                .ptr
                .wrapping_offset(row as isize * self.layout.stride(0)),
            layout: StridedLayout::new([self.ncols()], [self.layout.stride(1)]),
            extent: self.extent,
            _marker: PhantomData,
        }
    }

    /// Select a single column.
    ///
    /// # Panics
    /// Panics if `col` is out of range.
    pub fn col(&self, col: usize) -> StridedArrayView<'a, T, 1> {
        assert!(col < self.ncols(), "column index out of bounds");
        StridedArrayView {
            ptr: self
                .ptr
                .wrapping_offset(col as isize * self.layout.stride(1)),
            layout: StridedLayout::new([self.nrows()], [self.layout.stride(0)]),
            extent: self.extent,
            _marker: PhantomData,
        }
    }
}

// Slicing for 3D views
impl<T> StridedArrayView<'_, T, 3> {
    /// Slice the view along all three dimensions.
    pub fn slice<I0: SliceIndex, I1: SliceIndex, I2: SliceIndex>(
        &self,
        idx0: I0,
        idx1: I1,
        idx2: I2,
    ) -> Self {
        let (o0, len0, s0) = slice_axis(self.layout.dim(0), self.layout.stride(0), &idx0);
        let (o1, len1, s1) = slice_axis(self.layout.dim(1), self.layout.stride(1), &idx1);
        let (o2, len2, s2) = slice_axis(self.layout.dim(2), self.layout.stride(2), &idx2);
        self.with_layout(
            self.ptr
                .wrapping_offset(o0)
                .wrapping_offset(o1)
                .wrapping_offset(o2),
            StridedLayout::new([len0, len1, len2], [s0, s1, s2]),
        )
    }
}

// ============================================================================
// StridedArrayViewMut
// ============================================================================

/// A mutable strided view over borrowed memory.
///
/// Same as [`StridedArrayView`] but allows mutation. Transforms consume the
/// view so two mutable aliases never coexist; use [`reborrow`](Self::reborrow)
/// to keep the original.
pub struct StridedArrayViewMut<'a, T, const N: usize> {
    ptr: *mut T,
    layout: StridedLayout<N>,
    extent: DataExtent,
    _marker: PhantomData<&'a mut [T]>,
}

unsafe impl<T: Send, const N: usize> Send for StridedArrayViewMut<'_, T, N> {}
unsafe impl<T: Sync, const N: usize> Sync for StridedArrayViewMut<'_, T, N> {}

impl<T, const N: usize> std::fmt::Debug for StridedArrayViewMut<'_, T, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedArrayViewMut")
            .field("dims", self.layout.dims())
            .field("strides", self.layout.strides())
            .field("extent", &self.extent)
            .finish()
    }
}

impl<'a, T, const N: usize> StridedArrayViewMut<'a, T, N> {
    /// Create a new mutable strided view.
    pub fn new(
        data: &'a mut [T],
        dims: [usize; N],
        strides: [isize; N],
        offset: usize,
    ) -> Result<Self> {
        Self::from_layout(data, StridedLayout::new(dims, strides), offset)
    }

    /// Create a mutable view from an existing layout descriptor.
    ///
    /// # Errors
    /// Besides the bounds check of [`StridedArrayView::from_layout`], the
    /// layout must not reach one element through two indices: zero strides
    /// and overlapping axes give [`CastError::OverlappingStrides`].
    pub fn from_layout(
        data: &'a mut [T],
        layout: StridedLayout<N>,
        offset: usize,
    ) -> Result<Self> {
        layout.validate_bounds(data.len(), offset)?;
        if !layout.is_injective() {
            return Err(CastError::OverlappingStrides {
                dims: layout.dims().to_vec(),
                strides: layout.strides().to_vec(),
            });
        }
        Ok(Self {
            ptr: data.as_mut_ptr().wrapping_add(offset),
            layout,
            extent: DataExtent::Bounded(data.len()),
            _marker: PhantomData,
        })
    }

    /// Dense row-major mutable view over the start of `data`.
    pub fn row_major(data: &'a mut [T], dims: [usize; N]) -> Result<Self> {
        Self::from_layout(data, StridedLayout::contiguous(dims, MemoryOrder::RowMajor), 0)
    }

    /// Create a mutable view over memory whose size is not known.
    ///
    /// # Safety
    /// Same contract as [`StridedArrayView::from_raw_parts`]. In addition
    /// nothing else may read or write the reachable elements for `'a`, and
    /// no element may be reachable through two different indices.
    pub unsafe fn from_raw_parts(ptr: *mut T, layout: StridedLayout<N>) -> Self {
        Self {
            ptr,
            layout,
            extent: DataExtent::Unbounded,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn dims(&self) -> &[usize; N] {
        self.layout.dims()
    }

    #[inline]
    pub fn strides(&self) -> &[isize; N] {
        self.layout.strides()
    }

    #[inline]
    pub fn layout(&self) -> &StridedLayout<N> {
        &self.layout
    }

    #[inline]
    pub fn extent(&self) -> DataExtent {
        self.extent
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr as *const T
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr
    }

    /// Reborrow as an immutable view.
    pub fn as_view(&self) -> StridedArrayView<'_, T, N> {
        StridedArrayView {
            ptr: self.ptr as *const T,
            layout: self.layout,
            extent: self.extent,
            _marker: PhantomData,
        }
    }

    /// Reborrow as a shorter-lived mutable view.
    pub fn reborrow(&mut self) -> StridedArrayViewMut<'_, T, N> {
        StridedArrayViewMut {
            ptr: self.ptr,
            layout: self.layout,
            extent: self.extent,
            _marker: PhantomData,
        }
    }

    fn with_layout(self, ptr: *mut T, layout: StridedLayout<N>) -> Self {
        Self {
            ptr,
            layout,
            extent: self.extent,
            _marker: PhantomData,
        }
    }

    /// Permute dimensions, consuming the mutable view.
    pub fn permuted(self, perm: [usize; N]) -> Result<Self> {
        let layout = self.layout.permuted(perm)?;
        let ptr = self.ptr;
        Ok(self.with_layout(ptr, layout))
    }

    /// Swap two axes, consuming the mutable view.
    pub fn transposed(self, a: usize, b: usize) -> Self {
        let layout = self.layout.transposed(a, b);
        let ptr = self.ptr;
        self.with_layout(ptr, layout)
    }

    /// Reverse `axis`, consuming the mutable view.
    pub fn reversed(self, axis: usize) -> Self {
        let (ptr, layout) = reverse_axis(self.ptr as *const T, self.layout, axis);
        self.with_layout(ptr as *mut T, layout)
    }
}

impl<T: Copy, const N: usize> StridedArrayViewMut<'_, T, N> {
    /// Get the element at `indices`.
    #[inline]
    pub fn get(&self, indices: [usize; N]) -> T {
        check_indices(&self.layout, &indices);
        unsafe { *self.ptr.offset(self.layout.element_offset(&indices)) }
    }
}

impl<T, const N: usize> StridedArrayViewMut<'_, T, N> {
    /// Set the element at `indices`.
    ///
    /// # Panics
    /// Panics if an index is out of range for its axis.
    #[inline]
    pub fn set(&mut self, indices: [usize; N], value: T) {
        *self.get_mut(indices) = value;
    }

    /// Set an element without checking the indices.
    ///
    /// # Safety
    /// Every index must be within its axis extent.
    #[inline]
    pub unsafe fn set_unchecked(&mut self, indices: [usize; N], value: T) {
        *self.ptr.offset(self.layout.element_offset(&indices)) = value;
    }

    /// Get a mutable reference to the element at `indices`.
    #[inline]
    pub fn get_mut(&mut self, indices: [usize; N]) -> &mut T {
        check_indices(&self.layout, &indices);
        unsafe { &mut *self.ptr.offset(self.layout.element_offset(&indices)) }
    }
}

impl<'a, T> StridedArrayViewMut<'a, T, 2> {
    #[inline]
    pub fn t(self) -> Self {
        self.transposed(0, 1)
    }

    /// Select a single row, consuming the view.
    pub fn row_mut(self, row: usize) -> StridedArrayViewMut<'a, T, 1> {
        let [nrows, ncols] = *self.layout.dims();
        assert!(row < nrows, "row index out of bounds");
        let [s0, s1] = *self.layout.strides();
        StridedArrayViewMut {
            ptr: self.ptr.wrapping_offset(row as isize * s0),
            layout: StridedLayout::new([ncols], [s1]),
            extent: self.extent,
            _marker: PhantomData,
        }
    }

    /// Select a single column, consuming the view.
    pub fn col_mut(self, col: usize) -> StridedArrayViewMut<'a, T, 1> {
        let [nrows, ncols] = *self.layout.dims();
        assert!(col < ncols, "column index out of bounds");
        let [s0, s1] = *self.layout.strides();
        StridedArrayViewMut {
            ptr: self.ptr.wrapping_offset(col as isize * s1),
            layout: StridedLayout::new([nrows], [s0]),
            extent: self.extent,
            _marker: PhantomData,
        }
    }
}

// ============================================================================
// Slicing support
// ============================================================================

/// Trait for types that can be used as slice indices.
pub trait SliceIndex {
    /// Convert to a range given the dimension size.
    fn to_range(&self, dim_size: usize) -> Range<usize>;

    /// The step size (1 for regular ranges).
    fn step(&self) -> isize {
        1
    }
}

impl SliceIndex for RangeFull {
    fn to_range(&self, dim_size: usize) -> Range<usize> {
        0..dim_size
    }
}

impl SliceIndex for Range<usize> {
    fn to_range(&self, _dim_size: usize) -> Range<usize> {
        self.clone()
    }
}

impl SliceIndex for RangeFrom<usize> {
    fn to_range(&self, dim_size: usize) -> Range<usize> {
        self.start..dim_size
    }
}

impl SliceIndex for RangeTo<usize> {
    fn to_range(&self, _dim_size: usize) -> Range<usize> {
        0..self.end
    }
}

impl SliceIndex for RangeInclusive<usize> {
    fn to_range(&self, _dim_size: usize) -> Range<usize> {
        *self.start()..(*self.end() + 1)
    }
}

impl SliceIndex for RangeToInclusive<usize> {
    fn to_range(&self, _dim_size: usize) -> Range<usize> {
        0..(self.end + 1)
    }
}

/// A single index; the axis is kept with extent 1.
#[derive(Debug, Clone, Copy)]
pub struct Idx(pub usize);

impl SliceIndex for Idx {
    fn to_range(&self, _dim_size: usize) -> Range<usize> {
        self.0..(self.0 + 1)
    }
}

/// A strided range (`start`, `start + step`, ... up to but excluding `end`).
///
/// A negative step walks down from `start` to `end`.
#[derive(Debug, Clone, Copy)]
pub struct StridedRange {
    pub start: usize,
    pub end: usize,
    pub step: isize,
}

impl StridedRange {
    pub fn new(start: usize, end: usize, step: isize) -> Self {
        Self { start, end, step }
    }
}

impl SliceIndex for StridedRange {
    fn to_range(&self, _dim_size: usize) -> Range<usize> {
        self.start..self.end
    }

    fn step(&self) -> isize {
        self.step
    }
}

fn compute_slice_len(start: usize, end: usize, step: isize) -> usize {
    if step > 0 {
        end.saturating_sub(start).div_ceil(step as usize)
    } else {
        start.saturating_sub(end).div_ceil(step.unsigned_abs())
    }
}

/// Returns (origin offset, new extent, new stride) for slicing one axis.
fn slice_axis<I: SliceIndex>(dim: usize, stride: isize, index: &I) -> (isize, usize, isize) {
    let range = index.to_range(dim);
    let step = index.step();
    assert!(step != 0, "slice step must be non-zero");
    let len = compute_slice_len(range.start, range.end, step);
    if len > 0 {
        let last = range.start as isize + (len as isize - 1) * step;
        assert!(
            range.start < dim && last >= 0 && (last as usize) < dim,
            "slice {}..{} (step {}) out of bounds for axis of size {}",
            range.start,
            range.end,
            step,
            dim
        );
    }
    (range.start as isize * stride, len, stride * step)
}

// ============================================================================
// Helper functions
// ============================================================================

fn reverse_axis<T, const N: usize>(
    ptr: *const T,
    layout: StridedLayout<N>,
    axis: usize,
) -> (*const T, StridedLayout<N>) {
    assert!(axis < N, "axis {axis} out of range for rank {N}");
    let dim = layout.dim(axis);
    let stride = layout.stride(axis);
    let origin = if dim == 0 {
        ptr
    } else {
        ptr.wrapping_offset((dim as isize - 1) * stride)
    };
    let mut strides = *layout.strides();
    strides[axis] = -stride;
    (origin, StridedLayout::new(*layout.dims(), strides))
}

#[inline]
fn check_indices<const N: usize>(layout: &StridedLayout<N>, indices: &[usize; N]) {
    for i in 0..N {
        assert!(
            indices[i] < layout.dim(i),
            "index {} out of bounds for axis {} of size {}",
            indices[i],
            i,
            layout.dim(i)
        );
    }
}

// ============================================================================
// Iterator support
// ============================================================================

/// Iterator over elements of a [`StridedArrayView`] in row-major order.
pub struct StridedIter<'a, T, const N: usize> {
    ptr: *const T,
    layout: StridedLayout<N>,
    indices: [usize; N],
    remaining: usize,
    _marker: PhantomData<&'a [T]>,
}

impl<T: Copy, const N: usize> Iterator for StridedIter<'_, T, N> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: `indices` is within `dims` while `remaining > 0`, and the
        // view this iterator came from guarantees those offsets are valid.
        let value = unsafe { *self.ptr.offset(self.layout.element_offset(&self.indices)) };
        self.remaining -= 1;

        // Advance indices (row-major order: last index changes fastest)
        for i in (0..N).rev() {
            self.indices[i] += 1;
            if self.indices[i] < self.layout.dim(i) {
                break;
            }
            self.indices[i] = 0;
        }
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Copy, const N: usize> ExactSizeIterator for StridedIter<'_, T, N> {}

/// Iterator that yields `(indices, value)` pairs.
pub struct StridedEnumerate<'a, T, const N: usize> {
    inner: StridedIter<'a, T, N>,
}

impl<T: Copy, const N: usize> Iterator for StridedEnumerate<'_, T, N> {
    type Item = ([usize; N], T);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let indices = self.inner.indices;
        let value = self.inner.next()?;
        Some((indices, value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T: Copy, const N: usize> ExactSizeIterator for StridedEnumerate<'_, T, N> {}
