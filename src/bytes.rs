//! Byte-strided boundary.
//!
//! Vertex buffers and image rows describe their layout in bytes, while every
//! view in this crate counts strides in elements. The conversion happens
//! here, once, and is checked: a byte stride that does not describe whole
//! elements is rejected instead of silently reading torn values.

use std::mem::size_of;

use bytemuck::Pod;

use crate::layout::StridedLayout;
use crate::view::{StridedArrayView, StridedArrayViewMut};
use crate::{CastError, Result};

impl<const N: usize> StridedLayout<N> {
    /// Strides in bytes for elements of type `T`.
    pub fn byte_strides<T>(&self) -> [isize; N] {
        let size = size_of::<T>() as isize;
        self.strides().map(|s| s * size)
    }

    /// Element layout from byte strides.
    ///
    /// Strides of axes with at most one element are never used and are not
    /// checked.
    ///
    /// # Panics
    /// Panics if `T` is zero-sized.
    pub fn from_byte_strides<T>(dims: [usize; N], byte_strides: [isize; N]) -> Result<Self> {
        let size = size_of::<T>();
        assert!(size > 0, "zero-sized element types have no byte layout");
        let mut strides = [0isize; N];
        for axis in 0..N {
            let stride = byte_strides[axis];
            if dims[axis] > 1 && stride % size as isize != 0 {
                return Err(CastError::StrideNotMultiple { axis, stride, size });
            }
            strides[axis] = stride / size as isize;
        }
        Ok(Self::new(dims, strides))
    }
}

/// Element layout and element offset of a byte-described view.
fn element_layout<T, const N: usize>(
    dims: [usize; N],
    byte_strides: [isize; N],
    byte_offset: usize,
) -> Result<(StridedLayout<N>, usize)> {
    let layout = StridedLayout::from_byte_strides::<T>(dims, byte_strides)?;
    let size = size_of::<T>();
    if byte_offset % size != 0 {
        return Err(CastError::OffsetNotMultiple {
            offset: byte_offset,
            size,
        });
    }
    Ok((layout, byte_offset / size))
}

fn whole_elements<T>(len: usize) -> usize {
    len - len % size_of::<T>()
}

impl<'a, T: Pod, const N: usize> StridedArrayView<'a, T, N> {
    /// View a byte buffer as strided elements of type `T`.
    ///
    /// `byte_offset` locates the element at index zero. Trailing bytes that
    /// do not form a whole element are ignored.
    ///
    /// # Errors
    /// Fails if a stride or the offset does not fall on element boundaries,
    /// if `bytes` is not aligned for `T`, or if the view would reach past the
    /// end of the buffer.
    pub fn from_bytes(
        bytes: &'a [u8],
        dims: [usize; N],
        byte_strides: [isize; N],
        byte_offset: usize,
    ) -> Result<Self> {
        let len = bytes.len();
        element_layout::<T, N>(dims, byte_strides, byte_offset)
            .and_then(|(layout, offset)| {
                let elements: &'a [T] =
                    bytemuck::try_cast_slice(&bytes[..whole_elements::<T>(len)])
                        .map_err(CastError::Misaligned)?;
                Self::from_layout(elements, layout, offset)
            })
            .inspect_err(|e| log_rejection::<T>(len, e))
    }
}

impl<'a, T: Pod, const N: usize> StridedArrayViewMut<'a, T, N> {
    /// Mutable counterpart of [`StridedArrayView::from_bytes`].
    pub fn from_bytes_mut(
        bytes: &'a mut [u8],
        dims: [usize; N],
        byte_strides: [isize; N],
        byte_offset: usize,
    ) -> Result<Self> {
        let len = bytes.len();
        let (layout, offset) = element_layout::<T, N>(dims, byte_strides, byte_offset)
            .inspect_err(|e| log_rejection::<T>(len, e))?;
        let elements: &'a mut [T] =
            bytemuck::try_cast_slice_mut(&mut bytes[..whole_elements::<T>(len)])
                .map_err(CastError::Misaligned)
                .inspect_err(|e| log_rejection::<T>(len, e))?;
        Self::from_layout(elements, layout, offset).inspect_err(|e| log_rejection::<T>(len, e))
    }
}

fn log_rejection<T>(len: usize, err: &CastError) {
    log::debug!(
        "rejecting byte view of {len} bytes as {}: {err}",
        std::any::type_name::<T>()
    );
}

impl<T, const N: usize> StridedArrayView<'_, T, N> {
    /// The view's layout with strides expressed in bytes.
    pub fn as_bytes_layout(&self) -> StridedLayout<N> {
        StridedLayout::new(*self.dims(), self.layout().byte_strides::<T>())
    }
}
