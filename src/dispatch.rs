//! Vector-versus-matrix shape dispatch.
//!
//! Foreign types whose rank is part of their type (faer's `ColRef`, ndarray's
//! `ArrayView2`, ...) pick their cast at compile time through [`StaticShape`].
//! Types whose rank is only known at run time go through [`classify`] and
//! come back as an [`AnyArrayView`].

use crate::layout::StridedLayout;
use crate::view::StridedArrayView;
use crate::{CastError, Result};

/// What the type of a foreign expression proves about its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Exactly one logical axis (a row or a column vector).
    KnownVector,
    /// Two logical axes, whatever their run-time extents.
    KnownMatrix,
    /// Rank only known at run time.
    Dynamic,
}

/// Compile-time shape knowledge of a view type.
pub trait StaticShape {
    const KIND: ShapeKind;
}

impl<T> StaticShape for StridedArrayView<'_, T, 1> {
    const KIND: ShapeKind = ShapeKind::KnownVector;
}

impl<T> StaticShape for StridedArrayView<'_, T, 2> {
    const KIND: ShapeKind = ShapeKind::KnownMatrix;
}

/// Run-time branch for dynamic-rank sources.
pub fn classify(ndim: usize) -> Result<ShapeKind> {
    match ndim {
        1 => Ok(ShapeKind::KnownVector),
        2 => Ok(ShapeKind::KnownMatrix),
        _ => Err(CastError::UnsupportedRank(ndim)),
    }
}

/// A view whose rank was decided at run time.
#[derive(Debug, Clone, Copy)]
pub enum AnyArrayView<'a, T> {
    Vector(StridedArrayView<'a, T, 1>),
    Matrix(StridedArrayView<'a, T, 2>),
}

impl<'a, T> AnyArrayView<'a, T> {
    /// Build a view over dynamic-rank memory.
    ///
    /// # Safety
    /// Same contract as [`StridedArrayView::from_raw_parts`].
    pub unsafe fn from_raw_parts(
        ptr: *const T,
        dims: &[usize],
        strides: &[isize],
    ) -> Result<Self> {
        if dims.len() != strides.len() {
            return Err(CastError::RankMismatch(dims.len(), strides.len()));
        }
        let kind = classify(dims.len()).inspect_err(|_| {
            log::debug!("rejecting dynamic-rank cast: dims {dims:?} are neither 1-D nor 2-D");
        })?;
        Ok(match kind {
            ShapeKind::KnownVector => AnyArrayView::Vector(StridedArrayView::from_raw_parts(
                ptr,
                StridedLayout::new([dims[0]], [strides[0]]),
            )),
            _ => AnyArrayView::Matrix(StridedArrayView::from_raw_parts(
                ptr,
                StridedLayout::new([dims[0], dims[1]], [strides[0], strides[1]]),
            )),
        })
    }

    pub fn ndim(&self) -> usize {
        match self {
            AnyArrayView::Vector(_) => 1,
            AnyArrayView::Matrix(_) => 2,
        }
    }

    pub fn dims(&self) -> &[usize] {
        match self {
            AnyArrayView::Vector(v) => &v.dims()[..],
            AnyArrayView::Matrix(m) => &m.dims()[..],
        }
    }

    pub fn strides(&self) -> &[isize] {
        match self {
            AnyArrayView::Vector(v) => &v.strides()[..],
            AnyArrayView::Matrix(m) => &m.strides()[..],
        }
    }

    pub fn len(&self) -> usize {
        self.dims().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vector(self) -> Option<StridedArrayView<'a, T, 1>> {
        match self {
            AnyArrayView::Vector(v) => Some(v),
            AnyArrayView::Matrix(_) => None,
        }
    }

    pub fn into_matrix(self) -> Option<StridedArrayView<'a, T, 2>> {
        match self {
            AnyArrayView::Matrix(m) => Some(m),
            AnyArrayView::Vector(_) => None,
        }
    }

    /// Matrix form of either variant; vectors become `n × 1` columns.
    pub fn to_matrix(&self) -> StridedArrayView<'a, T, 2> {
        match self {
            AnyArrayView::Vector(v) => v.as_column_matrix(),
            AnyArrayView::Matrix(m) => *m,
        }
    }
}

impl<T: Copy> AnyArrayView<'_, T> {
    /// Element at `indices`, or `None` if their count or range is wrong.
    pub fn get(&self, indices: &[usize]) -> Option<T> {
        if indices.len() != self.ndim() || indices.iter().zip(self.dims()).any(|(i, d)| i >= d) {
            return None;
        }
        Some(match self {
            AnyArrayView::Vector(v) => v.get([indices[0]]),
            AnyArrayView::Matrix(m) => m.get([indices[0], indices[1]]),
        })
    }

    /// Copy the elements out in row-major logical order.
    pub fn to_vec(&self) -> Vec<T> {
        match self {
            AnyArrayView::Vector(v) => v.to_vec(),
            AnyArrayView::Matrix(m) => m.to_vec(),
        }
    }
}
