//! Zero-copy casts between strided array views and foreign dense matrix types.
//!
//! A caller holding memory in one representation (a slice, a strided view, a
//! `faer` matrix view, an `ndarray` view) gets a non-owning view of the same
//! memory in another representation. Nothing is copied: casts only rewrite
//! the shape/stride descriptor, translating between the row-major axis
//! conventions of [`StridedArrayView`] and the conventions of the foreign
//! type.
//!
//! # Core Types
//!
//! - [`StridedLayout`]: const-generic extents plus signed element strides
//! - [`StridedArrayView`] / [`StridedArrayViewMut`]: non-owning views with
//!   zero-copy transpose, reverse, broadcast and slicing
//! - [`ForeignLayout`]: a 2-D layout in a foreign library's (rows, cols) +
//!   (outer, inner) stride convention
//! - [`AnyArrayView`]: result of a cast whose rank is only known at run time
//!
//! # Directional casts
//!
//! | From                         | To                          | Function |
//! |------------------------------|-----------------------------|----------|
//! | `StridedArrayView<T, 1>`     | `faer::col::ColRef<T>`      | [`to_faer`] |
//! | `StridedArrayView<T, 2>`     | `faer::mat::MatRef<T>`      | [`to_faer`] |
//! | `ColRef` / `RowRef` / `MatRef` | `StridedArrayView`        | [`from_faer`] |
//! | `StridedArrayView<T, 1 or 2>` | `ndarray::ArrayView1/2`    | [`to_ndarray`] |
//! | `ArrayView1/2/D`             | `StridedArrayView` / [`AnyArrayView`] | [`from_ndarray`] |
//!
//! Casts into the foreign type are only implemented for one- and
//! two-dimensional views, so asking for anything else fails to compile.
//!
//! # Safety model
//!
//! Views built from slices ([`StridedArrayView::new`]) validate once, at
//! construction, that every reachable offset is inside the slice. Views
//! built from foreign expressions carry [`DataExtent::Unbounded`]: the
//! memory size is not known and the cast trusts the foreign type's own
//! guarantees. Element access never re-checks memory bounds.
//!
//! # Example
//!
//! ```rust
//! use strided_cast::StridedArrayView;
//!
//! let data: Vec<f32> = (0..20).map(|x| x as f32).collect();
//! let view = StridedArrayView::<f32, 2>::row_major(&data, [4, 5]).unwrap();
//!
//! assert_eq!(view.row(1).to_vec(), vec![5.0, 6.0, 7.0, 8.0, 9.0]);
//! assert_eq!(view.col(2).to_vec(), vec![2.0, 7.0, 12.0, 17.0]);
//!
//! let flipped = view.reversed(0).reversed(1);
//! assert_eq!(flipped.get([0, 0]), view.get([3, 4]));
//! ```

pub mod bytes;
pub mod dispatch;
#[cfg(feature = "faer")]
pub mod faer_cast;
#[cfg(feature = "glam")]
pub mod glam_cast;
pub mod layout;
#[cfg(feature = "ndarray")]
pub mod ndarray_cast;
#[cfg(feature = "parallel")]
mod parallel;
pub mod translate;
pub mod view;

// ============================================================================
// Layouts and views
// ============================================================================
pub use layout::{
    col_major_strides, inverse_permutation, row_major_strides, MemoryOrder, StridedLayout,
};
pub use view::{
    DataExtent, Idx, SliceIndex, StridedArrayView, StridedArrayViewMut, StridedEnumerate,
    StridedIter, StridedRange,
};

// ============================================================================
// Layout translation and dispatch
// ============================================================================
pub use dispatch::{classify, AnyArrayView, ShapeKind, StaticShape};
pub use translate::{from_foreign, reversed_axes, to_foreign, ForeignLayout};

// ============================================================================
// Foreign bridges
// ============================================================================
#[cfg(feature = "faer")]
pub use faer_cast::{from_faer, to_faer, to_faer_mat, FromFaer, ToFaer};
#[cfg(feature = "ndarray")]
pub use ndarray_cast::{from_ndarray, to_ndarray, to_ndarray_owned, FromNdarray, ToNdarray};
#[cfg(feature = "parallel")]
pub use parallel::ParStridedIter;

// ============================================================================
// Error types
// ============================================================================

/// Errors reported at the checked boundaries of the conversion layer.
///
/// Element access is never checked against memory; these errors only come
/// from constructing views over slices or bytes, validating permutations,
/// run-time rank dispatch and fixed-size conversions.
#[derive(Debug, thiserror::Error)]
pub enum CastError {
    /// Array ranks do not match.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// Run-time rank is neither a vector nor a matrix.
    #[error("unsupported rank {0}: only 1-D and 2-D views can be cast")]
    UnsupportedRank(usize),

    /// Array shapes are incompatible for the operation.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Invalid axis index for the given array rank.
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    /// The axis order is not a permutation of `0..rank`.
    #[error("invalid permutation {0:?}")]
    InvalidPermutation(Vec<usize>),

    /// Broadcasting requires the broadcast axis to have exactly one element.
    #[error("cannot broadcast axis {axis} of size {dim}: size must be 1")]
    BroadcastNonUnit { axis: usize, dim: usize },

    /// The view would reach memory outside the backing slice.
    #[error("offsets {min}..={max} out of bounds for length {len}")]
    OutOfBounds { min: isize, max: isize, len: usize },

    /// A mutable view would reach one element through two indices.
    #[error("strides {strides:?} overlap for dims {dims:?}: mutable views need distinct elements")]
    OverlappingStrides {
        dims: Vec<usize>,
        strides: Vec<isize>,
    },

    /// Integer overflow while computing an element offset.
    #[error("offset overflow while computing pointer")]
    OffsetOverflow,

    /// A byte stride does not describe whole elements.
    #[error("byte stride {stride} of axis {axis} is not a multiple of element size {size}")]
    StrideNotMultiple {
        axis: usize,
        stride: isize,
        size: usize,
    },

    /// A byte offset does not land on an element boundary.
    #[error("byte offset {offset} is not a multiple of element size {size}")]
    OffsetNotMultiple { offset: usize, size: usize },

    /// Byte buffer cannot be reinterpreted as the element type.
    #[error("byte buffer is not aligned or sized for the element type: {0}")]
    Misaligned(bytemuck::PodCastError),
}

/// Result type for conversion-layer operations.
pub type Result<T> = std::result::Result<T, CastError>;
