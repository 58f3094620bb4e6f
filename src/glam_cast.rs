//! Fixed-size conversions for `glam` vectors, matrices, quaternions and
//! affine transforms.
//!
//! glam matrices store their columns contiguously, so a matrix is viewed as
//! `(rows, cols)` with strides `(1, rows)`. Going the other way is an
//! explicit, named [`cast`]: glam types have no constructor taking an
//! arbitrary strided view, and `From` impls would hide where the shape check
//! happens.
//!
//! Every scalar flavour is covered: `f32` (`Mat3`, `Vec3`, `Quat`), `f64`
//! (`DMat3`, `DVec3`, `DQuat`), and the integer vectors `IVec*`/`UVec*`.

use glam::{
    Affine2, Affine3, Affine3A, DAffine2, DAffine3, DMat2, DMat3, DMat4, DQuat, DVec2, DVec3,
    DVec4, IVec2, IVec3, IVec4, Mat2, Mat3, Mat4, Quat, UVec2, UVec3, UVec4, Vec2, Vec3, Vec4,
};

use crate::view::StridedArrayView;
use crate::{CastError, Result};

/// A glam matrix with column-major storage.
pub trait GlamMatrix {
    type Scalar: Copy;
    const ROWS: usize;
    const COLS: usize;

    fn as_column_slice(&self) -> &[Self::Scalar];
}

/// A glam vector with contiguous storage.
pub trait GlamVector {
    type Scalar: Copy;
    const LEN: usize;

    fn as_slice(&self) -> &[Self::Scalar];
}

/// A glam quaternion, exchanged with the scalar part first.
pub trait GlamQuat: Sized {
    type Scalar: Copy;

    fn to_wxyz(&self) -> [Self::Scalar; 4];
    fn from_wxyz(wxyz: [Self::Scalar; 4]) -> Self;
}

/// A glam affine transform, seen as its compact `ROWS x (ROWS + 1)` matrix:
/// the linear part followed by the translation column.
///
/// SIMD-backed transforms pad their columns, so the compact matrix is always
/// a copy; see [`CompactAffine`].
pub trait GlamAffine: Sized {
    type Scalar: Copy;
    type Columns: AsRef<[Self::Scalar]>;
    const ROWS: usize;
    const COLS: usize;

    fn to_columns(&self) -> Self::Columns;
}

/// Conversion from a strided view into a fixed-size value.
pub trait FromStridedView<V>: Sized {
    fn from_strided_view(view: V) -> Result<Self>;
}

/// Zero-copy view of a glam matrix, indexed `[row, col]`.
pub fn matrix_view<M: GlamMatrix>(matrix: &M) -> StridedArrayView<'_, M::Scalar, 2> {
    StridedArrayView::col_major(matrix.as_column_slice(), [M::ROWS, M::COLS])
        .expect("glam matrix storage holds rows * cols elements")
}

/// Zero-copy view of a glam vector.
pub fn vector_view<V: GlamVector>(vector: &V) -> StridedArrayView<'_, V::Scalar, 1> {
    StridedArrayView::row_major(vector.as_slice(), [V::LEN])
        .expect("glam vector storage holds len elements")
}

/// Column-major copy of an affine transform's compact matrix.
///
/// ```
/// use strided_cast::glam_cast::CompactAffine;
///
/// let affine = glam::Affine2::from_translation(glam::Vec2::new(5.0, 6.0));
/// let compact = CompactAffine::new(&affine);
/// let view = compact.view();
/// assert_eq!(view.dims(), &[2, 3]);
/// assert_eq!(view.col(2).to_vec(), vec![5.0, 6.0]);
/// ```
pub struct CompactAffine<A: GlamAffine> {
    columns: A::Columns,
}

impl<A: GlamAffine> CompactAffine<A> {
    pub fn new(affine: &A) -> Self {
        Self {
            columns: affine.to_columns(),
        }
    }

    /// The compact matrix, indexed `[row, col]`.
    pub fn view(&self) -> StridedArrayView<'_, A::Scalar, 2> {
        StridedArrayView::col_major(self.columns.as_ref(), [A::ROWS, A::COLS])
            .expect("compact affine storage holds rows * (rows + 1) elements")
    }
}

/// Copy a strided view into a fixed-size glam value.
///
/// ```
/// # use strided_cast::StridedArrayView;
/// use strided_cast::glam_cast::cast;
///
/// let data: Vec<f32> = (0..9).map(|x| x as f32).collect();
/// let view = StridedArrayView::<f32, 2>::row_major(&data, [3, 3]).unwrap();
/// let m: glam::Mat3 = cast(&view).unwrap();
/// assert_eq!(m.row(1), glam::Vec3::new(3.0, 4.0, 5.0));
/// ```
pub fn cast<To, V>(view: V) -> Result<To>
where
    To: FromStridedView<V>,
{
    To::from_strided_view(view)
}

/// Quaternion components with the scalar part first.
pub fn quat_to_wxyz<Q: GlamQuat>(q: Q) -> [Q::Scalar; 4] {
    q.to_wxyz()
}

/// Quaternion from components with the scalar part first.
pub fn quat_from_wxyz<Q: GlamQuat>(wxyz: [Q::Scalar; 4]) -> Q {
    Q::from_wxyz(wxyz)
}

fn check_dims<const N: usize>(actual: &[usize; N], expected: [usize; N]) -> Result<()> {
    if *actual != expected {
        log::debug!("rejecting fixed-size cast: view is {actual:?}, target is {expected:?}");
        return Err(CastError::ShapeMismatch(actual.to_vec(), expected.to_vec()));
    }
    Ok(())
}

/// Read a `rows x cols` view into a column-major array.
fn read_columns<T: Copy, const K: usize>(
    view: &StridedArrayView<'_, T, 2>,
    rows: usize,
    cols: usize,
    zero: T,
) -> Result<[T; K]> {
    check_dims(view.dims(), [rows, cols])?;
    let mut out = [zero; K];
    for j in 0..cols {
        for i in 0..rows {
            out[j * rows + i] = view.get([i, j]);
        }
    }
    Ok(out)
}

macro_rules! impl_glam_matrix {
    ($ty:ty, $scalar:ty, $n:literal) => {
        impl GlamMatrix for $ty {
            type Scalar = $scalar;
            const ROWS: usize = $n;
            const COLS: usize = $n;

            fn as_column_slice(&self) -> &[$scalar] {
                AsRef::<[$scalar; $n * $n]>::as_ref(self)
            }
        }

        impl FromStridedView<&StridedArrayView<'_, $scalar, 2>> for $ty {
            fn from_strided_view(view: &StridedArrayView<'_, $scalar, 2>) -> Result<Self> {
                let cols = read_columns::<$scalar, { $n * $n }>(view, $n, $n, 0 as $scalar)?;
                Ok(<$ty>::from_cols_array(&cols))
            }
        }
    };
}

macro_rules! impl_glam_vector {
    ($ty:ty, $scalar:ty, $n:literal) => {
        impl GlamVector for $ty {
            type Scalar = $scalar;
            const LEN: usize = $n;

            fn as_slice(&self) -> &[$scalar] {
                AsRef::<[$scalar; $n]>::as_ref(self)
            }
        }

        impl FromStridedView<&StridedArrayView<'_, $scalar, 1>> for $ty {
            fn from_strided_view(view: &StridedArrayView<'_, $scalar, 1>) -> Result<Self> {
                check_dims(view.dims(), [$n])?;
                let mut values = [0 as $scalar; $n];
                for (i, value) in values.iter_mut().enumerate() {
                    *value = view.get([i]);
                }
                Ok(<$ty>::from_array(values))
            }
        }
    };
}

macro_rules! impl_glam_quat {
    ($ty:ty, $scalar:ty) => {
        impl GlamQuat for $ty {
            type Scalar = $scalar;

            fn to_wxyz(&self) -> [$scalar; 4] {
                [self.w, self.x, self.y, self.z]
            }

            fn from_wxyz([w, x, y, z]: [$scalar; 4]) -> Self {
                <$ty>::from_xyzw(x, y, z, w)
            }
        }

        /// Reads the four components in `w, x, y, z` order.
        impl FromStridedView<&StridedArrayView<'_, $scalar, 1>> for $ty {
            fn from_strided_view(view: &StridedArrayView<'_, $scalar, 1>) -> Result<Self> {
                check_dims(view.dims(), [4])?;
                Ok(Self::from_wxyz([
                    view.get([0]),
                    view.get([1]),
                    view.get([2]),
                    view.get([3]),
                ]))
            }
        }
    };
}

macro_rules! impl_glam_affine {
    ($ty:ty, $scalar:ty, $rows:literal) => {
        impl GlamAffine for $ty {
            type Scalar = $scalar;
            type Columns = [$scalar; $rows * ($rows + 1)];
            const ROWS: usize = $rows;
            const COLS: usize = $rows + 1;

            fn to_columns(&self) -> Self::Columns {
                self.to_cols_array()
            }
        }

        impl FromStridedView<&StridedArrayView<'_, $scalar, 2>> for $ty {
            fn from_strided_view(view: &StridedArrayView<'_, $scalar, 2>) -> Result<Self> {
                let cols = read_columns::<$scalar, { $rows * ($rows + 1) }>(
                    view,
                    $rows,
                    $rows + 1,
                    0.0,
                )?;
                Ok(<$ty>::from_cols_array(&cols))
            }
        }
    };
}

impl_glam_matrix!(Mat2, f32, 2);
impl_glam_matrix!(Mat3, f32, 3);
impl_glam_matrix!(Mat4, f32, 4);
impl_glam_matrix!(DMat2, f64, 2);
impl_glam_matrix!(DMat3, f64, 3);
impl_glam_matrix!(DMat4, f64, 4);

impl_glam_vector!(Vec2, f32, 2);
impl_glam_vector!(Vec3, f32, 3);
impl_glam_vector!(Vec4, f32, 4);
impl_glam_vector!(DVec2, f64, 2);
impl_glam_vector!(DVec3, f64, 3);
impl_glam_vector!(DVec4, f64, 4);
impl_glam_vector!(IVec2, i32, 2);
impl_glam_vector!(IVec3, i32, 3);
impl_glam_vector!(IVec4, i32, 4);
impl_glam_vector!(UVec2, u32, 2);
impl_glam_vector!(UVec3, u32, 3);
impl_glam_vector!(UVec4, u32, 4);

impl_glam_quat!(Quat, f32);
impl_glam_quat!(DQuat, f64);

impl_glam_affine!(Affine2, f32, 2);
impl_glam_affine!(Affine3, f32, 3);
impl_glam_affine!(Affine3A, f32, 3);
impl_glam_affine!(DAffine2, f64, 2);
impl_glam_affine!(DAffine3, f64, 3);
