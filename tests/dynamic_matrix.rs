#![cfg(feature = "faer")]

use approx::assert_relative_eq;
use faer::Mat;
use rand::{rngs::StdRng, Rng, SeedableRng};
use strided_cast::{from_faer, to_faer, DataExtent, StridedArrayView};

fn random_data(len: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

fn sequence(len: usize) -> Vec<f32> {
    (0..len).map(|x| x as f32).collect()
}

#[test]
fn test_block() {
    let data = random_data(20, 7);
    let view = StridedArrayView::<f32, 2>::row_major(&data, [4, 5]).unwrap();
    let m = to_faer(view);

    // Row, column and block of the faer matrix view the same memory as the
    // equivalent native slices
    let row = from_faer(m.row(1));
    assert_eq!(row.to_vec(), view.row(1).to_vec());
    assert_eq!(row.as_ptr(), view.row(1).as_ptr());

    let col = from_faer(m.col(2));
    assert_eq!(col.to_vec(), view.col(2).to_vec());

    let block = from_faer(m.submatrix(1, 1, 2, 3));
    assert_eq!(block.dims(), &[2, 3]);
    assert_eq!(block.layout(), view.block(1, 1, 2, 3).layout());
    assert_eq!(block.to_vec(), view.block(1, 1, 2, 3).to_vec());

    let native_block = to_faer(view.block(1, 1, 2, 3));
    for i in 0..2 {
        for j in 0..3 {
            assert_relative_eq!(native_block[(i, j)], m[(1 + i, 1 + j)]);
        }
    }
}

#[test]
fn test_transpose() {
    let data = sequence(20);
    let view = StridedArrayView::<f32, 2>::row_major(&data, [4, 5]).unwrap();
    let transposed = view.transposed(0, 1);

    let mapped = to_faer(transposed);
    assert_eq!((mapped.nrows(), mapped.ncols()), (5, 4));
    for i in 0..5 {
        for j in 0..4 {
            assert_eq!(mapped[(i, j)], view.get([j, i]));
        }
    }

    let back = from_faer(mapped);
    assert_eq!(back.extent(), DataExtent::Unbounded);
    assert_eq!(back.transposed(0, 1).to_vec(), view.to_vec());
}

#[test]
fn test_reverse() {
    let m = Mat::from_fn(4, 5, |i, j| (5 * i + j) as f64);

    let rows_reversed = from_faer(m.as_ref().reverse_rows());
    let cols_reversed = from_faer(m.as_ref().reverse_cols());
    let both_reversed = from_faer(m.as_ref().reverse_rows_and_cols());

    assert_eq!(rows_reversed.get([0, 0]), m[(3, 0)]);
    assert_eq!(cols_reversed.get([0, 0]), m[(0, 4)]);
    assert_eq!(both_reversed.get([0, 0]), m[(3, 4)]);
    assert!(rows_reversed.strides()[0] < 0);
    assert!(cols_reversed.strides()[1] < 0);

    // First column and row, read back through the reversal
    assert_eq!(rows_reversed.col(0).to_vec(), vec![15.0, 10.0, 5.0, 0.0]);
    assert_eq!(cols_reversed.row(0).to_vec(), vec![4.0, 3.0, 2.0, 1.0, 0.0]);

    // Flipping back natively gives the original matrix
    let restored = to_faer(both_reversed.reversed(0).reversed(1));
    for i in 0..4 {
        for j in 0..5 {
            assert_eq!(restored[(i, j)], m[(i, j)]);
        }
    }
}

#[test]
fn test_broadcasted() {
    let data = sequence(5);
    let view = StridedArrayView::<f32, 1>::row_major(&data, [5]).unwrap();
    let wide = view.as_column_matrix().broadcasted(1, 10).unwrap();

    let mapped = to_faer(wide);
    assert_eq!((mapped.nrows(), mapped.ncols()), (5, 10));
    assert_eq!(mapped.col_stride(), 0);
    for i in 0..5 {
        for j in 0..10 {
            assert_eq!(mapped[(i, j)], view.get([i]));
        }
    }

    let back = from_faer(mapped);
    assert_eq!(back.strides(), &[1, 0]);
    assert_eq!(back.col(9).to_vec(), data);
}
