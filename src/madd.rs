//! Multiply-accumulate: `a + b * c`
//!
//! Scalar and n-dimensional forms. The array forms follow NumPy broadcasting:
//! shapes are aligned on their trailing axes, missing leading axes count as
//! length 1, and along each axis the lengths must match or one must be 1.

use std::ops::{Add, Mul};

use ndarray::{ArrayBase, ArrayD, ArrayViewD, Data, DataMut, Dimension, Zip};

use crate::error::MathError;

/// Multiply-accumulate on scalars.
///
/// Computes `a + b * c` as two rounded operations, not a fused `mul_add`,
/// so floats behave exactly like ordinary IEEE arithmetic.
///
/// ```
/// assert_eq!(numlab::multiply_add(1.0, 2.0, 3.0), 7.0);
/// ```
#[inline]
pub fn multiply_add<T>(a: T, b: T, c: T) -> T
where
    T: Add<Output = T> + Mul<Output = T>,
{
    a + b * c
}

/// Shape produced by broadcasting `lhs` against `rhs`.
pub fn broadcast_shape(lhs: &[usize], rhs: &[usize]) -> Result<Vec<usize>, MathError> {
    let ndim = lhs.len().max(rhs.len());
    let lhs_pad = ndim - lhs.len();
    let rhs_pad = ndim - rhs.len();

    let mut shape = Vec::with_capacity(ndim);
    for axis in 0..ndim {
        let l = if axis < lhs_pad { 1 } else { lhs[axis - lhs_pad] };
        let r = if axis < rhs_pad { 1 } else { rhs[axis - rhs_pad] };
        let len = match (l, r) {
            (l, r) if l == r => l,
            (1, r) => r,
            (l, 1) => l,
            _ => {
                return Err(MathError::ShapeMismatch {
                    lhs: lhs.to_vec(),
                    rhs: rhs.to_vec(),
                });
            }
        };
        shape.push(len);
    }
    Ok(shape)
}

fn broadcast_view<'a, T, S, D>(
    array: &'a ArrayBase<S, D>,
    shape: &[usize],
) -> Result<ArrayViewD<'a, T>, MathError>
where
    S: Data<Elem = T>,
    D: Dimension,
{
    array
        .broadcast(shape)
        .ok_or_else(|| MathError::ShapeMismatch {
            lhs: shape.to_vec(),
            rhs: array.shape().to_vec(),
        })
}

/// Elementwise multiply-accumulate with broadcasting.
///
/// The result always has dynamic dimension since its rank depends on the
/// operand shapes.
///
/// Integer overflow follows Rust's usual rules: it panics in debug builds.
/// Use [`std::num::Wrapping`] elements for two's-complement wraparound.
///
/// # Errors
/// [`MathError::ShapeMismatch`] if the three shapes cannot be broadcast
/// together.
pub fn multiply_add_ndarray<T, Sa, Sb, Sc, Da, Db, Dc>(
    a: &ArrayBase<Sa, Da>,
    b: &ArrayBase<Sb, Db>,
    c: &ArrayBase<Sc, Dc>,
) -> Result<ArrayD<T>, MathError>
where
    T: Copy + Add<Output = T> + Mul<Output = T>,
    Sa: Data<Elem = T>,
    Sb: Data<Elem = T>,
    Sc: Data<Elem = T>,
    Da: Dimension,
    Db: Dimension,
    Dc: Dimension,
{
    let product_shape = broadcast_shape(b.shape(), c.shape())?;
    let shape = broadcast_shape(a.shape(), &product_shape)?;

    let a = broadcast_view(a, &shape)?;
    let b = broadcast_view(b, &shape)?;
    let c = broadcast_view(c, &shape)?;

    Ok(Zip::from(&a)
        .and(&b)
        .and(&c)
        .map_collect(|&a, &b, &c| multiply_add(a, b, c)))
}

/// In-place multiply-accumulate: `acc += b * c`.
///
/// `b` and `c` broadcast to the shape of `acc`; `acc` itself never grows.
/// On error `acc` is left untouched.
pub fn multiply_add_assign<T, Sa, Sb, Sc, D, Db, Dc>(
    acc: &mut ArrayBase<Sa, D>,
    b: &ArrayBase<Sb, Db>,
    c: &ArrayBase<Sc, Dc>,
) -> Result<(), MathError>
where
    T: Copy + Add<Output = T> + Mul<Output = T>,
    Sa: DataMut<Elem = T>,
    Sb: Data<Elem = T>,
    Sc: Data<Elem = T>,
    D: Dimension,
    Db: Dimension,
    Dc: Dimension,
{
    let shape = acc.shape().to_vec();
    let b = broadcast_view(b, &shape)?;
    let c = broadcast_view(c, &shape)?;

    Zip::from(acc.view_mut().into_dyn())
        .and(&b)
        .and(&c)
        .for_each(|a, &b, &c| *a = multiply_add(*a, b, c));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, arr0, array};

    #[test]
    fn test_scalar_example() {
        assert_eq!(multiply_add(1.0, 2.0, 3.0), 7.0);
        assert_eq!(multiply_add(1i64, 2, 3), 7);
    }

    #[test]
    fn test_zero_accumulator_is_plain_product() {
        let samples = [
            (2.5, -4.0),
            (1e150, 1e150),
            (-0.0, 3.0),
            (f64::MIN_POSITIVE, 0.5),
            (123.456, 789.012),
        ];
        for (b, c) in samples {
            assert_eq!(multiply_add(0.0, b, c), b * c, "b={b} c={c}");
        }
    }

    #[test]
    fn test_ieee_edge_cases() {
        assert!(multiply_add(f64::NAN, 1.0, 1.0).is_nan());
        assert!(multiply_add(1.0, f64::NAN, 1.0).is_nan());
        assert_eq!(multiply_add(0.0, f64::MAX, 2.0), f64::INFINITY);
        assert!(multiply_add(f64::INFINITY, -1.0, f64::INFINITY).is_nan());
    }

    #[test]
    fn test_broadcast_shape_rules() {
        assert_eq!(broadcast_shape(&[3], &[3]).unwrap(), vec![3]);
        assert_eq!(broadcast_shape(&[2, 1], &[3]).unwrap(), vec![2, 3]);
        assert_eq!(broadcast_shape(&[], &[4, 5]).unwrap(), vec![4, 5]);
        assert_eq!(broadcast_shape(&[1, 0], &[7, 1]).unwrap(), vec![7, 0]);
        assert_eq!(
            broadcast_shape(&[3], &[4]),
            Err(MathError::ShapeMismatch {
                lhs: vec![3],
                rhs: vec![4]
            })
        );
    }

    #[test]
    fn test_ndarray_range_example() {
        let x = Array1::from_iter(1i64..10);
        let out = multiply_add_ndarray(&x, &x, &x).unwrap();
        assert_eq!(
            out,
            array![2i64, 6, 12, 20, 30, 42, 56, 72, 90].into_dyn()
        );
    }

    #[test]
    fn test_ndarray_broadcasts_column_row_and_scalar() {
        let col = array![[1.0], [2.0]]; // 2x1
        let row = array![10.0, 20.0, 30.0]; // 3
        let two = arr0(2.0);

        let out = multiply_add_ndarray(&col, &row, &two).unwrap();
        assert_eq!(out.shape(), &[2, 3]);
        assert_eq!(
            out,
            array![[21.0, 41.0, 61.0], [22.0, 42.0, 62.0]].into_dyn()
        );
    }

    #[test]
    fn test_ndarray_shape_mismatch() {
        let a = array![1.0, 2.0, 3.0];
        let b = array![1.0, 2.0, 3.0, 4.0];
        let err = multiply_add_ndarray(&a, &b, &b).unwrap_err();
        assert!(matches!(err, MathError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_ndarray_wrapping_integers_wrap_around() {
        use std::num::Wrapping;

        let a = array![Wrapping(i64::MAX), Wrapping(1)];
        let one = array![Wrapping(1i64), Wrapping(1)];
        let out = multiply_add_ndarray(&a, &one, &one).unwrap();
        assert_eq!(
            out,
            array![Wrapping(i64::MIN), Wrapping(2)].into_dyn()
        );
    }

    #[test]
    fn test_assign_accumulates_in_place() {
        let mut acc = array![[1.0, 1.0], [1.0, 1.0]];
        multiply_add_assign(&mut acc, &array![1.0, 2.0], &arr0(3.0)).unwrap();
        assert_eq!(acc, array![[4.0, 7.0], [4.0, 7.0]]);
    }

    #[test]
    fn test_assign_does_not_grow_accumulator() {
        let mut acc = array![1.0, 2.0];
        let before = acc.clone();
        let b = array![[1.0, 1.0], [2.0, 2.0]];
        let err = multiply_add_assign(&mut acc, &b, &arr0(1.0)).unwrap_err();
        assert!(matches!(err, MathError::ShapeMismatch { .. }));
        assert_eq!(acc, before);
    }
}
