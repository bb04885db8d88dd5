//! Operations on whole half-precision vectors.
//!
//! The kernels trust their caller on operand dimensions; this layer is
//! that caller. Binary operations check that both operands have the same
//! length and report [`Error::DimensionMismatch`] otherwise. Results that
//! must be re-encoded are range-checked element by element first, so an
//! overflow fails the whole operation.

use std::cmp::Ordering;

use crate::codec::{decode_half, encode_half, Half, HALF_MAX};
use crate::error::{Error, Result};
use crate::kernels::{DistanceKernels, MAX_DIM};

/// Encodes `value`, rejecting NaN, infinities and magnitudes above [`HALF_MAX`].
pub fn checked_encode(value: f32) -> Result<Half> {
    if value.is_finite() && value.abs() <= HALF_MAX {
        Ok(encode_half(value))
    } else {
        Err(Error::NumericRange(format!(
            "{value} is out of range for half precision"
        )))
    }
}

/// Encodes every element with [`checked_encode`].
pub fn encode_slice(values: &[f32]) -> Result<Vec<Half>> {
    values.iter().map(|&v| checked_encode(v)).collect()
}

/// Decodes every element.
#[must_use]
pub fn decode_slice(values: &[Half]) -> Vec<f32> {
    values.iter().map(|&h| decode_half(h)).collect()
}

fn same_dimension(a: &[Half], b: &[Half]) -> Result<usize> {
    if a.len() == b.len() {
        Ok(a.len())
    } else {
        Err(Error::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        })
    }
}

// =============================================================================
// Distances
// =============================================================================

/// Euclidean distance, the square root of the squared-distance kernel.
pub fn l2_distance(kernels: &DistanceKernels, a: &[Half], b: &[Half]) -> Result<f64> {
    let dim = same_dimension(a, b)?;
    let squared = kernels.squared_euclidean_distance(dim, a, b)?;
    Ok(f64::from(squared).sqrt())
}

/// Negated inner product, so that ascending order ranks the most similar first.
pub fn negative_inner_product(kernels: &DistanceKernels, a: &[Half], b: &[Half]) -> Result<f32> {
    let dim = same_dimension(a, b)?;
    Ok(-kernels.inner_product(dim, a, b)?)
}

/// `1 - cosine_similarity`, in `0..=2`.
pub fn cosine_distance(kernels: &DistanceKernels, a: &[Half], b: &[Half]) -> Result<f64> {
    let dim = same_dimension(a, b)?;
    Ok(1.0 - kernels.cosine_similarity(dim, a, b)?)
}

/// Angle between the vectors in radians, in `0..=π`.
pub fn spherical_distance(kernels: &DistanceKernels, a: &[Half], b: &[Half]) -> Result<f64> {
    let dim = same_dimension(a, b)?;
    let similarity = kernels.cosine_similarity(dim, a, b)?;
    Ok(similarity.clamp(-1.0, 1.0).acos())
}

/// L1 (taxicab) distance.
pub fn l1_distance(kernels: &DistanceKernels, a: &[Half], b: &[Half]) -> Result<f32> {
    let dim = same_dimension(a, b)?;
    kernels.l1_distance(dim, a, b)
}

// =============================================================================
// Norms
// =============================================================================

/// Euclidean norm. Squares are summed in `f32`, the root taken in `f64`.
#[must_use]
pub fn l2_norm(values: &[Half]) -> f64 {
    let sum: f32 = values
        .iter()
        .map(|&h| {
            let v = decode_half(h);
            v * v
        })
        .sum();
    f64::from(sum).sqrt()
}

/// Scales `values` to unit length.
///
/// # Errors
///
/// [`Error::DegenerateInput`] for a zero vector.
pub fn l2_normalize(values: &[Half]) -> Result<Vec<Half>> {
    let norm = l2_norm(values);
    if norm == 0.0 {
        return Err(Error::DegenerateInput(
            "cannot normalize a zero vector".to_string(),
        ));
    }
    #[allow(clippy::cast_possible_truncation)] // |v / norm| <= 1
    let normalized = values
        .iter()
        .map(|&h| encode_half((f64::from(decode_half(h)) / norm) as f32))
        .collect();
    Ok(normalized)
}

// =============================================================================
// Arithmetic
// =============================================================================

fn zip_checked(a: &[Half], b: &[Half], op: impl Fn(f32, f32) -> f32) -> Result<Vec<Half>> {
    same_dimension(a, b)?;
    a.iter()
        .zip(b)
        .map(|(&x, &y)| checked_encode(op(decode_half(x), decode_half(y))))
        .collect()
}

/// Elementwise sum.
pub fn add(a: &[Half], b: &[Half]) -> Result<Vec<Half>> {
    zip_checked(a, b, |x, y| x + y)
}

/// Elementwise difference `a - b`.
pub fn sub(a: &[Half], b: &[Half]) -> Result<Vec<Half>> {
    zip_checked(a, b, |x, y| x - y)
}

/// Multiplies every element by `scalar`.
pub fn mul_scalar(values: &[Half], scalar: f32) -> Result<Vec<Half>> {
    values
        .iter()
        .map(|&h| checked_encode(decode_half(h) * scalar))
        .collect()
}

// =============================================================================
// Shape
// =============================================================================

/// Appends `b` to `a`.
///
/// # Errors
///
/// [`Error::InvalidArgument`] when the result would exceed [`MAX_DIM`].
pub fn concat(a: &[Half], b: &[Half]) -> Result<Vec<Half>> {
    let dim = a.len() + b.len();
    if dim > MAX_DIM {
        return Err(Error::InvalidArgument(format!(
            "concatenated dimension {dim} exceeds {MAX_DIM}"
        )));
    }
    let mut out = Vec::with_capacity(dim);
    out.extend_from_slice(a);
    out.extend_from_slice(b);
    Ok(out)
}

/// Elements `start..=end`, counting from 1.
///
/// # Errors
///
/// [`Error::InvalidArgument`] unless `1 <= start <= end <= values.len()`.
pub fn subvector(values: &[Half], start: usize, end: usize) -> Result<&[Half]> {
    if start < 1 || start > values.len() {
        return Err(Error::InvalidArgument(format!(
            "start position {start} is outside 1..={}",
            values.len()
        )));
    }
    if end < start || end > values.len() {
        return Err(Error::InvalidArgument(format!(
            "end position {end} is outside {start}..={}",
            values.len()
        )));
    }
    Ok(&values[start - 1..end])
}

/// Maps positive elements to `1.0` and everything else to `-1.0`.
#[must_use]
pub fn binary_quantize(values: &[Half]) -> Vec<Half> {
    const NEG_ONE: Half = Half::from_bits(0xbc00);
    values
        .iter()
        .map(|&h| if decode_half(h) > 0.0 { Half::ONE } else { NEG_ONE })
        .collect()
}

/// Lexicographic order by decoded value. NaN elements compare equal.
pub fn compare(a: &[Half], b: &[Half]) -> Result<Ordering> {
    same_dimension(a, b)?;
    for (&x, &y) in a.iter().zip(b) {
        match decode_half(x).partial_cmp(&decode_half(y)) {
            Some(Ordering::Equal) | None => {}
            Some(order) => return Ok(order),
        }
    }
    Ok(Ordering::Equal)
}
