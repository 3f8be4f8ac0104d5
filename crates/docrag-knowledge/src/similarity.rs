//! Cosine similarity.

use docrag_core::error::{DocRagError, Result};

/// `dot(a, b) / (|a| * |b|)`.
///
/// Unequal lengths are an error rather than a silent truncation. A zero-magnitude
/// operand yields `0.0`. Sums are accumulated in `f64`, where the square of any
/// finite `f32` neither overflows nor underflows, and the result is never NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(DocRagError::DimensionMismatch { left: a.len(), right: b.len() });
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return Ok(0.0);
    }
    // `+ 0.0` folds -0.0 into 0.0 so orthogonal scores tie under total ordering.
    let similarity = (dot / denom).clamp(-1.0, 1.0) as f32 + 0.0;
    // Only NaN/inf components get past the zero check with a non-finite result.
    Ok(if similarity.is_finite() { similarity } else { 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_is_one() {
        let v = [0.3, -1.2, 4.0, 0.5];
        let s = cosine_similarity(&v, &v).unwrap();
        assert!((s - 1.0).abs() < 1e-6, "got {s}");
    }

    #[test]
    fn test_symmetric() {
        let a = [1.0, 2.0, 3.0];
        let b = [-2.0, 0.5, 1.0];
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_and_opposite() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-6);
        let s = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap();
        assert!((s + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_magnitude_independent() {
        let s = cosine_similarity(&[1.0, 1.0], &[10.0, 10.0]).unwrap();
        assert!((s - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0]).unwrap_err();
        assert!(matches!(err, DocRagError::DimensionMismatch { left: 3, right: 2 }));
    }

    #[test]
    fn test_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_extreme_magnitudes_self_similarity() {
        for v in [[1e20f32, 0.0], [1e-30, 0.0], [f32::MAX, f32::MAX], [1e-40, 1e-40]] {
            let s = cosine_similarity(&v, &v).unwrap();
            assert!((s - 1.0).abs() < 1e-6, "{v:?} -> {s}");
        }
        let s = cosine_similarity(&[1e20, 1e20], &[1e20, 0.0]).unwrap();
        assert!((s - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_never_nan() {
        assert_eq!(cosine_similarity(&[f32::NAN, 1.0], &[1.0, 1.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[f32::INFINITY, 0.0], &[1.0, 0.0]).unwrap(), 0.0);
    }
}
