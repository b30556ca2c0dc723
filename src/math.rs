//! Shared numerical primitives anchored on `nalgebra`.

use nalgebra::DMatrix;

/// Primary scalar type used across the crate.
pub type Scalar = f64;
/// Dense real matrix used for Laplacians and their pseudoinverses.
pub type RMatrix = DMatrix<Scalar>;

/// Combines resistances in parallel: `1 / Σ(1/R_i)`.
///
/// Returns `+∞` for an empty set (no conducting branch).
#[must_use]
pub fn parallel<I>(resistances: I) -> Scalar
where
    I: IntoIterator<Item = Scalar>,
{
    let conductance: Scalar = resistances.into_iter().map(|r| 1.0 / r).sum();
    if conductance <= 0.0 {
        Scalar::INFINITY
    } else {
        1.0 / conductance
    }
}

/// Combines resistances in series: `Σ R_i`.
#[must_use]
pub fn series<I>(resistances: I) -> Scalar
where
    I: IntoIterator<Item = Scalar>,
{
    resistances.into_iter().sum()
}

/// True when `value` is acceptable as a resistance (finite and strictly positive).
#[inline]
#[must_use]
pub fn is_valid_resistance(value: Scalar) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn parallel_of_equal_pair_halves() {
        assert_relative_eq!(parallel([100.0, 100.0]), 50.0, epsilon = 1.0e-12);
    }

    #[test]
    fn parallel_of_nothing_is_open_circuit() {
        assert!(parallel(std::iter::empty()).is_infinite());
    }

    #[test]
    fn validity_rejects_zero_nan_and_infinity() {
        assert!(is_valid_resistance(1.0e-9));
        assert!(!is_valid_resistance(0.0));
        assert!(!is_valid_resistance(-5.0));
        assert!(!is_valid_resistance(Scalar::NAN));
        assert!(!is_valid_resistance(Scalar::INFINITY));
    }
}
