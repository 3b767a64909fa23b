//! # Complex Arithmetic
//!
//! Value-type arithmetic on `Complex64` used by the transform and spectrum
//! code. The value type is the one `rustfft` re-exports, so buffers can be
//! handed to either FFT implementation without conversion.
//!
//! `power` works in polar form on the principal branch: the argument is
//! taken from `atan2(im, re)` and lies in `(-π, π]`. For integer exponents
//! this is exact De Moivre; for fractional exponents it yields the principal
//! value, with the branch cut along the negative real axis.

pub use rustfft::num_complex::Complex64;

use crate::error::{AnalysisError, Result};

/// Component-wise sum `a + b`.
#[inline]
pub fn sum(a: Complex64, b: Complex64) -> Complex64 {
    Complex64::new(a.re + b.re, a.im + b.im)
}

/// Component-wise difference `a - b`.
#[inline]
pub fn diff(a: Complex64, b: Complex64) -> Complex64 {
    Complex64::new(a.re - b.re, a.im - b.im)
}

/// Product `(ac - bd) + (bc + ad)i`.
#[inline]
pub fn product(a: Complex64, b: Complex64) -> Complex64 {
    Complex64::new(a.re * b.re - a.im * b.im, a.im * b.re + a.re * b.im)
}

/// Divides `a` by `b` as `a · conj(b) / |b|²`.
///
/// # Errors
/// * `DivisionByZero` - `|b|²` is exactly zero
pub fn divide(a: Complex64, b: Complex64) -> Result<Complex64> {
    let denominator = b.re * b.re + b.im * b.im;
    if denominator == 0.0 {
        return Err(AnalysisError::DivisionByZero);
    }
    let numerator = product(a, Complex64::new(b.re, -b.im));
    Ok(Complex64::new(
        numerator.re / denominator,
        numerator.im / denominator,
    ))
}

/// Raises `a` to a real power using its polar form.
///
/// `power(0, 0)` is `1`, matching `0^0 = 1` for the modulus; any other
/// exponent of zero gives zero (or infinity for negative exponents).
///
/// # Arguments
/// * `a` - Base value
/// * `exponent` - Real exponent, integral or not
///
/// # Returns
/// * `modulus^e · (cos(e·arg) + i·sin(e·arg))`
pub fn power(a: Complex64, exponent: f64) -> Complex64 {
    let modulus = (a.re * a.re + a.im * a.im).sqrt();
    let argument = a.im.atan2(a.re);
    let scaled = modulus.powf(exponent);
    let angle = exponent * argument;
    Complex64::new(scaled * angle.cos(), scaled * angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_worked_examples() {
        let a = c(2.0, 3.0);
        let b = c(5.0, 6.0);
        assert_eq!(sum(a, b), c(7.0, 9.0));
        assert_eq!(diff(a, b), c(-3.0, -3.0));
        assert_eq!(product(a, b), c(-8.0, 27.0));

        let q = divide(a, b).unwrap();
        assert_relative_eq!(q.re, 28.0 / 61.0, epsilon = 1e-15);
        assert_relative_eq!(q.im, 3.0 / 61.0, epsilon = 1e-15);
    }

    #[test]
    fn test_divide_by_zero_fails() {
        assert_eq!(
            divide(c(1.0, 1.0), c(0.0, 0.0)),
            Err(AnalysisError::DivisionByZero)
        );
    }

    #[test]
    fn test_power_squares() {
        let p = power(c(2.0, 3.0), 2.0);
        assert_relative_eq!(p.re, -5.0, epsilon = 1e-12);
        assert_relative_eq!(p.im, 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_power_left_half_plane() {
        // atan(y/x) would put these in the wrong quadrant
        let p = power(c(-1.0, 0.0), 1.0);
        assert_relative_eq!(p.re, -1.0, epsilon = 1e-12);
        assert!(p.im.abs() < 1e-12);

        let p = power(c(-2.0, -3.0), 2.0);
        assert_relative_eq!(p.re, -5.0, epsilon = 1e-12);
        assert_relative_eq!(p.im, 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_power_principal_square_root() {
        let p = power(c(-4.0, 0.0), 0.5);
        assert!(p.re.abs() < 1e-12);
        assert_relative_eq!(p.im, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_power_of_zero() {
        assert_eq!(power(c(0.0, 0.0), 0.0), c(1.0, 0.0));
        assert_eq!(power(c(0.0, 0.0), 3.0), c(0.0, 0.0));
    }

    fn component() -> impl Strategy<Value = f64> {
        -1.0e3..1.0e3f64
    }

    proptest! {
        #[test]
        fn sum_commutes(ar in component(), ai in component(), br in component(), bi in component()) {
            prop_assert_eq!(sum(c(ar, ai), c(br, bi)), sum(c(br, bi), c(ar, ai)));
        }

        #[test]
        fn product_undoes_divide(ar in component(), ai in component(), cr in component(), ci in component()) {
            let a = c(ar, ai);
            prop_assume!(a.norm() > 1e-3);
            let target = c(cr, ci);
            let back = product(a, divide(target, a).unwrap());
            let tolerance = 1e-9 * (1.0 + target.norm());
            prop_assert!((back - target).norm() < tolerance, "{back} != {target}");
        }

        #[test]
        fn power_identities(ar in component(), ai in component()) {
            let a = c(ar, ai);
            prop_assume!(a.norm() > 1e-6);
            let one = power(a, 1.0);
            prop_assert!((one - a).norm() <= 1e-9 * a.norm());
            let unit = power(a, 0.0);
            prop_assert!((unit - c(1.0, 0.0)).norm() < 1e-12);
        }
    }
}
