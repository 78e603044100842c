// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Polynomials over the complex numbers, in the two shapes Newton's
//! method needs.  The rooted form is what the user types in and what
//! pixels are classified against; the coefficient form, and its
//! derivative, are what the iteration evaluates.

use itertools::Itertools;
use std::fmt;

use crate::complex::Complex;
use crate::errors::FractalError;

/// A polynomial in coefficient form.  Coefficient `i` multiplies `z^i`.
/// There is always at least one coefficient; the zero polynomial is
/// `[0]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ComplexPolynomial {
    coefficients: Vec<Complex>,
}

impl ComplexPolynomial {
    /// Builds a polynomial from coefficients in ascending degree.
    pub fn new(coefficients: Vec<Complex>) -> Result<Self, FractalError> {
        if coefficients.is_empty() {
            return Err(FractalError::EmptyPolynomial);
        }
        Ok(ComplexPolynomial { coefficients })
    }

    /// The zero polynomial.
    pub fn zero() -> Self {
        ComplexPolynomial {
            coefficients: vec![Complex::ZERO],
        }
    }

    /// Coefficients in ascending degree.
    pub fn coefficients(&self) -> &[Complex] {
        &self.coefficients
    }

    /// The highest power of `z`, i.e. one less than the coefficient count.
    pub fn order(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// The product of two polynomials, by discrete convolution.
    pub fn multiply(&self, other: &ComplexPolynomial) -> ComplexPolynomial {
        let len = self.coefficients.len() + other.coefficients.len() - 1;
        let mut product = vec![Complex::ZERO; len];
        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in other.coefficients.iter().enumerate() {
                product[i + j] = product[i + j] + *a * *b;
            }
        }
        ComplexPolynomial {
            coefficients: product,
        }
    }

    /// The first derivative.  A constant derives to the zero
    /// polynomial rather than to an empty one.
    pub fn derive(&self) -> ComplexPolynomial {
        if self.coefficients.len() == 1 {
            return ComplexPolynomial::zero();
        }
        let coefficients = self.coefficients[1..]
            .iter()
            .enumerate()
            .map(|(i, c)| c.scale((i + 1) as f64))
            .collect();
        ComplexPolynomial { coefficients }
    }

    /// Evaluates at `z` by summing `c_i * z^i` term by term.
    pub fn apply(&self, z: Complex) -> Complex {
        self.coefficients
            .iter()
            .enumerate()
            .fold(Complex::ZERO, |sum, (i, c)| sum + *c * z.power(i as u32))
    }
}

impl fmt::Display for ComplexPolynomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let terms = self
            .coefficients
            .iter()
            .enumerate()
            .rev()
            .map(|(i, c)| match i {
                0 => format!("({})", c),
                _ => format!("({})*z^{}", c, i),
            })
            .join(" + ");
        write!(f, "{}", terms)
    }
}

/// A polynomial written as `constant * (z - r_0) * (z - r_1) * ...`.
#[derive(Clone, Debug, PartialEq)]
pub struct ComplexRootedPolynomial {
    constant: Complex,
    roots: Vec<Complex>,
}

impl ComplexRootedPolynomial {
    /// No minimum number of roots is enforced here; the root reader
    /// insists on two before it builds one.
    pub fn new(constant: Complex, roots: Vec<Complex>) -> Self {
        ComplexRootedPolynomial { constant, roots }
    }

    /// The leading constant.
    pub fn constant(&self) -> Complex {
        self.constant
    }

    /// The roots, in the order they were given.
    pub fn roots(&self) -> &[Complex] {
        &self.roots
    }

    /// The number of roots.
    pub fn order(&self) -> usize {
        self.roots.len()
    }

    /// Evaluates the product directly.
    pub fn apply(&self, z: Complex) -> Complex {
        self.roots
            .iter()
            .fold(self.constant, |product, root| product * (z - *root))
    }

    /// Expands the product into coefficient form.  This is the
    /// expensive direction; a render does it once, up front.
    pub fn to_complex_polynomial(&self) -> ComplexPolynomial {
        let seed = ComplexPolynomial {
            coefficients: vec![self.constant],
        };
        self.roots.iter().fold(seed, |acc, root| {
            acc.multiply(&ComplexPolynomial {
                coefficients: vec![-*root, Complex::ONE],
            })
        })
    }

    /// The index of the root nearest to `z`, provided it lies within
    /// `threshold`.  Ties go to the lower index.  A NaN threshold is
    /// rejected.
    pub fn index_of_closest_root_for(
        &self,
        z: Complex,
        threshold: f64,
    ) -> Result<Option<usize>, FractalError> {
        if threshold.is_nan() {
            return Err(FractalError::InvalidThreshold {
                name: "root",
                value: threshold,
            });
        }
        Ok(self.closest_root(z, threshold))
    }

    /// The unchecked scan behind `index_of_closest_root_for`, for
    /// callers that validated the threshold once already.
    pub(crate) fn closest_root(&self, z: Complex, threshold: f64) -> Option<usize> {
        let mut index = None;
        let mut nearest = std::f64::INFINITY;
        for (i, root) in self.roots.iter().enumerate() {
            let distance = (z - *root).module();
            if distance < nearest {
                nearest = distance;
                index = Some(i);
            }
        }
        index.filter(|_| nearest <= threshold)
    }
}

impl fmt::Display for ComplexRootedPolynomial {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({})", self.constant)?;
        for root in &self.roots {
            write!(f, "*(z-({}))", root)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn c(re: f64, im: f64) -> Complex {
        Complex::new(re, im).unwrap()
    }

    fn close(a: Complex, b: Complex, tol: f64) -> bool {
        (a - b).module() <= tol * (1.0 + b.module())
    }

    fn random(rng: &mut StdRng, radius: f64) -> Complex {
        c(rng.gen_range(-radius..radius), rng.gen_range(-radius..radius))
    }

    fn z_squared_minus_one() -> ComplexRootedPolynomial {
        ComplexRootedPolynomial::new(Complex::ONE, vec![c(1.0, 0.0), c(-1.0, 0.0)])
    }

    #[test]
    fn empty_coefficients_are_rejected() {
        assert_eq!(ComplexPolynomial::new(vec![]), Err(FractalError::EmptyPolynomial));
    }

    #[test]
    fn multiply_convolves() {
        // (1 + z) * (1 - z) = 1 - z^2
        let a = ComplexPolynomial::new(vec![Complex::ONE, Complex::ONE]).unwrap();
        let b = ComplexPolynomial::new(vec![Complex::ONE, c(-1.0, 0.0)]).unwrap();
        let p = a.multiply(&b);
        assert_eq!(p.order(), 2);
        assert_eq!(p.coefficients(), &[c(1.0, 0.0), c(0.0, 0.0), c(-1.0, 0.0)]);
    }

    #[test]
    fn derive_applies_power_rule() {
        // 7 + 3z + 2z^2 + z^3 -> 3 + 4z + 3z^2
        let p = ComplexPolynomial::new(vec![c(7.0, 0.0), c(3.0, 0.0), c(2.0, 0.0), c(1.0, 0.0)])
            .unwrap();
        let d = p.derive();
        assert_eq!(d.coefficients(), &[c(3.0, 0.0), c(4.0, 0.0), c(3.0, 0.0)]);
    }

    #[test]
    fn constant_derives_to_zero() {
        let p = ComplexPolynomial::new(vec![c(5.0, 2.0)]).unwrap();
        assert_eq!(p.derive(), ComplexPolynomial::zero());
        assert_eq!(p.derive().order(), 0);
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let mut rng = StdRng::seed_from_u64(3);
        let roots = (0..4).map(|_| random(&mut rng, 2.0)).collect();
        let p = ComplexRootedPolynomial::new(c(0.5, -1.0), roots).to_complex_polynomial();
        let d = p.derive();
        let h = 1e-6;
        for _ in 0..50 {
            let z = random(&mut rng, 2.0);
            let step = c(h, 0.0);
            let numeric = (p.apply(z + step) - p.apply(z - step)).scale(0.5 / h);
            assert!(close(d.apply(z), numeric, 1e-5), "at {}", z);
        }
    }

    #[test]
    fn rooted_and_coefficient_forms_agree() {
        let mut rng = StdRng::seed_from_u64(5);
        for order in 1..7 {
            let roots = (0..order).map(|_| random(&mut rng, 3.0)).collect();
            let rooted = ComplexRootedPolynomial::new(random(&mut rng, 2.0), roots);
            let expanded = rooted.to_complex_polynomial();
            assert_eq!(expanded.order(), order);
            for _ in 0..20 {
                let z = random(&mut rng, 3.0);
                assert!(close(expanded.apply(z), rooted.apply(z), 1e-9), "order {} at {}", order, z);
            }
        }
    }

    #[test]
    fn expansion_of_z_squared_minus_one() {
        let p = z_squared_minus_one().to_complex_polynomial();
        assert_eq!(p.coefficients(), &[c(-1.0, 0.0), c(0.0, 0.0), c(1.0, 0.0)]);
    }

    #[test]
    fn closest_root_honours_threshold() {
        let p = z_squared_minus_one();
        assert_eq!(p.index_of_closest_root_for(c(0.999, 0.0), 0.01), Ok(Some(0)));
        assert_eq!(p.index_of_closest_root_for(c(-1.0, 0.001), 0.01), Ok(Some(1)));
        assert_eq!(p.index_of_closest_root_for(c(0.0, 0.0), 0.5), Ok(None));
    }

    #[test]
    fn closest_root_ties_go_to_lower_index() {
        let p = z_squared_minus_one();
        assert_eq!(p.index_of_closest_root_for(c(0.0, 0.0), 1.0), Ok(Some(0)));
    }

    #[test]
    fn nan_threshold_is_rejected() {
        let p = z_squared_minus_one();
        assert!(p.index_of_closest_root_for(Complex::ZERO, std::f64::NAN).is_err());
    }

    #[test]
    fn displays_both_forms() {
        let p = z_squared_minus_one();
        assert_eq!(p.to_string(), "(1 + i0)*(z-(1 + i0))*(z-(-1 + i0))");
        assert_eq!(
            p.to_complex_polynomial().to_string(),
            "(1 + i0)*z^2 + (0 + i0)*z^1 + (-1 + i0)"
        );
    }
}
