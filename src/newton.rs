// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The per-pixel work: run Newton's method from the point a pixel
//! covers and record which root, if any, it settled on.
//!
//! A `NewtonRaphson` is built once per render request.  Building it
//! expands the rooted polynomial into coefficient form and derives it,
//! so the hot loop only ever evaluates.  After that it is immutable and
//! shared by reference between all the workers of the request; each
//! worker hands `render_rows` its own slice of the output buffer.

use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::complex::Complex;
use crate::errors::FractalError;
use crate::planes::{Pixel, Viewport};
use crate::polynomial::{ComplexPolynomial, ComplexRootedPolynomial};

/// Tuning knobs for the iteration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IterationConfig {
    /// Upper bound on Newton steps per pixel.  At least one step is
    /// always taken.
    pub max_iterations: usize,
    /// Two successive iterates closer than this count as converged.
    pub convergence_threshold: f64,
    /// A converged iterate must be this close to a root to match it.
    pub root_threshold: f64,
}

impl Default for IterationConfig {
    fn default() -> Self {
        IterationConfig {
            max_iterations: 16 * 16 * 16,
            convergence_threshold: 1e-3,
            root_threshold: 2e-3,
        }
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<(), FractalError> {
    if value.is_nan() || value < 0.0 {
        return Err(FractalError::InvalidThreshold { name, value });
    }
    Ok(())
}

/// A validated, ready-to-run Newton iteration for one polynomial.
#[derive(Clone, Debug)]
pub struct NewtonRaphson {
    rooted: ComplexRootedPolynomial,
    polynomial: ComplexPolynomial,
    derivative: ComplexPolynomial,
    config: IterationConfig,
}

impl NewtonRaphson {
    /// Checks the configuration and prepares the coefficient form and
    /// derivative of `rooted`.
    pub fn new(
        rooted: ComplexRootedPolynomial,
        config: IterationConfig,
    ) -> Result<Self, FractalError> {
        if config.max_iterations == 0 {
            return Err(FractalError::NoIterations);
        }
        check_threshold("convergence", config.convergence_threshold)?;
        check_threshold("root", config.root_threshold)?;

        // Slot values are root index + 1 and have to fit a u16.
        let max = usize::from(u16::MAX) - 1;
        if rooted.order() > max {
            return Err(FractalError::TooManyRoots {
                max,
                got: rooted.order(),
            });
        }

        let polynomial = rooted.to_complex_polynomial();
        let derivative = polynomial.derive();
        Ok(NewtonRaphson {
            rooted,
            polynomial,
            derivative,
            config,
        })
    }

    /// The polynomial pixels are classified against.
    pub fn rooted(&self) -> &ComplexRootedPolynomial {
        &self.rooted
    }

    /// The expanded polynomial the iteration evaluates.
    pub fn polynomial(&self) -> &ComplexPolynomial {
        &self.polynomial
    }

    /// The iteration settings.
    pub fn config(&self) -> &IterationConfig {
        &self.config
    }

    /// Distinct values a slot can hold: one per root, plus 0 for
    /// "no root".
    pub fn num_colors(&self) -> usize {
        self.rooted.order() + 1
    }

    /// Iterates `z - f(z)/f'(z)` from `z0` until two iterates are within
    /// the convergence threshold or the iteration limit is hit.  A zero
    /// derivative leaves nowhere to step, so the current iterate is
    /// returned as is.
    pub fn converge(&self, z0: Complex) -> Complex {
        let mut z = z0;
        for _ in 0..self.config.max_iterations {
            let step = match self.polynomial.apply(z).divide(self.derivative.apply(z)) {
                Ok(step) => step,
                Err(_) => break,
            };
            let next = z - step;
            let moved = (next - z).module();
            z = next;
            if moved <= self.config.convergence_threshold {
                break;
            }
        }
        z
    }

    /// The slot value for the pixel at `z0`: index of the matched root
    /// plus one, or 0 when nothing is within the root threshold.
    pub fn classify(&self, z0: Complex) -> u16 {
        let z = self.converge(z0);
        match self.rooted.closest_root(z, self.config.root_threshold) {
            // Bounded by the order check in `new`.
            Some(index) => (index + 1) as u16,
            None => 0,
        }
    }

    /// Fills `pixels`, which holds exactly the rows in `rows` of
    /// `viewport`, one row at a time.  `cancel` is checked before each
    /// row; once it is set the remaining rows are left as they are.
    /// Returns the number of rows completed.
    ///
    /// # Panics
    ///
    /// If `rows` reaches past the bottom of `viewport`, or if `pixels`
    /// is not exactly `rows.len() * viewport.width` long.
    pub fn render_rows(
        &self,
        viewport: &Viewport,
        rows: Range<usize>,
        pixels: &mut [u16],
        cancel: &AtomicBool,
    ) -> usize {
        assert!(rows.end <= viewport.height);
        assert_eq!(pixels.len(), rows.len() * viewport.width);

        let mut completed = 0;
        for (y, line) in rows.zip(pixels.chunks_mut(viewport.width)) {
            if cancel.load(Ordering::SeqCst) {
                break;
            }
            for (x, slot) in line.iter_mut().enumerate() {
                *slot = self.classify(viewport.pixel_to_point(Pixel(x, y)));
            }
            completed += 1;
        }
        completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex {
        Complex::new(re, im).unwrap()
    }

    fn z_squared_minus_one() -> NewtonRaphson {
        let rooted = ComplexRootedPolynomial::new(Complex::ONE, vec![c(1.0, 0.0), c(-1.0, 0.0)]);
        NewtonRaphson::new(rooted, IterationConfig::default()).unwrap()
    }

    #[test]
    fn rejects_bad_configuration() {
        let rooted = ComplexRootedPolynomial::new(Complex::ONE, vec![c(1.0, 0.0), c(-1.0, 0.0)]);
        let no_steps = IterationConfig {
            max_iterations: 0,
            ..IterationConfig::default()
        };
        assert_eq!(
            NewtonRaphson::new(rooted.clone(), no_steps).unwrap_err(),
            FractalError::NoIterations
        );

        let nan_root = IterationConfig {
            root_threshold: std::f64::NAN,
            ..IterationConfig::default()
        };
        assert!(NewtonRaphson::new(rooted.clone(), nan_root).is_err());

        let negative = IterationConfig {
            convergence_threshold: -1.0,
            ..IterationConfig::default()
        };
        assert!(NewtonRaphson::new(rooted, negative).is_err());
    }

    #[test]
    fn converges_to_nearby_roots() {
        let newton = z_squared_minus_one();
        assert!((newton.converge(c(0.8, 0.3)) - c(1.0, 0.0)).module() < 1e-3);
        assert!((newton.converge(c(-1.7, -0.4)) - c(-1.0, 0.0)).module() < 1e-3);
    }

    #[test]
    fn classifies_by_root_index() {
        let newton = z_squared_minus_one();
        assert_eq!(newton.num_colors(), 3);
        assert_eq!(newton.classify(c(1.2, 0.1)), 1);
        assert_eq!(newton.classify(c(-0.9, -0.2)), 2);
    }

    #[test]
    fn zero_derivative_stops_in_place() {
        // f'(0) = 0 for z^2 - 1, and 0 is not near either root.
        let newton = z_squared_minus_one();
        assert_eq!(newton.converge(Complex::ZERO), Complex::ZERO);
        assert_eq!(newton.classify(Complex::ZERO), 0);
    }

    #[test]
    fn single_step_limit_is_honoured() {
        let rooted = ComplexRootedPolynomial::new(Complex::ONE, vec![c(1.0, 0.0), c(-1.0, 0.0)]);
        let config = IterationConfig {
            max_iterations: 1,
            ..IterationConfig::default()
        };
        let newton = NewtonRaphson::new(rooted, config).unwrap();
        // One step from 2: 2 - 3/4 = 1.25
        assert!((newton.converge(c(2.0, 0.0)) - c(1.25, 0.0)).module() < 1e-12);
    }

    #[test]
    fn renders_only_the_given_rows() {
        let newton = z_squared_minus_one();
        let viewport = Viewport::new(-2.0, 2.0, -2.0, 2.0, 8, 8).unwrap();
        let mut band = vec![u16::MAX; 3 * 8];
        let done = newton.render_rows(&viewport, 2..5, &mut band, &AtomicBool::new(false));
        assert_eq!(done, 3);
        assert!(band.iter().all(|&v| v <= 2));
    }

    #[test]
    fn cancelling_between_rows_keeps_earlier_rows() {
        let newton = z_squared_minus_one();
        let viewport = Viewport::new(-2.0, 2.0, -2.0, 2.0, 8, 8).unwrap();
        let cancel = AtomicBool::new(false);
        let mut band = vec![u16::MAX; 4 * 8];
        let (first, rest) = band.split_at_mut(8);

        assert_eq!(newton.render_rows(&viewport, 2..3, first, &cancel), 1);
        cancel.store(true, Ordering::SeqCst);
        assert_eq!(newton.render_rows(&viewport, 3..6, rest, &cancel), 0);

        assert!(band[..8].iter().all(|&v| v <= 2));
        assert!(band[8..].iter().all(|&v| v == u16::MAX));
    }

    #[test]
    fn cancelled_band_is_left_untouched() {
        let newton = z_squared_minus_one();
        let viewport = Viewport::new(-2.0, 2.0, -2.0, 2.0, 8, 8).unwrap();
        let mut band = vec![u16::MAX; 8 * 8];
        let done = newton.render_rows(&viewport, 0..8, &mut band, &AtomicBool::new(true));
        assert_eq!(done, 0);
        assert!(band.iter().all(|&v| v == u16::MAX));
    }
}
