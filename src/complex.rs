// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! An immutable complex number with finite components.
//!
//! The arithmetic itself is delegated to `num`'s `Complex<f64>`; this
//! wrapper adds the checked constructor, the checked division and the
//! power and root operations Newton's method and the root reader need.

use num::complex::Complex64;
use std::f64::consts::PI;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use crate::errors::FractalError;

/// A complex number.  Every operation returns a new value.
///
/// `Complex::new` refuses NaN and infinities.  Values produced by
/// arithmetic on valid values are not re-checked, so a product that
/// overflows behaves the way an `f64` would.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Complex(Complex64);

impl Complex {
    /// 0 + i0
    pub const ZERO: Complex = Complex(Complex64 { re: 0.0, im: 0.0 });
    /// 1 + i0
    pub const ONE: Complex = Complex(Complex64 { re: 1.0, im: 0.0 });
    /// 0 + i1
    pub const IM: Complex = Complex(Complex64 { re: 0.0, im: 1.0 });

    /// Builds a complex number, rejecting non-finite components.
    pub fn new(re: f64, im: f64) -> Result<Self, FractalError> {
        if re.is_finite() && im.is_finite() {
            Ok(Complex(Complex64::new(re, im)))
        } else {
            Err(FractalError::NonFinite { re, im })
        }
    }

    /// The real part.
    pub fn re(self) -> f64 {
        self.0.re
    }

    /// The imaginary part.
    pub fn im(self) -> f64 {
        self.0.im
    }

    /// The modulus, computed with `hypot` so it does not overflow
    /// early for large components.
    pub fn module(self) -> f64 {
        self.0.norm()
    }

    /// The argument, in `(-π, π]`.
    pub fn arg(self) -> f64 {
        self.0.arg()
    }

    /// Multiplies both components by a real factor.
    pub fn scale(self, factor: f64) -> Self {
        Complex(self.0 * factor)
    }

    /// Divides by `other`.  Fails only when the divisor's squared
    /// modulus is exactly zero.
    pub fn divide(self, other: Complex) -> Result<Self, FractalError> {
        if other.0.norm_sqr() == 0.0 {
            return Err(FractalError::DivisionByZero);
        }
        Ok(Complex(self.0 / other.0))
    }

    /// Raises to a non-negative integral power by repeated squaring.
    /// Any base, zero included, raised to 0 is 1.
    pub fn power(self, n: u32) -> Self {
        match n {
            0 => Complex::ONE,
            1 => self,
            _ => {
                let mut result = Complex::ONE;
                let mut base = self;
                let mut n = n;
                while n > 0 {
                    if n & 1 == 1 {
                        result = result * base;
                    }
                    n >>= 1;
                    if n > 0 {
                        base = base * base;
                    }
                }
                result
            }
        }
    }

    /// All `n` of the `n`-th roots, starting with the principal one
    /// and proceeding counter-clockwise.
    pub fn root(self, n: u32) -> Result<Vec<Self>, FractalError> {
        if n == 0 {
            return Err(FractalError::ZeroRootOrder);
        }
        let order = f64::from(n);
        let modulus = self.module().powf(1.0 / order);
        let arg = self.arg();
        Ok((0..n)
            .map(|k| {
                let angle = (arg + 2.0 * PI * f64::from(k)) / order;
                Complex(Complex64::from_polar(modulus, angle))
            })
            .collect())
    }
}

impl Add for Complex {
    type Output = Complex;
    fn add(self, other: Complex) -> Complex {
        Complex(self.0 + other.0)
    }
}

impl Sub for Complex {
    type Output = Complex;
    fn sub(self, other: Complex) -> Complex {
        Complex(self.0 - other.0)
    }
}

impl Mul for Complex {
    type Output = Complex;
    fn mul(self, other: Complex) -> Complex {
        Complex(self.0 * other.0)
    }
}

impl Neg for Complex {
    type Output = Complex;
    fn neg(self) -> Complex {
        Complex(-self.0)
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sign = if self.0.im < 0.0 { '-' } else { '+' };
        write!(f, "{} {} i{}", self.0.re, sign, self.0.im.abs())
    }
}

fn parse_part(s: &str, whole: &str) -> Result<f64, FractalError> {
    f64::from_str(s).map_err(|_| FractalError::Parse(whole.to_string()))
}

/// Accepts the forms a person types at the root prompt: `a`, `ib`,
/// `a + ib`, `a - ib`, `i`, `-i`, with or without spaces.  An `i`
/// with nothing after it means a coefficient of one.
impl FromStr for Complex {
    type Err = FractalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(FractalError::Parse(s.to_string()));
        }

        let (re, im) = match compact.find('i') {
            None => (parse_part(&compact, s)?, 0.0),
            Some(pos) => {
                let (real, sign) = match compact[..pos].chars().last() {
                    None => ("", 1.0),
                    Some('+') => (&compact[..pos - 1], 1.0),
                    Some('-') => (&compact[..pos - 1], -1.0),
                    Some(_) => return Err(FractalError::Parse(s.to_string())),
                };
                let real = if real.is_empty() { 0.0 } else { parse_part(real, s)? };
                let digits = &compact[pos + 1..];
                if digits.starts_with('+') || digits.starts_with('-') {
                    return Err(FractalError::Parse(s.to_string()));
                }
                let imag = if digits.is_empty() { 1.0 } else { parse_part(digits, s)? };
                (real, sign * imag)
            }
        };
        Complex::new(re, im)
    }
}
