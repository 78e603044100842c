// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The error type shared by every fallible operation in the crate.
//! All of these are domain errors: they are raised when a value is
//! built or parsed, never in the middle of a render.

use failure::Fail;

/// Everything that can go wrong before a render request is submitted.
#[derive(Debug, Clone, PartialEq, Fail)]
pub enum FractalError {
    /// A complex number was built from NaN or an infinity.
    #[fail(display = "complex components must be finite, got ({}, {})", re, im)]
    NonFinite {
        /// The offending real part.
        re: f64,
        /// The offending imaginary part.
        im: f64,
    },

    /// Division by a complex number whose squared modulus is zero.
    #[fail(display = "division by zero")]
    DivisionByZero,

    /// Asked for the zeroth root of a complex number.
    #[fail(display = "root order must be at least 1")]
    ZeroRootOrder,

    /// A polynomial needs at least one coefficient.
    #[fail(display = "a polynomial needs at least one coefficient")]
    EmptyPolynomial,

    /// A distance threshold was NaN or negative.
    #[fail(display = "{} threshold must be a non-negative number, got {}", name, value)]
    InvalidThreshold {
        /// Which threshold.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The iteration limit must allow at least one Newton step.
    #[fail(display = "iteration limit must be positive")]
    NoIterations,

    /// More roots than a pixel slot can index.
    #[fail(display = "at most {} roots are supported, got {}", max, got)]
    TooManyRoots {
        /// The largest supported root count.
        max: usize,
        /// The supplied root count.
        got: usize,
    },

    /// A viewport with no pixels or with non-finite bounds.
    #[fail(display = "invalid viewport: {}", _0)]
    InvalidViewport(String),

    /// Worker or track counts must be positive.
    #[fail(display = "{} count must be positive", _0)]
    NonPositiveCount(&'static str),

    /// Could not make a complex number out of some text.
    #[fail(display = "could not parse '{}' as a complex number", _0)]
    Parse(String),

    /// Input ended before enough roots were read.
    #[fail(display = "at least {} roots are required, got {}", needed, got)]
    NotEnoughRoots {
        /// The minimum number of roots.
        needed: usize,
        /// How many were supplied.
        got: usize,
    },

    /// A worker thread panicked while rendering.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,

    /// Reading roots or writing prompts failed.
    #[fail(display = "i/o error: {}", _0)]
    Io(String),
}

impl From<std::io::Error> for FractalError {
    fn from(e: std::io::Error) -> Self {
        FractalError::Io(e.to_string())
    }
}
