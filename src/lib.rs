#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Newton-Raphson fractal renderer
//!
//! Pick a handful of points on the complex plane and build the
//! polynomial that has exactly those points as its roots.  Then, for
//! every pixel of an image laid over the plane, start Newton's method
//! at the point the pixel covers and follow it until it settles.
//! Colour the pixel by the root it settled on.  The borders between
//! the basins of attraction are fractal.
//!
//! The image is cut into horizontal bands which a pool of worker
//! threads pulls from a shared queue.  Each band owns its own slice of
//! the output buffer, so the workers never need to lock anything, and
//! a shared flag lets a caller abandon a render part way through.
//!
//! ```
//! use std::sync::atomic::AtomicBool;
//! use newton::{
//!     Complex, ComplexRootedPolynomial, FractalProducer, IterationConfig, NewtonRaphson,
//!     ParallelProducer, SchedulerConfig, Viewport,
//! };
//!
//! let roots = vec![Complex::new(-1.0, 0.0).unwrap(), Complex::ONE];
//! let rooted = ComplexRootedPolynomial::new(Complex::ONE, roots);
//! let newton = NewtonRaphson::new(rooted, IterationConfig::default()).unwrap();
//! let producer = ParallelProducer::new(newton, SchedulerConfig::new(2, 8).unwrap());
//! let viewport = Viewport::new(-2.0, 2.0, -2.0, 2.0, 32, 32).unwrap();
//!
//! let mut colors = 0;
//! producer
//!     .produce(&viewport, 1, &AtomicBool::new(false), |_buffer, n, _id| colors = n)
//!     .unwrap();
//! assert_eq!(colors, 3);
//! ```

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod complex;
pub mod errors;
pub mod input;
pub mod newton;
pub mod painter;
pub mod planes;
pub mod polynomial;
pub mod scheduler;

pub use complex::Complex;
pub use errors::FractalError;
pub use newton::{IterationConfig, NewtonRaphson};
pub use planes::{Pixel, Viewport};
pub use polynomial::{ComplexPolynomial, ComplexRootedPolynomial};
pub use scheduler::{FractalProducer, ParallelProducer, SchedulerConfig};
