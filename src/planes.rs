// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Viewport struct, which describes a relationship
//! between a rectangle of pixels with an origin at 0,0 in the upper
//! left corner, and a rectangle on the complex plane bounded by
//! `re_min..re_max` and `im_min..im_max`.
//!
//! Pixel rows grow downward and the imaginary axis grows upward, so
//! row 0 maps to `im_max` and the last row maps to `im_min`.

use crate::complex::Complex;
use crate::errors::FractalError;

/// Describes the x, y of a pixel in the image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The mapping between an image `width` by `height` pixels and a
/// rectangle on the complex plane.  The corner pixels land exactly on
/// the corners of the rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Real part of the left edge.
    pub re_min: f64,
    /// Real part of the right edge.
    pub re_max: f64,
    /// Imaginary part of the bottom edge.
    pub im_min: f64,
    /// Imaginary part of the top edge.
    pub im_max: f64,
    /// Width of the image in pixels.
    pub width: usize,
    /// Height of the image in pixels.
    pub height: usize,
}

// Linear interpolation of `t` from [t0, t1] onto [a, b].  A degenerate
// source interval maps everything onto `b`.
fn lerp(t: f64, t0: f64, t1: f64, a: f64, b: f64) -> f64 {
    if t0 == t1 {
        return b;
    }
    a + (t - t0) / (t1 - t0) * (b - a)
}

impl Viewport {
    /// Constructor.  The bounds must be finite and the image must
    /// contain at least one pixel, and no more than fit in memory with
    /// each side addressable by a `u32`.  Inverted bounds are allowed and
    /// simply mirror the picture.
    pub fn new(
        re_min: f64,
        re_max: f64,
        im_min: f64,
        im_max: f64,
        width: usize,
        height: usize,
    ) -> Result<Self, FractalError> {
        let spans = [re_max - re_min, im_max - im_min];
        if ![re_min, re_max, im_min, im_max].iter().chain(&spans).all(|b| b.is_finite()) {
            return Err(FractalError::InvalidViewport(
                "the bounds of the complex plane must be finite".to_string(),
            ));
        }
        if width == 0 || height == 0 {
            return Err(FractalError::InvalidViewport(format!(
                "an image of {}x{} has no pixels",
                width, height
            )));
        }
        // Images are addressed with u32 coordinates when painted.
        let limit = u32::MAX as usize;
        if width > limit || height > limit || width.checked_mul(height).is_none() {
            return Err(FractalError::InvalidViewport(format!(
                "an image of {}x{} is too large",
                width, height
            )));
        }
        Ok(Viewport {
            re_min,
            re_max,
            im_min,
            im_max,
            width,
            height,
        })
    }

    /// Builds a viewport from its lower-left and upper-right corners.
    pub fn from_corners(
        width: usize,
        height: usize,
        leftlower: Complex,
        rightupper: Complex,
    ) -> Result<Self, FractalError> {
        Viewport::new(
            leftlower.re(),
            rightupper.re(),
            leftlower.im(),
            rightupper.im(),
            width,
            height,
        )
    }

    /// The total number of pixels.  Used to size the output buffer.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Never true for a constructed viewport; here to pair with `len`.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Given a pixel, return the point on the complex plane it covers.
    /// Column 0 is `re_min`, the last column `re_max`; row 0 is
    /// `im_max`, the last row `im_min`.  A one-pixel-wide image sits
    /// on `re_max` and a one-pixel-high image on `im_max`.
    pub fn pixel_to_point(&self, pixel: Pixel) -> Complex {
        let re = lerp(
            pixel.0 as f64,
            0.0,
            (self.width - 1) as f64,
            self.re_min,
            self.re_max,
        );
        let im = lerp(
            pixel.1 as f64,
            (self.height - 1) as f64,
            0.0,
            self.im_min,
            self.im_max,
        );
        // Both spans were checked at construction, so re and im are finite.
        Complex::new(re, im).unwrap_or(Complex::ZERO)
    }

    /// The row-major offset of a pixel in the output buffer.
    pub fn offset(&self, pixel: Pixel) -> usize {
        pixel.1 * self.width + pixel.0
    }
}
