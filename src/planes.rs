// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Viewport struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0
//! (the pixel buffer), and a window onto the complex plane described
//! by a zoom factor and a pan offset.
use num::Complex;

use crate::errors::RenderError;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the x, y of a pixel in the integral plane.  x grows to
/// the right, y grows downwards.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Linearly remap `value` from the range `[in_min, in_max]` onto
/// `[out_min, out_max]`.  Values outside the input range extrapolate.
#[inline]
pub fn remap(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
}

/// Maps pixels of a buffer onto the complex plane.  Each pixel axis
/// is squeezed into `[-0.5, 0.5]`, shifted by `offset`, and then the
/// whole thing is multiplied by `scale`; a scale of 4 therefore shows
/// a window four units across.

#[derive(Copy, Clone, Debug)]
pub struct Viewport {
    /// The size of the pixel buffer.
    pub integral_plane: IntegralPlane,
    /// Zoom factor.  Larger values zoom out.
    pub scale: f64,
    /// Pan applied before scaling.
    pub offset: Complex<f64>,
}

impl Viewport {
    /// Constructor.  Refuses buffers with no area, since the remap
    /// would divide by zero, buffers whose RGBA byte count overflows
    /// `usize`, and scales that are not positive.
    pub fn new(
        width: usize,
        height: usize,
        scale: f64,
        offset: Complex<f64>,
    ) -> Result<Viewport, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::DegenerateBuffer(width, height));
        }

        if width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(4))
            .is_none()
        {
            return Err(RenderError::FrameTooLarge(width, height));
        }

        if !scale.is_finite() || scale <= 0.0 {
            return Err(RenderError::InvalidScale(scale));
        }

        Ok(Viewport {
            integral_plane: IntegralPlane(width, height),
            scale,
            offset,
        })
    }

    /// The total number of pixels in the integral grid.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Always false for a constructed viewport; here for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Given a pixel on the integral cartesian plane, return the
    /// complex number it stands for.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let IntegralPlane(width, height) = self.integral_plane;
        let normal = Complex::new(
            remap(pixel.0 as f64, 0.0, width as f64, -0.5, 0.5),
            remap(pixel.1 as f64, 0.0, height as f64, -0.5, 0.5),
        );
        (normal + self.offset) * self.scale
    }
}
