// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The ways a render call can be refused.  Every check happens before
//! the first byte of the caller's buffer is touched, so a failed call
//! leaves the buffer exactly as it was handed in.

use failure::Fail;

/// Errors raised by the viewport, the palette, and the frame renderer.
#[derive(Debug, Clone, PartialEq, Fail)]
pub enum RenderError {
    /// Interpolating over zero colours has no answer.
    #[fail(display = "The palette must contain at least one colour")]
    InvalidPalette,

    /// Width or height is zero.  The renderer treats this as a no-op;
    /// only the viewport constructor reports it.
    #[fail(display = "The buffer has no area ({}x{})", _0, _1)]
    DegenerateBuffer(usize, usize),

    /// The pixel buffer is not `width * height * 4` bytes long.
    #[fail(
        display = "The buffer holds {} bytes, but the frame needs {}",
        actual, expected
    )]
    BufferSize {
        /// Bytes required by the frame dimensions.
        expected: usize,
        /// Bytes actually supplied.
        actual: usize,
    },

    /// `width * height` RGBA pixels do not fit in the address space.
    #[fail(display = "A {}x{} frame is too large to address", _0, _1)]
    FrameTooLarge(usize, usize),

    /// Scale must be finite and greater than zero.
    #[fail(display = "The scale must be a positive number, not {}", _0)]
    InvalidScale(f64),
}
