#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time fractal renderer
//!
//! The Mandelbrot and Julia sets are drawn by the same trick: take a
//! point on the complex plane, repeatedly square it and add a
//! constant, and count how many steps it takes to run away.  That
//! count, the "escape time", picks a colour from a palette.  Points
//! that never run away within the iteration budget get the far end of
//! the palette.
//!
//! The Mandelbrot uses each pixel's own point as the constant; a
//! Julia set fixes one constant for the whole picture and varies only
//! the starting point.
//!
//! Rendering writes straight into a caller-owned RGBA buffer, and is
//! stateless: the same inputs always produce the same bytes.

extern crate crossbeam;
extern crate failure;
extern crate itertools;
extern crate log;
extern crate num;

pub mod errors;
pub mod escape;
pub mod palette;
pub mod planes;
pub mod renderer;

pub use crate::errors::RenderError;
pub use crate::escape::{escape_time, iterate, julia_preset, FractalMode, BOUNDS, MAX};
pub use crate::palette::{Color, Palette, RAINBOW};
pub use crate::planes::{Pixel, Viewport};
pub use crate::renderer::{render, render_threaded, FrameRenderer, RenderParams};
