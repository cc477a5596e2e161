// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The frame renderer.  For every pixel of the caller's buffer: map
//! it onto the complex plane, count how long it takes to escape, turn
//! that count into a palette position, and write the colour out as
//! RGBA.  No pixel cares about any other pixel, so the threaded
//! version simply hands each thread its own band of rows.

use itertools::iproduct;
use log::{debug, trace};
use num::Complex;
use std::time::Instant;

use crate::errors::RenderError;
use crate::escape::{escape_time, FractalMode, MAX};
use crate::palette::{Color, Palette, RAINBOW};
use crate::planes::{remap, Pixel, Viewport};

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// Everything about a frame except its size.  Plain data; build one,
/// hand it to `render` as often as needed.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderParams {
    /// Colour the buffer is cleared to before the fractal is drawn.
    pub background: Color,
    /// Control points for colouring escape times.  Must not be empty.
    pub palette: Vec<Color>,
    /// Width of the visible window on the complex plane.
    pub scale: f64,
    /// Pan, in units of the window.
    pub offset: Complex<f64>,
    /// Mandelbrot, or Julia with its constant.
    pub mode: FractalMode,
}

impl Default for RenderParams {
    fn default() -> Self {
        RenderParams {
            background: Color::new(0.0, 0.0, 0.0),
            palette: RAINBOW.to_vec(),
            scale: 4.0,
            offset: Complex::new(-0.15, 0.001),
            mode: FractalMode::Mandelbrot,
        }
    }
}

/// A validated frame: the viewport for a particular buffer size, the
/// palette, and the mode.  Once built it cannot fail.
pub struct FrameRenderer {
    viewport: Viewport,
    palette: Palette,
    background: [u8; 4],
    mode: FractalMode,
}

impl FrameRenderer {
    /// Checks the parameters against the buffer dimensions.  Fails on
    /// an empty palette, a bad scale, a zero-area buffer, or a frame too
    /// large to address.
    pub fn new(width: usize, height: usize, params: &RenderParams) -> Result<Self, RenderError> {
        let palette = Palette::new(params.palette.clone())?;
        let viewport = Viewport::new(width, height, params.scale, params.offset)?;
        Ok(FrameRenderer {
            viewport,
            palette,
            background: params.background.to_rgba(),
            mode: params.mode,
        })
    }

    /// The number of bytes a buffer for this frame must hold.  Cannot
    /// overflow; `Viewport::new` refuses frames where it would.
    pub fn buffer_len(&self) -> usize {
        self.viewport.len() * CHANNELS
    }

    fn check(&self, buffer: &[u8]) -> Result<(), RenderError> {
        if buffer.len() != self.buffer_len() {
            return Err(RenderError::BufferSize {
                expected: self.buffer_len(),
                actual: buffer.len(),
            });
        }
        Ok(())
    }

    /// The colour of a single pixel, as RGBA bytes.
    pub fn shade(&self, pixel: &Pixel) -> [u8; 4] {
        let point = self.viewport.pixel_to_point(pixel);
        let n = escape_time(point, &self.mode);
        // Points that never escape land just past 1.0; the palette
        // clamps them to its last entry.
        let position = remap(n as f64, 0.0, MAX as f64, 0.0, 1.0);
        self.palette.interpolate(position).to_rgba()
    }

    fn clear(&self, buffer: &mut [u8]) {
        for pixel in buffer.chunks_mut(CHANNELS) {
            pixel.copy_from_slice(&self.background);
        }
    }

    /// Render a band of whole rows.  `band` starts at the first byte of
    /// row `top`.
    fn render_rows(&self, band: &mut [u8], top: usize) {
        let width = self.viewport.integral_plane.0;
        let rows = band.len() / (width * CHANNELS);
        for (row, column) in iproduct!(0..rows, 0..width) {
            let offset = (row * width + column) * CHANNELS;
            let rgba = self.shade(&Pixel(column, top + row));
            band[offset..offset + CHANNELS].copy_from_slice(&rgba);
        }
    }

    /// The main function for single-threaded renders.
    pub fn render_single(&self, buffer: &mut [u8]) -> Result<(), RenderError> {
        self.check(buffer)?;
        let started = Instant::now();
        self.clear(buffer);
        self.render_rows(buffer, 0);
        debug!(
            "Rendered {}x{} frame in {:?}",
            self.viewport.integral_plane.0,
            self.viewport.integral_plane.1,
            started.elapsed()
        );
        Ok(())
    }

    /// A multi-threaded version of the render function.  The buffer is
    /// cut into contiguous bands of rows, one per thread; the bands
    /// never overlap, so the threads need no locking.
    pub fn render_threaded(&self, buffer: &mut [u8], threads: usize) -> Result<(), RenderError> {
        self.check(buffer)?;
        let started = Instant::now();
        self.clear(buffer);

        let width = self.viewport.integral_plane.0;
        let height = self.viewport.integral_plane.1;
        let threads = threads.max(1).min(height);
        let rows_per_band = (height + threads - 1) / threads;
        let band_len = rows_per_band * width * CHANNELS;

        let outcome = crossbeam::scope(|spawner| {
            for (index, band) in buffer.chunks_mut(band_len).enumerate() {
                let top = index * rows_per_band;
                let rows = band.len() / (width * CHANNELS);
                trace!("Band {} covers rows {}..{}", index, top, top + rows);
                spawner.spawn(move |_| self.render_rows(band, top));
            }
        });
        if let Err(panic) = outcome {
            std::panic::resume_unwind(panic);
        }

        debug!(
            "Rendered {}x{} frame on {} threads in {:?}",
            width,
            height,
            threads,
            started.elapsed()
        );
        Ok(())
    }
}

/// Fill `buffer` (`width * height` RGBA pixels, row-major, top-left
/// origin) with the fractal described by `params`.  A buffer with no
/// area is left alone.  Nothing is written unless every check passes.
pub fn render(
    buffer: &mut [u8],
    width: usize,
    height: usize,
    params: &RenderParams,
) -> Result<(), RenderError> {
    render_threaded(buffer, width, height, params, 1)
}

/// As `render`, spreading the rows over `threads` threads.  The output
/// is identical whatever the thread count.
pub fn render_threaded(
    buffer: &mut [u8],
    width: usize,
    height: usize,
    params: &RenderParams,
    threads: usize,
) -> Result<(), RenderError> {
    if width == 0 || height == 0 {
        debug!("Skipping render of empty {}x{} frame", width, height);
        return Ok(());
    }
    let renderer = FrameRenderer::new(width, height, params)?;
    if threads <= 1 {
        renderer.render_single(buffer)
    } else {
        renderer.render_threaded(buffer, threads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANDELBROT_2X2: [u8; 16] = [
        36, 0, 0, 255, 36, 0, 0, 255, //
        54, 0, 0, 255, 255, 255, 255, 255,
    ];

    const JULIA_A_2X2: [u8; 16] = [
        36, 0, 0, 255, 36, 0, 0, 255, //
        36, 0, 0, 255, 255, 48, 0, 255,
    ];

    fn julia_a() -> RenderParams {
        RenderParams {
            mode: FractalMode::julia_preset("a").unwrap(),
            ..RenderParams::default()
        }
    }

    #[test]
    fn default_mandelbrot_matches_baseline() {
        let mut buffer = vec![0u8; 16];
        render(&mut buffer, 2, 2, &RenderParams::default()).unwrap();
        assert_eq!(buffer, MANDELBROT_2X2.to_vec());
        assert!(buffer.chunks(4).all(|p| p[3] == 255));
    }

    #[test]
    fn julia_preset_matches_baseline_and_differs() {
        let mut buffer = vec![0u8; 16];
        render(&mut buffer, 2, 2, &julia_a()).unwrap();
        assert_eq!(buffer, JULIA_A_2X2.to_vec());
        assert_ne!(buffer, MANDELBROT_2X2.to_vec());
    }

    #[test]
    fn renders_are_deterministic() {
        let params = RenderParams::default();
        let mut first = vec![0u8; 31 * 17 * 4];
        let mut second = vec![1u8; 31 * 17 * 4];
        render(&mut first, 31, 17, &params).unwrap();
        render(&mut second, 31, 17, &params).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn threaded_matches_single() {
        let params = julia_a();
        let (width, height) = (37, 23);
        let mut single = vec![0u8; width * height * 4];
        render(&mut single, width, height, &params).unwrap();
        for threads in &[2, 3, 4, 8, 64] {
            let mut threaded = vec![0u8; width * height * 4];
            render_threaded(&mut threaded, width, height, &params, *threads).unwrap();
            assert_eq!(single, threaded, "{} threads", threads);
        }
    }

    #[test]
    fn origin_is_coloured_as_never_escaping() {
        // With no pan and a scale of 1, pixel (2, 2) of a 4x4 buffer is 0+0i.
        let params = RenderParams {
            scale: 1.0,
            offset: Complex::new(0.0, 0.0),
            ..RenderParams::default()
        };
        let renderer = FrameRenderer::new(4, 4, &params).unwrap();
        assert_eq!(renderer.shade(&Pixel(2, 2)), [255, 255, 255, 255]);
    }

    #[test]
    fn empty_frames_are_a_no_op() {
        let mut buffer: Vec<u8> = vec![];
        assert_eq!(render(&mut buffer, 0, 0, &RenderParams::default()), Ok(()));
        let mut buffer = vec![7u8; 8];
        assert_eq!(render(&mut buffer, 0, 2, &RenderParams::default()), Ok(()));
        assert_eq!(buffer, vec![7u8; 8]);
    }

    #[test]
    fn empty_palettes_write_nothing() {
        let params = RenderParams {
            palette: vec![],
            ..RenderParams::default()
        };
        let mut buffer = vec![7u8; 16];
        assert_eq!(render(&mut buffer, 2, 2, &params), Err(RenderError::InvalidPalette));
        assert_eq!(buffer, vec![7u8; 16]);
    }

    #[test]
    fn wrong_sized_buffers_write_nothing() {
        let mut buffer = vec![7u8; 15];
        assert_eq!(
            render(&mut buffer, 2, 2, &RenderParams::default()),
            Err(RenderError::BufferSize {
                expected: 16,
                actual: 15
            })
        );
        assert_eq!(buffer, vec![7u8; 15]);
    }

    #[test]
    fn oversized_frames_are_refused() {
        let mut buffer: Vec<u8> = vec![];
        let (width, height) = (usize::max_value() / 2, 3);
        assert_eq!(
            render(&mut buffer, width, height, &RenderParams::default()),
            Err(RenderError::FrameTooLarge(width, height))
        );
        assert_eq!(
            render_threaded(&mut buffer, width, height, &RenderParams::default(), 4),
            Err(RenderError::FrameTooLarge(width, height))
        );
        assert!(buffer.is_empty());
    }

    #[test]
    fn empty_palettes_on_empty_frames_are_a_no_op() {
        let params = RenderParams {
            palette: vec![],
            ..RenderParams::default()
        };
        let mut buffer = vec![7u8; 8];
        assert_eq!(render(&mut buffer, 2, 0, &params), Ok(()));
        assert_eq!(render_threaded(&mut buffer, 0, 0, &params, 3), Ok(()));
        assert_eq!(buffer, vec![7u8; 8]);
    }

    #[test]
    fn bad_scales_are_refused() {
        let params = RenderParams {
            scale: -1.0,
            ..RenderParams::default()
        };
        let mut buffer = vec![0u8; 16];
        assert_eq!(render(&mut buffer, 2, 2, &params), Err(RenderError::InvalidScale(-1.0)));
    }

    #[test]
    fn single_colour_palettes_paint_everything() {
        let params = RenderParams {
            palette: vec![Color::new(0.0, 1.0, 0.0)],
            background: Color::new(1.0, 0.0, 0.0),
            ..RenderParams::default()
        };
        let mut buffer = vec![0u8; 5 * 3 * 4];
        render_threaded(&mut buffer, 5, 3, &params, 2).unwrap();
        assert!(buffer.chunks(4).all(|p| p == [0, 255, 0, 255]));
    }
}
