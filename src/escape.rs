// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time iterator.  Take a point, square it and add a
//! constant, over and over, and count how long it takes for either
//! component to wander past `BOUNDS`.  The Mandelbrot and the Julia
//! sets run the very same recurrence; they differ only in where `z`
//! starts and what `c` is.

use num::Complex;

/// The maximum number of update steps per point.
pub const MAX: usize = 100;

/// If either component of `z` exceeds this in magnitude, the point has escaped.
pub const BOUNDS: f64 = 16.0;

/// Which member of the quadratic family to draw.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FractalMode {
    /// `c` is the pixel's own point, and so is the starting `z`.
    Mandelbrot,
    /// `c` is fixed for the whole frame; `z` starts at the pixel's point.
    Julia(Complex<f64>),
}

impl Default for FractalMode {
    fn default() -> Self {
        FractalMode::Mandelbrot
    }
}

impl FractalMode {
    /// Derive the starting value and the constant for a point.
    #[inline]
    pub fn seed(&self, point: Complex<f64>) -> (Complex<f64>, Complex<f64>) {
        match *self {
            FractalMode::Mandelbrot => (point, point),
            FractalMode::Julia(c) => (point, c),
        }
    }

    /// A Julia mode using one of the named presets.
    pub fn julia_preset(name: &str) -> Option<FractalMode> {
        julia_preset(name).map(FractalMode::Julia)
    }
}

/// Well-known Julia constants, by letter.
pub const JULIA_PRESETS: [(&str, f64, f64); 9] = [
    ("a", -0.4, 0.6),
    ("b", 0.285, 0.0),
    ("c", 0.285, 0.1),
    ("d", 0.45, 0.1428),
    ("e", -0.70176, -0.3842),
    ("f", -0.835, -0.2321),
    ("g", -0.8, 0.156),
    ("h", -0.7269, 0.1889),
    ("i", 0.0, -0.8),
];

/// Look up a Julia constant by its preset letter.
pub fn julia_preset(name: &str) -> Option<Complex<f64>> {
    JULIA_PRESETS
        .iter()
        .find(|(key, _, _)| *key == name)
        .map(|&(_, re, im)| Complex::new(re, im))
}

/// This is our classic iterator function.  It returns the step on
/// which `z` first escaped, counting from 1, or `MAX + 1` if it never
/// did.  The square is expanded by hand so the arithmetic is exactly
/// `(re² - im², 2·re·im)`.
pub fn iterate(z0: Complex<f64>, c: Complex<f64>) -> usize {
    let mut z = z0;
    for n in 1..=MAX {
        z = Complex::new(z.re * z.re - z.im * z.im, 2.0 * z.re * z.im) + c;
        if z.re.abs() > BOUNDS || z.im.abs() > BOUNDS {
            return n;
        }
    }
    MAX + 1
}

/// The escape time of a plane point under the given mode.
#[inline]
pub fn escape_time(point: Complex<f64>, mode: &FractalMode) -> usize {
    let (z0, c) = mode.seed(point);
    iterate(z0, c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn origin_never_escapes_the_mandelbrot() {
        assert_eq!(escape_time(Complex::new(0.0, 0.0), &FractalMode::Mandelbrot), MAX + 1);
    }

    #[test]
    fn far_points_escape_on_the_first_step() {
        assert_eq!(escape_time(Complex::new(20.0, 0.0), &FractalMode::Mandelbrot), 1);
        assert_eq!(escape_time(Complex::new(0.0, -5.0), &FractalMode::Mandelbrot), 1);
    }

    #[test]
    fn escape_is_counted_per_step() {
        // 2 -> 6 -> 38: out on the second step.
        assert_eq!(iterate(Complex::new(2.0, 0.0), Complex::new(2.0, 0.0)), 2);
        // Bounded on the real axis at -2: -2 -> 2 -> 2 -> ...
        assert_eq!(iterate(Complex::new(-2.0, 0.0), Complex::new(-2.0, 0.0)), MAX + 1);
    }

    #[test]
    fn the_bound_is_strict() {
        // The first step lands exactly on the bound, which is not an escape.
        assert_eq!(iterate(Complex::new(0.0, 0.0), Complex::new(16.0, 0.0)), 2);
    }

    #[test]
    fn julia_uses_the_fixed_constant() {
        let mode = FractalMode::Julia(Complex::new(20.0, 0.0));
        assert_eq!(escape_time(Complex::new(0.0, 0.0), &mode), 1);
        assert_eq!(
            mode.seed(Complex::new(1.0, 2.0)),
            (Complex::new(1.0, 2.0), Complex::new(20.0, 0.0))
        );
    }

    #[test]
    fn presets_are_found_by_letter() {
        assert_eq!(julia_preset("a"), Some(Complex::new(-0.4, 0.6)));
        assert_eq!(julia_preset("i"), Some(Complex::new(0.0, -0.8)));
        assert_eq!(julia_preset("z"), None);
        assert_eq!(
            FractalMode::julia_preset("e"),
            Some(FractalMode::Julia(Complex::new(-0.70176, -0.3842)))
        );
    }

    #[test]
    fn counts_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..2000 {
            let point = Complex::new(rng.gen_range(-3.0, 3.0), rng.gen_range(-3.0, 3.0));
            let constant = Complex::new(rng.gen_range(-1.0, 1.0), rng.gen_range(-1.0, 1.0));
            for mode in &[FractalMode::Mandelbrot, FractalMode::Julia(constant)] {
                let n = escape_time(point, mode);
                assert!(n >= 1 && n <= MAX + 1, "{} out of range for {:?}", n, point);
            }
        }
    }

    #[test]
    fn iteration_is_deterministic() {
        let point = Complex::new(-0.7435, 0.1314);
        let first = escape_time(point, &FractalMode::Mandelbrot);
        assert_eq!(first, escape_time(point, &FractalMode::Mandelbrot));
    }
}
