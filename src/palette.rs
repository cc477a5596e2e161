// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colours, and blending between them.  A palette is an ordered list
//! of colours; a real number in `[0, 1]` picks a position along that
//! list, and the colour there is a straight-line blend of its two
//! neighbours.  Because whoever said array indexes must be integers
//! lacked imagination.

use num::clamp;
use std::str::FromStr;

use crate::errors::RenderError;

/// An RGB colour with each channel in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    /// Red
    pub r: f64,
    /// Green
    pub g: f64,
    /// Blue
    pub b: f64,
}

impl Color {
    /// Constructor.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Color { r, g, b }
    }

    /// Convert to 8-bit RGBA, fully opaque.  Channels are rounded to
    /// the nearest byte value; anything outside `[0, 1]` is clamped
    /// first.
    pub fn to_rgba(&self) -> [u8; 4] {
        [to_byte(self.r), to_byte(self.g), to_byte(self.b), 255]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::new(0.0, 0.0, 0.0)
    }
}

#[inline]
fn to_byte(channel: f64) -> u8 {
    (clamp(channel, 0.0, 1.0) * 255.0).round() as u8
}

/// Parses `r,g,b` with each channel a float in `[0, 1]`.
impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let channels = s
            .split(',')
            .map(|c| f64::from_str(c.trim()))
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|e| format!("Could not parse colour '{}': {}", s, e))?;
        match channels.as_slice() {
            [r, g, b] if channels.iter().all(|c| *c >= 0.0 && *c <= 1.0) => {
                Ok(Color::new(*r, *g, *b))
            }
            [_, _, _] => Err(format!("Colour channels must lie in [0, 1]: '{}'", s)),
            _ => Err(format!("A colour needs exactly three channels: '{}'", s)),
        }
    }
}

/// Black, red, yellow, green, cyan, blue, magenta, white.
pub const RAINBOW: [Color; 8] = [
    Color::new(0.0, 0.0, 0.0),
    Color::new(1.0, 0.0, 0.0),
    Color::new(1.0, 1.0, 0.0),
    Color::new(0.0, 1.0, 0.0),
    Color::new(0.0, 1.0, 1.0),
    Color::new(0.0, 0.0, 1.0),
    Color::new(1.0, 0.0, 1.0),
    Color::new(1.0, 1.0, 1.0),
];

/// Piecewise-linear interpolation into a list of values, treating `i`
/// in `[0, 1]` as a position from the first entry to the last.
/// Positions outside that range (and NaN) clamp to the ends.  `values`
/// must not be empty; `Palette` guarantees that.
fn lerp_array(values: &[f64], i: f64) -> f64 {
    let last = values.len() - 1;
    if i.is_nan() || i <= 0.0 {
        return values[0];
    }
    if i >= 1.0 {
        return values[last];
    }
    let position = i * (last as f64);
    let index = position.floor() as usize;
    if index >= last {
        return values[last];
    }
    let fraction = position - index as f64;
    values[index] + (values[index + 1] - values[index]) * fraction
}

/// An ordered, non-empty list of colours, kept alongside one list of
/// values per channel so that blending never has to rebuild them.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
    channels: [Vec<f64>; 3],
}

impl Palette {
    /// Constructor.  An empty list cannot be interpolated, so it is
    /// refused.
    pub fn new(colors: Vec<Color>) -> Result<Palette, RenderError> {
        if colors.is_empty() {
            return Err(RenderError::InvalidPalette);
        }
        Ok(Palette::unchecked(colors))
    }

    fn unchecked(colors: Vec<Color>) -> Palette {
        let channels = [
            colors.iter().map(|c| c.r).collect(),
            colors.iter().map(|c| c.g).collect(),
            colors.iter().map(|c| c.b).collect(),
        ];
        Palette { colors, channels }
    }

    /// The colours, in order.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Blend the palette at position `i`.  Each channel is interpolated
    /// on its own.
    pub fn interpolate(&self, i: f64) -> Color {
        Color::new(
            lerp_array(&self.channels[0], i),
            lerp_array(&self.channels[1], i),
            lerp_array(&self.channels[2], i),
        )
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::unchecked(RAINBOW.to_vec())
    }
}
