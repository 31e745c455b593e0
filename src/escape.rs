//! The escape-time kernel, and the loop that runs it over a band.

use crate::color::{Palette, Pixel};
use crate::geometry::{bound_index, bound_length, map_coord_to_point, Point, WorkUnit};
use itertools::iproduct;
use num::Complex;

/// The most iterations any point gets.  Also the largest count
/// `escapes` can report, so a count always fits in a color channel.
pub const MAX_ITERATIONS: u8 = 255;

/// Iterate `z = z * z + c`, starting from `z = c`, and count how many
/// steps it takes before `|z|` reaches 2.  A point already at or past
/// 2 scores 0; a point that is still inside after `MAX_ITERATIONS`
/// steps scores `MAX_ITERATIONS`.
pub fn escapes(p: Point) -> u8 {
    let c: Complex<f64> = p.into();
    let mut z = c;
    for i in 0..MAX_ITERATIONS {
        if z.norm_sqr() >= 4.0 {
            return i;
        }
        z = z * z + c;
    }
    MAX_ITERATIONS
}

/// Compute every pixel of a band, row by row, in the band's own
/// row-major order.
pub fn render_band(work: &WorkUnit, palette: Palette) -> Vec<Pixel> {
    let bound = work.bound;
    let mut pixels = vec![Pixel::default(); bound_length(&bound)];
    for (row, column) in iproduct!(0..bound.height, 0..bound.width) {
        let count = escapes(map_coord_to_point(column, row, work));
        pixels[bound_index(column, row, &bound)] = palette.color(count);
    }
    pixels
}
