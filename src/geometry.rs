//! Contains the value types describing the two planes the renderer
//! works with: an integral pixel grid with its origin at the upper
//! left, and a rectangle of the complex plane with y increasing
//! upward.  A `WorkUnit` pairs one of each, and
//! `map_coord_to_point` maps pixels of the former into points of the
//! latter.
use num::Complex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A location on the complex plane, treating the real part as x and
/// the imaginary part as y.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Real component.
    pub x: f64,
    /// Imaginary component.
    pub y: f64,
}

impl Point {
    /// Constructor.
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }
}

impl From<Point> for Complex<f64> {
    fn from(p: Point) -> Complex<f64> {
        Complex::new(p.x, p.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// The extent of a region of the complex plane.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectSize {
    /// Extent along the real axis.
    pub width: f64,
    /// Extent along the imaginary axis.
    pub height: f64,
}

impl RectSize {
    /// Constructor.
    pub fn new(width: f64, height: f64) -> RectSize {
        RectSize { width, height }
    }
}

/// An axis-aligned rectangle of the complex plane.  `ul` is to the
/// left of and above `lr`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Upper-left corner.
    pub ul: Point,
    /// Lower-right corner.
    pub lr: Point,
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} x {}", self.ul, self.lr)
    }
}

/// The width and height of a pixel grid whose upper-left pixel is 0,0.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bound {
    /// Columns.
    pub width: u32,
    /// Rows.
    pub height: u32,
}

impl Bound {
    /// Constructor.
    pub fn new(width: u32, height: u32) -> Bound {
        Bound { width, height }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

/// One participant's share of a render: the pixels it must produce
/// and the part of the plane those pixels cover.  Field order is the
/// wire order.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkUnit {
    /// Pixel dimensions of the band.
    pub bound: Bound,
    /// The slice of the plane the band covers.
    pub region: Rect,
}

impl fmt::Display for WorkUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "WorkUnit {} region {}", self.bound, self.region)
    }
}

/// The rectangle of extent `size` centered on `center`.
pub fn make_rect(center: Point, size: RectSize) -> Rect {
    Rect {
        ul: Point::new(center.x - size.width / 2.0, center.y + size.height / 2.0),
        lr: Point::new(center.x + size.width / 2.0, center.y - size.height / 2.0),
    }
}

/// Extent of `r` along the real axis.
pub fn rect_width(r: &Rect) -> f64 {
    r.lr.x - r.ul.x
}

/// Extent of `r` along the imaginary axis.  Positive because `ul` is
/// above `lr`.
pub fn rect_height(r: &Rect) -> f64 {
    r.ul.y - r.lr.y
}

/// Row-major offset of pixel `x, y` in a buffer shaped like `bound`.
///
/// Asking for a pixel outside the bound is a partitioning or mapping
/// bug, not a condition callers can recover from, so it panics.
pub fn bound_index(x: u32, y: u32, bound: &Bound) -> usize {
    assert!(x < bound.width, "column {} outside bound {}", x, bound);
    assert!(y < bound.height, "row {} outside bound {}", y, bound);
    (y as usize) * (bound.width as usize) + (x as usize)
}

/// The total number of pixels in the grid.
pub fn bound_length(bound: &Bound) -> usize {
    (bound.width as usize) * (bound.height as usize)
}

/// Given the column and row of a pixel inside `work.bound`, return the
/// point of `work.region` it samples.  Every participant maps through
/// this one function, which is what keeps adjacent bands seamless.
pub fn map_coord_to_point(x: u32, y: u32, work: &WorkUnit) -> Point {
    let region = &work.region;
    Point {
        x: region.ul.x + (rect_width(region) / f64::from(work.bound.width)) * f64::from(x),
        y: region.ul.y - (rect_height(region) / f64::from(work.bound.height)) * f64::from(y),
    }
}
