#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Banded Mandelbrot renderer
//!
//! The Mandelbrot set takes a point on the complex plane, repeatedly
//! squares it and adds the original point back in, and measures how
//! quickly the result runs off to infinity.  That "escape time" is
//! the number used to color the pixel.
//!
//! This crate splits one image into horizontal bands, hands one band
//! to each member of a fixed-size process group, lets every member
//! compute its band independently, and reassembles the bands on the
//! coordinator (rank 0).  Work descriptions and pixels only ever
//! cross between participants as encoded bytes with a fixed wire
//! layout, so the pipeline is indifferent to whether a participant
//! is a thread, a process, or a machine.
//!
//! The pipeline is exactly one scatter of work units followed by
//! exactly one gather of pixels.  There is no load balancing and no
//! recovery: a participant that stalls stalls the whole render.

extern crate bincode;
extern crate clap;
extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;
extern crate serde;

pub mod color;
pub mod config;
pub mod error;
pub mod escape;
pub mod geometry;
pub mod group;
pub mod partition;
pub mod pipeline;
pub mod sink;
pub mod wire;

pub use color::{Palette, Pixel, PixelHsv};
pub use config::RenderConfig;
pub use error::{RenderError, Result};
pub use geometry::{Bound, Point, Rect, RectSize, WorkUnit};
pub use group::{Communicator, ProcessGroup};
pub use partition::partition;
pub use pipeline::{render, Image};
pub use sink::{FileSink, ImageSink, MemorySink};
