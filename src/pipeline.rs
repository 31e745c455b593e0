// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The two roles of a render and the entry point that runs them.
//!
//! The coordinator (rank 0) partitions the image, scatters one work
//! unit to every rank including itself, computes its own band, gathers
//! every band into the full image buffer, and hands the result to the
//! image sink.  A worker receives its unit, computes its band, and
//! contributes it to the gather.  One scatter, one gather, no retries.

use crate::color::{Palette, Pixel};
use crate::config::RenderConfig;
use crate::error::{RenderError, Result};
use crate::escape::render_band;
use crate::geometry::{bound_index, bound_length, Bound, WorkUnit};
use crate::group::{Communicator, ProcessGroup};
use crate::partition::partition;
use crate::sink::ImageSink;
use crate::wire::Wire;
use std::fmt;

/// A finished image: row-major RGB pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Dimensions in pixels.
    pub bound: Bound,
    /// `bound.width * bound.height` pixels, top row first.
    pub pixels: Vec<Pixel>,
}

impl Image {
    /// An all-black image.
    pub fn blank(bound: Bound) -> Image {
        Image {
            bound,
            pixels: vec![Pixel::default(); bound_length(&bound)],
        }
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Whether the image has no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// The pixel at column `x`, row `y`.
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        self.pixels[bound_index(x, y, &self.bound)]
    }

    /// Three bytes per pixel, in pixel order.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| vec![p.red, p.green, p.blue])
            .collect()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum CoordinatorState {
    Partitioning,
    Dispatching,
    ComputingLocalBand,
    Collecting,
    Encoding,
    Done,
}

impl fmt::Display for CoordinatorState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            CoordinatorState::Partitioning => "partitioning",
            CoordinatorState::Dispatching => "dispatching",
            CoordinatorState::ComputingLocalBand => "computing local band",
            CoordinatorState::Collecting => "collecting",
            CoordinatorState::Encoding => "encoding",
            CoordinatorState::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum WorkerState {
    WaitingForWork,
    Computing,
    SendingResult,
    Done,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            WorkerState::WaitingForWork => "waiting for work",
            WorkerState::Computing => "computing",
            WorkerState::SendingResult => "sending result",
            WorkerState::Done => "done",
        };
        f.write_str(name)
    }
}

fn enter<S: fmt::Display>(rank: usize, state: S) {
    debug!("rank {}: {}", rank, state);
}

/// The rank 0 role.  Returns the image it handed to `sink`.
pub fn coordinate<S>(comm: &mut Communicator, config: &RenderConfig, sink: &S) -> Result<Image>
where
    S: ImageSink + ?Sized,
{
    let rank = comm.rank();

    enter(rank, CoordinatorState::Partitioning);
    let bands = partition(config.bound, config.region, comm.size())?;
    info!(
        "allocating {} bytes for a {} pixel array",
        bound_length(&config.bound) * Pixel::WIRE_SIZE,
        config.bound
    );
    let mut image = Image::blank(config.bound);

    enter(rank, CoordinatorState::Dispatching);
    let work: WorkUnit = comm.scatter(Some(&bands[..]))?;
    debug!("rank {} kept {}", rank, work);

    enter(rank, CoordinatorState::ComputingLocalBand);
    let local = render_band(&work, config.palette);

    enter(rank, CoordinatorState::Collecting);
    comm.gather(&local[..], Some(&mut image.pixels[..]))?;
    drop(local);

    enter(rank, CoordinatorState::Encoding);
    sink.write(image.bound, &image.to_rgb_bytes())?;

    enter(rank, CoordinatorState::Done);
    Ok(image)
}

/// The role of every rank other than 0.
pub fn work(comm: &mut Communicator, palette: Palette) -> Result<()> {
    let rank = comm.rank();

    enter(rank, WorkerState::WaitingForWork);
    let work: WorkUnit = comm.scatter(None)?;
    debug!("rank {} received {}", rank, work);

    enter(rank, WorkerState::Computing);
    let pixels = render_band(&work, palette);

    enter(rank, WorkerState::SendingResult);
    comm.gather(&pixels[..], None)?;
    drop(pixels);

    enter(rank, WorkerState::Done);
    Ok(())
}

/// Bring up a group of `config.workers` participants, run one render
/// across it, and hand the assembled image to `sink`.  Also returns the
/// image.
pub fn render<S>(config: &RenderConfig, sink: &S) -> Result<Image>
where
    S: ImageSink + Sync + ?Sized,
{
    let group = ProcessGroup::init(config.workers)?;
    let mut results = group.run(|mut comm| {
        if comm.is_root() {
            coordinate(&mut comm, config, sink).map(Some)
        } else {
            work(&mut comm, config.palette).map(|_| None)
        }
    })?;

    if results.is_empty() {
        return Err(RenderError::Bootstrap("no participants ran".to_string()));
    }
    results
        .swap_remove(0)
        .ok_or_else(|| RenderError::Bootstrap("the coordinator produced no image".to_string()))
}
