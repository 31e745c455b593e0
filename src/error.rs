//! The one error type shared by every stage of a render.

use failure::Fail;

/// Everything that can stop a render.  Index violations inside a band
/// are not here: those are contract failures and panic.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The process group could not be brought up.
    #[fail(display = "unable to initialize process group: {}", _0)]
    Bootstrap(String),

    /// The image cannot be split the way it was asked to be split.
    #[fail(
        display = "cannot partition a {}x{} image into {} bands: {}",
        width, height, zones, reason
    )]
    Partition {
        /// Global image width in pixels.
        width: u32,
        /// Global image height in pixels.
        height: u32,
        /// Requested band count.
        zones: usize,
        /// What was wrong with the request.
        reason: &'static str,
    },

    /// The codec itself refused a value.
    #[fail(display = "wire codec error: {}", _0)]
    Wire(#[cause] bincode::Error),

    /// A message arrived with the wrong number of bytes for its type.
    #[fail(
        display = "wire message for {} is {} bytes, expected a multiple of {}",
        kind, actual, expected
    )]
    WireLength {
        /// Name of the type being decoded.
        kind: &'static str,
        /// Bytes received.
        actual: usize,
        /// Encoded size of one value.
        expected: usize,
    },

    /// A scatter or gather could not complete.
    #[fail(display = "collective {} failed on rank {}: {}", op, rank, reason)]
    Collective {
        /// Which collective, `scatter` or `gather`.
        op: &'static str,
        /// The rank that noticed the failure.
        rank: usize,
        /// What went wrong.
        reason: String,
    },

    /// Command-line or programmatic configuration was rejected.
    #[fail(display = "invalid configuration: {}", _0)]
    Config(String),

    /// The image sink could not build or write the image.
    #[fail(display = "unable to encode image: {}", _0)]
    Encode(String),
}

impl From<bincode::Error> for RenderError {
    fn from(err: bincode::Error) -> Self {
        RenderError::Wire(err)
    }
}

/// Shorthand used across the crate.
pub type Result<T> = std::result::Result<T, RenderError>;
