//! The byte layout of every value that travels between participants.
//!
//! Layouts are structural: fields in declaration order, integers at
//! their fixed width, floats as IEEE-754 doubles, all little-endian,
//! and no tags or lengths anywhere.  A peer built from a different
//! codebase interoperates as long as it writes the same bytes:
//!
//! | type       | layout                              | bytes |
//! |------------|-------------------------------------|-------|
//! | `Point`    | `f64 x, f64 y`                      | 16    |
//! | `RectSize` | `f64 width, f64 height`             | 16    |
//! | `Rect`     | `Point ul, Point lr`                | 32    |
//! | `Bound`    | `u32 width, u32 height`             | 8     |
//! | `Pixel`    | `u8 red, u8 green, u8 blue`         | 3     |
//! | `WorkUnit` | `Bound bound, Rect region`          | 40    |
//!
//! `Bound` has been a signed `int` pair in older peers; those will not
//! read these messages correctly.
//!
//! bincode's fixed-width, little-endian default configuration writes
//! exactly these layouts from the serde derives, so the codec is a
//! thin wrapper that also checks lengths on the way in.

use crate::color::Pixel;
use crate::error::{RenderError, Result};
use crate::geometry::{Bound, Point, Rect, RectSize, WorkUnit};

/// A value with a fixed-size encoding.
pub trait Wire: Sized {
    /// Encoded size of one value.
    const WIRE_SIZE: usize;
    /// Name used in error messages.
    const NAME: &'static str;

    /// Append the encoding of `self` to `out`.
    fn encode_into(&self, out: &mut Vec<u8>) -> Result<()>;

    /// Decode one value from exactly `WIRE_SIZE` bytes.
    fn decode(bytes: &[u8]) -> Result<Self>;

    /// The encoding of `self` on its own.
    fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(Self::WIRE_SIZE);
        self.encode_into(&mut out)?;
        Ok(out)
    }
}

macro_rules! wire_type {
    ($t: ty, $size: expr) => {
        impl Wire for $t {
            const WIRE_SIZE: usize = $size;
            const NAME: &'static str = stringify!($t);

            fn encode_into(&self, out: &mut Vec<u8>) -> Result<()> {
                bincode::serialize_into(out, self)?;
                Ok(())
            }

            fn decode(bytes: &[u8]) -> Result<Self> {
                if bytes.len() != Self::WIRE_SIZE {
                    return Err(RenderError::WireLength {
                        kind: Self::NAME,
                        actual: bytes.len(),
                        expected: Self::WIRE_SIZE,
                    });
                }
                Ok(bincode::deserialize(bytes)?)
            }
        }
    };
}

wire_type!(Point, 16);
wire_type!(RectSize, 16);
wire_type!(Rect, 32);
wire_type!(Bound, 8);
wire_type!(Pixel, 3);
wire_type!(WorkUnit, 40);

/// Encode a run of values back to back.
pub fn encode_slice<T: Wire>(items: &[T]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(items.len() * T::WIRE_SIZE);
    for item in items {
        item.encode_into(&mut out)?;
    }
    Ok(out)
}

/// Decode a run of values written by `encode_slice`.
pub fn decode_slice<T: Wire>(bytes: &[u8]) -> Result<Vec<T>> {
    if bytes.len() % T::WIRE_SIZE != 0 {
        return Err(RenderError::WireLength {
            kind: T::NAME,
            actual: bytes.len(),
            expected: T::WIRE_SIZE,
        });
    }
    bytes.chunks(T::WIRE_SIZE).map(T::decode).collect()
}
