//! Pixels, the HSV color model, and the palettes that turn an escape
//! count into a color.
use crate::error::RenderError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One RGB sample.  Field order is the wire order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pixel {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
}

impl Pixel {
    /// Constructor.
    pub fn new(red: u8, green: u8, blue: u8) -> Pixel {
        Pixel { red, green, blue }
    }

    /// The same value on all three channels.
    pub fn gray(level: u8) -> Pixel {
        Pixel::new(level, level, level)
    }
}

/// A color in hue/saturation/value form.  Hue is in degrees, `[0, 360)`;
/// saturation and value are in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PixelHsv {
    /// Hue in degrees.
    pub h: f64,
    /// Saturation.
    pub s: f64,
    /// Value.
    pub v: f64,
}

/// Convert an RGB pixel to HSV.  Achromatic pixels get a hue of 0.
pub fn rgb_to_hsv(pixel: Pixel) -> PixelHsv {
    let r = f64::from(pixel.red) / 255.0;
    let g = f64::from(pixel.green) / 255.0;
    let b = f64::from(pixel.blue) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let s = if max == 0.0 { 0.0 } else { delta / max };

    PixelHsv {
        h: wrap_hue(h),
        s,
        v: max,
    }
}

/// Convert an HSV color to RGB.  Any finite hue is accepted and
/// wrapped into `[0, 360)` first.
pub fn hsv_to_rgb(hsv: PixelHsv) -> Pixel {
    let h = wrap_hue(hsv.h);
    let c = hsv.v * hsv.s;
    let sector = h / 60.0;
    let x = c * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
    let m = hsv.v - c;

    let (r, g, b) = match (sector.floor() as i64).rem_euclid(6) {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Pixel::new(to_channel(r + m), to_channel(g + m), to_channel(b + m))
}

fn wrap_hue(h: f64) -> f64 {
    let h = h.rem_euclid(360.0);
    // rem_euclid of a tiny negative rounds up to exactly 360.0
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

fn to_channel(unit: f64) -> u8 {
    num::clamp((unit * 255.0).round(), 0.0, 255.0) as u8
}

/// How an escape count becomes a color.  Every participant in a render
/// uses the same palette.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Palette {
    /// The escape count on all three channels.
    Grayscale,
    /// The escape count swept around the hue wheel; points that never
    /// escape are black.
    Hue,
}

impl Default for Palette {
    fn default() -> Palette {
        Palette::Grayscale
    }
}

impl Palette {
    /// Color for a pixel that took `count` iterations to escape.
    pub fn color(self, count: u8) -> Pixel {
        match self {
            Palette::Grayscale => Pixel::gray(count),
            Palette::Hue => {
                if count == u8::max_value() {
                    Pixel::default()
                } else {
                    hsv_to_rgb(PixelHsv {
                        h: 360.0 * f64::from(count) / 255.0,
                        s: 1.0,
                        v: 1.0,
                    })
                }
            }
        }
    }
}

impl FromStr for Palette {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Palette, RenderError> {
        match s {
            "gray" | "grey" => Ok(Palette::Grayscale),
            "hue" => Ok(Palette::Hue),
            _ => Err(RenderError::Config(format!("unknown palette '{}'", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn close(a: Pixel, b: Pixel) -> bool {
        let d = |x: u8, y: u8| (i16::from(x) - i16::from(y)).abs() <= 1;
        d(a.red, b.red) && d(a.green, b.green) && d(a.blue, b.blue)
    }

    #[test]
    fn primaries_to_hsv() {
        let red = rgb_to_hsv(Pixel::new(255, 0, 0));
        assert_eq!((red.h, red.s, red.v), (0.0, 1.0, 1.0));
        let green = rgb_to_hsv(Pixel::new(0, 255, 0));
        assert_eq!((green.h, green.s, green.v), (120.0, 1.0, 1.0));
        let blue = rgb_to_hsv(Pixel::new(0, 0, 255));
        assert_eq!((blue.h, blue.s, blue.v), (240.0, 1.0, 1.0));
    }

    #[test]
    fn hsv_primaries_to_rgb() {
        let hsv = |h| PixelHsv { h, s: 1.0, v: 1.0 };
        assert_eq!(hsv_to_rgb(hsv(0.0)), Pixel::new(255, 0, 0));
        assert_eq!(hsv_to_rgb(hsv(60.0)), Pixel::new(255, 255, 0));
        assert_eq!(hsv_to_rgb(hsv(120.0)), Pixel::new(0, 255, 0));
        assert_eq!(hsv_to_rgb(hsv(180.0)), Pixel::new(0, 255, 255));
        assert_eq!(hsv_to_rgb(hsv(240.0)), Pixel::new(0, 0, 255));
        assert_eq!(hsv_to_rgb(hsv(300.0)), Pixel::new(255, 0, 255));
    }

    #[test]
    fn hue_wraps_out_of_range() {
        let hsv = |h| PixelHsv { h, s: 1.0, v: 1.0 };
        assert_eq!(hsv_to_rgb(hsv(360.0)), hsv_to_rgb(hsv(0.0)));
        assert_eq!(hsv_to_rgb(hsv(480.0)), hsv_to_rgb(hsv(120.0)));
        assert_eq!(hsv_to_rgb(hsv(-120.0)), hsv_to_rgb(hsv(240.0)));
    }

    #[test]
    fn achromatic_pixels_have_no_hue_and_round_trip_exactly() {
        for level in 0..=255u8 {
            let p = Pixel::gray(level);
            let hsv = rgb_to_hsv(p);
            assert_eq!(hsv.h, 0.0);
            assert_eq!(hsv.s, 0.0);
            assert_eq!(hsv_to_rgb(hsv), p);
        }
    }

    #[test]
    fn full_and_zero_value_round_trip_exactly() {
        let samples = [
            Pixel::new(255, 0, 0),
            Pixel::new(0, 255, 0),
            Pixel::new(0, 0, 255),
            Pixel::new(255, 255, 0),
            Pixel::new(0, 255, 255),
            Pixel::new(255, 0, 255),
            Pixel::new(0, 0, 0),
        ];
        for p in samples.iter() {
            assert_eq!(hsv_to_rgb(rgb_to_hsv(*p)), *p);
        }
    }

    #[test]
    fn lattice_round_trips_within_one() {
        for r in (0..=255u16).step_by(5) {
            for g in (0..=255u16).step_by(5) {
                for b in (0..=255u16).step_by(5) {
                    let p = Pixel::new(r as u8, g as u8, b as u8);
                    let back = hsv_to_rgb(rgb_to_hsv(p));
                    assert!(close(p, back), "{:?} came back as {:?}", p, back);
                }
            }
        }
    }

    #[test]
    fn random_pixels_round_trip_within_one() {
        let mut rng = rand::thread_rng();
        for _ in 0..10_000 {
            let p = Pixel::new(rng.gen(), rng.gen(), rng.gen());
            let hsv = rgb_to_hsv(p);
            assert!(hsv.h >= 0.0 && hsv.h < 360.0);
            assert!(hsv.s >= 0.0 && hsv.s <= 1.0);
            assert!(hsv.v >= 0.0 && hsv.v <= 1.0);
            let back = hsv_to_rgb(hsv);
            assert!(close(p, back), "{:?} came back as {:?}", p, back);
        }
    }

    #[test]
    fn grayscale_palette_copies_count() {
        assert_eq!(Palette::Grayscale.color(0), Pixel::gray(0));
        assert_eq!(Palette::Grayscale.color(77), Pixel::gray(77));
        assert_eq!(Palette::Grayscale.color(255), Pixel::gray(255));
    }

    #[test]
    fn hue_palette_paints_the_set_black() {
        assert_eq!(Palette::Hue.color(255), Pixel::new(0, 0, 0));
        assert_eq!(Palette::Hue.color(0), Pixel::new(255, 0, 0));
    }

    #[test]
    fn palette_names() {
        assert_eq!("gray".parse::<Palette>().unwrap(), Palette::Grayscale);
        assert_eq!("grey".parse::<Palette>().unwrap(), Palette::Grayscale);
        assert_eq!("hue".parse::<Palette>().unwrap(), Palette::Hue);
        assert!("plaid".parse::<Palette>().is_err());
    }
}
