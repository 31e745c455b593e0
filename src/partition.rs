//! Splits an image and the region of the plane it depicts into
//! horizontal bands, one per participant.

use crate::error::{RenderError, Result};
use crate::geometry::{rect_height, Bound, Point, Rect, WorkUnit};

/// Cut `bound` and `region` into `zones` bands of equal height, top to
/// bottom.
///
/// Band height is `bound.height / zones`, rounded down.  When the
/// division is not exact the leftover rows at the bottom of the image
/// belong to no band and are never computed.  Each band's region is a
/// slice of `region` exactly `1 / zones` of its height, so the bands
/// meet edge to edge with no gaps and no overlap.
pub fn partition(bound: Bound, region: Rect, zones: usize) -> Result<Vec<WorkUnit>> {
    let reject = |reason| RenderError::Partition {
        width: bound.width,
        height: bound.height,
        zones,
        reason,
    };

    if zones == 0 {
        return Err(reject("zone count must be positive"));
    }
    if bound.width == 0 || bound.height == 0 {
        return Err(reject("image has no pixels"));
    }
    if zones > bound.height as usize {
        return Err(reject("more bands than rows"));
    }

    let band_height = bound.height / zones as u32;
    let dropped = bound.height % zones as u32;
    if dropped != 0 {
        warn!(
            "{} rows do not divide into {} bands; the bottom {} rows will be left blank",
            bound.height, zones, dropped
        );
    }

    let slice = rect_height(&region) / zones as f64;
    let bands = (0..zones)
        .map(|zone| WorkUnit {
            bound: Bound::new(bound.width, band_height),
            region: Rect {
                ul: Point::new(region.ul.x, region.ul.y - slice * zone as f64),
                lr: Point::new(region.lr.x, region.ul.y - slice * (zone + 1) as f64),
            },
        })
        .collect::<Vec<_>>();

    for band in &bands {
        debug!("{}", band);
    }
    Ok(bands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{bound_length, make_rect, RectSize};
    use rand::Rng;

    fn default_region() -> Rect {
        make_rect(Point::new(0.0, 0.0), RectSize::new(2.0, 2.0))
    }

    #[test]
    fn four_bands_of_a_square() {
        let bands = partition(Bound::new(100, 100), default_region(), 4).unwrap();
        assert_eq!(bands.len(), 4);
        let tops: Vec<f64> = bands.iter().map(|b| b.region.ul.y).collect();
        assert_eq!(tops, vec![1.0, 0.5, 0.0, -0.5]);
        assert_eq!(bands[3].region.lr.y, -1.0);
        for band in &bands {
            assert_eq!(band.bound, Bound::new(100, 25));
            assert_eq!(band.region.ul.x, -1.0);
            assert_eq!(band.region.lr.x, 1.0);
        }
    }

    #[test]
    fn one_band_is_the_whole_image() {
        let region = default_region();
        let bands = partition(Bound::new(64, 48), region, 1).unwrap();
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].bound, Bound::new(64, 48));
        assert_eq!(bands[0].region, region);
    }

    #[test]
    fn remainder_rows_are_dropped() {
        let bands = partition(Bound::new(10, 10), default_region(), 3).unwrap();
        assert!(bands.iter().all(|b| b.bound == Bound::new(10, 3)));
        let covered: usize = bands.iter().map(|b| bound_length(&b.bound)).sum();
        assert_eq!(covered, 90);
    }

    #[test]
    fn bands_tile_without_gaps_for_random_shapes() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let zones = rng.gen_range(1, 17);
            let bound = Bound::new(rng.gen_range(1, 500), rng.gen_range(zones as u32, 800));
            let region = make_rect(
                Point::new(rng.gen_range(-2.0, 2.0), rng.gen_range(-2.0, 2.0)),
                RectSize::new(rng.gen_range(0.01, 4.0), rng.gen_range(0.01, 4.0)),
            );
            let bands = partition(bound, region, zones).unwrap();

            assert_eq!(bands.len(), zones);
            let covered: usize = bands.iter().map(|b| bound_length(&b.bound)).sum();
            let band_height = bound.height as usize / zones;
            assert_eq!(covered, bound.width as usize * band_height * zones);

            assert_eq!(bands[0].region.ul.y, region.ul.y);
            for pair in bands.windows(2) {
                assert_eq!(pair[0].region.lr.y, pair[1].region.ul.y);
                assert!(pair[0].region.ul.y > pair[0].region.lr.y);
            }
            let last = bands[zones - 1].region.lr.y;
            assert!((last - region.lr.y).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_zones_is_rejected() {
        match partition(Bound::new(10, 10), default_region(), 0) {
            Err(RenderError::Partition { zones: 0, .. }) => {}
            other => panic!("expected a partition error, got {:?}", other),
        }
    }

    #[test]
    fn empty_image_is_rejected() {
        assert!(partition(Bound::new(0, 10), default_region(), 2).is_err());
        assert!(partition(Bound::new(10, 0), default_region(), 2).is_err());
    }

    #[test]
    fn more_bands_than_rows_is_rejected() {
        assert!(partition(Bound::new(10, 3), default_region(), 4).is_err());
    }
}
