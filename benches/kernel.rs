#[macro_use]
extern crate criterion;
extern crate mandelband;

use criterion::Criterion;
use mandelband::config::default_region;
use mandelband::escape::{escapes, render_band};
use mandelband::{partition, Bound, Palette, Point};

fn escape_benchmark(c: &mut Criterion) {
    c.bench_function("escapes inside the set", |b| {
        b.iter(|| escapes(Point::new(-0.1, 0.1)))
    });
    c.bench_function("escapes near the boundary", |b| {
        b.iter(|| escapes(Point::new(-0.75, 0.1)))
    });
}

fn band_benchmark(c: &mut Criterion) {
    let bands = partition(Bound::new(256, 192), default_region(), 4).unwrap();
    let band = bands[1];
    c.bench_function("render one 256x48 band", move |b| {
        b.iter(|| render_band(&band, Palette::Grayscale))
    });
}

criterion_group!(benches, escape_benchmark, band_benchmark);
criterion_main!(benches);
