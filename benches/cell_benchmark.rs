//! Cell benchmark: Measure cell comparison and construction.
//!
//! Target: < 2ns per comparison

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lattice::{Cell, Rgb, Style};

fn cell_equality_same(c: &mut Criterion) {
    let style = Style::new(Rgb::new(255, 128, 64), Rgb::new(32, 32, 32)).bold();
    let cell_a = Cell::new("A", style);
    let cell_b = cell_a.clone();

    c.bench_function("cell_eq_same", |b| {
        b.iter(|| black_box(&cell_a) == black_box(&cell_b))
    });
}

fn cell_equality_different_glyph(c: &mut Criterion) {
    let cell_a = Cell::new("A", Style::DEFAULT);
    let cell_b = Cell::new("B", Style::DEFAULT);

    c.bench_function("cell_eq_diff_glyph", |b| {
        b.iter(|| black_box(&cell_a) == black_box(&cell_b))
    });
}

fn cell_equality_different_color(c: &mut Criterion) {
    let cell_a = Cell::new("A", Style::DEFAULT.with_fg(Rgb::new(255, 0, 0)));
    let cell_b = Cell::new("A", Style::DEFAULT.with_fg(Rgb::new(0, 255, 0)));

    c.bench_function("cell_eq_diff_color", |b| {
        b.iter(|| black_box(&cell_a) == black_box(&cell_b))
    });
}

fn cell_equality_spilled(c: &mut Criterion) {
    let cell_a = Cell::new("👩‍🚀", Style::DEFAULT);
    let cell_b = cell_a.clone();

    c.bench_function("cell_eq_spilled", |b| {
        b.iter(|| black_box(&cell_a) == black_box(&cell_b))
    });
}

fn cell_new(c: &mut Criterion) {
    c.bench_function("cell_new_ascii", |b| {
        b.iter(|| Cell::new(black_box("A"), Style::DEFAULT))
    });

    c.bench_function("cell_new_cjk", |b| {
        b.iter(|| Cell::new(black_box("日"), Style::DEFAULT))
    });

    c.bench_function("cell_new_cluster", |b| {
        b.iter(|| Cell::new(black_box("👩‍🚀"), Style::DEFAULT))
    });
}

fn rgb_lerp(c: &mut Criterion) {
    let from = Rgb::new(10, 200, 30);
    let to = Rgb::new(240, 20, 90);

    c.bench_function("rgb_lerp", |b| {
        b.iter(|| black_box(from).lerp(black_box(to), black_box(0.37)))
    });
}

criterion_group!(
    benches,
    cell_equality_same,
    cell_equality_different_glyph,
    cell_equality_different_color,
    cell_equality_spilled,
    cell_new,
    rgb_lerp,
);
criterion_main!(benches);
