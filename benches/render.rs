//! Full pass against speed pass, and the cost of a recolor.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fractview::{
    fixed_palette, mix, render, CycleDirection, FixedPalette, FractalEngine, NoProgress,
    ShapingMode, ViewParameters,
};
use num::Complex;

fn view(speed_pass: bool, threads: usize) -> ViewParameters {
    ViewParameters {
        width: 160,
        height: 120,
        center: Complex::new(-0.745, 0.11),
        zoom: 25.0,
        iteration_cap: 500,
        speed_pass,
        threads,
        ..ViewParameters::default()
    }
}

fn passes(c: &mut Criterion) {
    let bands = mix(&fixed_palette(FixedPalette::Rainbow), 500, ShapingMode::Linear, 2).unwrap();
    let mut group = c.benchmark_group("render");
    group.sample_size(20);
    for &(name, speed_pass) in &[("full", false), ("speed", true)] {
        for &threads in &[1usize, 4] {
            let v = view(speed_pass, threads);
            group.bench_with_input(BenchmarkId::new(name, threads), &v, |b, v| {
                b.iter(|| render(black_box(v), &bands, &mut NoProgress).unwrap())
            });
        }
    }
    group.finish();
}

fn recolor(c: &mut Criterion) {
    let mut engine =
        FractalEngine::new(fixed_palette(FixedPalette::Rainbow), ShapingMode::Linear, 2).unwrap();
    engine.render(&view(false, 1), &mut NoProgress).unwrap();
    c.bench_function("cycle_colors", |b| {
        b.iter(|| engine.cycle_colors(black_box(3), CycleDirection::Up).unwrap().len())
    });
}

criterion_group!(benches, passes, recolor);
criterion_main!(benches);
