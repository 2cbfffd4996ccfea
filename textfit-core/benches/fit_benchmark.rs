use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use textfit_core::{AttributedString, Color, FitEngine, Font, LinearTextSizing, SizeF};

fn bench_single_line_fit(c: &mut Criterion) {
    let ts = LinearTextSizing::default();
    let engine = FitEngine::with_defaults(&ts);
    let run = AttributedString::new("Hello, textfit!", Font::new(40.0), Color::BLACK);

    c.bench_function("single_line_fit", |b| {
        b.iter(|| {
            engine.single_line_drawing_font_size(
                black_box(&run),
                black_box(SizeF::new(200.0, 30.0)),
                None,
            )
        });
    });
}

fn bench_multi_line_fit(c: &mut Criterion) {
    let ts = LinearTextSizing::default();
    let engine = FitEngine::with_defaults(&ts);
    let paragraph = "The quick brown fox jumps over the lazy dog. \
        Lorem ipsum dolor sit amet, consectetur adipiscing elit.";
    let run = AttributedString::new(paragraph, Font::new(48.0), Color::BLACK);

    c.bench_function("multi_line_fit", |b| {
        b.iter(|| {
            engine.multiline_font_size_that_fits(
                black_box(&run),
                black_box(SizeF::new(400.0, 300.0)),
                8,
                1.0,
            )
        });
    });
}

fn bench_multi_line_fit_shrink_ratio(c: &mut Criterion) {
    let ts = LinearTextSizing::default();
    let engine = FitEngine::with_defaults(&ts);
    let run = AttributedString::new("HelloWorld", Font::new(100.0), Color::BLACK);

    c.bench_function("multi_line_fit_shrink_ratio", |b| {
        b.iter(|| {
            engine.multiline_font_size_that_fits(
                black_box(&run),
                black_box(SizeF::new(300.0, 200.0)),
                8,
                0.5,
            )
        });
    });
}

fn bench_height_fit(c: &mut Criterion) {
    let ts = LinearTextSizing::default();
    let engine = FitEngine::with_defaults(&ts);
    let font = Font::new(40.0);

    c.bench_function("font_that_fits_height", |b| {
        b.iter(|| engine.font_that_fits_height(black_box(&font), black_box(17.0), Some(60.0)));
    });
}

criterion_group!(
    benches,
    bench_single_line_fit,
    bench_multi_line_fit,
    bench_multi_line_fit_shrink_ratio,
    bench_height_fit,
);
criterion_main!(benches);
