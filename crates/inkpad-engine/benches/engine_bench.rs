// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the inkpad-engine hot paths: stroke rendering while
// the pointer moves, and overlay extraction at export time.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{Rgba, RgbaImage};

use inkpad_core::types::Point;
use inkpad_engine::extract::extract_ink;
use inkpad_engine::{RasterSurface, StrokeRenderer, StrokeStyle};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// A signature-like zigzag of 200 samples across an A4 page rendered at
/// scale 2 (1190x1684).
fn bench_stroke_rendering(c: &mut Criterion) {
    let blank = RasterSurface::from_image(RgbaImage::from_pixel(1190, 1684, Rgba([255; 4])));
    let style = StrokeStyle::default();

    c.bench_function("stroke_rendering (200 samples, A4 @2x)", |b| {
        b.iter(|| {
            let mut surface = blank.clone();
            let mut renderer = StrokeRenderer::default();
            renderer.begin(&mut surface, Point::new(100.0, 800.0), 0.0, &style, 2.0);
            for i in 1..200u32 {
                let x = 100.0 + i as f32 * 5.0;
                let y = 800.0 + if i % 2 == 0 { 40.0 } else { -40.0 };
                renderer.extend(&mut surface, Point::new(x, y), f64::from(i) * 8.0);
            }
            renderer.end();
            black_box(surface);
        });
    });
}

/// Extraction over a full A4 page at scale 2 with a band of ink.
fn bench_extraction(c: &mut Criterion) {
    let background = RgbaImage::from_pixel(1190, 1684, Rgba([255; 4]));
    let mut overlay = background.clone();
    for y in 780..820 {
        for x in 100..1100 {
            overlay.put_pixel(x, y, Rgba([0, 0, 0, 255]));
        }
    }

    c.bench_function("extract_ink (A4 @2x)", |b| {
        b.iter(|| {
            let layer = extract_ink(1, black_box(&overlay), black_box(&background), 4);
            black_box(layer.map(|l| l.ink_pixel_count()).unwrap_or_default());
        });
    });
}

criterion_group!(benches, bench_stroke_rendering, bench_extraction);
criterion_main!(benches);
