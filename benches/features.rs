use std::f64::consts::PI;
use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use ictal::{design_bandpass, filter_1d, DatasetConfig, FeatureExtractor, Recording, CHB_MIT_CHANNELS};
use ndarray::Array2;

const SFREQ: f64 = 256.0;

/// 18 channels of mixed alpha / line-noise content, in volts.
fn synthetic(seconds: usize) -> Recording {
    let n = seconds * SFREQ as usize;
    let data = Array2::from_shape_fn((CHB_MIT_CHANNELS.len(), n), |(c, t)| {
        let ts = t as f64 / SFREQ;
        40e-6 * (2.0 * PI * 10.0 * ts + c as f64).sin() + 15e-6 * (2.0 * PI * 60.0 * ts).sin()
    });
    let names = CHB_MIT_CHANNELS.iter().map(|s| s.to_string()).collect();
    Recording::new(names, SFREQ, data)
}

fn bench_design(c: &mut Criterion) {
    c.bench_function("design_bandpass 8–13 Hz @ 256 Hz", |b| {
        b.iter(|| black_box(design_bandpass(black_box(8.0), black_box(13.0), SFREQ)).len())
    });
}

fn bench_filter_1d(c: &mut Criterion) {
    let h = design_bandpass(8.0, 13.0, SFREQ);
    let rec = synthetic(60);
    let row = rec.data.row(0).to_vec();
    c.bench_function("filter_1d 60 s [15360 samples]", |b| {
        b.iter(|| black_box(filter_1d(black_box(&row), &h))[0])
    });
}

fn bench_extract(c: &mut Criterion) {
    let cfg = DatasetConfig::default();
    let fx = FeatureExtractor::from_config(&cfg, SFREQ).unwrap();
    let rec = synthetic(300);
    c.bench_function("extract 300 s [18×76800] → [60×18×1280]", |b| {
        b.iter(|| black_box(fx.extract(black_box(&rec))).shape()[0])
    });
}

criterion_group!(benches, bench_design, bench_filter_1d, bench_extract);
criterion_main!(benches);
