use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use xdsp::{coherogram, crossspectrogram, hilbert, psd, Coordinate, DataArray, SpectralConfig};

fn noise(seed: u64, channels: usize, samples: usize) -> DataArray<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = Array2::from_shape_fn((channels, samples), |_| rng.random_range(-1.0..1.0));
    let fs = 1666.0;
    DataArray::new(data.into_dyn(), ["channel", "time"])
        .expect("benchmark array")
        .with_coord(
            "time",
            Coordinate::index("time", (0..samples).map(|i| i as f64 / fs).collect()),
        )
        .expect("benchmark time index")
}

fn psd_16ch_60s(c: &mut Criterion) {
    let x = noise(7, 16, 100_000).with_name("x");
    let config = SpectralConfig::default().with_seglen(1.0);

    c.bench_function("psd_16ch_60s", |b| {
        b.iter(|| {
            black_box(psd(&x, &config).expect("benchmark input should satisfy psd preconditions"));
        });
    });
}

fn crossspectrogram_16ch_60s(c: &mut Criterion) {
    let x = noise(7, 16, 100_000).with_name("x");
    let y = noise(11, 16, 100_000).with_name("y");
    let config = SpectralConfig::default().with_seglen(1.0);

    c.bench_function("crossspectrogram_16ch_60s", |b| {
        b.iter(|| {
            black_box(
                crossspectrogram(&x, &y, &config)
                    .expect("benchmark input should satisfy crossspectrogram preconditions"),
            );
        });
    });
}

fn coherogram_4ch_60s(c: &mut Criterion) {
    let x = noise(7, 4, 100_000).with_name("x");
    let y = noise(11, 4, 100_000).with_name("y");
    let config = SpectralConfig::default().with_seglen(0.5);

    c.bench_function("coherogram_4ch_60s", |b| {
        b.iter(|| {
            black_box(
                coherogram(&x, &y, &config)
                    .expect("benchmark input should satisfy coherogram preconditions"),
            );
        });
    });
}

fn hilbert_16ch_60s(c: &mut Criterion) {
    let x = noise(7, 16, 100_000);

    c.bench_function("hilbert_16ch_60s", |b| {
        b.iter(|| {
            black_box(hilbert(&x, None, None).expect("benchmark input should satisfy hilbert preconditions"));
        });
    });
}

criterion_group!(
    benches,
    psd_16ch_60s,
    crossspectrogram_16ch_60s,
    coherogram_4ch_60s,
    hilbert_16ch_60s
);
criterion_main!(benches);
