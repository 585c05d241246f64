//! Benchmarks for classification and band resolution.
//!
//! Run with: cargo bench --package variables

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use variables::{classify, resolve, Denylist};

const BANDS: &[(&str, &str)] = &[
    ("temperature_2m", "K"),
    ("dewpoint_temperature_2m", "K"),
    ("snow_depth", "m"),
    ("lake_ice_depth", "m"),
    ("total_evaporation_sum", "m"),
    ("surface_latent_heat_flux_sum", "J/m^2"),
    ("surface_net_thermal_radiation_sum", "J/m^2"),
    ("v_component_of_wind_10m", "m/s"),
    ("surface_pressure", "Pa"),
    ("unknown_band", ""),
];

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    group.bench_function("first_rule", |b| {
        b.iter(|| classify(black_box("temperature_2m"), black_box("K")))
    });

    group.bench_function("fallback", |b| {
        b.iter(|| classify(black_box("unknown_band"), black_box("")))
    });

    group.bench_function("mixed_catalog", |b| {
        b.iter(|| {
            for (band, unit) in BANDS {
                let _ = classify(black_box(band), black_box(unit));
            }
        })
    });

    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    let available: Vec<String> = BANDS
        .iter()
        .flat_map(|(band, _)| [format!("{}_mean", band), format!("{}_sum", band)])
        .collect();
    let curated: Vec<&str> = BANDS.iter().map(|(band, _)| *band).collect();

    group.bench_function("suffix_fallback", |b| {
        b.iter(|| resolve(black_box(&curated), black_box(&available)))
    });

    let denylist = Denylist::default();
    group.bench_function("denylist_then_resolve", |b| {
        b.iter(|| {
            let kept = denylist.apply(black_box(&curated));
            resolve(&kept, black_box(&available))
        })
    });

    group.finish();
}

criterion_group!(benches, bench_classify, bench_resolve);
criterion_main!(benches);
