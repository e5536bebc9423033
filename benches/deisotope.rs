use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mzpeaks::Tolerance;

use mzisotope::utils::NEUTRON_SHIFT;
use mzisotope::{Deisotoper, DeisotopingParameters, RawSpectrum};

/// Build a dense spectrum of overlapping isotopic series with noise peaks between
/// them. A small linear congruential generator keeps it reproducible.
fn synthetic_spectrum(n_series: usize) -> RawSpectrum {
    let mut state: u64 = 0x2545F4914F6CDD1D;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) as f64) / ((1u64 << 31) as f64)
    };

    let mut peaks: Vec<(f64, f64)> = Vec::new();
    for _ in 0..n_series {
        let mz = 150.0 + next() * 1850.0;
        let charge = 1 + (next() * 4.0) as i32;
        let height = 100.0 + next() * 1e4;
        for k in 0..5 {
            let decay = 0.8f64.powi(k) * (0.9 + 0.1 * next());
            peaks.push((
                mz + k as f64 * NEUTRON_SHIFT / charge as f64,
                height * decay,
            ));
        }
        for _ in 0..3 {
            peaks.push((150.0 + next() * 1850.0, next() * 500.0));
        }
    }
    peaks.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mzs: Vec<f64> = peaks.iter().map(|p| p.0).collect();
    let intensities: Vec<f64> = peaks.iter().map(|p| p.1).collect();
    RawSpectrum::from_arrays(&mzs, &intensities).unwrap()
}

fn deisotoping(c: &mut Criterion) {
    let spectrum = synthetic_spectrum(2000);
    let deisotoper = Deisotoper::new(
        DeisotopingParameters::default()
            .with_tolerance(Tolerance::PPM(10.0))
            .with_charge_range(1, 4)
            .with_isotopic_peak_range(2, 6)
            .with_annotations(true, true),
    )
    .unwrap();

    c.bench_function("deisotope_dense_spectrum", |b| {
        b.iter(|| {
            let mut spectrum = spectrum.clone();
            deisotoper.deisotope(black_box(&mut spectrum)).unwrap()
        })
    });

    c.bench_function("assign_dense_spectrum", |b| {
        b.iter(|| deisotoper.assign(black_box(&spectrum)).unwrap())
    });
}

criterion_group!(benches, deisotoping);
criterion_main!(benches);
