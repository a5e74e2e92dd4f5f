use blf::config::{MaskFillConfig, NestingConfig, Quality};
use blf::opt::mask_fill::MaskFiller;
use blf::opt::nest::BLFNester;
use blf::progress::PackingHooks;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sheetnest::entities::{MaterialSurface, PartInput, RotationPolicy};
use sheetnest::mask::{AvailabilityMask, CellScale};

criterion_main!(benches);
criterion_group!(benches, mask_fill_bench, nesting_bench);

const MASK_SIZES: [usize; 3] = [200, 400, 800];
const N_PARTS: usize = 100;

/// Disc of usable material with a few scattered defects
fn disc_mask(size: usize, rng: &mut SmallRng) -> AvailabilityMask {
    let r = size as f64 / 2.0;
    let cells = (0..size * size)
        .map(|i| {
            let (x, y) = ((i % size) as f64 - r, (i / size) as f64 - r);
            let inside = x * x + y * y < r * r;
            match inside && rng.random_bool(0.999) {
                true => 255,
                false => 0,
            }
        })
        .collect::<Vec<u8>>();
    AvailabilityMask::from_luminance(size, size, &cells).unwrap()
}

fn mask_fill_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask_fill");
    group.sample_size(10);
    for size in MASK_SIZES {
        let mask = disc_mask(size, &mut SmallRng::seed_from_u64(0));
        //the mask always covers 1000 x 1000 physical units
        let scale = CellScale::from_extent((size, size), (1000.0, 1000.0)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &mask, |b, mask| {
            b.iter(|| {
                MaskFiller::new(mask.clone(), scale, MaskFillConfig::default(), PackingHooks::default())
                    .unwrap()
                    .fill()
            })
        });
    }
    group.finish();
}

fn nesting_bench(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(0);
    let parts = (0..N_PARTS)
        .map(|i| PartInput {
            id: format!("p{i}"),
            width: rng.random_range(20.0..200.0),
            height: rng.random_range(20.0..200.0),
            fragment: String::new(),
        })
        .collect::<Vec<_>>();
    let surface = MaterialSurface::new(1000.0, 1000.0).unwrap();

    let mut group = c.benchmark_group("nesting");
    for quality in [Quality::Fast, Quality::Balanced, Quality::Best] {
        let config = NestingConfig {
            rotation: RotationPolicy::RightAngle,
            spacing: 2.0,
            quality,
            grid_step: None,
        };
        group.bench_function(format!("{quality:?}"), |b| {
            b.iter(|| {
                BLFNester::new(surface, &parts, config, PackingHooks::default())
                    .unwrap()
                    .solve()
            })
        });
    }
    group.finish();
}
