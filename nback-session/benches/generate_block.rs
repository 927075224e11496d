use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

use nback_session::{RngSource, SequenceGenerator, SessionConfig};

/// Block synthesis across the range of levels a subject realistically reaches.
pub fn bench_generate_block(c: &mut Criterion) {
    let generator = SequenceGenerator::new(&SessionConfig::default()).unwrap();
    let mut group = c.benchmark_group("generate_block");
    group
        .sample_size(100)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));

    for n in [2u32, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let mut rng = RngSource::seeded(0x5EED);
            b.iter(|| black_box(generator.generate(black_box(n), &mut rng).unwrap()));
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .confidence_level(0.95)
        .noise_threshold(0.02);
    targets = bench_generate_block
}

criterion_main!(benches);
