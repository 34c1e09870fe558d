use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use waitless::{rank, PatientObservation, PatientStore, QueueMode};

fn populated(n: u32) -> PatientStore {
    let mut store = PatientStore::new();
    for i in 0..n {
        let risk = f64::from((i * 37) % 101);
        let ttr = f64::from((i * 53) % 480);
        store
            .upsert(PatientObservation::new(format!("P{i:05}"), risk, ttr))
            .expect("generated observation is valid");
    }
    store
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");
    for n in [100u32, 1_000, 10_000] {
        let snapshot = populated(n).list();
        for mode in [QueueMode::RiskPriority, QueueMode::Arrival] {
            group.bench_with_input(BenchmarkId::new(mode.to_string(), n), &snapshot, |b, snapshot| {
                b.iter(|| rank(black_box(snapshot), mode))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_rank);
criterion_main!(benches);
