use catoid::{Cate, Oid, Registry, ShardGenerator, TimeSource};
use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};

struct FixedMockTime {
    millis: i64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> i64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration. Stays under the
// per-millisecond sequence budget so the fixed-clock run never wraps.
const TOTAL_IDS: usize = 2048;

fn bench_generator(c: &mut Criterion) {
    let mut group = c.benchmark_group("generator");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("next/{TOTAL_IDS}"), |b| {
        b.iter_batched(
            || ShardGenerator::with_time_source(8, FixedMockTime { millis: 1_700_000_000_000 }),
            |generator| {
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next());
                }
            },
            criterion::BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_registry(c: &mut Criterion) {
    let registry = Registry::new();

    let mut group = c.benchmark_group("registry");
    group.throughput(Throughput::Elements(1));

    group.bench_function("new_id/builtin", |b| {
        b.iter(|| black_box(registry.new_id(Cate::PEOPLE)));
    });
    group.bench_function("new_id/on_demand", |b| {
        let cate = Cate::from_value(500);
        b.iter(|| black_box(registry.new_id(cate)));
    });

    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let registry = Registry::new();
    let oid = registry.new_id(Cate::PEOPLE);
    let text = oid.to_string();

    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Elements(1));

    group.bench_function("to_string", |b| {
        b.iter(|| black_box(oid.to_string()));
    });
    group.bench_function("parse", |b| {
        b.iter(|| black_box(Oid::parse(&text).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_generator, bench_registry, bench_codec);
criterion_main!(benches);
