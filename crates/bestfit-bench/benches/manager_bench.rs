//! Manager benchmarks.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use bestfit_core::MemoryManager;

struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }
}

fn bench_alloc_free_cycle(c: &mut Criterion) {
    let sizes: &[u64] = &[1, 8, 64, 512, 4096];
    let mut group = c.benchmark_group("alloc_free_cycle");

    for &size in sizes {
        group.bench_with_input(BenchmarkId::new("manager", size), &size, |b, &sz| {
            let mut manager = MemoryManager::new(1 << 20);
            b.iter(|| {
                let id = manager.allocate(sz).expect("space available");
                manager.free(id);
                criterion::black_box(&manager);
            });
        });
    }
    group.finish();
}

fn bench_alloc_burst(c: &mut Criterion) {
    let mut group = c.benchmark_group("alloc_burst");

    group.bench_function("4096x64", |b| {
        b.iter(|| {
            let mut manager = MemoryManager::new(4096 * 64);
            for _ in 0..4096 {
                manager.allocate(64).expect("space available");
            }
            criterion::black_box(manager);
        });
    });

    group.finish();
}

fn bench_churn_storm(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn_storm");

    group.bench_function("seeded_10000_ops", |b| {
        b.iter(|| {
            let mut rng = XorShift64::new(7);
            let mut manager = MemoryManager::new(1 << 16);
            let mut live = Vec::new();
            for _ in 0..10_000 {
                let allocate = live.is_empty() || rng.next_u64() % 100 < 55;
                if allocate {
                    let size = 1 + rng.next_u64() % 128;
                    if let Some(id) = manager.allocate(size) {
                        live.push(id);
                    }
                } else {
                    let victim = (rng.next_u64() as usize) % live.len();
                    let id = live.swap_remove(victim);
                    manager.free(id);
                }
            }
            criterion::black_box(manager);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_alloc_free_cycle,
    bench_alloc_burst,
    bench_churn_storm
);
criterion_main!(benches);
