//! 注入器解析性能基准测试

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use injector::{injectable, Injector, Lifetime};
use std::sync::Arc;

struct Config {
    timeout: u64,
}

struct Repository {
    config: Arc<Config>,
}

struct Service {
    config: Arc<Config>,
    repository: Arc<Repository>,
}

injectable!(Config, || Config { timeout: 30 });
injectable!(Repository, |config: Config| Repository { config });
injectable!(Service, |config: Config, repository: Repository| Service {
    config,
    repository
});

fn build(lifetime: Lifetime) -> Injector {
    let mut injector = Injector::create();
    injector.register::<Config>(lifetime);
    injector.register::<Repository>(lifetime);
    injector.register::<Service>(lifetime);
    injector
}

/// 基准测试：单例缓存命中
fn bench_singleton_resolution(c: &mut Criterion) {
    let injector = build(Lifetime::Singleton);
    injector.get::<Service>().unwrap();

    c.bench_function("singleton_cache_hit", |b| {
        b.iter(|| {
            let service = injector.get::<Service>().unwrap();
            black_box(service.config.timeout)
        })
    });
}

/// 基准测试：作用域对象图构造
fn bench_scoped_resolution(c: &mut Criterion) {
    let injector = build(Lifetime::Scoped);

    c.bench_function("scoped_graph_construction", |b| {
        b.iter(|| {
            let service = injector.get::<Service>().unwrap();
            black_box(service.repository.config.timeout)
        })
    });
}

/// 基准测试：混合生命周期在不同解析次数下的表现
fn bench_mixed_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed_resolution");

    for count in [1usize, 10, 100].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            let injector = Injector::create()
                .add_singleton::<Config>()
                .add_scoped::<Repository>()
                .add_scoped::<Service>();
            b.iter(|| {
                for _ in 0..count {
                    black_box(injector.get::<Service>().unwrap());
                }
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_singleton_resolution,
    bench_scoped_resolution,
    bench_mixed_resolution
);
criterion_main!(benches);
