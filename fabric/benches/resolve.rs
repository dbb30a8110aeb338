#![allow(dead_code)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use fabric::{Container, Context, Injectable};
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Barrier,
    },
    thread,
    time::{Duration, Instant},
};

const THREADS: usize = 10;

#[derive(Default)]
struct Config;

trait Database: Send + Sync {}

#[derive(Default)]
struct Postgres;

impl Database for Postgres {}

#[derive(Injectable)]
struct Service {
    #[fabric(tag = "inject")]
    config: Arc<Config>,
    #[fabric(tag = "inject:cache")]
    cache: Arc<dyn Database>,
    #[fabric(tag = "inject:primary")]
    primary: Option<Arc<dyn Database>>,
}

fn container() -> Container {
    let container = Container::new();
    container.register::<Config>(|options| options.as_singleton()).unwrap();
    container
        .register::<Postgres>(|options| {
            options
                .as_singleton()
                .with_named_capability::<dyn Database>("cache", |db| db)
                .with_named_capability::<dyn Database>("primary", |db| db)
        })
        .unwrap();
    container.register_injectable::<Service>(|options| options).unwrap();
    container
}

fn run_bench_threads<W, F>(threads: usize, mut make_test_fn: W, iters: u64) -> Duration
where
    W: FnMut() -> F,
    F: FnMut() + Send + 'static,
{
    let barrier = Arc::new(Barrier::new(threads + 1));
    let elapsed_handles = Arc::new((0..threads).map(|_| AtomicU64::default()).collect::<Box<[_]>>());

    thread::scope(|s| {
        for i in 0..threads {
            let barrier = barrier.clone();
            let elapsed_handles = elapsed_handles.clone();
            let mut test_fn = make_test_fn();

            s.spawn(move || {
                barrier.wait();
                let start = Instant::now();
                for _ in 0..iters {
                    test_fn();
                }
                elapsed_handles[i].store(start.elapsed().as_nanos() as u64, Ordering::Relaxed);
            });
        }

        barrier.wait();
    });

    let nanos = elapsed_handles
        .iter()
        .map(|elapsed_handle| elapsed_handle.load(Ordering::Relaxed))
        .collect::<Vec<_>>();
    Duration::from_nanos(nanos.iter().sum::<u64>() / nanos.len() as u64)
}

fn criterion_benchmark(c: &mut Criterion) {
    let ctx = Context::new();

    c.bench_function("resolve_singleton", |b| {
        let container = container();
        b.iter(|| container.resolve::<Config>(&ctx).unwrap());
    })
    .bench_function("resolve_capability", |b| {
        let container = container();
        b.iter(|| container.resolve_named::<dyn Database>(&ctx, "cache").unwrap());
    })
    .bench_function("resolve_transient", |b| {
        let container = Container::new();
        container.register::<Config>(|options| options).unwrap();
        b.iter(|| container.resolve::<Config>(&ctx).unwrap());
    })
    .bench_function("resolve_injectable", |b| {
        let container = container();
        b.iter(|| container.resolve::<Service>(&ctx).unwrap());
    })
    .bench_function("register", |b| {
        b.iter(container);
    });

    let mut group = c.benchmark_group("concurrent");
    group.sample_size(30);
    group.warm_up_time(Duration::from_secs(3));

    group.bench_function(BenchmarkId::new("resolve_singleton", THREADS), |b| {
        let container = container();

        b.iter_custom(|iters| {
            run_bench_threads(
                THREADS,
                || {
                    let container = container.clone();
                    let ctx = Context::new();
                    move || {
                        container.resolve::<Config>(&ctx).unwrap();
                    }
                },
                (iters + THREADS as u64 - 1) / THREADS as u64,
            )
        });
    });

    group.bench_function(BenchmarkId::new("resolve_injectable", THREADS), |b| {
        let container = container();

        b.iter_custom(|iters| {
            run_bench_threads(
                THREADS,
                || {
                    let container = container.clone();
                    let ctx = Context::new();
                    move || {
                        container.resolve::<Service>(&ctx).unwrap();
                    }
                },
                (iters + THREADS as u64 - 1) / THREADS as u64,
            )
        });
    });

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
