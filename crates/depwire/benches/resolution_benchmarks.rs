//! Resolution benchmarks
//!
//! Measures constructor injection through dependency chains of increasing
//! depth, plus the cheap provider shapes and the static graph check.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use depwire::{injectable, Container, Lifetime};

struct Root(u64);

/// One level of a dependency chain
struct Link<T> {
    inner: Arc<T>,
}

#[injectable]
impl<T: Send + Sync + 'static> Link<T> {
    #[inject]
    fn new(inner: Arc<T>) -> Self {
        Self { inner }
    }
}

type Link4<T> = Link<Link<Link<Link<T>>>>;
type Depth4 = Link4<Root>;
type Depth16 = Link4<Link4<Link4<Link4<Root>>>>;
type Depth32 = Link4<Link4<Link4<Link4<Link4<Link4<Link4<Link4<Root>>>>>>>>;

/// Registers every level of a chain, innermost first
trait Chain: Send + Sync + Sized + 'static {
    fn register(container: &mut Container);
}

impl Chain for Root {
    fn register(container: &mut Container) {
        container.register_instance(Arc::new(Root(7)));
    }
}

impl<T: Chain> Chain for Link<T> {
    fn register(container: &mut Container) {
        T::register(container);
        container
            .register_type::<Self>()
            .expect("chain link has one #[inject] constructor");
    }
}

fn chain_container<T: Chain>() -> Container {
    let mut container = Container::new();
    T::register(&mut container);
    container
}

/// Benchmark constructor injection through chains of different depths
fn benchmark_chain_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_resolution");

    let container = chain_container::<Depth4>();
    group.bench_function(BenchmarkId::new("depth", 4), |b| {
        b.iter(|| black_box(container.get::<Depth4>().expect("resolves")))
    });

    let container = chain_container::<Depth16>();
    group.bench_function(BenchmarkId::new("depth", 16), |b| {
        b.iter(|| black_box(container.get::<Depth16>().expect("resolves")))
    });

    let container = chain_container::<Depth32>();
    group.bench_function(BenchmarkId::new("depth", 32), |b| {
        b.iter(|| black_box(container.get::<Depth32>().expect("resolves")))
    });

    group.finish();
}

/// Benchmark the providers that never descend
fn benchmark_flat_providers(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat_providers");

    let mut container = Container::new();
    container.register_instance(Arc::new(Root(1)));
    group.bench_function("instance", |b| {
        b.iter(|| black_box(container.get::<Root>().expect("resolves")))
    });

    let mut container = Container::new();
    container.register_factory(|| Arc::new(Root(2)));
    group.bench_function("transient_factory", |b| {
        b.iter(|| black_box(container.get::<Root>().expect("resolves")))
    });

    let mut container = Container::new();
    container.register_factory_with(Lifetime::Singleton, || Arc::new(Root(3)));
    group.bench_function("singleton_factory", |b| {
        b.iter(|| black_box(container.get::<Root>().expect("resolves")))
    });

    group.finish();
}

/// Benchmark the static whole-registry check
fn benchmark_validation(c: &mut Criterion) {
    let container = chain_container::<Depth32>();
    c.bench_function("validate_depth_32", |b| {
        b.iter(|| black_box(container.validate().expect("valid")))
    });

    let resolved = chain_container::<Depth4>()
        .get::<Depth4>()
        .expect("resolves");
    assert_eq!(resolved.inner.inner.inner.inner.0, 7);
}

criterion_group!(
    benches,
    benchmark_chain_resolution,
    benchmark_flat_providers,
    benchmark_validation
);
criterion_main!(benches);
