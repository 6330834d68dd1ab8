use bencher::{TestCase, route_table};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use futures::executor::block_on;
use http::{Method, Uri};
use micro_fs_router::{Resolver, RoutePattern};
use std::hint::black_box;

fn create_test_cases() -> Vec<TestCase> {
    vec![
        TestCase::small("small_static", "/about"),
        TestCase::small("small_index", "/"),
        TestCase::normal("normal_dynamic", "/users/42"),
        TestCase::normal("normal_miss", "/nowhere/to/be/found"),
        TestCase::large("large_nested_dynamic", "/orgs/rust-lang/repos/regex/issues/1024?state=open"),
        TestCase::large("large_miss", "/orgs/rust-lang"),
    ]
}

fn benchmark_resolve(criterion: &mut Criterion) {
    let test_cases = create_test_cases();
    let mut group = criterion.benchmark_group("resolve");

    for case in test_cases {
        let resolver = Resolver::new(route_table(case.group().filler_routes()));
        let uri = Uri::from_static(case.uri());

        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &case, |b, _case| {
            b.iter(|| {
                let resolution = block_on(resolver.resolve(&Method::GET, &uri));
                black_box(resolution.is_found());
            });
        });
    }

    group.finish();
}

fn benchmark_compile(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("compile");

    for template in ["/about.ts", "/users/index.ts", "/orgs/[org]/repos/[repo]/issues/[number].ts"] {
        group.bench_with_input(BenchmarkId::from_parameter(template), template, |b, template| {
            b.iter(|| black_box(RoutePattern::compile(template).expect("template should compile")));
        });
    }

    group.finish();
}

criterion_group!(router, benchmark_resolve, benchmark_compile);
criterion_main!(router);
