use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fnref::{FnMutRef, FnRef};

fn add1(x: i32) -> i32 {
    x + 1
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    group.bench_function("direct", |b| b.iter(|| add1(black_box(5))));

    let by_ptr = FnRef::<fn(i32) -> i32>::new(add1);
    group.bench_function("fn_ref/fn_pointer", |b| {
        b.iter(|| by_ptr.call((black_box(5),)))
    });

    let offset = 1;
    let closure = |x: i32| x + offset;
    let by_ref = FnRef::<fn(i32) -> i32>::from_ref(&closure);
    group.bench_function("fn_ref/closure", |b| {
        b.iter(|| by_ref.call((black_box(5),)))
    });

    let stateless = FnRef::<fn(i32) -> i32>::from_stateless(add1);
    group.bench_function("fn_ref/stateless", |b| {
        b.iter(|| stateless.call((black_box(5),)))
    });

    let dyn_ref: &dyn Fn(i32) -> i32 = &closure;
    group.bench_function("dyn_fn", |b| b.iter(|| dyn_ref(black_box(5))));

    group.finish();
}

fn bench_mutable_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_mut");

    let mut total = 0_i64;
    let mut acc = |x: i32| {
        total += i64::from(x);
        total
    };
    let mut r = FnMutRef::<fn(i32) -> i64>::from_mut(&mut acc);
    group.bench_function("fn_mut_ref/closure", |b| {
        b.iter(|| r.call((black_box(1),)))
    });

    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_mutable_dispatch);
criterion_main!(benches);
