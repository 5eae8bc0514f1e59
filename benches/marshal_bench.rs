//! Marshaling benchmarks: primitive-array and text round trips through
//! the in-memory runtime.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bridgekit::interop::marshal;
use bridgekit::runtime::InMemoryRuntime;

fn bench_prim_array_round_trip(c: &mut Criterion) {
    let env = InMemoryRuntime::new();
    let values: Vec<i32> = (0..1024).collect();

    c.bench_function("i32x1024_to_managed", |b| {
        b.iter(|| {
            let arr = marshal::to_managed_array::<i32, _>(&env, black_box(&values)).unwrap();
            black_box(arr)
        })
    });

    let arr = marshal::to_managed_array::<i32, _>(&env, &values).unwrap();
    c.bench_function("i32x1024_to_native", |b| {
        b.iter(|| {
            let out = marshal::to_native_array::<i32, _>(&env, black_box(arr)).unwrap();
            black_box(out)
        })
    });
}

fn bench_text_round_trip(c: &mut Criterion) {
    let env = InMemoryRuntime::new();
    let text = "marshaling benchmark payload ".repeat(32);

    c.bench_function("string_round_trip", |b| {
        b.iter(|| {
            let s = marshal::to_managed_string(&env, black_box(&text)).unwrap();
            let back = marshal::to_native_string(&env, s).unwrap();
            black_box(back)
        })
    });
}

criterion_group!(benches, bench_prim_array_round_trip, bench_text_round_trip);
criterion_main!(benches);
