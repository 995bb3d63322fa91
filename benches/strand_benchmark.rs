use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strand::{split, split_args, Strand};

fn bench_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("Append (100x 'abc')");

    group.bench_function("std::String", |b| {
        b.iter(|| {
            let mut s = String::new();
            for _ in 0..100 {
                s.push_str("abc");
            }
            black_box(s);
        })
    });

    group.bench_function("Vec<u8>", |b| {
        b.iter(|| {
            let mut v = Vec::new();
            for _ in 0..100 {
                v.extend_from_slice(b"abc");
            }
            black_box(v);
        })
    });

    group.bench_function("Strand", |b| {
        b.iter(|| {
            let mut s = Strand::empty();
            for _ in 0..100 {
                s.append(b"abc").unwrap();
            }
            black_box(s);
        })
    });

    group.finish();
}

fn bench_append_preallocated(c: &mut Criterion) {
    let mut group = c.benchmark_group("Append into reserved room (100x 'abc')");

    group.bench_function("Strand::make_room", |b| {
        b.iter(|| {
            let mut s = Strand::empty();
            s.make_room(300).unwrap();
            for _ in 0..100 {
                s.append(b"abc").unwrap();
            }
            black_box(s);
        })
    });

    group.finish();
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("Split CSV row (32 fields)");
    let row: Vec<u8> = (0..32)
        .map(|i| format!("field{i}"))
        .collect::<Vec<_>>()
        .join(",")
        .into_bytes();

    group.bench_function("Strand split", |b| {
        b.iter(|| {
            let tokens = split(black_box(&row), b",").unwrap();
            black_box(tokens);
        })
    });

    group.bench_function("std slice split", |b| {
        b.iter(|| {
            let tokens: Vec<Vec<u8>> = black_box(&row)
                .split(|&c| c == b',')
                .map(<[u8]>::to_vec)
                .collect();
            black_box(tokens);
        })
    });

    group.finish();
}

fn bench_split_args(c: &mut Criterion) {
    let mut group = c.benchmark_group("Parse config line");
    let line = b"save \"dump dir/file.rdb\" 900 1 'quoted arg' \\x41";

    group.bench_function("split_args", |b| {
        b.iter(|| {
            let args = split_args(black_box(line)).unwrap();
            black_box(args);
        })
    });

    group.finish();
}

fn bench_repr(c: &mut Criterion) {
    let mut group = c.benchmark_group("Escape 1 KiB mixed payload");
    let payload: Vec<u8> = (0..1024).map(|i| (i % 256) as u8).collect();

    group.bench_function("append_repr", |b| {
        b.iter(|| {
            let mut out = Strand::empty();
            out.append_repr(black_box(&payload)).unwrap();
            black_box(out);
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_append,
    bench_append_preallocated,
    bench_split,
    bench_split_args,
    bench_repr
);
criterion_main!(benches);
