use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stemquiz_core::segment::Segmenter;

fn bench_segmenting(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmenting");
    let segmenter = Segmenter::default();

    let plain = "Which of the following values is the largest in the chart above?";
    let mixed = "Solve $x^2 - 5x + 6 = 0$ and report the sum of $x_1$ and $x_2$.";
    let unmatched = "It costs $5 and another $10 and then $ again";
    let long = "Let $a_i = i$ for every index. ".repeat(200);

    group.bench_function("plain", |b| {
        b.iter(|| segmenter.segment(black_box(plain)).count())
    });

    group.bench_function("mixed", |b| {
        b.iter(|| segmenter.segment(black_box(mixed)).count())
    });

    group.bench_function("unmatched", |b| {
        b.iter(|| segmenter.segment(black_box(unmatched)).count())
    });

    group.bench_function("400_math_spans", |b| {
        b.iter(|| segmenter.segment(black_box(&long)).count())
    });

    group.finish();
}

criterion_group!(benches, bench_segmenting);
criterion_main!(benches);
