use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stemquiz_core::parser::parse_question_set_str;
use stemquiz_core::statistics::aggregate;

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");

    let small = generate_question_set_json(5);
    let medium = generate_question_set_json(50);
    let large = generate_question_set_json(500);

    group.bench_function("5_questions", |b| {
        b.iter(|| parse_question_set_str(black_box(&small)))
    });

    group.bench_function("50_questions", |b| {
        b.iter(|| parse_question_set_str(black_box(&medium)))
    });

    group.bench_function("500_questions", |b| {
        b.iter(|| parse_question_set_str(black_box(&large)))
    });

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let set = match parse_question_set_str(&generate_question_set_json(500)) {
        Ok(set) => set,
        Err(e) => panic!("bench input is invalid: {e}"),
    };

    c.bench_function("aggregate_500", |b| b.iter(|| aggregate(black_box(&set))));
}

fn generate_question_set_json(n: usize) -> String {
    let questions: Vec<String> = (0..n)
        .map(|i| {
            format!(
                r#"{{
  "id": {i},
  "question": "What is ${i} + 1$?",
  "options": ["{a}", "{b}", "{c}", "{d}"],
  "correct": 1,
  "topic": "Topic {topic}",
  "concept": "Concept {concept}",
  "graph": {{"type": "line", "data": [{{"x": 0, "y": {i}}}, {{"x": 1, "y": {b}}}]}}
}}"#,
                a = i,
                b = i + 1,
                c = i + 2,
                d = i + 3,
                topic = i % 7,
                concept = i % 13,
            )
        })
        .collect();
    format!("[{}]", questions.join(",\n"))
}

criterion_group!(benches, bench_validation, bench_aggregate);
criterion_main!(benches);
