//! Lexer throughput benchmarks. Run with `cargo bench --package blc-lex`.

use blc_lex::Lexer;
use blc_util::{Handler, Interner};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn token_count(source: &str) -> usize {
    let mut interner = Interner::new();
    let mut handler = Handler::new();
    Lexer::new(source, &mut interner, &mut handler).tokenize().len()
}

fn bench_lexer(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let small = "auto x; x = 2 + 3 * 4;";
    let loop_heavy = "main() { auto i; i = 0; while (i < 1000) { i = i + 1; } return i; }";

    group.throughput(Throughput::Bytes(small.len() as u64));
    group.bench_function("small_expr", |b| b.iter(|| token_count(black_box(small))));

    group.throughput(Throughput::Bytes(loop_heavy.len() as u64));
    group.bench_function("loop_heavy", |b| b.iter(|| token_count(black_box(loop_heavy))));

    group.finish();
}

criterion_group!(benches, bench_lexer);
criterion_main!(benches);
