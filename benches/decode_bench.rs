//! Benchmarks for symbol decoding and signature building

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use hwacc_bind::ffi::{NameGrammar, SignatureBuilder};
use hwacc_bind::registrar;

/// Benchmark decoding symbols with a growing number of operands
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let grammar = NameGrammar::new();

    for &operands in &[1, 4, 16, 64] {
        let symbol = create_symbol(operands);
        group.throughput(Throughput::Elements(operands as u64));

        group.bench_function(format!("{}_operands", operands), |b| {
            b.iter(|| black_box(grammar.decode(black_box(&symbol))))
        });
    }

    group.finish();
}

/// Benchmark a full discovery pass over a module
fn bench_signatures(c: &mut Criterion) {
    let grammar = NameGrammar::new();
    let builder = SignatureBuilder::new(*grammar.vocabulary());
    let module: Vec<String> = (0..256)
        .map(|i| {
            if i % 4 == 0 {
                format!("helper_{}", i)
            } else {
                create_symbol(i % 8 + 1)
            }
        })
        .collect();

    c.bench_function("module_256_symbols", |b| {
        b.iter(|| black_box(registrar::signatures(&grammar, &builder, &module)))
    });
}

/// Build `linalg_matmul_` followed by `operands` view and scalar tokens
fn create_symbol(operands: usize) -> String {
    let tokens: Vec<String> = (0..operands)
        .map(|i| match i % 3 {
            0 => "f32".to_string(),
            1 => format!("{}x{}xf32", i + 1, i + 2),
            _ => format!("{}x{}x{}xf32", i, i + 1, i + 2),
        })
        .collect();
    format!("linalg_matmul_{}", tokens.join("_"))
}

criterion_group!(benches, bench_decode, bench_signatures);
criterion_main!(benches);
