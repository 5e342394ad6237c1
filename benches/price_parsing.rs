//! Price parsing benchmark.
//!
//! Covers the price formats seen on product pages: plain, grouped,
//! symbol-prefixed, code-suffixed and rejected input.
//!
//! Run with: cargo bench --bench price_parsing
//! Results saved to: target/criterion/

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use product_scraper::parse_price;

// ============================================================================
// Benchmark Parameters
// ============================================================================

const INPUTS: &[(&str, &str)] = &[
    ("plain", "1234.50"),
    ("symbol", "$0.99"),
    ("grouped", "$1,234,567.50"),
    ("code_suffix", "1,000.00 USD"),
    ("padded", "  \u{a0}\u{20ac}49.00\u{a0} "),
    ("rejected", "Call for price"),
];

// ============================================================================
// Benchmark: parse_price
// ============================================================================

fn bench_parse_price(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_price");

    for &(name, input) in INPUTS {
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, text| {
            b.iter(|| parse_price(black_box(text)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_price);
criterion_main!(benches);
