//! Benchmarks for prefix lookup throughput.
//!
//! Run with: cargo bench
//!
//! Measures covering-prefix lookup and exact membership across index
//! sizes, with prefixes spread over several length classes the way real
//! route corpora are.

use std::net::Ipv4Addr;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use cidrdb::{Cidr, PrefixIndex};

/// Build an index with roughly `count` prefixes across four lengths.
fn build_index(count: u32) -> PrefixIndex {
    let mut index = PrefixIndex::new();
    for i in 0..count {
        // Weyl-style scramble for a spread of networks; keep them non-zero.
        let base = i.wrapping_mul(2_654_435_761) | 0x0100_0000;
        let prefix_len = match i % 4 {
            0 => 16,
            1 => 21,
            2 => 24,
            _ => 8,
        };
        if let Ok(cidr) = Cidr::new(Ipv4Addr::from(base), prefix_len) {
            index.put(cidr);
        }
    }
    index
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for size in [1_000u32, 10_000, 100_000] {
        let index = build_index(size);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(size), &index, |b, index| {
            let mut probe = 0u32;
            b.iter(|| {
                probe = probe.wrapping_add(2_654_435_761);
                black_box(index.lookup(Ipv4Addr::from(probe)))
            });
        });
    }

    group.finish();
}

fn bench_has(c: &mut Criterion) {
    let index = build_index(100_000);
    let probe: Cidr = "10.0.0.0/8".parse().unwrap();

    c.bench_function("has_100k", |b| {
        b.iter(|| black_box(index.has(black_box(probe))))
    });
}

criterion_group!(benches, bench_lookup, bench_has);
criterion_main!(benches);
