//! Slug / URL 校验和随机 slug 生成基准测试

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use nyooom::services::{is_valid_slug, new_link};
use nyooom::utils::generate_random_string;
use nyooom::utils::url_validator::normalize_url;

fn bench_normalize_url(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation/normalize_url");

    group.bench_function("with_scheme", |b| {
        b.iter(|| normalize_url(black_box("https://example.com/some/long/path?q=1")))
    });

    group.bench_function("without_scheme", |b| {
        b.iter(|| normalize_url(black_box("example.com/some/long/path?q=1")))
    });

    group.bench_function("dangerous", |b| {
        b.iter(|| normalize_url(black_box("javascript:alert(1)")))
    });

    group.finish();
}

fn bench_slug(c: &mut Criterion) {
    c.bench_function("validation/is_valid_slug", |b| {
        b.iter(|| is_valid_slug(black_box("my-link_2024")))
    });

    c.bench_function("validation/random_slug", |b| {
        b.iter(|| generate_random_string(black_box(6)))
    });

    c.bench_function("validation/new_link", |b| {
        b.iter(|| new_link(black_box("docs"), black_box("docs.rs/tokio"), 6))
    });
}

criterion_group!(benches, bench_normalize_url, bench_slug);
criterion_main!(benches);
