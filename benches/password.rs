//! Argon2 密码哈希性能基准测试

use criterion::{Criterion, criterion_group, criterion_main};
use nyooom::utils::password::{hash_password, verify_password};

fn bench_hash_password(c: &mut Criterion) {
    c.bench_function("password/hash", |b| {
        b.iter(|| {
            let _ = hash_password("test_password_123");
        });
    });
}

fn bench_verify_password(c: &mut Criterion) {
    let password = "correct_password_456";
    let hash = hash_password(password).expect("hash should succeed");

    let mut group = c.benchmark_group("password/verify");

    group.bench_function("correct", |b| {
        b.iter(|| {
            let result = verify_password(password, &hash).expect("verify should succeed");
            assert!(result);
        });
    });

    group.bench_function("wrong", |b| {
        b.iter(|| {
            let result = verify_password("wrong_password", &hash).expect("verify should succeed");
            assert!(!result);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_hash_password, bench_verify_password);
criterion_main!(benches);
