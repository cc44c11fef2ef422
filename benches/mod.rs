use criterion::{criterion_group, criterion_main};

mod hash;

criterion_group!(
    benches,
    hash::bench_md5,
    hash::bench_sha1,
    hash::bench_hmac,
    hash::bench_sign
);
criterion_main!(benches);
