use criterion::{BenchmarkId, Criterion, Throughput};
use qsense::hash::{hmac, md5, sha1, signature};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::hint::black_box;

const SIZES: [usize; 4] = [64, 512, 2048, 8192];

fn payload(len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut data = vec![0u8; len];
    rng.fill(data.as_mut_slice());
    data
}

pub fn bench_md5(c: &mut Criterion) {
    let mut group = c.benchmark_group("md5");
    for size in SIZES {
        let data = payload(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| md5::hex(black_box(data)))
        });
    }
    group.finish();
}

pub fn bench_sha1(c: &mut Criterion) {
    let mut group = c.benchmark_group("sha1");
    for size in SIZES {
        let data = payload(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| sha1::hash(black_box(data)))
        });
    }
    group.finish();
}

pub fn bench_hmac(c: &mut Criterion) {
    let mut group = c.benchmark_group("hmac");
    let key = payload(40);
    for size in SIZES {
        let data = payload(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
            b.iter(|| hmac::hmac(black_box(&key), black_box(data)))
        });
    }
    group.finish();
}

/// The full per-request cost: body hash plus signature.
pub fn bench_sign(c: &mut Criterion) {
    let mut group = c.benchmark_group("sign");
    let body: String = payload(1024)
        .into_iter()
        .map(|byte| char::from(b'a' + byte % 26))
        .collect();
    group.throughput(Throughput::Bytes(body.len() as u64));
    group.bench_function("event", |b| {
        b.iter(|| {
            let content_md5 = md5::hex(black_box(body.as_bytes()));
            signature::sign(
                black_box("c2VjcmV0LWtleQ"),
                "POST",
                "/rest/v1/event",
                "2024-01-01T00:00:00.000Z",
                &content_md5,
                signature::SIGNATURE_VERSION,
            )
        })
    });
    group.finish();
}
