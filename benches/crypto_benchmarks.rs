use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use qkd_protocol::{RsaKey, SecureChannel, XorCipher, sha3_256, sha3_512, shake_256};

use rand::SeedableRng;
use rand::rngs::StdRng;

fn benchmark_sponge(c: &mut Criterion) {
    let mut group = c.benchmark_group("sponge");
    let input = vec![0xABu8; 16 * 1024];
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("sha3_256_16k", |b| {
        b.iter(|| sha3_256(black_box(&input)));
    });
    group.bench_function("sha3_512_16k", |b| {
        b.iter(|| sha3_512(black_box(&input)));
    });
    group.bench_function("shake_256_16k_out_1k", |b| {
        b.iter(|| shake_256(black_box(&input), 1024));
    });

    group.finish();
}

fn benchmark_rsa(c: &mut Criterion) {
    let mut group = c.benchmark_group("rsa");

    group.bench_function("generate_512", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| RsaKey::generate(&mut rng, 512).unwrap());
    });

    let mut rng = StdRng::seed_from_u64(2);
    let key = RsaKey::generate(&mut rng, 512).unwrap();
    let secret = [0x5Au8; 16];
    let wrapped = key.encrypt(&secret).unwrap();

    group.bench_function("wrap_16_byte_key", |b| {
        b.iter(|| key.encrypt(black_box(&secret)).unwrap());
    });
    group.bench_function("unwrap_16_byte_key", |b| {
        b.iter(|| key.decrypt(black_box(&wrapped)).unwrap());
    });

    group.finish();
}

fn benchmark_channel(c: &mut Criterion) {
    let mut group = c.benchmark_group("channel");
    let channel: SecureChannel<XorCipher> = SecureChannel::new(&[0x42; 16]).unwrap();

    let plaintext = vec![0x17u8; 4096];
    group.throughput(Throughput::Bytes(plaintext.len() as u64));
    let sealed = channel.seal(&plaintext);

    group.bench_function("seal_4k", |b| {
        b.iter(|| channel.seal(black_box(&plaintext)));
    });
    group.bench_function("open_4k", |b| {
        b.iter(|| channel.open(black_box(&sealed)).unwrap());
    });

    group.finish();
}

criterion_group!(benches, benchmark_sponge, benchmark_rsa, benchmark_channel);
criterion_main!(benches);
