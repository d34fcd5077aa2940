use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn ed25519_sign_bench(c: &mut Criterion) {
    let kp = ballot_crypto::generate_keypair();
    let msg = [42u8; 128];

    c.bench_function("ed25519_sign_128B", |b| {
        b.iter(|| ballot_crypto::sign_message(black_box(&msg), &kp.private))
    });
}

fn ed25519_verify_bench(c: &mut Criterion) {
    let kp = ballot_crypto::generate_keypair();
    let msg = [42u8; 128];
    let sig = ballot_crypto::sign_message(&msg, &kp.private);

    c.bench_function("ed25519_verify_128B", |b| {
        b.iter(|| ballot_crypto::verify_signature(black_box(&msg), &sig, &kp.public))
    });
}

fn public_key_hex_decode_bench(c: &mut Criterion) {
    let hex = ballot_crypto::generate_keypair().public.to_hex();

    c.bench_function("public_key_hex_decode", |b| {
        b.iter(|| ballot_crypto::decode_public_key_hex(black_box(&hex)))
    });
}

fn app_hash_fold_bench(c: &mut Criterion) {
    let prev = [7u8; 32];
    let tx = vec![0xCDu8; 512];

    c.bench_function("blake2b_app_hash_fold_512B", |b| {
        b.iter(|| ballot_crypto::blake2b_256_multi(black_box(&[prev.as_slice(), tx.as_slice()])))
    });
}

criterion_group!(
    benches,
    ed25519_sign_bench,
    ed25519_verify_bench,
    public_key_hex_decode_bench,
    app_hash_fold_bench
);
criterion_main!(benches);
