use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ballot_crypto::keypair_from_seed;
use ballot_ledger::{
    verify_envelope, ElectionCreate, Envelope, Payload, StateMachine, ValidationContext, VoteCast,
};
use ballot_nullables::{NullManifestStore, NullStore};

fn signed_vote() -> Vec<u8> {
    let voter = keypair_from_seed(&[2; 32]);
    Envelope::sign(
        Payload::Vote(VoteCast {
            from: voter.public.to_hex(),
            poll_hash: "bf00112233445566778899aabbccddeeff".into(),
            choice: "a".into(),
        }),
        &voter.private,
    )
    .to_bytes()
}

fn decode_verify_bench(c: &mut Criterion) {
    let tx = signed_vote();

    c.bench_function("envelope_decode_verify", |b| {
        b.iter(|| {
            let env = Envelope::decode(black_box(&tx)).unwrap();
            verify_envelope(&env).unwrap()
        })
    });
}

fn admission_check_bench(c: &mut Criterion) {
    let authority = keypair_from_seed(&[1; 32]);
    let voters: Vec<String> = (10u8..110)
        .map(|s| keypair_from_seed(&[s; 32]).public.to_hex())
        .collect();
    let tx = Envelope::sign(
        Payload::Election(ElectionCreate {
            id: "e1".into(),
            from: authority.public.to_hex(),
            voters,
        }),
        &authority.private,
    )
    .to_bytes();
    let sm = StateMachine::new(
        ValidationContext::new(authority.public.to_hex()),
        NullStore::new(),
        NullManifestStore::new(),
    );

    c.bench_function("admission_check_election_100_voters", |b| {
        b.iter(|| sm.check(black_box(&tx)).unwrap())
    });
}

criterion_group!(benches, decode_verify_bench, admission_check_bench);
criterion_main!(benches);
