//! vfxd Benchmark Suite
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench -p vfxd
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vfxd::prelude::*;

const PHRASE: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

// ============================================================================
// Mnemonic Benchmarks
// ============================================================================

fn bench_mnemonic(c: &mut Criterion) {
    let mut group = c.benchmark_group("Mnemonic");

    group.bench_function("generate_24", |b| {
        b.iter(|| Mnemonic::generate(black_box(WordCount::TwentyFour)))
    });

    group.bench_function("validate_12", |b| {
        b.iter(|| vfxd::mnemonic::validate(black_box(PHRASE)))
    });

    group.bench_function("to_seed", |b| {
        let mnemonic = Mnemonic::parse(PHRASE).unwrap();
        b.iter(|| mnemonic.to_seed(black_box("")))
    });

    group.finish();
}

// ============================================================================
// Key Benchmarks
// ============================================================================

fn bench_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("Keys");

    group.bench_function("derive_from_mnemonic", |b| {
        b.iter(|| derive_from_mnemonic(black_box(PHRASE), black_box(0)))
    });

    group.bench_function("address_from_private", |b| {
        let key = generate_random().unwrap();
        b.iter(|| address_from_private(black_box(&key), Network::Mainnet))
    });

    group.bench_function("address_parse", |b| {
        b.iter(|| Address::parse_any(black_box("RNZZecHLuoqUzNc9oE8ErkPFV1zJdvDBAH")))
    });

    group.finish();
}

// ============================================================================
// Transfer Benchmarks
// ============================================================================

fn bench_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("Transfer");
    let sender = Keypair::generate(Network::Testnet).unwrap();
    let recipient = Keypair::generate(Network::Testnet).unwrap();

    group.bench_function("build_and_sign", |b| {
        b.iter(|| {
            build_transfer(
                &sender,
                black_box(recipient.address().as_str()),
                "5",
                Network::Testnet,
            )
        })
    });

    let signed = build_transfer(&sender, recipient.address().as_str(), "5", Network::Testnet).unwrap();
    group.bench_function("verify", |b| {
        b.iter(|| vfxd::vfx::verify_signed_transfer(black_box(&signed)))
    });

    group.finish();
}

criterion_group!(benches, bench_mnemonic, bench_keys, bench_transfer);
criterion_main!(benches);
