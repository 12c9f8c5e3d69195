//! Benchmark suite for the ledger engine
//!
//! Measures the cost of the two hot operations — wallet address
//! generation and the full atomic transfer commit — using the divan
//! benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! Transfer benchmarks include the durable snapshot flush, so they
//! reflect end-to-end commit latency against a real (temporary) data
//! directory, not just the in-memory bookkeeping.

use rust_decimal::Decimal;
use tempfile::tempdir;

use crypto_ledger::{AddressGenerator, LedgerEngine, Symbol};

fn main() {
    divan::main();
}

/// Benchmark raw wallet address generation
#[divan::bench]
fn address_generation() -> String {
    AddressGenerator::new().generate()
}

/// Benchmark one full transfer commit against a two-account ledger
#[divan::bench(sample_count = 20)]
fn transfer_commit_small_ledger() {
    let dir = tempdir().expect("temp dir");
    let engine = LedgerEngine::open(dir.path()).expect("open engine");

    engine.create_account("alice").expect("create alice");
    engine.create_account("bob").expect("create bob");
    engine.grant_demo_funds("alice").expect("fund alice");
    let bob_address = engine.get_account("bob").expect("bob account").address;

    engine
        .transfer("alice", &bob_address, Symbol::Usdt, Decimal::new(1, 0))
        .expect("transfer");
}

/// Benchmark transfer commit cost with a populated ledger (100 accounts,
/// 100 prior transactions)
#[divan::bench(sample_count = 10)]
fn transfer_commit_populated_ledger() {
    let dir = tempdir().expect("temp dir");
    let engine = LedgerEngine::open(dir.path()).expect("open engine");

    for i in 0..100 {
        engine
            .create_account(&format!("user-{i}"))
            .expect("create account");
    }
    engine.grant_demo_funds("user-0").expect("fund sender");
    let target = engine.get_account("user-1").expect("account").address;

    for _ in 0..100 {
        engine
            .transfer("user-0", &target, Symbol::Usdt, Decimal::new(1, 0))
            .expect("transfer");
    }
}
