//! Circular debts and why simplification is a net operation.
//!
//! Three friends cover each other's tickets in a ring. Everyone owes
//! someone, yet nobody needs to pay: the net positions are all zero.
//! Perturb one amount and a single transfer settles the whole group.

use split_ledger::core::currency::CurrencyCode;
use split_ledger::core::expense::{ExpenseRecord, SplitRecord};
use split_ledger::core::money::MinorUnits;
use split_ledger::core::user::{GroupId, UserId};
use split_ledger::scenario::InMemoryLedger;
use split_ledger::settle::engine::SettlementEngine;

/// One friend covers another's ticket in full.
fn covers(
    group: &GroupId,
    payer: &UserId,
    debtor: &UserId,
    amount: i64,
) -> ExpenseRecord {
    ExpenseRecord::new(
        Some(group.clone()),
        payer.clone(),
        CurrencyCode::new("USD"),
        MinorUnits::new(amount),
        vec![SplitRecord::new(debtor.clone(), MinorUnits::new(amount))],
    )
}

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  split-ledger: Circular Debts Example    ║");
    println!("╚══════════════════════════════════════════╝\n");

    let house = GroupId::new("ski-house");
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");
    let cara = UserId::new("cara");

    // --- Scenario 1: a perfect ring ---
    println!("━━━ Scenario 1: Perfect Ring ━━━\n");
    println!("  alice covers bob's lift pass, bob covers cara's,");
    println!("  cara covers alice's — 60.00 USD each.\n");

    let mut ledger = InMemoryLedger::new();
    ledger.add_group(house.clone(), vec![alice.clone(), bob.clone(), cara.clone()]);
    ledger.add_expense(covers(&house, &alice, &bob, 6_000));
    ledger.add_expense(covers(&house, &bob, &cara, 6_000));
    ledger.add_expense(covers(&house, &cara, &alice, 6_000));

    let engine = SettlementEngine::new(ledger);
    let report = engine
        .group_balances(&house, &alice)
        .expect("demo ledger is valid");
    print!("{}", report);
    println!();

    let plan = engine
        .simplify_debts(&house, &alice)
        .expect("demo ledger is valid");
    print!("{}", plan);
    println!("\n  Three pairwise debts, zero transfers: the ring nets out.\n");

    // --- Scenario 2: an uneven ring ---
    println!("━━━ Scenario 2: Uneven Ring ━━━\n");
    println!("  Same ring, but alice covered a 90.00 USD pass for bob.\n");

    let mut ledger = InMemoryLedger::new();
    ledger.add_group(house.clone(), vec![alice.clone(), bob.clone(), cara.clone()]);
    ledger.add_expense(covers(&house, &alice, &bob, 9_000));
    ledger.add_expense(covers(&house, &bob, &cara, 6_000));
    ledger.add_expense(covers(&house, &cara, &alice, 6_000));

    let engine = SettlementEngine::new(ledger);
    let plan = engine
        .simplify_debts(&house, &alice)
        .expect("demo ledger is valid");
    print!("{}", plan);
    println!("\n  Three pairwise debts collapse into one transfer.");
}
