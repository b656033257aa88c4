//! A weekend trip ledger, end to end.
//!
//! Three friends log shared expenses in two currencies, one of them
//! settles part of their debt, and the engine reports who owes whom and
//! how to square up.

use split_ledger::core::currency::CurrencyCode;
use split_ledger::core::expense::{split_evenly, ExpenseRecord, SplitRecord};
use split_ledger::core::money::MinorUnits;
use split_ledger::core::payment::PaymentRecord;
use split_ledger::core::user::{GroupId, UserId};
use split_ledger::scenario::InMemoryLedger;
use split_ledger::settle::engine::SettlementEngine;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  split-ledger: Weekend Trip Example      ║");
    println!("╚══════════════════════════════════════════╝\n");

    let trip = GroupId::new("weekend-trip");
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");
    let cara = UserId::new("cara");
    let usd = CurrencyCode::new("USD");
    let eur = CurrencyCode::new("EUR");
    let everyone = [alice.clone(), bob.clone(), cara.clone()];

    let mut ledger = InMemoryLedger::new();
    ledger.add_group(trip.clone(), everyone.to_vec());

    // --- The weekend's expenses ---
    println!("━━━ The Ledger ━━━\n");

    let expenses = vec![
        ExpenseRecord::new(
            Some(trip.clone()),
            alice.clone(),
            usd.clone(),
            MinorUnits::new(24_000),
            split_evenly(MinorUnits::new(24_000), &everyone),
        )
        .describe("hotel, two nights"),
        ExpenseRecord::new(
            Some(trip.clone()),
            bob.clone(),
            usd.clone(),
            MinorUnits::new(9_000),
            split_evenly(MinorUnits::new(9_000), &everyone),
        )
        .describe("saturday dinner"),
        ExpenseRecord::new(
            Some(trip.clone()),
            cara.clone(),
            usd.clone(),
            MinorUnits::new(2_400),
            vec![
                SplitRecord::new(bob.clone(), MinorUnits::new(1_200)),
                SplitRecord::new(cara.clone(), MinorUnits::new(1_200)),
            ],
        )
        .describe("airport taxi (bob and cara only)"),
        ExpenseRecord::new(
            Some(trip.clone()),
            alice.clone(),
            eur.clone(),
            MinorUnits::new(4_500),
            split_evenly(MinorUnits::new(4_500), &everyone),
        )
        .describe("museum tickets"),
    ];
    for expense in expenses {
        println!(
            "  {} — {}",
            expense,
            expense.description().unwrap_or("(no description)")
        );
        ledger.add_expense(expense);
    }

    // bob squares up part of what he owes alice
    let payment = PaymentRecord::confirmed(
        Some(trip.clone()),
        bob.clone(),
        alice.clone(),
        usd.clone(),
        MinorUnits::new(5_000),
    );
    println!("  {}", payment);
    ledger.add_payment(payment);
    println!();

    let engine = SettlementEngine::new(ledger);

    // --- Who owes whom, pair by pair ---
    println!("━━━ Who Owes Whom ━━━\n");
    let report = engine
        .group_balances(&trip, &alice)
        .expect("demo ledger is valid");
    print!("{}", report);
    println!();

    // --- One member's personal view ---
    println!("━━━ Alice's View ━━━\n");
    let view = engine.user_balances(&alice).expect("demo ledger is valid");
    print!("{}", view);
    println!();

    // --- The settlement plan ---
    println!("━━━ Settlement Plan ━━━\n");
    let plan = engine
        .simplify_debts(&trip, &alice)
        .expect("demo ledger is valid");
    print!("{}", plan);
}
