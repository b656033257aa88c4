use criterion::{black_box, criterion_group, criterion_main, Criterion};
use split_ledger::ledger::balance::BalanceSheet;
use split_ledger::ledger::extract::EntryExtractor;
use split_ledger::scenario::{generate_scenario, ScenarioConfig};
use split_ledger::settle::simplify::DebtSimplifier;

fn bench_aggregate_10_members(c: &mut Criterion) {
    let config = ScenarioConfig {
        member_count: 10,
        expense_count: 50,
        payment_count: 10,
        ..Default::default()
    };
    let ledger = generate_scenario(&config);

    c.bench_function("aggregate_10_members", |b| {
        b.iter(|| {
            let entries =
                EntryExtractor::extract(black_box(ledger.expenses()), black_box(ledger.payments()))
                    .unwrap();
            BalanceSheet::from_entries(&entries).unwrap()
        })
    });
}

fn bench_aggregate_100_members(c: &mut Criterion) {
    let config = ScenarioConfig {
        member_count: 100,
        expense_count: 1000,
        payment_count: 100,
        ..Default::default()
    };
    let ledger = generate_scenario(&config);

    c.bench_function("aggregate_100_members", |b| {
        b.iter(|| {
            let entries =
                EntryExtractor::extract(black_box(ledger.expenses()), black_box(ledger.payments()))
                    .unwrap();
            BalanceSheet::from_entries(&entries).unwrap()
        })
    });
}

fn bench_simplify_100_members(c: &mut Criterion) {
    let config = ScenarioConfig {
        member_count: 100,
        expense_count: 1000,
        payment_count: 100,
        ..Default::default()
    };
    let ledger = generate_scenario(&config);
    let entries = EntryExtractor::extract(ledger.expenses(), ledger.payments()).unwrap();
    let sheet = BalanceSheet::from_entries(&entries).unwrap();

    c.bench_function("simplify_100_members", |b| {
        b.iter(|| DebtSimplifier::simplify_sheet(black_box(&sheet)))
    });
}

fn bench_simplify_1000_members(c: &mut Criterion) {
    let config = ScenarioConfig {
        member_count: 1000,
        expense_count: 10_000,
        payment_count: 500,
        ..Default::default()
    };
    let ledger = generate_scenario(&config);
    let entries = EntryExtractor::extract(ledger.expenses(), ledger.payments()).unwrap();
    let sheet = BalanceSheet::from_entries(&entries).unwrap();

    c.bench_function("simplify_1000_members", |b| {
        b.iter(|| DebtSimplifier::simplify_sheet(black_box(&sheet)))
    });
}

criterion_group!(
    benches,
    bench_aggregate_10_members,
    bench_aggregate_100_members,
    bench_simplify_100_members,
    bench_simplify_1000_members
);
criterion_main!(benches);
