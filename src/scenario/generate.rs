//! Random scenario generation.
//!
//! Produces plausible group ledgers for benchmarks and CLI experiments:
//! a pool of members, even-split expenses with random payers and
//! participant subsets, and a handful of confirmed payments on top.

use crate::core::currency::CurrencyCode;
use crate::core::expense::{split_evenly, ExpenseRecord};
use crate::core::money::MinorUnits;
use crate::core::payment::PaymentRecord;
use crate::core::user::{GroupId, UserId};
use crate::scenario::model::InMemoryLedger;
use rand::Rng;

/// Configuration for generating a random group scenario.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Group every generated record belongs to.
    pub group: GroupId,
    /// Number of group members.
    pub member_count: usize,
    /// Number of expenses to generate.
    pub expense_count: usize,
    /// Number of confirmed payments to generate.
    pub payment_count: usize,
    /// Currencies to draw from.
    pub currencies: Vec<CurrencyCode>,
    /// Minimum expense amount, in minor units.
    pub min_amount: i64,
    /// Maximum expense amount, in minor units.
    pub max_amount: i64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            group: GroupId::new("generated"),
            member_count: 10,
            expense_count: 30,
            payment_count: 5,
            currencies: vec![CurrencyCode::new("USD")],
            min_amount: 500,
            max_amount: 50_000,
        }
    }
}

/// Generates a random scenario ledger for testing.
pub fn generate_scenario(config: &ScenarioConfig) -> InMemoryLedger {
    let mut rng = rand::thread_rng();
    let mut ledger = InMemoryLedger::new();

    let members: Vec<UserId> = (0..config.member_count)
        .map(|i| UserId::new(format!("member-{i:03}")))
        .collect();
    ledger.add_group(config.group.clone(), members.clone());
    if members.is_empty() || config.currencies.is_empty() {
        return ledger;
    }

    for _ in 0..config.expense_count {
        let payer = members[rng.gen_range(0..members.len())].clone();
        let currency = config.currencies[rng.gen_range(0..config.currencies.len())].clone();
        let amount = MinorUnits::new(rng.gen_range(config.min_amount..=config.max_amount));

        // Random participant subset, always including the payer.
        let mut participants: Vec<UserId> = members
            .iter()
            .filter(|_| rng.gen_bool(0.5))
            .cloned()
            .collect();
        if !participants.contains(&payer) {
            participants.push(payer.clone());
        }

        ledger.add_expense(ExpenseRecord::new(
            Some(config.group.clone()),
            payer,
            currency,
            amount,
            split_evenly(amount, &participants),
        ));
    }

    for _ in 0..config.payment_count {
        if members.len() < 2 {
            break;
        }
        let from_idx = rng.gen_range(0..members.len());
        let mut to_idx = rng.gen_range(0..members.len());
        while to_idx == from_idx {
            to_idx = rng.gen_range(0..members.len());
        }
        let currency = config.currencies[rng.gen_range(0..config.currencies.len())].clone();
        let amount = MinorUnits::new(rng.gen_range(config.min_amount..=config.max_amount));
        ledger.add_payment(PaymentRecord::confirmed(
            Some(config.group.clone()),
            members[from_idx].clone(),
            members[to_idx].clone(),
            currency,
            amount,
        ));
    }

    ledger
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::balance::BalanceSheet;
    use crate::ledger::extract::EntryExtractor;
    use crate::settle::simplify::DebtSimplifier;
    use crate::sources::{ExpenseSource, PaymentSource};

    #[test]
    fn test_generated_scenario_shape() {
        let config = ScenarioConfig {
            member_count: 6,
            expense_count: 12,
            payment_count: 3,
            ..Default::default()
        };
        let ledger = generate_scenario(&config);

        assert_eq!(ledger.expenses().len(), 12);
        assert_eq!(ledger.payments().len(), 3);
        assert_eq!(ledger.groups()[&config.group].len(), 6);
    }

    #[test]
    fn test_generated_scenario_settles_cleanly() {
        let config = ScenarioConfig {
            member_count: 8,
            expense_count: 40,
            payment_count: 6,
            currencies: vec![CurrencyCode::new("USD"), CurrencyCode::new("EUR")],
            ..Default::default()
        };
        let ledger = generate_scenario(&config);

        let expenses = ledger.expenses_for_group(&config.group).unwrap();
        let payments = ledger.confirmed_payments_for_group(&config.group).unwrap();
        let entries = EntryExtractor::extract(&expenses, &payments).unwrap();
        let sheet = BalanceSheet::from_entries(&entries).unwrap();

        assert!(sheet.is_conserved());
        let plan = DebtSimplifier::simplify_sheet(&sheet).unwrap();
        for currency in sheet.currencies() {
            let nonzero = sheet.net_positions_for(&currency).len();
            let transfers = plan.iter().filter(|t| t.currency == currency).count();
            assert!(nonzero == 0 || transfers <= nonzero - 1);
        }
    }

    #[test]
    fn test_empty_member_pool_yields_empty_ledger() {
        let config = ScenarioConfig {
            member_count: 0,
            ..Default::default()
        };
        let ledger = generate_scenario(&config);
        assert!(ledger.expenses().is_empty());
        assert!(ledger.payments().is_empty());
    }
}
