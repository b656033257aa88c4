//! The settlement engine façade.
//!
//! Thin orchestration over the extract → aggregate → simplify pipeline,
//! generic over the data sources that supply records. Every call pulls a
//! fresh snapshot and recomputes; the engine holds no state between
//! calls, so it can never serve a stale balance.
//!
//! Amounts cross this boundary as exact decimal strings in each
//! currency's display units, never as floats and never as raw minor
//! units.

use crate::core::currency::CurrencyCode;
use crate::core::error::{LedgerError, Result};
use crate::core::user::{GroupId, UserId};
use crate::ledger::balance::BalanceSheet;
use crate::ledger::extract::EntryExtractor;
use crate::settle::simplify::DebtSimplifier;
use crate::settle::summary::SettlementSummary;
use crate::sources::{ExpenseSource, MembershipSource, PaymentSource};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// One row of a user's balance view. `amount` is signed from the
/// subject's side: positive means the counterparty owes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterpartyBalance {
    pub counterparty: UserId,
    pub currency: CurrencyCode,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// Everything one user is owed or owes, across their whole footprint.
#[derive(Debug, Clone, Serialize)]
pub struct UserBalanceReport {
    pub user: UserId,
    pub balances: Vec<CounterpartyBalance>,
}

/// A nonzero pairwise debt inside a group, debtor → creditor with a
/// positive amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwedBalance {
    pub debtor: UserId,
    pub creditor: UserId,
    pub currency: CurrencyCode,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// All outstanding debts within one group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupBalanceReport {
    pub group: GroupId,
    pub debts: Vec<OwedBalance>,
}

/// One transfer of a settlement plan: `from` pays `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedTransfer {
    pub from: UserId,
    pub to: UserId,
    pub currency: CurrencyCode,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// A simplified settlement plan for one group.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementPlan {
    pub group: GroupId,
    pub transfers: Vec<SuggestedTransfer>,
    pub summary: SettlementSummary,
}

/// The engine: balance queries and debt simplification over pluggable
/// sources.
pub struct SettlementEngine<S> {
    source: S,
}

impl<S> SettlementEngine<S>
where
    S: ExpenseSource + PaymentSource + MembershipSource,
{
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// A user's balances against every counterparty they share history
    /// with, in any group or none. Zero balances are omitted; a user
    /// with no history gets an empty report.
    pub fn user_balances(&self, user: &UserId) -> Result<UserBalanceReport> {
        let expenses = self.source.expenses_for_user(user)?;
        let payments = self.source.confirmed_payments_for_user(user)?;
        let entries = EntryExtractor::extract(&expenses, &payments)?;
        let sheet = BalanceSheet::from_entries(&entries)?;

        let balances = sheet
            .counterparty_balances(user)
            .into_iter()
            .map(|(counterparty, currency, amount)| CounterpartyBalance {
                counterparty,
                amount: currency.to_decimal(amount),
                currency,
            })
            .collect();
        Ok(UserBalanceReport {
            user: user.clone(),
            balances,
        })
    }

    /// Every outstanding pairwise debt in a group. The viewer must be a
    /// member; a group with no recorded data yields an empty report.
    pub fn group_balances(&self, group: &GroupId, viewer: &UserId) -> Result<GroupBalanceReport> {
        self.require_member(group, viewer)?;
        let sheet = self.sheet_for_group(group)?;

        let debts = sheet
            .nonzero_pair_balances()
            .into_iter()
            .map(|debt| OwedBalance {
                debtor: debt.debtor,
                creditor: debt.creditor,
                amount: debt.currency.to_decimal(debt.amount),
                currency: debt.currency,
            })
            .collect();
        Ok(GroupBalanceReport {
            group: group.clone(),
            debts,
        })
    }

    /// A simplified settlement plan for the group: the fewest transfers
    /// the greedy matcher finds, per currency, with a summary of what
    /// simplification saved. Same membership precondition as
    /// [`group_balances`](Self::group_balances).
    pub fn simplify_debts(&self, group: &GroupId, viewer: &UserId) -> Result<SettlementPlan> {
        self.require_member(group, viewer)?;
        let sheet = self.sheet_for_group(group)?;
        let instructions = DebtSimplifier::simplify_sheet(&sheet)?;
        let summary = SettlementSummary::from_plan(&sheet, &instructions);

        let transfers = instructions
            .into_iter()
            .map(|t| SuggestedTransfer {
                from: t.from,
                to: t.to,
                amount: t.currency.to_decimal(t.amount),
                currency: t.currency,
            })
            .collect();
        Ok(SettlementPlan {
            group: group.clone(),
            transfers,
            summary,
        })
    }

    fn sheet_for_group(&self, group: &GroupId) -> Result<BalanceSheet> {
        let expenses = self.source.expenses_for_group(group)?;
        let payments = self.source.confirmed_payments_for_group(group)?;
        let entries = EntryExtractor::extract(&expenses, &payments)?;
        BalanceSheet::from_entries(&entries)
    }

    fn require_member(&self, group: &GroupId, user: &UserId) -> Result<()> {
        if self.source.is_member(group, user)? {
            Ok(())
        } else {
            log::debug!("denying {user} access to group {group}");
            Err(LedgerError::AccessDenied {
                user: user.clone(),
                group: group.clone(),
            })
        }
    }
}

impl fmt::Display for UserBalanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Balances for {} ===", self.user)?;
        if self.balances.is_empty() {
            writeln!(f, "  nothing outstanding")?;
        }
        for row in &self.balances {
            if row.amount.is_sign_negative() {
                writeln!(
                    f,
                    "  {} owes {} {} {}",
                    self.user,
                    row.counterparty,
                    -row.amount,
                    row.currency
                )?;
            } else {
                writeln!(
                    f,
                    "  {} owes {} {} {}",
                    row.counterparty, self.user, row.amount, row.currency
                )?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for GroupBalanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Group {} Balances ===", self.group)?;
        if self.debts.is_empty() {
            writeln!(f, "  all settled")?;
        }
        for debt in &self.debts {
            writeln!(
                f,
                "  {} owes {} {} {}",
                debt.debtor, debt.creditor, debt.amount, debt.currency
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for SettlementPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Settlement Plan for {} ===", self.group)?;
        if self.transfers.is_empty() {
            writeln!(f, "  nothing to settle")?;
        }
        for transfer in &self.transfers {
            writeln!(
                f,
                "  {} pays {} {} {}",
                transfer.from, transfer.to, transfer.amount, transfer.currency
            )?;
        }
        writeln!(f)?;
        write!(f, "{}", self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expense::{split_evenly, ExpenseRecord, SplitRecord};
    use crate::core::money::MinorUnits;
    use crate::core::payment::PaymentRecord;
    use crate::scenario::InMemoryLedger;

    fn usd() -> CurrencyCode {
        CurrencyCode::new("USD")
    }

    fn trip() -> GroupId {
        GroupId::new("trip")
    }

    fn user(name: &str) -> UserId {
        UserId::new(name)
    }

    /// Group {a, b, c}; a pays 90.00 split evenly.
    fn even_split_ledger() -> InMemoryLedger {
        let mut ledger = InMemoryLedger::new();
        ledger.add_group(trip(), vec![user("a"), user("b"), user("c")]);
        ledger.add_expense(ExpenseRecord::new(
            Some(trip()),
            user("a"),
            usd(),
            MinorUnits::new(9000),
            split_evenly(MinorUnits::new(9000), &[user("a"), user("b"), user("c")]),
        ));
        ledger
    }

    #[test]
    fn test_group_balances_even_split() {
        let engine = SettlementEngine::new(even_split_ledger());
        let report = engine.group_balances(&trip(), &user("a")).unwrap();

        assert_eq!(report.debts.len(), 2);
        assert_eq!(report.debts[0].debtor, user("b"));
        assert_eq!(report.debts[0].creditor, user("a"));
        assert_eq!(report.debts[0].amount.to_string(), "30.00");
        assert_eq!(report.debts[1].debtor, user("c"));
        assert_eq!(report.debts[1].amount.to_string(), "30.00");
    }

    #[test]
    fn test_simplify_even_split_orders_by_user_id() {
        let engine = SettlementEngine::new(even_split_ledger());
        let plan = engine.simplify_debts(&trip(), &user("b")).unwrap();

        // equal magnitudes settle in user id order
        assert_eq!(plan.transfers.len(), 2);
        assert_eq!(plan.transfers[0].from, user("b"));
        assert_eq!(plan.transfers[0].to, user("a"));
        assert_eq!(plan.transfers[0].amount.to_string(), "30.00");
        assert_eq!(plan.transfers[1].from, user("c"));
        assert_eq!(plan.summary.transfers, 2);
    }

    #[test]
    fn test_confirmed_payment_offsets_debt() {
        let mut ledger = even_split_ledger();
        ledger.add_payment(PaymentRecord::confirmed(
            Some(trip()),
            user("b"),
            user("a"),
            usd(),
            MinorUnits::new(3000),
        ));
        let engine = SettlementEngine::new(ledger);

        let plan = engine.simplify_debts(&trip(), &user("a")).unwrap();
        // b settled up and is omitted entirely
        assert_eq!(plan.transfers.len(), 1);
        assert_eq!(plan.transfers[0].from, user("c"));
        assert_eq!(plan.transfers[0].to, user("a"));
        assert_eq!(plan.transfers[0].amount.to_string(), "30.00");
    }

    #[test]
    fn test_cycle_shows_debts_but_empty_plan() {
        let mut ledger = InMemoryLedger::new();
        ledger.add_group(trip(), vec![user("a"), user("b"), user("c")]);
        // a owes b, b owes c, c owes a, 10.00 each: the payer covers the
        // whole amount and the debtor holds the only split
        for (debtor, creditor) in [("a", "b"), ("b", "c"), ("c", "a")] {
            ledger.add_expense(ExpenseRecord::new(
                Some(trip()),
                user(creditor),
                usd(),
                MinorUnits::new(1000),
                vec![SplitRecord::new(user(debtor), MinorUnits::new(1000))],
            ));
        }
        let engine = SettlementEngine::new(ledger);

        let report = engine.group_balances(&trip(), &user("a")).unwrap();
        assert_eq!(report.debts.len(), 3);

        let plan = engine.simplify_debts(&trip(), &user("a")).unwrap();
        assert!(plan.transfers.is_empty());
        assert_eq!(plan.summary.pairwise_debts, 3);
        assert_eq!(plan.summary.transfers_saved(), 3);
    }

    #[test]
    fn test_non_member_is_denied() {
        let engine = SettlementEngine::new(even_split_ledger());
        let err = engine
            .group_balances(&trip(), &user("mallory"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::AccessDenied { .. }));
        let err = engine.simplify_debts(&trip(), &user("mallory")).unwrap_err();
        assert!(matches!(err, LedgerError::AccessDenied { .. }));
    }

    #[test]
    fn test_unknown_group_is_denied() {
        let engine = SettlementEngine::new(InMemoryLedger::new());
        let err = engine
            .group_balances(&GroupId::new("nowhere"), &user("a"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::AccessDenied { .. }));
    }

    #[test]
    fn test_empty_group_yields_empty_report() {
        let mut ledger = InMemoryLedger::new();
        ledger.add_group(trip(), vec![user("a"), user("b")]);
        let engine = SettlementEngine::new(ledger);

        let report = engine.group_balances(&trip(), &user("a")).unwrap();
        assert!(report.debts.is_empty());
        let plan = engine.simplify_debts(&trip(), &user("a")).unwrap();
        assert!(plan.transfers.is_empty());
    }

    #[test]
    fn test_user_balances_span_groups_and_direct_expenses() {
        let mut ledger = even_split_ledger();
        // direct expense outside any group: b paid 12.00, a owes half
        ledger.add_expense(ExpenseRecord::new(
            None,
            user("b"),
            usd(),
            MinorUnits::new(1200),
            split_evenly(MinorUnits::new(1200), &[user("a"), user("b")]),
        ));
        let engine = SettlementEngine::new(ledger);

        let report = engine.user_balances(&user("a")).unwrap();
        assert_eq!(report.user, user("a"));
        // b owes a 30.00 from the trip, a owes b 6.00 direct: net +24.00
        let b_row = report
            .balances
            .iter()
            .find(|row| row.counterparty == user("b"))
            .unwrap();
        assert_eq!(b_row.amount.to_string(), "24.00");
    }

    #[test]
    fn test_user_with_no_history_gets_empty_report() {
        let engine = SettlementEngine::new(InMemoryLedger::new());
        let report = engine.user_balances(&user("ghost")).unwrap();
        assert!(report.balances.is_empty());
    }

    #[test]
    fn test_amounts_serialize_as_strings() {
        let engine = SettlementEngine::new(even_split_ledger());
        let plan = engine.simplify_debts(&trip(), &user("a")).unwrap();
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["transfers"][0]["amount"], "30.00");
        assert_eq!(json["transfers"][0]["from"], "b");
    }

    #[test]
    fn test_source_failure_propagates() {
        struct Failing;
        impl crate::sources::ExpenseSource for Failing {
            fn expenses_for_group(&self, _: &GroupId) -> crate::core::error::Result<Vec<ExpenseRecord>> {
                Err(LedgerError::Source("expense store offline".into()))
            }
            fn expenses_for_user(&self, _: &UserId) -> crate::core::error::Result<Vec<ExpenseRecord>> {
                Err(LedgerError::Source("expense store offline".into()))
            }
        }
        impl crate::sources::PaymentSource for Failing {
            fn confirmed_payments_for_group(
                &self,
                _: &GroupId,
            ) -> crate::core::error::Result<Vec<PaymentRecord>> {
                Ok(Vec::new())
            }
            fn confirmed_payments_for_user(
                &self,
                _: &UserId,
            ) -> crate::core::error::Result<Vec<PaymentRecord>> {
                Ok(Vec::new())
            }
        }
        impl crate::sources::MembershipSource for Failing {
            fn is_member(&self, _: &GroupId, _: &UserId) -> crate::core::error::Result<bool> {
                Ok(true)
            }
        }

        let engine = SettlementEngine::new(Failing);
        let err = engine.user_balances(&user("a")).unwrap_err();
        assert!(matches!(err, LedgerError::Source(_)));
        assert!(!err.is_data_integrity());
    }
}
