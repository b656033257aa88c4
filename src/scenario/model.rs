//! Scenario files and the in-memory source they hydrate.
//!
//! A scenario file is a small JSON document describing groups, expenses
//! and payments, with amounts as decimal strings in display units. It
//! exists for the CLI, demos and benchmarks; production callers
//! implement the source traits over their own storage instead.

use crate::core::currency::{AmountError, CurrencyCode};
use crate::core::error::Result;
use crate::core::expense::{ExpenseRecord, SplitRecord};
use crate::core::money::MinorUnits;
use crate::core::payment::{PaymentRecord, PaymentStatus};
use crate::core::user::{GroupId, UserId};
use crate::sources::{ExpenseSource, MembershipSource, PaymentSource};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while loading a scenario file.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("could not read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid decimal {text:?}")]
    BadDecimal {
        text: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("amount {value} does not fit {currency} minor units")]
    BadAmount {
        value: Decimal,
        currency: CurrencyCode,
        #[source]
        source: AmountError,
    },
}

/// A group and its member list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupEntry {
    pub id: GroupId,
    pub members: Vec<UserId>,
}

/// One split of a scenario expense; `owed` is a decimal string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitEntry {
    pub user: UserId,
    pub owed: String,
}

/// A scenario expense; `amount` is a decimal string in display units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupId>,
    pub payer: UserId,
    #[serde(default = "default_currency")]
    pub currency: CurrencyCode,
    pub amount: String,
    pub splits: Vec<SplitEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A scenario payment. Status defaults to confirmed: scenario files
/// mostly describe history that already happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupId>,
    pub from: UserId,
    pub to: UserId,
    #[serde(default = "default_currency")]
    pub currency: CurrencyCode,
    pub amount: String,
    #[serde(default = "default_status")]
    pub status: PaymentStatus,
}

fn default_currency() -> CurrencyCode {
    CurrencyCode::new("USD")
}

fn default_status() -> PaymentStatus {
    PaymentStatus::Confirmed
}

/// A whole scenario document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub groups: Vec<GroupEntry>,
    #[serde(default)]
    pub expenses: Vec<ExpenseEntry>,
    #[serde(default)]
    pub payments: Vec<PaymentEntry>,
}

impl ScenarioFile {
    /// Reads and parses a scenario file from disk.
    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Converts the document into an [`InMemoryLedger`], turning every
    /// decimal string into minor units of its currency.
    pub fn into_ledger(self) -> std::result::Result<InMemoryLedger, ScenarioError> {
        let mut ledger = InMemoryLedger::new();
        for group in self.groups {
            ledger.add_group(group.id, group.members);
        }
        for expense in self.expenses {
            let amount = parse_amount(&expense.amount, &expense.currency)?;
            let mut splits = Vec::with_capacity(expense.splits.len());
            for split in &expense.splits {
                splits.push(SplitRecord::new(
                    split.user.clone(),
                    parse_amount(&split.owed, &expense.currency)?,
                ));
            }
            let mut record = ExpenseRecord::new(
                expense.group,
                expense.payer,
                expense.currency,
                amount,
                splits,
            );
            if let Some(text) = expense.description {
                record = record.describe(text);
            }
            ledger.add_expense(record);
        }
        for payment in self.payments {
            let amount = parse_amount(&payment.amount, &payment.currency)?;
            ledger.add_payment(PaymentRecord::with_id(
                Uuid::new_v4(),
                payment.group,
                payment.from,
                payment.to,
                payment.currency,
                amount,
                payment.status,
                Utc::now(),
            ));
        }
        Ok(ledger)
    }

    /// Renders a ledger back into the document form, amounts as exact
    /// decimal strings.
    pub fn from_ledger(ledger: &InMemoryLedger) -> Self {
        let groups = ledger
            .groups()
            .iter()
            .map(|(id, members)| GroupEntry {
                id: id.clone(),
                members: members.clone(),
            })
            .collect();
        let expenses = ledger
            .expenses()
            .iter()
            .map(|expense| ExpenseEntry {
                group: expense.group().cloned(),
                payer: expense.payer().clone(),
                currency: expense.currency().clone(),
                amount: expense.currency().to_decimal(expense.amount()).to_string(),
                splits: expense
                    .splits()
                    .iter()
                    .map(|split| SplitEntry {
                        user: split.user.clone(),
                        owed: expense.currency().to_decimal(split.owed).to_string(),
                    })
                    .collect(),
                description: expense.description().map(str::to_string),
            })
            .collect();
        let payments = ledger
            .payments()
            .iter()
            .map(|payment| PaymentEntry {
                group: payment.group().cloned(),
                from: payment.from().clone(),
                to: payment.to().clone(),
                currency: payment.currency().clone(),
                amount: payment.currency().to_decimal(payment.amount()).to_string(),
                status: payment.status(),
            })
            .collect();
        ScenarioFile {
            groups,
            expenses,
            payments,
        }
    }
}

fn parse_amount(
    text: &str,
    currency: &CurrencyCode,
) -> std::result::Result<MinorUnits, ScenarioError> {
    let value: Decimal = text.parse().map_err(|source| ScenarioError::BadDecimal {
        text: text.to_string(),
        source,
    })?;
    currency
        .minor_units(value)
        .map_err(|source| ScenarioError::BadAmount {
            value,
            currency: currency.clone(),
            source,
        })
}

/// An in-memory record store implementing all three source traits.
///
/// Backs the CLI, demos, tests and benchmarks. Reads clone the matching
/// records, mirroring the snapshot semantics real sources have.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    groups: BTreeMap<GroupId, Vec<UserId>>,
    expenses: Vec<ExpenseRecord>,
    payments: Vec<PaymentRecord>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a group with its member list, replacing any previous
    /// registration of the same group.
    pub fn add_group(&mut self, group: GroupId, members: Vec<UserId>) {
        self.groups.insert(group, members);
    }

    pub fn add_expense(&mut self, expense: ExpenseRecord) {
        self.expenses.push(expense);
    }

    pub fn add_payment(&mut self, payment: PaymentRecord) {
        self.payments.push(payment);
    }

    pub fn groups(&self) -> &BTreeMap<GroupId, Vec<UserId>> {
        &self.groups
    }

    pub fn expenses(&self) -> &[ExpenseRecord] {
        &self.expenses
    }

    pub fn payments(&self) -> &[PaymentRecord] {
        &self.payments
    }
}

impl ExpenseSource for InMemoryLedger {
    fn expenses_for_group(&self, group: &GroupId) -> Result<Vec<ExpenseRecord>> {
        Ok(self
            .expenses
            .iter()
            .filter(|expense| expense.group() == Some(group))
            .cloned()
            .collect())
    }

    fn expenses_for_user(&self, user: &UserId) -> Result<Vec<ExpenseRecord>> {
        Ok(self
            .expenses
            .iter()
            .filter(|expense| {
                expense.payer() == user || expense.splits().iter().any(|split| &split.user == user)
            })
            .cloned()
            .collect())
    }
}

impl PaymentSource for InMemoryLedger {
    fn confirmed_payments_for_group(&self, group: &GroupId) -> Result<Vec<PaymentRecord>> {
        Ok(self
            .payments
            .iter()
            .filter(|payment| payment.group() == Some(group) && payment.status().is_confirmed())
            .cloned()
            .collect())
    }

    fn confirmed_payments_for_user(&self, user: &UserId) -> Result<Vec<PaymentRecord>> {
        Ok(self
            .payments
            .iter()
            .filter(|payment| {
                (payment.from() == user || payment.to() == user)
                    && payment.status().is_confirmed()
            })
            .cloned()
            .collect())
    }
}

impl MembershipSource for InMemoryLedger {
    fn is_member(&self, group: &GroupId, user: &UserId) -> Result<bool> {
        Ok(self
            .groups
            .get(group)
            .map(|members| members.contains(user))
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "groups": [ { "id": "trip", "members": ["a", "b", "c"] } ],
            "expenses": [
                {
                    "group": "trip",
                    "payer": "a",
                    "amount": "90.00",
                    "splits": [
                        { "user": "a", "owed": "30.00" },
                        { "user": "b", "owed": "30.00" },
                        { "user": "c", "owed": "30.00" }
                    ]
                }
            ],
            "payments": [
                { "group": "trip", "from": "b", "to": "a", "amount": "30.00" }
            ]
        }"#
    }

    #[test]
    fn test_parse_applies_defaults() {
        let file: ScenarioFile = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(file.expenses[0].currency, CurrencyCode::new("USD"));
        assert_eq!(file.payments[0].status, PaymentStatus::Confirmed);
    }

    #[test]
    fn test_into_ledger_converts_to_minor_units() {
        let file: ScenarioFile = serde_json::from_str(sample_json()).unwrap();
        let ledger = file.into_ledger().unwrap();

        assert_eq!(ledger.expenses().len(), 1);
        assert_eq!(ledger.expenses()[0].amount(), MinorUnits::new(9000));
        assert_eq!(ledger.expenses()[0].splits()[1].owed, MinorUnits::new(3000));
        assert_eq!(ledger.payments()[0].amount(), MinorUnits::new(3000));
    }

    #[test]
    fn test_bad_decimal_is_rejected() {
        let json = r#"{ "expenses": [ { "payer": "a", "amount": "12.3.4", "splits": [] } ] }"#;
        let file: ScenarioFile = serde_json::from_str(json).unwrap();
        let err = file.into_ledger().unwrap_err();
        assert!(matches!(err, ScenarioError::BadDecimal { .. }));
    }

    #[test]
    fn test_too_precise_amount_is_rejected() {
        let json = r#"{ "expenses": [ { "payer": "a", "amount": "10.005", "splits": [] } ] }"#;
        let file: ScenarioFile = serde_json::from_str(json).unwrap();
        let err = file.into_ledger().unwrap_err();
        assert!(matches!(err, ScenarioError::BadAmount { .. }));
    }

    #[test]
    fn test_from_ledger_renders_decimal_strings() {
        let file: ScenarioFile = serde_json::from_str(sample_json()).unwrap();
        let ledger = file.into_ledger().unwrap();
        let rendered = ScenarioFile::from_ledger(&ledger);

        assert_eq!(rendered.expenses[0].amount, "90.00");
        assert_eq!(rendered.payments[0].amount, "30.00");
        assert_eq!(rendered.groups[0].members.len(), 3);
    }

    #[test]
    fn test_group_scope_excludes_direct_expenses() {
        let mut ledger = InMemoryLedger::new();
        let trip = GroupId::new("trip");
        ledger.add_group(trip.clone(), vec![UserId::new("a"), UserId::new("b")]);
        ledger.add_expense(ExpenseRecord::new(
            Some(trip.clone()),
            UserId::new("a"),
            CurrencyCode::new("USD"),
            MinorUnits::new(1000),
            vec![SplitRecord::new(UserId::new("b"), MinorUnits::new(1000))],
        ));
        ledger.add_expense(ExpenseRecord::new(
            None,
            UserId::new("a"),
            CurrencyCode::new("USD"),
            MinorUnits::new(500),
            vec![SplitRecord::new(UserId::new("b"), MinorUnits::new(500))],
        ));

        assert_eq!(ledger.expenses_for_group(&trip).unwrap().len(), 1);
        assert_eq!(ledger.expenses_for_user(&UserId::new("b")).unwrap().len(), 2);
    }

    #[test]
    fn test_payment_scope_filters_unconfirmed() {
        let mut ledger = InMemoryLedger::new();
        let trip = GroupId::new("trip");
        ledger.add_payment(PaymentRecord::confirmed(
            Some(trip.clone()),
            UserId::new("a"),
            UserId::new("b"),
            CurrencyCode::new("USD"),
            MinorUnits::new(100),
        ));
        ledger.add_payment(PaymentRecord::new(
            Some(trip.clone()),
            UserId::new("a"),
            UserId::new("b"),
            CurrencyCode::new("USD"),
            MinorUnits::new(200),
        ));

        assert_eq!(ledger.confirmed_payments_for_group(&trip).unwrap().len(), 1);
        assert_eq!(
            ledger
                .confirmed_payments_for_user(&UserId::new("b"))
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_membership_lookup() {
        let mut ledger = InMemoryLedger::new();
        let trip = GroupId::new("trip");
        ledger.add_group(trip.clone(), vec![UserId::new("a")]);

        assert!(ledger.is_member(&trip, &UserId::new("a")).unwrap());
        assert!(!ledger.is_member(&trip, &UserId::new("z")).unwrap());
        assert!(!ledger
            .is_member(&GroupId::new("nowhere"), &UserId::new("a"))
            .unwrap());
    }
}
