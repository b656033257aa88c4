//! Ledger entry extraction.
//!
//! Translates raw expense and payment records into normalized
//! [`LedgerEntry`] values. This is the validation gate of the engine:
//! corrupt records (negative shares, negative payment amounts, malformed
//! currency codes) are rejected here with a data-integrity error, so
//! everything downstream can assume well-formed entries.

use crate::core::entry::LedgerEntry;
use crate::core::error::{LedgerError, Result};
use crate::core::expense::ExpenseRecord;
use crate::core::payment::PaymentRecord;

/// The ledger entry extractor.
///
/// Both record kinds reduce to the same normalized fact:
///
/// - an expense split for a participant other than the payer means the
///   participant owes the payer their share;
/// - a confirmed payment from A to B means B now owes A that amount,
///   which offsets what A owed B once aggregated.
///
/// Modeling payments as reverse debts keeps aggregation uniform: the
/// accumulator only ever sums entries, it never branches on record kind.
pub struct EntryExtractor;

impl EntryExtractor {
    /// Extracts entries from a snapshot of expenses and payments.
    ///
    /// Fails fast on the first integrity violation. Non-confirmed
    /// payments present in the input are skipped, never counted.
    pub fn extract(
        expenses: &[ExpenseRecord],
        payments: &[PaymentRecord],
    ) -> Result<Vec<LedgerEntry>> {
        let mut entries = Vec::new();
        for expense in expenses {
            entries.extend(Self::expense_entries(expense)?);
        }
        for payment in payments {
            if let Some(entry) = Self::payment_entry(payment)? {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    /// Entries for a single expense: one per split whose participant is
    /// not the payer, directed participant → payer.
    ///
    /// Zero-amount splits still produce (zero) entries; they are
    /// harmless no-ops under aggregation. The payer's own share never
    /// produces an entry.
    pub fn expense_entries(expense: &ExpenseRecord) -> Result<Vec<LedgerEntry>> {
        if !expense.currency().is_well_formed() {
            log::error!(
                "expense {} carries malformed currency {:?}",
                expense.id(),
                expense.currency().as_str()
            );
            return Err(LedgerError::MalformedCurrency {
                record: expense.id(),
                code: expense.currency().as_str().to_string(),
            });
        }

        let mut entries = Vec::with_capacity(expense.splits().len());
        for split in expense.splits() {
            if split.owed.is_negative() {
                log::error!(
                    "expense {} has negative split {} for {}",
                    expense.id(),
                    split.owed,
                    split.user
                );
                return Err(LedgerError::NegativeSplit {
                    expense: expense.id(),
                    user: split.user.clone(),
                    amount: split.owed,
                });
            }
            if &split.user == expense.payer() {
                continue;
            }
            entries.push(LedgerEntry::new(
                split.user.clone(),
                expense.payer().clone(),
                expense.currency().clone(),
                split.owed,
            ));
        }
        Ok(entries)
    }

    /// Entry for a single payment, or `None` when the payment does not
    /// count (not confirmed).
    pub fn payment_entry(payment: &PaymentRecord) -> Result<Option<LedgerEntry>> {
        if !payment.status().is_confirmed() {
            log::debug!(
                "skipping payment {} in status {}",
                payment.id(),
                payment.status()
            );
            return Ok(None);
        }
        if !payment.currency().is_well_formed() {
            log::error!(
                "payment {} carries malformed currency {:?}",
                payment.id(),
                payment.currency().as_str()
            );
            return Err(LedgerError::MalformedCurrency {
                record: payment.id(),
                code: payment.currency().as_str().to_string(),
            });
        }
        if payment.amount().is_negative() {
            log::error!(
                "payment {} has negative amount {}",
                payment.id(),
                payment.amount()
            );
            return Err(LedgerError::NegativePayment {
                payment: payment.id(),
                from: payment.from().clone(),
                to: payment.to().clone(),
                amount: payment.amount(),
            });
        }
        Ok(Some(LedgerEntry::new(
            payment.to().clone(),
            payment.from().clone(),
            payment.currency().clone(),
            payment.amount(),
        )))
    }
}
