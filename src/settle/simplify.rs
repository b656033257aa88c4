//! Greedy debt simplification.
//!
//! Collapses a set of net positions into a short list of concrete
//! transfers that settles everyone. The output is a heuristic minimum:
//! never more than one transfer fewer than the number of unsettled
//! users, not a provably optimal count.

use crate::core::currency::CurrencyCode;
use crate::core::error::{LedgerError, Result};
use crate::core::money::MinorUnits;
use crate::core::user::UserId;
use crate::ledger::balance::BalanceSheet;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt;

/// A suggested settlement transfer: `from` pays `to`. `amount` is
/// always positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementInstruction {
    pub from: UserId,
    pub to: UserId,
    pub currency: CurrencyCode,
    pub amount: MinorUnits,
}

impl fmt::Display for SettlementInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pays {} {} {}",
            self.from, self.to, self.amount, self.currency
        )
    }
}

/// Heap slot ordered by magnitude, ties broken toward the smaller user
/// id so equal-magnitude pops are deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HeapSlot {
    magnitude: MinorUnits,
    user: UserId,
}

impl Ord for HeapSlot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.magnitude
            .cmp(&other.magnitude)
            .then_with(|| other.user.cmp(&self.user))
    }
}

impl PartialOrd for HeapSlot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The debt simplifier.
pub struct DebtSimplifier;

impl DebtSimplifier {
    /// Simplifies one currency's net positions into transfers.
    ///
    /// # Algorithm
    ///
    /// 1. Split nonzero positions into a debtor heap and a creditor
    ///    heap, both popping largest magnitude first (ties toward the
    ///    smaller user id).
    /// 2. Match the largest debtor with the largest creditor and emit a
    ///    transfer of the smaller magnitude.
    /// 3. Push any nonzero remainder back and repeat until both heaps
    ///    drain.
    ///
    /// Every round fully retires at least one participant, so at most
    /// `nonzero_positions - 1` transfers are emitted. The positions must
    /// conserve (sum to zero); anything else is reported as corruption
    /// before any matching happens.
    pub fn simplify(
        positions: &BTreeMap<UserId, MinorUnits>,
        currency: &CurrencyCode,
    ) -> Result<Vec<SettlementInstruction>> {
        let mut debtors = BinaryHeap::new();
        let mut creditors = BinaryHeap::new();
        let mut residual: i128 = 0;
        let mut nonzero = 0usize;

        for (user, &amount) in positions {
            residual += amount.value() as i128;
            if amount.is_zero() {
                continue;
            }
            nonzero += 1;
            let slot = HeapSlot {
                magnitude: amount.abs(),
                user: user.clone(),
            };
            if amount.is_negative() {
                debtors.push(slot);
            } else {
                creditors.push(slot);
            }
        }

        if nonzero == 1 {
            // A single unsettled user has nobody to settle with; the
            // books upstream are corrupt.
            let (user, amount) = match (debtors.peek(), creditors.peek()) {
                (Some(slot), _) => (slot.user.clone(), -slot.magnitude),
                (_, Some(slot)) => (slot.user.clone(), slot.magnitude),
                _ => unreachable!("nonzero count is 1"),
            };
            log::error!("lone net position {amount} {currency} held by {user}");
            return Err(LedgerError::LoneNetPosition {
                user,
                currency: currency.clone(),
                amount,
            });
        }

        if residual != 0 {
            // Error payload clamps to the i64 range.
            let clamped =
                MinorUnits::new(residual.clamp(i64::MIN as i128, i64::MAX as i128) as i64);
            log::error!("positions in {currency} sum to {residual}, expected zero");
            return Err(LedgerError::ConservationBroken {
                currency: currency.clone(),
                residual: clamped,
            });
        }

        let mut instructions = Vec::new();
        loop {
            match (debtors.pop(), creditors.pop()) {
                (Some(debtor), Some(creditor)) => {
                    let transfer = debtor.magnitude.min(creditor.magnitude);
                    instructions.push(SettlementInstruction {
                        from: debtor.user.clone(),
                        to: creditor.user.clone(),
                        currency: currency.clone(),
                        amount: transfer,
                    });
                    let debtor_left = debtor.magnitude - transfer;
                    if !debtor_left.is_zero() {
                        debtors.push(HeapSlot {
                            magnitude: debtor_left,
                            user: debtor.user,
                        });
                    }
                    let creditor_left = creditor.magnitude - transfer;
                    if !creditor_left.is_zero() {
                        creditors.push(HeapSlot {
                            magnitude: creditor_left,
                            user: creditor.user,
                        });
                    }
                }
                // Conservation drains both heaps on the same round.
                _ => break,
            }
        }
        Ok(instructions)
    }

    /// Simplifies an entire balance sheet, one currency at a time in
    /// sorted currency order, and concatenates the transfers.
    pub fn simplify_sheet(sheet: &BalanceSheet) -> Result<Vec<SettlementInstruction>> {
        let mut instructions = Vec::new();
        for currency in sheet.currencies() {
            let positions = sheet.net_positions_for(&currency);
            instructions.extend(Self::simplify(&positions, &currency)?);
        }
        Ok(instructions)
    }
}
