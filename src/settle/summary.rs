//! Settlement plan summary: how much a simplified plan saves.

use crate::core::currency::CurrencyCode;
use crate::ledger::balance::BalanceSheet;
use crate::settle::simplify::SettlementInstruction;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Total amount a plan moves in one currency, in display units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyTotal {
    pub currency: CurrencyCode,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// Compares a settlement plan against the pairwise balances it settles.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementSummary {
    /// Nonzero pairwise balances before simplification.
    pub pairwise_debts: usize,
    /// Suggested transfers in the simplified plan.
    pub transfers: usize,
    /// Amount the plan moves per currency, sorted by currency.
    pub settled_totals: Vec<CurrencyTotal>,
}

impl SettlementSummary {
    /// Computes the summary for a plan over the sheet it was derived from.
    pub fn from_plan(sheet: &BalanceSheet, instructions: &[SettlementInstruction]) -> Self {
        let mut totals: BTreeMap<CurrencyCode, Decimal> = BTreeMap::new();
        for transfer in instructions {
            *totals
                .entry(transfer.currency.clone())
                .or_insert(Decimal::ZERO) += transfer.currency.to_decimal(transfer.amount);
        }

        SettlementSummary {
            pairwise_debts: sheet.nonzero_pair_balances().len(),
            transfers: instructions.len(),
            settled_totals: totals
                .into_iter()
                .map(|(currency, amount)| CurrencyTotal { currency, amount })
                .collect(),
        }
    }

    /// Transfers eliminated relative to settling every pairwise balance
    /// one by one.
    pub fn transfers_saved(&self) -> usize {
        self.pairwise_debts.saturating_sub(self.transfers)
    }

    /// Transfers saved as a percentage of the pairwise count.
    pub fn savings_percent(&self) -> f64 {
        if self.pairwise_debts == 0 {
            return 0.0;
        }
        self.transfers_saved() as f64 * 100.0 / self.pairwise_debts as f64
    }
}

impl std::fmt::Display for SettlementSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Settlement Summary ===")?;
        writeln!(f, "Pairwise debts: {}", self.pairwise_debts)?;
        writeln!(f, "Transfers:      {}", self.transfers)?;
        writeln!(
            f,
            "Saved:          {} ({:.1}%)",
            self.transfers_saved(),
            self.savings_percent()
        )?;
        for total in &self.settled_totals {
            writeln!(f, "  {} moved: {}", total.currency, total.amount)?;
        }
        Ok(())
    }
}
