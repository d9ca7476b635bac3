//! Transfer execution.
//!
//! The accounting core only schedules movements; something has to apply
//! them. `TransferExecutor` is that seam, and `MemoryLedger` is the
//! in-memory implementation used by tests and the CLI. A waterfall's
//! movement list is applied all-or-nothing: the amounts are derived to sum
//! exactly, so a partially-applied batch is never an acceptable state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::LienError;
use crate::types::{AccountId, Amount, AssetKind, Transfer};
use crate::LienResult;

/// Applies value-movement instructions.
pub trait TransferExecutor {
    /// Apply a single movement. `amount == 0` or `from == to` is a no-op.
    fn execute(&mut self, transfer: &Transfer) -> LienResult<()>;

    /// Apply a batch atomically: either every movement lands or none do.
    /// No retries; the first failure aborts the whole batch.
    fn execute_batch(&mut self, transfers: &[Transfer]) -> LienResult<()>;
}

/// In-memory double-entry ledger.
///
/// Balances are signed: a pull-based transfer may drive a payer negative
/// (the real executor would have collected the funds), but an outbound send
/// from the ledger's own holding account requires cover.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryLedger {
    /// The executor's own holding account; sends from it are outbound.
    pub holding: AccountId,
    balances: HashMap<String, HashMap<AccountId, i128>>,
}

impl MemoryLedger {
    pub fn new(holding: impl Into<AccountId>) -> Self {
        MemoryLedger {
            holding: holding.into(),
            balances: HashMap::new(),
        }
    }

    /// Seed an account balance for an asset.
    pub fn credit(&mut self, asset_code: &str, account: &AccountId, amount: Amount) {
        *self
            .balances
            .entry(asset_code.to_string())
            .or_default()
            .entry(account.clone())
            .or_insert(0) += amount as i128;
    }

    pub fn balance(&self, asset_code: &str, account: &AccountId) -> i128 {
        self.balances
            .get(asset_code)
            .and_then(|accounts| accounts.get(account))
            .copied()
            .unwrap_or(0)
    }

    fn apply(
        balances: &mut HashMap<String, HashMap<AccountId, i128>>,
        holding: &AccountId,
        transfer: &Transfer,
    ) -> LienResult<()> {
        match transfer.asset.kind {
            AssetKind::Fungible => {}
            AssetKind::NonFungible => {
                if transfer.amount != 1 {
                    return Err(LienError::TransferFailed(format!(
                        "non-fungible {} moved with amount {}",
                        transfer.asset.code, transfer.amount
                    )));
                }
            }
            AssetKind::Unknown => {
                return Err(LienError::UnsupportedAssetKind(transfer.asset.code.clone()));
            }
        }

        if transfer.amount == 0 || transfer.from == transfer.to {
            return Ok(());
        }

        let accounts = balances.entry(transfer.asset.code.clone()).or_default();
        let from_balance = accounts.entry(transfer.from.clone()).or_insert(0);
        if transfer.from == *holding && *from_balance < transfer.amount as i128 {
            return Err(LienError::TransferFailed(format!(
                "holding account {} has {} of {}, cannot send {}",
                holding, from_balance, transfer.asset.code, transfer.amount
            )));
        }
        *from_balance -= transfer.amount as i128;
        *accounts.entry(transfer.to.clone()).or_insert(0) += transfer.amount as i128;
        Ok(())
    }
}

impl TransferExecutor for MemoryLedger {
    fn execute(&mut self, transfer: &Transfer) -> LienResult<()> {
        let holding = self.holding.clone();
        Self::apply(&mut self.balances, &holding, transfer)
    }

    fn execute_batch(&mut self, transfers: &[Transfer]) -> LienResult<()> {
        // Stage on a copy; commit only if every movement succeeds.
        let mut staged = self.balances.clone();
        for transfer in transfers {
            Self::apply(&mut staged, &self.holding, transfer)?;
        }
        self.balances = staged;
        Ok(())
    }
}
