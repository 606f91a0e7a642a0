//! Point-in-time view of the burner's read surface.

use alloy::primitives::{Address, U256};
use serde::Serialize;

use crate::clock::ClockInputs;

/// Every accessor is read on its own, possibly at different blocks. `None`
/// means the read failed or has not happened yet and is shown as zero/false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSnapshot {
    pub total_burned: Option<U256>,
    pub burn_rate_per_hour: Option<U256>,
    pub caller_reward: Option<U256>,
    pub burns_enabled: Option<bool>,
    pub pending_burn_amount: Option<U256>,
    pub contract_balance: Option<U256>,
    pub last_burn_timestamp: Option<U256>,
    pub total_burn_calls: Option<U256>,
    pub owner: Option<Address>,
}

impl ContractSnapshot {
    pub fn burns_enabled(&self) -> bool {
        self.burns_enabled.unwrap_or(false)
    }

    pub fn has_pending_burn(&self) -> bool {
        self.pending_burn_amount.is_some_and(|amount| !amount.is_zero())
    }

    pub fn clock_inputs(&self) -> ClockInputs {
        ClockInputs {
            last_burn_timestamp: self.last_burn_timestamp,
            burn_rate_per_hour: self.burn_rate_per_hour,
            burns_enabled: self.burns_enabled,
        }
    }

    /// Overlays the fields `fresh` managed to read, keeping the previous value
    /// of any field whose read failed this round.
    pub fn merge(&mut self, fresh: ContractSnapshot) {
        fn keep<T>(slot: &mut Option<T>, fresh: Option<T>) {
            if fresh.is_some() {
                *slot = fresh;
            }
        }
        keep(&mut self.total_burned, fresh.total_burned);
        keep(&mut self.burn_rate_per_hour, fresh.burn_rate_per_hour);
        keep(&mut self.caller_reward, fresh.caller_reward);
        keep(&mut self.burns_enabled, fresh.burns_enabled);
        keep(&mut self.pending_burn_amount, fresh.pending_burn_amount);
        keep(&mut self.contract_balance, fresh.contract_balance);
        keep(&mut self.last_burn_timestamp, fresh.last_burn_timestamp);
        keep(&mut self.total_burn_calls, fresh.total_burn_calls);
        keep(&mut self.owner, fresh.owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_reads_are_falsy() {
        let snapshot = ContractSnapshot::default();
        assert!(!snapshot.burns_enabled());
        assert!(!snapshot.has_pending_burn());

        let zero = ContractSnapshot {
            pending_burn_amount: Some(U256::ZERO),
            ..Default::default()
        };
        assert!(!zero.has_pending_burn());
    }

    #[test]
    fn merge_keeps_stale_fields() {
        let mut current = ContractSnapshot {
            total_burned: Some(U256::from(10)),
            burns_enabled: Some(true),
            ..Default::default()
        };
        current.merge(ContractSnapshot {
            total_burned: Some(U256::from(20)),
            ..Default::default()
        });
        assert_eq!(current.total_burned, Some(U256::from(20)));
        assert_eq!(current.burns_enabled, Some(true));
    }
}
