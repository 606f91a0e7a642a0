//! Bindings for the burner contract and the client seam used by the dashboard.

use alloy::{
    primitives::{Address, B256},
    providers::{DynProvider, Provider},
    rpc::types::Filter,
    sol,
    sol_types::SolEvent,
};
use async_trait::async_trait;
use eyre::{Result, eyre};
use tracing::{debug, info, instrument};

use crate::{error::Error, history::BurnRecord, snapshot::ContractSnapshot};

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IClawdBurner {
        event BurnExecuted(address indexed caller, uint256 burnAmount, uint256 callerReward);

        function totalBurned() external view returns (uint256);
        function burnRatePerHour() external view returns (uint256);
        function callerReward() external view returns (uint256);
        function burnsEnabled() external view returns (bool);
        function pendingBurnAmount() external view returns (uint256);
        function contractBalance() external view returns (uint256);
        function lastBurnTimestamp() external view returns (uint256);
        function totalBurnCalls() external view returns (uint256);
        function owner() external view returns (address);

        function burn() external;
    }
}

/// Read and write surface of the burner, as consumed by the dashboard.
#[async_trait]
pub trait BurnerClient: Send + Sync {
    /// Reads every accessor concurrently. A failed accessor leaves its field empty.
    async fn snapshot(&self) -> ContractSnapshot;

    /// Current chain head.
    async fn block_number(&self) -> Result<u64>;

    /// `BurnExecuted` events in `from..=to`, in chain order.
    async fn burn_events(&self, from: u64, to: u64) -> Result<Vec<BurnRecord>>;
}

/// Submits `burn()` and waits for the receipt.
#[async_trait]
pub trait BurnSubmitter: Send + Sync {
    async fn burn(&self) -> Result<B256>;
}

/// [`BurnerClient`] over a JSON-RPC provider.
#[derive(Clone)]
pub struct RpcBurner {
    address: Address,
    provider: DynProvider,
}

impl RpcBurner {
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self { address, provider }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    fn instance(&self) -> IClawdBurner::IClawdBurnerInstance<&DynProvider> {
        IClawdBurner::new(self.address, &self.provider)
    }
}

macro_rules! read_field {
    ($call:expr, $name:literal) => {
        async {
            match $call.call().await {
                Ok(value) => Some(value),
                Err(e) => {
                    debug!(field = $name, err = %e, "contract read failed");
                    metrics::counter!("burn_dashboard_errors", "request" => $name).increment(1);
                    None
                }
            }
        }
    };
}

#[async_trait]
impl BurnerClient for RpcBurner {
    #[instrument(name = "burner::snapshot", skip(self), fields(burner = %self.address))]
    async fn snapshot(&self) -> ContractSnapshot {
        let burner = self.instance();
        let (
            total_burned,
            burn_rate_per_hour,
            caller_reward,
            burns_enabled,
            pending_burn_amount,
            contract_balance,
            last_burn_timestamp,
            total_burn_calls,
            owner,
        ) = futures::join!(
            read_field!(burner.totalBurned(), "totalBurned"),
            read_field!(burner.burnRatePerHour(), "burnRatePerHour"),
            read_field!(burner.callerReward(), "callerReward"),
            read_field!(burner.burnsEnabled(), "burnsEnabled"),
            read_field!(burner.pendingBurnAmount(), "pendingBurnAmount"),
            read_field!(burner.contractBalance(), "contractBalance"),
            read_field!(burner.lastBurnTimestamp(), "lastBurnTimestamp"),
            read_field!(burner.totalBurnCalls(), "totalBurnCalls"),
            read_field!(burner.owner(), "owner"),
        );
        ContractSnapshot {
            total_burned,
            burn_rate_per_hour,
            caller_reward,
            burns_enabled,
            pending_burn_amount,
            contract_balance,
            last_burn_timestamp,
            total_burn_calls,
            owner,
        }
    }

    async fn block_number(&self) -> Result<u64> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| eyre!("failed to get block number: {e}"))
    }

    #[instrument(name = "burner::burn_events", skip(self))]
    async fn burn_events(&self, from: u64, to: u64) -> Result<Vec<BurnRecord>> {
        let filter = Filter::new()
            .address(self.address)
            .event_signature(IClawdBurner::BurnExecuted::SIGNATURE_HASH)
            .from_block(from)
            .to_block(to);

        let logs = self.provider.get_logs(&filter).await?;

        let mut records = Vec::with_capacity(logs.len());
        for log in logs {
            let decoded = match log.log_decode::<IClawdBurner::BurnExecuted>() {
                Ok(decoded) => decoded,
                Err(e) => {
                    debug!(err = %e, "skipping undecodable burn log");
                    continue;
                }
            };
            let event = decoded.inner.data;
            records.push(BurnRecord {
                caller: event.caller,
                burn_amount: event.burnAmount,
                caller_reward: event.callerReward,
                block_number: decoded.block_number.unwrap_or_default(),
                log_index: decoded.log_index.unwrap_or_default(),
            });
        }
        Ok(records)
    }
}

/// [`BurnSubmitter`] over a wallet-backed provider.
#[derive(Clone)]
pub struct RpcBurnSubmitter {
    address: Address,
    provider: DynProvider,
}

impl RpcBurnSubmitter {
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self { address, provider }
    }
}

#[async_trait]
impl BurnSubmitter for RpcBurnSubmitter {
    #[instrument(name = "burner::burn", skip(self), fields(burner = %self.address))]
    async fn burn(&self) -> Result<B256> {
        let burner = IClawdBurner::new(self.address, &self.provider);
        let pending = burner.burn().send().await?;
        let tx_hash = *pending.tx_hash();
        info!(%tx_hash, "burn transaction sent");

        let receipt = pending.get_receipt().await?;
        if !receipt.status() {
            return Err(Error::BurnReverted(tx_hash).into());
        }
        info!(%tx_hash, block = ?receipt.block_number, gas_used = receipt.gas_used, "burn confirmed");
        Ok(tx_hash)
    }
}
