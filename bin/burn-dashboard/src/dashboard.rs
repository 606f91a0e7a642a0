//! View model: the state every screen is rendered from.
//!
//! The dashboard owns no chain state. It keeps the latest reads, the price,
//! the local clock and the busy flags, and derives display strings on demand.

use alloy::primitives::B256;
use serde::Serialize;
use tracing::{error, info};

use crate::{
    clock::{ClockReading, LocalClock},
    contract::BurnSubmitter,
    format::{
        format_amount, format_amount_full, format_count, format_duration_secs, format_price,
        format_supply_share, format_usd,
    },
    gate::{Blocked, BusyFlag, GateInputs},
    history::{BurnBatch, BurnHistory, BurnRecord},
    snapshot::ContractSnapshot,
    telemetry::error_field,
    wallet::WalletStatus,
};

/// Static display settings.
#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub symbol: String,
    pub target_chain_id: u64,
    pub target_chain_name: String,
    pub total_supply_tokens: u64,
    pub history_window: usize,
}

#[derive(Debug)]
pub struct Dashboard {
    settings: ViewSettings,
    snapshot: ContractSnapshot,
    price_usd: Option<f64>,
    clock: LocalClock,
    history: BurnHistory,
    wallet: WalletStatus,
    burning: BusyFlag,
    switching: BusyFlag,
}

/// What the single action control shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ActionView {
    /// No wallet, nothing to press.
    Connect { label: String },
    /// Wallet on another chain.
    Switch { label: String, enabled: bool },
    /// The burn control itself.
    Burn { label: String, enabled: bool },
}

impl ActionView {
    pub fn label(&self) -> &str {
        match self {
            Self::Connect { label } | Self::Switch { label, .. } | Self::Burn { label, .. } => {
                label
            }
        }
    }

    pub fn enabled(&self) -> bool {
        match self {
            Self::Connect { .. } => false,
            Self::Switch { enabled, .. } | Self::Burn { enabled, .. } => *enabled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnRow {
    pub caller: String,
    pub burned: String,
    pub reward: String,
    pub block: u64,
}

/// A stat with its optional secondary lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatView {
    pub value: String,
    pub share: String,
    pub usd: Option<String>,
}

/// Everything a renderer needs, already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub symbol: String,
    pub total_burned: StatView,
    pub burn_rate: StatView,
    pub caller_reward: StatView,
    pub contract_balance: StatView,
    pub total_burns: String,
    pub burns_enabled: bool,
    pub pending_burn: StatView,
    pub next_burn_in: Option<String>,
    pub since_last_burn: Option<String>,
    pub price: String,
    pub owner: Option<String>,
    pub wallet: Option<String>,
    pub action: ActionView,
    pub recent_burns: Vec<BurnRow>,
}

impl Dashboard {
    pub fn new(settings: ViewSettings) -> Self {
        Self {
            settings,
            snapshot: ContractSnapshot::default(),
            price_usd: None,
            clock: LocalClock::default(),
            history: BurnHistory::default(),
            wallet: WalletStatus::default(),
            burning: BusyFlag::default(),
            switching: BusyFlag::default(),
        }
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    pub fn snapshot(&self) -> &ContractSnapshot {
        &self.snapshot
    }

    pub fn history(&self) -> &BurnHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut BurnHistory {
        &mut self.history
    }

    /// Adds burns found by the event scanner.
    pub fn record_burns(&mut self, batch: BurnBatch) {
        self.history.extend(batch.records);
    }

    pub fn clock(&self) -> &LocalClock {
        &self.clock
    }

    /// Applies a fresh read. Returns `true` when the clock inputs changed and
    /// the tick schedule should restart.
    pub fn apply_snapshot(&mut self, fresh: ContractSnapshot) -> bool {
        self.snapshot.merge(fresh);
        self.clock.retarget(self.snapshot.clock_inputs())
    }

    pub fn set_price(&mut self, price_usd: Option<f64>) {
        if price_usd.is_some() {
            self.price_usd = price_usd;
        }
    }

    pub fn price_usd(&self) -> Option<f64> {
        self.price_usd
    }

    pub fn tick(&mut self, now: u64) -> ClockReading {
        self.clock.tick(now)
    }

    pub fn set_wallet(&mut self, wallet: WalletStatus) {
        self.wallet = wallet;
    }

    pub fn wallet(&self) -> WalletStatus {
        self.wallet
    }

    pub fn wrong_network(&self) -> bool {
        self.wallet.connected() && !self.wallet.on_chain(self.settings.target_chain_id)
    }

    pub fn is_burning(&self) -> bool {
        self.burning.is_busy()
    }

    pub fn is_switching(&self) -> bool {
        self.switching.is_busy()
    }

    pub fn gate(&self) -> GateInputs {
        GateInputs {
            wallet_connected: self.wallet.connected(),
            on_target_chain: self.wallet.on_chain(self.settings.target_chain_id),
            burn_in_flight: self.burning.is_busy(),
            burns_enabled: self.snapshot.burns_enabled(),
            has_pending_burn: self.snapshot.has_pending_burn(),
        }
    }

    /// Marks a burn as in flight if the gate allows it.
    pub fn begin_burn(&mut self) -> Result<(), Blocked> {
        self.gate().check()?;
        self.burning.begin();
        Ok(())
    }

    /// Clears the busy flag. Failures are only logged, the control simply
    /// becomes available again and the next poll shows the outcome.
    pub fn finish_burn(&mut self, result: &eyre::Result<B256>) {
        match result {
            Ok(tx_hash) => info!(%tx_hash, "burn succeeded"),
            Err(e) => {
                metrics::counter!("burn_dashboard_errors", "request" => "burn").increment(1);
                error!(error = error_field(e), "burn failed");
            }
        }
        self.burning.finish();
    }

    /// Gate, submit and wait, in one step.
    pub async fn burn_with(&mut self, submitter: &dyn BurnSubmitter) -> eyre::Result<B256> {
        self.begin_burn().map_err(crate::error::Error::BurnRefused)?;
        let result = submitter.burn().await;
        self.finish_burn(&result);
        result
    }

    /// Marks a network switch as in flight. Refused when not needed or already running.
    pub fn begin_switch(&mut self) -> bool {
        self.wrong_network() && self.switching.begin()
    }

    pub fn finish_switch(&mut self, result: eyre::Result<WalletStatus>) {
        match result {
            Ok(status) => {
                info!(chain_id = ?status.chain_id, "wallet switched network");
                self.wallet = status;
            }
            Err(e) => error!(error = error_field(&e), "network switch failed"),
        }
        self.switching.finish();
    }

    pub fn recent_burns(&self) -> Vec<&BurnRecord> {
        self.history.recent(self.settings.history_window)
    }

    fn stat(&self, value: Option<alloy::primitives::U256>) -> StatView {
        StatView {
            value: format_amount(value),
            share: format_supply_share(value, self.settings.total_supply_tokens),
            usd: format_usd(value, self.price_usd),
        }
    }

    fn action(&self) -> ActionView {
        let symbol = &self.settings.symbol;
        if !self.wallet.connected() {
            return ActionView::Connect {
                label: "Connect wallet to burn".to_string(),
            };
        }
        if self.wrong_network() {
            let label = if self.switching.is_busy() {
                "Switching...".to_string()
            } else {
                format!("Switch to {}", self.settings.target_chain_name)
            };
            return ActionView::Switch {
                label,
                enabled: !self.switching.is_busy(),
            };
        }

        let gate = self.gate();
        let label = match gate.check() {
            Err(Blocked::Busy) => "Burning...".to_string(),
            Err(Blocked::BurnsPaused) => "Burns Paused".to_string(),
            Err(Blocked::NothingPending) => "No Tokens to Burn Yet".to_string(),
            Err(other) => other.to_string(),
            Ok(()) => format!(
                "Burn {} {symbol}, earn {} reward",
                format_amount(self.snapshot.pending_burn_amount),
                format_amount(self.snapshot.caller_reward),
            ),
        };
        ActionView::Burn {
            label,
            enabled: gate.allows_burn(),
        }
    }

    pub fn view(&self) -> DashboardView {
        let snapshot = &self.snapshot;
        let reading = self.clock.reading();

        let next_burn_in = (snapshot.burns_enabled()
            && reading.remaining > 0
            && !snapshot.has_pending_burn())
        .then(|| format_duration_secs(reading.remaining));

        let pending_burn = StatView {
            value: format_amount_full(snapshot.pending_burn_amount),
            ..self.stat(snapshot.pending_burn_amount)
        };

        DashboardView {
            symbol: self.settings.symbol.clone(),
            total_burned: self.stat(snapshot.total_burned),
            burn_rate: self.stat(snapshot.burn_rate_per_hour),
            caller_reward: self.stat(snapshot.caller_reward),
            contract_balance: self.stat(snapshot.contract_balance),
            total_burns: format_count(snapshot.total_burn_calls),
            burns_enabled: snapshot.burns_enabled(),
            pending_burn,
            next_burn_in,
            since_last_burn: reading.elapsed.map(format_duration_secs),
            price: format_price(self.price_usd),
            owner: snapshot.owner.map(|owner| owner.to_string()),
            wallet: self.wallet.address.map(|address| address.to_string()),
            action: self.action(),
            recent_burns: self
                .recent_burns()
                .into_iter()
                .map(|record| BurnRow {
                    caller: short_address(&record.caller.to_string()),
                    burned: format_amount(Some(record.burn_amount)),
                    reward: format_amount(Some(record.caller_reward)),
                    block: record.block_number,
                })
                .collect(),
        }
    }
}

/// `0x1234...abcd`
pub fn short_address(address: &str) -> String {
    if address.len() <= 12 {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}
