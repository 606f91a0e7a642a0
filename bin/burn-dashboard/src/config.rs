//! Dashboard configuration: an optional TOML file overlaid by CLI flags.

use std::{path::Path, time::Duration};

use alloy::primitives::Address;
use eyre::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{self, poll as poll_const, price as price_const},
    dashboard::ViewSettings,
    error::Error,
    history::EventScanner,
    opts::DashboardArgs,
};

/// Public Base RPC, good enough for reads.
pub const DEFAULT_RPC_URL: &str = "https://mainnet.base.org";

/// Root configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Endpoint used for contract reads.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Endpoint the wallet signs through. Defaults to `rpc_url`.
    #[serde(default)]
    pub wallet_rpc_url: Option<String>,
    /// Chain the burner is deployed on.
    #[serde(default = "constants::default_chain_id")]
    pub chain_id: u64,
    /// Human-readable name of that chain.
    #[serde(default = "default_chain_name")]
    pub chain_name: String,
    /// Burner contract.
    #[serde(default)]
    pub burner: Option<Address>,
    /// Burned token, used as the price lookup key.
    #[serde(default)]
    pub token: Option<Address>,
    /// Token ticker for labels.
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Fixed total supply in whole tokens.
    #[serde(default = "constants::default_total_supply_tokens")]
    pub total_supply_tokens: u64,
    /// First block scanned for burn events.
    #[serde(default)]
    pub from_block: u64,
    #[serde(default)]
    pub price: PriceSettings,
    #[serde(default)]
    pub poll: PollSettings,
    #[serde(default)]
    pub history: HistorySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSettings {
    /// Token lookup endpoint, the token address is appended.
    #[serde(default = "default_price_endpoint")]
    pub endpoint: String,
    /// Seconds between fetches.
    #[serde(default = "price_const::default_interval_secs")]
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollSettings {
    /// Seconds between contract snapshot and event polls.
    #[serde(default = "poll_const::default_interval_secs")]
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySettings {
    /// Burn events shown, newest first.
    #[serde(default = "constants::default_history_window")]
    pub window: usize,
    /// Blocks covered by one log query while scanning for burns.
    #[serde(default = "constants::default_history_batch_blocks")]
    pub batch_blocks: u64,
}

impl Default for PriceSettings {
    fn default() -> Self {
        Self {
            endpoint: default_price_endpoint(),
            interval_secs: price_const::DEFAULT_INTERVAL_SECS,
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: poll_const::DEFAULT_INTERVAL_SECS,
        }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            window: constants::DEFAULT_HISTORY_WINDOW,
            batch_blocks: constants::DEFAULT_HISTORY_BATCH_BLOCKS,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            wallet_rpc_url: None,
            chain_id: constants::DEFAULT_CHAIN_ID,
            chain_name: default_chain_name(),
            burner: None,
            token: None,
            symbol: default_symbol(),
            total_supply_tokens: constants::DEFAULT_TOTAL_SUPPLY_TOKENS,
            from_block: 0,
            price: PriceSettings::default(),
            poll: PollSettings::default(),
            history: HistorySettings::default(),
        }
    }
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

fn default_chain_name() -> String {
    "Base".to_string()
}

fn default_symbol() -> String {
    "CLAWD".to_string()
}

fn default_price_endpoint() -> String {
    price_const::DEFAULT_ENDPOINT.to_string()
}

/// Validated settings every command runs from.
#[derive(Debug, Clone)]
pub struct Settings {
    pub rpc_url: Url,
    pub wallet_rpc_url: Url,
    pub chain_id: u64,
    pub chain_name: String,
    pub burner: Address,
    pub token: Option<Address>,
    pub symbol: String,
    pub total_supply_tokens: u64,
    pub from_block: u64,
    pub price_endpoint: Url,
    pub price_interval: Duration,
    pub poll_interval: Duration,
    pub history_window: usize,
    pub history_batch_blocks: u64,
}

impl Settings {
    /// Scanner starting at the configured block.
    pub fn event_scanner(&self) -> EventScanner {
        EventScanner::new(self.from_block, self.history_batch_blocks)
    }

    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            symbol: self.symbol.clone(),
            target_chain_id: self.chain_id,
            target_chain_name: self.chain_name.clone(),
            total_supply_tokens: self.total_supply_tokens,
            history_window: self.history_window,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .wrap_err_with(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Flags given on the command line win over the file.
    pub fn merge_args(mut self, args: &DashboardArgs) -> Self {
        if let Some(rpc_url) = &args.rpc_url {
            self.rpc_url = rpc_url.to_string();
        }
        if let Some(wallet_rpc_url) = &args.wallet_rpc_url {
            self.wallet_rpc_url = Some(wallet_rpc_url.to_string());
        }
        if let Some(chain_id) = args.chain_id {
            self.chain_id = chain_id;
        }
        if let Some(burner) = args.burner {
            self.burner = Some(burner);
        }
        if let Some(token) = args.token {
            self.token = Some(token);
        }
        if let Some(from_block) = args.from_block {
            self.from_block = from_block;
        }
        if let Some(price_endpoint) = &args.price_endpoint {
            self.price.endpoint = price_endpoint.to_string();
        }
        if let Some(window) = args.history_window {
            self.history.window = window;
        }
        if let Some(batch_blocks) = args.history_batch_blocks {
            self.history.batch_blocks = batch_blocks;
        }
        self
    }

    /// Checks the merged configuration and parses its endpoints.
    pub fn validate(self) -> Result<Settings> {
        let burner = self.burner.ok_or(Error::MissingBurner)?;
        if self.price.interval_secs == 0 {
            return Err(Error::ZeroInterval("price").into());
        }
        if self.poll.interval_secs == 0 {
            return Err(Error::ZeroInterval("poll").into());
        }
        if self.history.window == 0 {
            return Err(Error::EmptyHistoryWindow.into());
        }
        if self.history.batch_blocks == 0 {
            return Err(Error::EmptyBatchRange.into());
        }

        let rpc_url: Url = self
            .rpc_url
            .parse()
            .wrap_err_with(|| format!("invalid rpc url {:?}", self.rpc_url))?;
        let wallet_rpc_url = match &self.wallet_rpc_url {
            Some(url) => url
                .parse()
                .wrap_err_with(|| format!("invalid wallet rpc url {url:?}"))?,
            None => rpc_url.clone(),
        };
        let price_endpoint: Url = self
            .price
            .endpoint
            .parse()
            .wrap_err_with(|| format!("invalid price endpoint {:?}", self.price.endpoint))?;

        Ok(Settings {
            rpc_url,
            wallet_rpc_url,
            chain_id: self.chain_id,
            chain_name: self.chain_name,
            burner,
            token: self.token,
            symbol: self.symbol,
            total_supply_tokens: self.total_supply_tokens,
            from_block: self.from_block,
            price_endpoint,
            price_interval: Duration::from_secs(self.price.interval_secs),
            poll_interval: Duration::from_secs(self.poll.interval_secs),
            history_window: self.history.window,
            history_batch_blocks: self.history.batch_blocks,
        })
    }
}
