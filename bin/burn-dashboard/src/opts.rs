use std::path::PathBuf;

use alloy::primitives::Address;
use clap::{Args, Parser, Subcommand};
use reqwest::Url;

use crate::{
    cmd::{
        burn::BurnArgs, export::ExportArgs, history::HistoryArgs, status::StatusArgs,
        watch::WatchArgs,
    },
    config::{DashboardConfig, Settings},
};

#[derive(Parser, Debug)]
#[command(name = "burn-dashboard", version, about, long_about = None)]
pub struct BurnDashboard {
    #[command(subcommand)]
    pub cmd: BurnDashboardSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum BurnDashboardSubcommand {
    /// Live terminal dashboard with the burn control.
    Watch(WatchArgs),
    /// Print the current contract state once.
    Status(StatusArgs),
    /// Print the most recent burns.
    History(HistoryArgs),
    /// Trigger a single burn.
    Burn(BurnArgs),
    /// Serve dashboard values as Prometheus metrics.
    Export(ExportArgs),
}

/// Options shared by every subcommand. Each one overrides the config file.
#[derive(Args, Debug, Clone, Default)]
#[command(next_help_heading = "Deployment")]
pub struct DashboardArgs {
    /// Path to a TOML config file.
    #[arg(long, env = "BURN_DASHBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// RPC endpoint for contract reads.
    #[arg(short, long, env = "BURN_DASHBOARD_RPC_URL")]
    pub rpc_url: Option<Url>,

    /// RPC endpoint the wallet signs through (defaults to --rpc-url).
    #[arg(long, env = "BURN_DASHBOARD_WALLET_RPC_URL")]
    pub wallet_rpc_url: Option<Url>,

    /// Chain the burner lives on.
    #[arg(short, long, env = "BURN_DASHBOARD_CHAIN_ID")]
    pub chain_id: Option<u64>,

    /// Burner contract address.
    #[arg(short, long, env = "BURN_DASHBOARD_BURNER")]
    pub burner: Option<Address>,

    /// Burned token address, used for price lookups.
    #[arg(short, long, env = "BURN_DASHBOARD_TOKEN")]
    pub token: Option<Address>,

    /// First block to scan for burn events.
    #[arg(long)]
    pub from_block: Option<u64>,

    /// Price lookup endpoint.
    #[arg(long, env = "BURN_DASHBOARD_PRICE_ENDPOINT")]
    pub price_endpoint: Option<Url>,

    /// Number of burns shown in the history.
    #[arg(long)]
    pub history_window: Option<usize>,

    /// Blocks covered by one log query while scanning for burns.
    #[arg(long, env = "BURN_DASHBOARD_HISTORY_BATCH_BLOCKS")]
    pub history_batch_blocks: Option<u64>,
}

impl DashboardArgs {
    /// Loads the config file if one was given, applies the flags and validates.
    pub fn settings(&self) -> eyre::Result<Settings> {
        let config = match &self.config {
            Some(path) => DashboardConfig::load(path)?,
            None => DashboardConfig::default(),
        };
        config.merge_args(self).validate()
    }
}

/// Signing key for write commands.
#[derive(Args, Debug, Clone, Default)]
#[command(next_help_heading = "Wallet")]
pub struct WalletArgs {
    /// Hex private key of the burning wallet.
    #[arg(long, env = "BURN_DASHBOARD_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_consistent() {
        BurnDashboard::command().debug_assert();
    }

    #[test]
    fn parses_status_flags() {
        let args = BurnDashboard::try_parse_from([
            "burn-dashboard",
            "status",
            "--burner",
            "0x1111111111111111111111111111111111111111",
            "--rpc-url",
            "http://localhost:8545",
        ])
        .unwrap();
        let BurnDashboardSubcommand::Status(status) = args.cmd else {
            panic!("expected status subcommand");
        };
        let settings = status.dashboard.settings().unwrap();
        assert_eq!(settings.rpc_url.as_str(), "http://localhost:8545/");
    }
}
