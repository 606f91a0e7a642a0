//! Burn dashboard.
//!
//! Watches a token burner contract and triggers burns from the terminal.

use burn_dashboard::opts::{BurnDashboard, BurnDashboardSubcommand};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| eyre::eyre!("failed to install default rustls crypto provider"))?;

    let args = BurnDashboard::parse();

    match args.cmd {
        BurnDashboardSubcommand::Watch(cmd) => cmd.run().await,
        BurnDashboardSubcommand::Status(cmd) => cmd.run().await,
        BurnDashboardSubcommand::History(cmd) => cmd.run().await,
        BurnDashboardSubcommand::Burn(cmd) => cmd.run().await,
        BurnDashboardSubcommand::Export(cmd) => cmd.run().await,
    }
}
