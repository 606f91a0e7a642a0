use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use crate::{
    cmd,
    contract::BurnerClient,
    dashboard::Dashboard,
    error::Error,
    format::format_amount,
    opts::{DashboardArgs, WalletArgs},
    telemetry,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Trigger a single burn", long_about = None)]
pub struct BurnArgs {
    #[command(flatten)]
    pub dashboard: DashboardArgs,

    #[command(flatten)]
    pub wallet: WalletArgs,
}

impl BurnArgs {
    pub async fn run(self) -> Result<()> {
        telemetry::init_stdout();
        let settings = self.dashboard.settings()?;

        let wallet = cmd::wallet(&settings, &self.wallet)
            .await?
            .ok_or(Error::NoWallet)?;
        let reader = cmd::reader(&settings);

        let mut dashboard = Dashboard::new(settings.view_settings());
        dashboard.set_wallet(wallet.status());
        dashboard.apply_snapshot(reader.snapshot().await);

        let snapshot = dashboard.snapshot();
        info!(
            pending = %format_amount(snapshot.pending_burn_amount),
            reward = %format_amount(snapshot.caller_reward),
            "submitting burn"
        );

        let submitter = wallet.submitter(settings.burner);
        let tx_hash = dashboard
            .burn_with(&submitter)
            .await
            .wrap_err("burn failed")?;

        println!("burn confirmed: {tx_hash}");
        Ok(())
    }
}
