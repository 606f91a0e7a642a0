use clap::Parser;
use eyre::Result;

use crate::{
    clock::unix_now,
    cmd::{self, OutputFormat},
    contract::BurnerClient,
    dashboard::Dashboard,
    display,
    opts::{DashboardArgs, WalletArgs},
    telemetry,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Print the current burner state", long_about = None)]
pub struct StatusArgs {
    #[command(flatten)]
    pub dashboard: DashboardArgs,

    #[command(flatten)]
    pub wallet: WalletArgs,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl StatusArgs {
    pub async fn run(self) -> Result<()> {
        telemetry::init_stdout();
        let settings = self.dashboard.settings()?;

        let reader = cmd::reader(&settings);
        let mut dashboard = Dashboard::new(settings.view_settings());

        dashboard.apply_snapshot(reader.snapshot().await);
        if let Some(mut poller) = cmd::price_poller(&settings)? {
            poller.poll().await;
            dashboard.set_price(poller.usd());
        }
        if let Some(wallet) = cmd::wallet(&settings, &self.wallet).await? {
            dashboard.set_wallet(wallet.status());
        }
        dashboard.tick(unix_now());

        let view = dashboard.view();
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
            OutputFormat::Table => {
                let mut lines = display::status_lines(&view);
                lines.extend(display::action_lines(&view));
                print!("{}", display::to_plain(&lines));
            }
        }
        Ok(())
    }
}
