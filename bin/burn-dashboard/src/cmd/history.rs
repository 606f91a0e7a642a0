use clap::Parser;
use eyre::Result;

use crate::{
    cmd::{self, OutputFormat},
    dashboard::Dashboard,
    display,
    opts::DashboardArgs,
    telemetry,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Print the most recent burns", long_about = None)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub dashboard: DashboardArgs,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

impl HistoryArgs {
    pub async fn run(self) -> Result<()> {
        telemetry::init_stdout();
        let settings = self.dashboard.settings()?;

        let reader = cmd::reader(&settings);
        let mut dashboard = Dashboard::new(settings.view_settings());
        settings
            .event_scanner()
            .sync(&reader, dashboard.history_mut())
            .await?;

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&dashboard.recent_burns())?)
            }
            OutputFormat::Table => {
                let view = dashboard.view();
                print!(
                    "{}",
                    display::to_plain(&display::history_lines(&view.recent_burns))
                );
            }
        }
        Ok(())
    }
}
