use std::time::Duration;

use clap::Parser;
use eyre::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use poem::{EndpointExt, Route, Server, get, listener::TcpListener};
use tokio::{signal, time::MissedTickBehavior};
use tracing::{info, instrument};

use crate::{
    clock::{LocalClock, unix_now},
    cmd,
    config::Settings,
    contract::{BurnerClient, RpcBurner},
    exporter::{self, prometheus_metrics},
    opts::DashboardArgs,
    price::{DexPriceSource, PricePoller},
    snapshot::ContractSnapshot,
    telemetry,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Expose burner state as Prometheus metrics", long_about = None)]
pub struct ExportArgs {
    #[command(flatten)]
    pub dashboard: DashboardArgs,

    /// Prometheus metrics port.
    #[arg(short, long, required = true)]
    pub port: u16,
}

struct Exporter {
    reader: RpcBurner,
    price: Option<PricePoller<DexPriceSource>>,
    snapshot: ContractSnapshot,
    clock: LocalClock,
    poll_interval: Duration,
    price_interval: Duration,
}

impl Exporter {
    fn new(settings: &Settings) -> eyre::Result<Self> {
        Ok(Self {
            reader: cmd::reader(settings),
            price: cmd::price_poller(settings)?,
            snapshot: ContractSnapshot::default(),
            clock: LocalClock::default(),
            poll_interval: settings.poll_interval,
            price_interval: settings.price_interval,
        })
    }

    #[instrument(name = "exporter::update_snapshot", skip(self))]
    async fn update_snapshot(&mut self) {
        self.snapshot.merge(self.reader.snapshot().await);
        exporter::record_snapshot(&self.snapshot);
        self.clock.retarget(self.snapshot.clock_inputs());
    }

    #[instrument(name = "exporter::worker", skip(self))]
    async fn worker(&mut self) {
        let mut poll = tokio::time::interval(self.poll_interval);
        let mut price = tokio::time::interval(self.price_interval);
        let mut tick = tokio::time::interval(Duration::from_secs(1));
        for interval in [&mut poll, &mut price, &mut tick] {
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        loop {
            tokio::select! {
                _ = poll.tick() => self.update_snapshot().await,
                _ = price.tick() => {
                    if let Some(poller) = &mut self.price {
                        poller.poll().await;
                    }
                }
                _ = tick.tick() => exporter::record_clock(self.clock.tick(unix_now())),
            }
        }
    }
}

impl ExportArgs {
    pub async fn run(self) -> eyre::Result<()> {
        telemetry::init_stdout();
        let settings = self.dashboard.settings()?;

        let builder = PrometheusBuilder::new()
            .add_global_label("chain_id", settings.chain_id.to_string())
            .add_global_label("burner", settings.burner.to_string());
        let metrics_handle = builder
            .install_recorder()
            .context("failed to install recorder")?;
        exporter::describe();

        let mut exporter = Exporter::new(&settings)?;

        let app = Route::new().at(
            "/metrics",
            get(prometheus_metrics).data(metrics_handle.clone()),
        );

        let addr = format!("0.0.0.0:{}", self.port);
        info!(%addr, burner = %settings.burner, "serving metrics");

        let exporter_handle = tokio::spawn(async move {
            exporter.worker().await;
        });

        let server = Server::new(TcpListener::bind(addr));
        let server_handle = tokio::spawn(async move { server.run(app).await });

        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("failed to install SIGTERM handler")?;
        let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
            .context("failed to install SIGINT handler")?;

        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down gracefully"),
            _ = sigint.recv() => info!("Received SIGINT, shutting down gracefully"),
        }

        exporter_handle.abort();
        server_handle.abort();

        info!("Shutdown complete");
        Ok(())
    }
}
