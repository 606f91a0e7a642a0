use std::{
    io::{Stdout, stdout},
    path::PathBuf,
    time::Duration,
};

use alloy::primitives::B256;
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use eyre::{Context, Result};
use futures::StreamExt;
use tokio::{
    signal,
    sync::mpsc,
    task::JoinHandle,
    time::{Interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    clock::unix_now,
    cmd,
    config::Settings,
    contract::{BurnSubmitter, BurnerClient, RpcBurner},
    dashboard::Dashboard,
    display,
    opts::{DashboardArgs, WalletArgs},
    price::{PricePoller, PriceSource},
    snapshot::ContractSnapshot,
    telemetry,
    wallet::WalletConnection,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Live burner dashboard", long_about = None)]
pub struct WatchArgs {
    #[command(flatten)]
    pub dashboard: DashboardArgs,

    #[command(flatten)]
    pub wallet: WalletArgs,

    /// File the dashboard logs to while it owns the terminal.
    #[arg(long, default_value = "burn-dashboard.log")]
    pub log_file: PathBuf,
}

/// Outcome of a write spawned off the event loop.
enum TaskResult {
    Burn(Result<B256>),
    Switch(Result<WalletConnection>),
}

/// Raw mode plus alternate screen, restored on drop.
struct TerminalGuard {
    out: Stdout,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        let mut out = stdout();
        enable_raw_mode().wrap_err("failed to enable raw mode")?;
        execute!(out, EnterAlternateScreen, Hide).wrap_err("failed to enter alternate screen")?;
        Ok(Self { out })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(self.out, Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

fn interval(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Reads the burner every `period` and forwards each snapshot.
async fn poll_snapshots(
    reader: RpcBurner,
    period: Duration,
    snapshots: mpsc::Sender<ContractSnapshot>,
) {
    let mut poll = interval(period);
    loop {
        poll.tick().await;
        if snapshots.send(reader.snapshot().await).await.is_err() {
            return;
        }
    }
}

/// Fetches the price every `period` and forwards each fresh quote. Failed
/// fetches send nothing, so the dashboard keeps its last price.
async fn poll_prices<S: PriceSource>(
    mut poller: PricePoller<S>,
    period: Duration,
    prices: mpsc::Sender<f64>,
) {
    let mut timer = interval(period);
    loop {
        timer.tick().await;
        if !poller.poll().await {
            continue;
        }
        let Some(usd) = poller.usd() else {
            continue;
        };
        if prices.send(usd).await.is_err() {
            return;
        }
    }
}

enum KeyAction {
    Burn,
    Switch,
    Quit,
}

fn key_action(key: KeyEvent) -> Option<KeyAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(KeyAction::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Char('b') | KeyCode::Enter => Some(KeyAction::Burn),
        KeyCode::Char('s') => Some(KeyAction::Switch),
        _ => None,
    }
}

struct Session {
    settings: Settings,
    dashboard: Dashboard,
    wallet: Option<WalletConnection>,
    results: mpsc::Sender<TaskResult>,
    tasks: Vec<JoinHandle<()>>,
}

impl Session {
    fn start_burn(&mut self) {
        if let Err(reason) = self.dashboard.begin_burn() {
            debug!(%reason, "burn not available");
            return;
        }
        let Some(wallet) = &self.wallet else {
            self.dashboard
                .finish_burn(&Err(crate::error::Error::NoWallet.into()));
            return;
        };

        let submitter = wallet.submitter(self.settings.burner);
        let results = self.results.clone();
        self.tasks.push(tokio::spawn(async move {
            let result = submitter.burn().await;
            let _ = results.send(TaskResult::Burn(result)).await;
        }));
    }

    fn start_switch(&mut self) {
        let Some(wallet) = self.wallet.clone() else {
            return;
        };
        if !self.dashboard.begin_switch() {
            return;
        }

        let target = self.settings.rpc_url.clone();
        info!(%target, chain_id = self.settings.chain_id, "switching wallet network");
        let results = self.results.clone();
        self.tasks.push(tokio::spawn(async move {
            let result = wallet.switch_to(target).await;
            let _ = results.send(TaskResult::Switch(result)).await;
        }));
    }

    fn on_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Burn(result) => self.dashboard.finish_burn(&result),
            TaskResult::Switch(Ok(connection)) => {
                self.dashboard.finish_switch(Ok(connection.status()));
                self.wallet = Some(connection);
            }
            TaskResult::Switch(Err(e)) => self.dashboard.finish_switch(Err(e)),
        }
        self.tasks.retain(|task| !task.is_finished());
    }
}

impl WatchArgs {
    pub async fn run(self) -> Result<()> {
        telemetry::init_file(&self.log_file)?;
        let settings = self.dashboard.settings()?;
        info!(burner = %settings.burner, rpc = %settings.rpc_url, "starting dashboard");

        let reader = cmd::reader(&settings);
        let price = cmd::price_poller(&settings)?;
        let wallet = match cmd::wallet(&settings, &self.wallet).await {
            Ok(wallet) => wallet,
            Err(e) => {
                warn!(error = telemetry::error_field(&e), "wallet unavailable, running read-only");
                None
            }
        };

        let mut dashboard = Dashboard::new(settings.view_settings());
        if let Some(wallet) = &wallet {
            dashboard.set_wallet(wallet.status());
        }

        let (results_tx, mut results_rx) = mpsc::channel(4);
        let (snapshots_tx, mut snapshots_rx) = mpsc::channel(4);
        let (burns_tx, mut burns_rx) = mpsc::channel(16);
        let (prices_tx, mut prices_rx) = mpsc::channel(4);
        let mut tasks = vec![
            tokio::spawn(poll_snapshots(
                reader.clone(),
                settings.poll_interval,
                snapshots_tx,
            )),
            tokio::spawn({
                let scanner = settings.event_scanner();
                let period = settings.poll_interval;
                async move { scanner.follow(&reader, period, burns_tx).await }
            }),
        ];
        if let Some(poller) = price {
            tasks.push(tokio::spawn(poll_prices(
                poller,
                settings.price_interval,
                prices_tx,
            )));
        }
        let mut clock_timer = interval(Duration::from_secs(
            crate::constants::poll::CLOCK_TICK_SECS,
        ));

        let mut session = Session {
            settings,
            dashboard,
            wallet,
            results: results_tx,
            tasks,
        };

        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("failed to install SIGTERM handler")?;

        let mut terminal = TerminalGuard::enter()?;
        let mut events = EventStream::new();

        loop {
            tokio::select! {
                Some(snapshot) = snapshots_rx.recv() => {
                    if session.dashboard.apply_snapshot(snapshot) {
                        debug!(generation = session.dashboard.clock().generation(), "clock inputs changed");
                        clock_timer.reset();
                        session.dashboard.tick(unix_now());
                    }
                }
                Some(batch) = burns_rx.recv() => session.dashboard.record_burns(batch),
                Some(usd) = prices_rx.recv() => session.dashboard.set_price(Some(usd)),
                _ = clock_timer.tick() => {
                    session.dashboard.tick(unix_now());
                }
                Some(result) = results_rx.recv() => session.on_result(result),
                event = events.next() => match event {
                    Some(Ok(Event::Key(key))) => match key_action(key) {
                        Some(KeyAction::Quit) => break,
                        Some(KeyAction::Burn) => session.start_burn(),
                        Some(KeyAction::Switch) => session.start_switch(),
                        None => {}
                    },
                    Some(Ok(_)) => {}
                    Some(Err(e)) => warn!(error = telemetry::error_field(&e), "terminal input error"),
                    None => break,
                },
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully");
                    break;
                }
            }

            display::draw(&mut terminal.out, &session.dashboard.view())
                .wrap_err("failed to draw dashboard")?;
        }

        for task in session.tasks.drain(..) {
            task.abort();
        }
        drop(terminal);

        info!("Shutdown complete");
        Ok(())
    }
}
