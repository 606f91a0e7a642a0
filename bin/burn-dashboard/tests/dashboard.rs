//! Dashboard behaviour against in-memory burner and price fakes.

use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
};

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;
use burn_dashboard::{
    contract::{BurnSubmitter, BurnerClient},
    dashboard::{ActionView, Dashboard, ViewSettings},
    error::{Error, PriceError},
    format::ONE_TOKEN,
    gate::Blocked,
    history::{BurnRecord, EventScanner},
    price::{DexPriceSource, PricePoller, PriceSource},
    snapshot::ContractSnapshot,
    wallet::WalletStatus,
};

const TARGET_CHAIN: u64 = 8453;

fn tokens(n: u64) -> U256 {
    U256::from(n) * ONE_TOKEN
}

fn settings() -> ViewSettings {
    ViewSettings {
        symbol: "CLAWD".to_string(),
        target_chain_id: TARGET_CHAIN,
        target_chain_name: "Base".to_string(),
        total_supply_tokens: 1_000_000_000,
        history_window: 20,
    }
}

fn live_snapshot() -> ContractSnapshot {
    ContractSnapshot {
        total_burned: Some(tokens(2_500_000)),
        burn_rate_per_hour: Some(tokens(500_000)),
        caller_reward: Some(tokens(5_000)),
        burns_enabled: Some(true),
        pending_burn_amount: Some(tokens(1_500)),
        contract_balance: Some(tokens(10_000_000)),
        last_burn_timestamp: Some(U256::from(1_700_000_000u64)),
        total_burn_calls: Some(U256::from(7)),
        owner: Some(Address::repeat_byte(0x11)),
    }
}

fn connected(chain_id: u64) -> WalletStatus {
    WalletStatus {
        address: Some(Address::repeat_byte(0xaa)),
        chain_id: Some(chain_id),
    }
}

fn ready_dashboard() -> Dashboard {
    let mut dashboard = Dashboard::new(settings());
    dashboard.apply_snapshot(live_snapshot());
    dashboard.set_wallet(connected(TARGET_CHAIN));
    dashboard
}

#[derive(Default)]
struct FakeBurner {
    snapshot: Mutex<ContractSnapshot>,
    head: AtomicU64,
    events: Mutex<Vec<BurnRecord>>,
    queried: Mutex<Vec<(u64, u64)>>,
}

impl FakeBurner {
    fn push_burn(&self, block_number: u64) {
        self.events.lock().unwrap().push(BurnRecord {
            caller: Address::repeat_byte(block_number as u8),
            burn_amount: tokens(block_number),
            caller_reward: tokens(1),
            block_number,
            log_index: 0,
        });
        self.head.fetch_max(block_number, Ordering::SeqCst);
    }
}

#[async_trait]
impl BurnerClient for FakeBurner {
    async fn snapshot(&self) -> ContractSnapshot {
        self.snapshot.lock().unwrap().clone()
    }

    async fn block_number(&self) -> eyre::Result<u64> {
        Ok(self.head.load(Ordering::SeqCst))
    }

    async fn burn_events(&self, from: u64, to: u64) -> eyre::Result<Vec<BurnRecord>> {
        self.queried.lock().unwrap().push((from, to));
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|r| (from..=to).contains(&r.block_number))
            .cloned()
            .collect())
    }
}

struct FakeSubmitter {
    outcome: Result<B256, &'static str>,
    calls: AtomicUsize,
}

impl FakeSubmitter {
    fn succeeding() -> Self {
        Self {
            outcome: Ok(B256::repeat_byte(0x42)),
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            outcome: Err("execution reverted"),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl BurnSubmitter for FakeSubmitter {
    async fn burn(&self) -> eyre::Result<B256> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.map_err(|msg| eyre::eyre!(msg))
    }
}

#[test]
fn burn_enabled_only_when_all_conditions_clear() {
    let dashboard = ready_dashboard();
    assert!(dashboard.gate().allows_burn());

    let action = dashboard.view().action;
    assert!(action.enabled());
    assert_eq!(action.label(), "Burn 1.5K CLAWD, earn 5.0K reward");
}

#[test]
fn disconnected_wallet_shows_connect_prompt() {
    let mut dashboard = ready_dashboard();
    dashboard.set_wallet(WalletStatus::default());

    assert_eq!(dashboard.gate().check(), Err(Blocked::WalletDisconnected));
    let action = dashboard.view().action;
    assert!(matches!(action, ActionView::Connect { .. }));
    assert!(!action.enabled());
}

#[test]
fn wrong_network_offers_switch() {
    let mut dashboard = ready_dashboard();
    dashboard.set_wallet(connected(1));

    assert_eq!(dashboard.gate().check(), Err(Blocked::WrongNetwork));
    let action = dashboard.view().action;
    assert_eq!(
        action,
        ActionView::Switch {
            label: "Switch to Base".to_string(),
            enabled: true
        }
    );

    assert!(dashboard.begin_switch());
    assert!(!dashboard.begin_switch());
    assert_eq!(dashboard.view().action.label(), "Switching...");
    assert!(!dashboard.view().action.enabled());

    dashboard.finish_switch(Ok(connected(TARGET_CHAIN)));
    assert!(!dashboard.is_switching());
    assert!(dashboard.gate().allows_burn());
}

#[test]
fn failed_switch_reenables_control() {
    let mut dashboard = ready_dashboard();
    dashboard.set_wallet(connected(1));
    assert!(dashboard.begin_switch());
    dashboard.finish_switch(Err(eyre::eyre!("connection refused")));

    assert!(!dashboard.is_switching());
    assert!(dashboard.view().action.enabled());
    assert!(dashboard.wrong_network());
}

#[test]
fn nothing_pending_or_paused_disables_burn() {
    let mut dashboard = ready_dashboard();
    dashboard.apply_snapshot(ContractSnapshot {
        pending_burn_amount: Some(U256::ZERO),
        ..Default::default()
    });
    let action = dashboard.view().action;
    assert_eq!(action.label(), "No Tokens to Burn Yet");
    assert!(!action.enabled());

    let mut dashboard = ready_dashboard();
    dashboard.apply_snapshot(ContractSnapshot {
        burns_enabled: Some(false),
        ..Default::default()
    });
    let action = dashboard.view().action;
    assert_eq!(action.label(), "Burns Paused");
    assert!(!action.enabled());
}

#[test]
fn busy_is_set_immediately_and_cleared_on_either_outcome() {
    let mut dashboard = ready_dashboard();

    dashboard.begin_burn().unwrap();
    assert!(dashboard.is_burning());
    assert_eq!(dashboard.view().action.label(), "Burning...");
    assert!(!dashboard.view().action.enabled());
    assert_eq!(dashboard.begin_burn(), Err(Blocked::Busy));

    dashboard.finish_burn(&Ok(B256::ZERO));
    assert!(!dashboard.is_burning());
    assert!(dashboard.view().action.enabled());

    dashboard.begin_burn().unwrap();
    dashboard.finish_burn(&Err(eyre::eyre!("user rejected")));
    assert!(!dashboard.is_burning());
    assert!(dashboard.view().action.enabled());
}

#[tokio::test]
async fn burn_with_submits_once_and_does_not_mutate_state() {
    let mut dashboard = ready_dashboard();
    let submitter = FakeSubmitter::succeeding();

    let tx_hash = dashboard.burn_with(&submitter).await.unwrap();
    assert_eq!(tx_hash, B256::repeat_byte(0x42));
    assert_eq!(submitter.calls.load(Ordering::SeqCst), 1);
    assert!(!dashboard.is_burning());
    // no optimistic update, the next poll brings the new state
    assert_eq!(dashboard.snapshot().pending_burn_amount, Some(tokens(1_500)));
}

#[tokio::test]
async fn failed_burn_reenables_control() {
    let mut dashboard = ready_dashboard();
    let submitter = FakeSubmitter::failing();

    assert!(dashboard.burn_with(&submitter).await.is_err());
    assert!(!dashboard.is_burning());
    assert!(dashboard.view().action.enabled());
}

#[tokio::test]
async fn refused_burn_never_reaches_the_chain() {
    let mut dashboard = ready_dashboard();
    dashboard.set_wallet(WalletStatus::default());
    let submitter = FakeSubmitter::succeeding();

    let err = dashboard.burn_with(&submitter).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::BurnRefused(Blocked::WalletDisconnected))
    ));
    assert_eq!(submitter.calls.load(Ordering::SeqCst), 0);
    assert!(!dashboard.is_burning());
}

#[tokio::test]
async fn history_loads_then_follows_new_blocks() {
    let burner = FakeBurner::default();
    for block in 1..=25 {
        burner.push_burn(block * 10);
    }

    let mut dashboard = Dashboard::new(settings());
    let mut scanner = EventScanner::new(0, 100);
    assert_eq!(
        scanner.sync(&burner, dashboard.history_mut()).await.unwrap(),
        25
    );
    assert_eq!(scanner.last_processed_block(), Some(250));

    burner.push_burn(260);
    assert_eq!(
        scanner.sync(&burner, dashboard.history_mut()).await.unwrap(),
        1
    );
    assert_eq!(
        *burner.queried.lock().unwrap(),
        vec![(0, 99), (100, 199), (200, 250), (251, 260)]
    );

    // head did not move
    assert_eq!(
        scanner.sync(&burner, dashboard.history_mut()).await.unwrap(),
        0
    );

    let rows = dashboard.view().recent_burns;
    assert_eq!(rows.len(), 20);
    assert_eq!(rows[0].block, 260);
    assert_eq!(rows[19].block, 70);
    assert!(rows.windows(2).all(|w| w[0].block > w[1].block));
}

#[tokio::test]
async fn failed_reads_render_as_zero() {
    let burner = FakeBurner::default();
    let mut dashboard = Dashboard::new(settings());
    dashboard.apply_snapshot(burner.snapshot().await);

    let view = dashboard.view();
    assert_eq!(view.total_burned.value, "0");
    assert_eq!(view.pending_burn.value, "0");
    assert_eq!(view.total_burns, "0");
    assert!(!view.burns_enabled);
    assert_eq!(view.owner, None);
}

struct ScriptedPrice {
    prices: Mutex<Vec<Result<f64, PriceError>>>,
}

#[async_trait]
impl PriceSource for ScriptedPrice {
    async fn fetch_price(&self) -> Result<f64, PriceError> {
        self.prices.lock().unwrap().remove(0)
    }
}

#[tokio::test]
async fn price_failure_keeps_displayed_price() {
    let mut poller = PricePoller::new(ScriptedPrice {
        prices: Mutex::new(vec![Ok(0.002), Err(PriceError::NoPairs), Err(PriceError::MissingPrice)]),
    });
    let mut dashboard = ready_dashboard();

    poller.poll().await;
    dashboard.set_price(poller.usd());
    let before = dashboard.view();
    assert_eq!(before.price, "$0.00200000");
    assert_eq!(before.pending_burn.usd.as_deref(), Some("$3.00"));

    for _ in 0..2 {
        assert!(!poller.poll().await);
        dashboard.set_price(poller.usd());
        let after = dashboard.view();
        assert_eq!(after.price, before.price);
        assert_eq!(after.pending_burn.usd, before.pending_burn.usd);
    }
}

/// Quotes once, then asks a feed nobody listens on.
struct QuoteThenOffline {
    quoted: AtomicBool,
    offline: DexPriceSource,
}

#[async_trait]
impl PriceSource for QuoteThenOffline {
    async fn fetch_price(&self) -> Result<f64, PriceError> {
        if !self.quoted.swap(true, Ordering::SeqCst) {
            return Ok(0.002);
        }
        self.offline.fetch_price().await
    }
}

#[tokio::test]
async fn unreachable_price_feed_keeps_displayed_price() {
    let endpoint = "http://127.0.0.1:1/tokens".parse().unwrap();
    let offline = DexPriceSource::new(&endpoint, Address::repeat_byte(0x22)).unwrap();
    assert!(matches!(
        offline.fetch_price().await,
        Err(PriceError::Http(_))
    ));

    let mut poller = PricePoller::new(QuoteThenOffline {
        quoted: AtomicBool::new(false),
        offline,
    });
    let mut dashboard = ready_dashboard();

    assert!(poller.poll().await);
    dashboard.set_price(poller.usd());
    let before = dashboard.view();

    assert!(!poller.poll().await);
    dashboard.set_price(poller.usd());
    let after = dashboard.view();
    assert_eq!(after.price, "$0.00200000");
    assert_eq!(after.pending_burn.usd, before.pending_burn.usd);
}

#[test]
fn countdown_only_when_nothing_pending() {
    let mut dashboard = Dashboard::new(settings());
    dashboard.apply_snapshot(ContractSnapshot {
        burns_enabled: Some(true),
        // 60 tokens per hour, one per minute
        burn_rate_per_hour: Some(tokens(60)),
        last_burn_timestamp: Some(U256::from(1_000)),
        pending_burn_amount: Some(U256::ZERO),
        ..Default::default()
    });

    dashboard.tick(1_015);
    let view = dashboard.view();
    assert_eq!(view.next_burn_in.as_deref(), Some("45s"));
    assert_eq!(view.since_last_burn.as_deref(), Some("15s"));

    dashboard.apply_snapshot(ContractSnapshot {
        pending_burn_amount: Some(tokens(1)),
        ..Default::default()
    });
    dashboard.tick(1_016);
    assert_eq!(dashboard.view().next_burn_in, None);
}

#[test]
fn snapshot_change_restarts_clock() {
    let mut dashboard = Dashboard::new(settings());
    assert!(dashboard.apply_snapshot(live_snapshot()));
    assert!(!dashboard.apply_snapshot(live_snapshot()));

    let mut later = live_snapshot();
    later.last_burn_timestamp = Some(U256::from(1_700_000_600u64));
    assert!(dashboard.apply_snapshot(later));
}
