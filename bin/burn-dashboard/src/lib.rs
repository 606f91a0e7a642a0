//! Terminal dashboard for an on-chain token burner.
//!
//! Reads the burner's counters over JSON-RPC, follows its `BurnExecuted`
//! events, polls a DEX price feed and lets a configured wallet call `burn()`.
//! Accrual math stays on chain. This crate only presents what the contract
//! reports and decides when the burn control is live.

pub mod clock;
pub mod cmd;
pub mod config;
pub mod constants;
pub mod contract;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod exporter;
pub mod format;
pub mod gate;
pub mod history;
pub mod opts;
pub mod price;
pub mod snapshot;
pub mod telemetry;
pub mod wallet;
