//! Error types for the burn dashboard.

use alloy::primitives::B256;
use thiserror::Error;

use crate::gate::Blocked;

/// Errors that can occur while configuring or driving the dashboard.
#[derive(Debug, Error)]
pub enum Error {
    /// No burner contract address was given on the command line or in the config file.
    #[error("burner contract address is required (use --burner or set `burner` in the config)")]
    MissingBurner,
    /// A polling interval was configured as zero.
    #[error("{0} interval must be greater than zero")]
    ZeroInterval(&'static str),
    /// The history window was configured as zero.
    #[error("history window must hold at least one event")]
    EmptyHistoryWindow,
    /// The log query range was configured as zero blocks.
    #[error("history batch_blocks must be greater than zero")]
    EmptyBatchRange,
    /// A burn was requested but the gate refused it.
    #[error("burn refused: {0}")]
    BurnRefused(Blocked),
    /// The burn transaction was mined but reverted.
    #[error("burn transaction {0} reverted")]
    BurnReverted(B256),
    /// A write was requested without a wallet.
    #[error("no wallet configured, pass --private-key to sign transactions")]
    NoWallet,
}

/// Failures of a single price fetch. None of them reach the render path.
#[derive(Debug, Error)]
pub enum PriceError {
    /// The request could not be sent or the response body could not be decoded.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// The lookup returned no trading pairs for the token.
    #[error("price lookup returned no pairs")]
    NoPairs,
    /// The first pair carried no USD price.
    #[error("first pair has no USD price")]
    MissingPrice,
    /// The USD price string could not be parsed.
    #[error("invalid USD price {0:?}")]
    InvalidPrice(String),
}
