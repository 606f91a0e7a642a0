//! Defaults for the dashboard.

/// Base mainnet.
pub const DEFAULT_CHAIN_ID: u64 = 8453;

/// Decimals of the burned token.
pub const TOKEN_DECIMALS: u8 = 18;

/// Fixed total supply of the burned token, in whole tokens.
pub const DEFAULT_TOTAL_SUPPLY_TOKENS: u64 = 1_000_000_000;

/// Number of burn events shown in the history table.
pub const DEFAULT_HISTORY_WINDOW: usize = 20;

/// Widest block range asked of `eth_getLogs` in one query.
pub const DEFAULT_HISTORY_BATCH_BLOCKS: u64 = 10_000;

/// Price feed defaults.
pub mod price {
    /// DexScreener token lookup, the token address is appended as a path segment.
    pub const DEFAULT_ENDPOINT: &str = "https://api.dexscreener.com/latest/dex/tokens";
    /// Seconds between price fetches.
    pub const DEFAULT_INTERVAL_SECS: u64 = 60;
    /// Request timeout for a single price fetch.
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;

    pub const fn default_interval_secs() -> u64 {
        DEFAULT_INTERVAL_SECS
    }
}

/// Polling defaults.
pub mod poll {
    /// Seconds between contract snapshot and event polls.
    pub const DEFAULT_INTERVAL_SECS: u64 = 4;
    /// Seconds between local clock ticks.
    pub const CLOCK_TICK_SECS: u64 = 1;

    pub const fn default_interval_secs() -> u64 {
        DEFAULT_INTERVAL_SECS
    }
}

/// Returns the default history window (for serde default).
pub const fn default_history_window() -> usize {
    DEFAULT_HISTORY_WINDOW
}

/// Returns the default log query range (for serde default).
pub const fn default_history_batch_blocks() -> u64 {
    DEFAULT_HISTORY_BATCH_BLOCKS
}

/// Returns the default chain id (for serde default).
pub const fn default_chain_id() -> u64 {
    DEFAULT_CHAIN_ID
}

/// Returns the default total supply (for serde default).
pub const fn default_total_supply_tokens() -> u64 {
    DEFAULT_TOTAL_SUPPLY_TOKENS
}
