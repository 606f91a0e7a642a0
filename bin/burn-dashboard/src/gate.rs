//! Whether the burn control is enabled, and why not.

use std::fmt;

/// The booleans the burn control depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateInputs {
    pub wallet_connected: bool,
    pub on_target_chain: bool,
    pub burn_in_flight: bool,
    pub burns_enabled: bool,
    pub has_pending_burn: bool,
}

/// Reason the burn control is disabled, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocked {
    WalletDisconnected,
    WrongNetwork,
    Busy,
    BurnsPaused,
    NothingPending,
}

impl fmt::Display for Blocked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WalletDisconnected => "wallet not connected",
            Self::WrongNetwork => "wallet is on the wrong network",
            Self::Busy => "a burn is already in flight",
            Self::BurnsPaused => "burns are paused",
            Self::NothingPending => "no tokens to burn yet",
        })
    }
}

impl GateInputs {
    /// `Ok` only when every condition clears.
    pub fn check(&self) -> Result<(), Blocked> {
        if !self.wallet_connected {
            return Err(Blocked::WalletDisconnected);
        }
        if !self.on_target_chain {
            return Err(Blocked::WrongNetwork);
        }
        if self.burn_in_flight {
            return Err(Blocked::Busy);
        }
        if !self.burns_enabled {
            return Err(Blocked::BurnsPaused);
        }
        if !self.has_pending_burn {
            return Err(Blocked::NothingPending);
        }
        Ok(())
    }

    pub fn allows_burn(&self) -> bool {
        self.check().is_ok()
    }
}

/// Single in-flight guard. A second `begin` while busy is refused, nothing is queued.
#[derive(Debug, Default)]
pub struct BusyFlag {
    busy: bool,
}

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Sets the flag. Returns `false` if it was already set.
    pub fn begin(&mut self) -> bool {
        !std::mem::replace(&mut self.busy, true)
    }

    pub fn finish(&mut self) {
        self.busy = false;
    }
}
