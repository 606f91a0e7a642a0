//! Local clock derived from the on-chain last-burn timestamp.
//!
//! Nothing here is persisted. Every tick recomputes elapsed and remaining
//! seconds from wall-clock time, so a missed tick only delays the display.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use alloy::primitives::U256;

use crate::format::to_tokens;

/// The contract reads the clock depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockInputs {
    pub last_burn_timestamp: Option<U256>,
    pub burn_rate_per_hour: Option<U256>,
    pub burns_enabled: Option<bool>,
}

/// Seconds derived on the latest tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockReading {
    /// Seconds since the last burn, `None` until the timestamp is known.
    pub elapsed: Option<u64>,
    /// Seconds until one whole token has accrued again. Zero when inactive.
    pub remaining: u64,
}

#[derive(Debug, Default)]
pub struct LocalClock {
    inputs: ClockInputs,
    reading: ClockReading,
    generation: u64,
}

impl LocalClock {
    /// Replaces the inputs. Returns `true` when they changed, in which case the
    /// caller restarts its tick schedule.
    pub fn retarget(&mut self, inputs: ClockInputs) -> bool {
        if inputs == self.inputs {
            return false;
        }
        self.inputs = inputs;
        self.generation += 1;
        true
    }

    /// Bumped on every input change.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn inputs(&self) -> ClockInputs {
        self.inputs
    }

    pub fn reading(&self) -> ClockReading {
        self.reading
    }

    /// Recomputes the reading for `now` (seconds since the unix epoch).
    pub fn tick(&mut self, now: u64) -> ClockReading {
        let elapsed = self
            .inputs
            .last_burn_timestamp
            .filter(|ts| !ts.is_zero())
            .map(|ts| now.saturating_sub(ts.saturating_to::<u64>()));

        let remaining = match (elapsed, self.min_interval()) {
            (Some(elapsed), Some(min)) => min.saturating_sub(elapsed),
            _ => 0,
        };

        self.reading = ClockReading { elapsed, remaining };
        self.reading
    }

    /// Seconds needed for one whole token to accrue at the current rate.
    ///
    /// `None` when burns are paused or the rate is unknown.
    fn min_interval(&self) -> Option<u64> {
        if self.inputs.burns_enabled != Some(true) {
            return None;
        }
        let rate = self.inputs.burn_rate_per_hour.filter(|r| !r.is_zero())?;
        let per_hour = to_tokens(rate);
        Some(((3600.0 / per_hour).floor() as u64).max(1))
    }
}

/// Current wall-clock time in whole seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}
