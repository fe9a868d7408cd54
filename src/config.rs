use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::RowRounding;
use crate::schedule::ScheduleKind;

/// Dots drawn on every tick.
pub const BATCH_SIZE: u32 = 40;

/// Ink budget a session starts with; one batch is subtracted per tick.
pub const INITIAL_BUDGET: i64 = 200000;

pub const TICK_PERIOD_MS: u64 = 33;

#[derive(Debug, Clone, PartialEq, Eq, clap::Args, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of dots drawn per tick.
    #[clap(long, default_value_t = BATCH_SIZE)]
    pub batch_size: u32,

    /// Initial ink budget. The session stops once it has been spent.
    #[clap(long, default_value_t = INITIAL_BUDGET)]
    pub budget: i64,

    /// How the maximum dot radius shrinks as the budget runs down.
    #[clap(long, value_enum, default_value_t = ScheduleKind::Fixed)]
    pub schedule: ScheduleKind,

    /// Use the conventional `floor(i / width)` row when mapping a sample to coordinates, instead
    /// of `ceil(i / width)`.
    #[clap(long)]
    pub floor_rows: bool,

    /// Milliseconds between ticks.
    #[clap(long, default_value_t = TICK_PERIOD_MS)]
    pub period_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            batch_size: BATCH_SIZE,
            budget: INITIAL_BUDGET,
            schedule: ScheduleKind::Fixed,
            floor_rows: false,
            period_ms: TICK_PERIOD_MS,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::invalid_config("batch size must be positive"));
        }
        if self.budget <= 0 {
            return Err(Error::invalid_config(format!(
                "budget must be positive, got {}",
                self.budget
            )));
        }
        Ok(())
    }

    pub fn rows(&self) -> RowRounding {
        if self.floor_rows {
            RowRounding::Floor
        } else {
            RowRounding::Ceil
        }
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    /// Number of ticks until the session stops, counting the final tick that draws nothing.
    ///
    /// Zero for a config that would fail [`validate`][Self::validate].
    pub fn total_ticks(&self) -> u64 {
        let budget = u64::try_from(self.budget).unwrap_or(0);
        if budget == 0 || self.batch_size == 0 {
            return 0;
        }
        budget.div_ceil(u64::from(self.batch_size))
    }
}
