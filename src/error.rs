// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::{DateTime, Utc};
use std::error::Error as StdError;
use thiserror::Error;

/// Convenience type alias for usage within Snowflake.
pub type BoxDynError = Box<dyn StdError + 'static + Send + Sync>;

/// The error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{field} must be between 0 and {max}, got {value}")]
    InvalidConfiguration {
        field: &'static str,
        value: i64,
        max: i64,
    },
    #[error("{0} was not provided")]
    MissingIdentity(&'static str),
    #[error("clock moved backwards, refusing to generate id for {0} milliseconds")]
    ClockRegression(i64),
    #[error("start_time `{0}` is ahead of current time")]
    StartTimeAheadOfCurrentTime(DateTime<Utc>),
    #[error("over the time limit: elapsed time since the epoch does not fit in 41 bits")]
    OverTimeLimit,
    #[error("epoch_ms `{0}` is not a representable timestamp")]
    InvalidEpoch(i64),
    #[error("batch size must be between 1 and {max}, got {count}")]
    InvalidBatchSize { count: usize, max: usize },
    #[error("mutex is poisoned (i.e. a panic happened while it was locked)")]
    MutexPoisoned,
}
