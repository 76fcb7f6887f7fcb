use crate::Snowflake;
use crate::clock::{Clock, SystemClock};
use crate::error::Error;
use crate::snowflake::{
    BIT_LEN_TIME, DEFAULT_EPOCH, Internals, MAX_DATACENTER_ID, MAX_MACHINE_ID, SharedSnowflake,
};
use chrono::prelude::*;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// A builder for building the ['Snowflake'] generator.
///
/// [`Snowflake`]: struct.Snowflake.html
#[derive(Default)]
pub struct Builder {
    start_time: Option<DateTime<Utc>>,
    datacenter_id: Option<i64>,
    machine_id: Option<i64>,
    clock: Option<Box<dyn Clock>>,
}

impl Builder {
    /// Construct a new builder for the build of ['Snowflake'].
    ///
    /// [`Snowflake`]: struct.Snowflake.html
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start time used as the epoch of the timestamp section.
    /// If the time is set later than the current time, 'finalize' will fail.
    pub fn start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Set the data center ID. Must be within `0..=31`.
    pub fn datacenter_id(mut self, datacenter_id: i64) -> Self {
        self.datacenter_id = Some(datacenter_id);
        self
    }

    /// Set the machine ID. Must be within `0..=31`.
    pub fn machine_id(mut self, machine_id: i64) -> Self {
        self.machine_id = Some(machine_id);
        self
    }

    /// Replace the system clock, e.g. with a [`ManualClock`].
    ///
    /// [`ManualClock`]: crate::ManualClock
    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Finish building and create a Snowflake instance.
    /// This method will return an error if an identity field is missing or out of range,
    /// or if the start time lies in the future.
    pub fn finalize(self) -> Result<Snowflake, Error> {
        let datacenter_id = self
            .datacenter_id
            .ok_or(Error::MissingIdentity("datacenter_id"))?;
        let machine_id = self.machine_id.ok_or(Error::MissingIdentity("machine_id"))?;

        check_range("datacenter_id", datacenter_id, MAX_DATACENTER_ID)?;
        check_range("machine_id", machine_id, MAX_MACHINE_ID)?;

        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock));

        let epoch = if let Some(start_time) = self.start_time {
            if start_time.timestamp_millis() > clock.now_millis() {
                return Err(Error::StartTimeAheadOfCurrentTime(start_time));
            }
            start_time.timestamp_millis()
        } else {
            DEFAULT_EPOCH
        };

        if clock.now_millis() - epoch >= 1 << BIT_LEN_TIME {
            return Err(Error::OverTimeLimit);
        }

        debug!(datacenter_id, machine_id, epoch, "snowflake generator created");

        let shared = Arc::new(SharedSnowflake {
            epoch,
            datacenter_id,
            machine_id,
            clock,
            internals: Mutex::new(Internals {
                last_time: -1,
                sequence: 0,
            }),
        });
        Ok(Snowflake::new_inner(shared))
    }
}

fn check_range(field: &'static str, value: i64, max: i64) -> Result<(), Error> {
    if !(0..=max).contains(&value) {
        return Err(Error::InvalidConfiguration { field, value, max });
    }
    Ok(())
}
