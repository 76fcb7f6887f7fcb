use crate::builder::Builder;
use crate::clock::Clock;
use crate::error::*;
use chrono::{DateTime, SecondsFormat};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{trace, warn};

/// Default epoch: 2010-11-04T01:42:54.657Z, in milliseconds since the Unix epoch.
pub const DEFAULT_EPOCH: i64 = 1_288_834_974_657;

/// bit length of time
pub const BIT_LEN_TIME: u32 = 41;
/// bit length of the data center id
pub const BIT_LEN_DATACENTER_ID: u32 = 5;
/// bit length of machine id
pub const BIT_LEN_MACHINE_ID: u32 = 5;
/// bit length of sequence number
pub const BIT_LEN_SEQUENCE: u32 = 12;

pub const MAX_DATACENTER_ID: i64 = (1 << BIT_LEN_DATACENTER_ID) - 1;
pub const MAX_MACHINE_ID: i64 = (1 << BIT_LEN_MACHINE_ID) - 1;
pub const MAX_SEQUENCE: i64 = (1 << BIT_LEN_SEQUENCE) - 1;

const MACHINE_ID_SHIFT: u32 = BIT_LEN_SEQUENCE;
const DATACENTER_ID_SHIFT: u32 = BIT_LEN_SEQUENCE + BIT_LEN_MACHINE_ID;
const TIMESTAMP_SHIFT: u32 = BIT_LEN_SEQUENCE + BIT_LEN_MACHINE_ID + BIT_LEN_DATACENTER_ID;

/// Mutable state guarded by the generator lock.
#[derive(Debug)]
pub(crate) struct Internals {
    /// Millisecond of the last emitted id, -1 before the first one.
    pub(crate) last_time: i64,
    pub(crate) sequence: i64,
}

/// SharedSnowflake is shared between Snowflake instances.
/// This struct is not exposed to the public.
pub(crate) struct SharedSnowflake {
    pub(crate) epoch: i64,
    pub(crate) datacenter_id: i64,
    pub(crate) machine_id: i64,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) internals: Mutex<Internals>,
}

/// Snowflake is a distributed unique ID generator.
/// It is thread-safe and can be cloned to be used in multiple threads.
pub struct Snowflake(pub(crate) Arc<SharedSnowflake>);

impl Snowflake {
    /// Create a new Snowflake for the given data center and machine,
    /// using the default epoch and the system clock.
    /// For custom configuration see [`builder`].
    ///
    /// [`builder`]: struct.Snowflake.html#method.builder
    pub fn new(datacenter_id: i64, machine_id: i64) -> Result<Self, Error> {
        Builder::new()
            .datacenter_id(datacenter_id)
            .machine_id(machine_id)
            .finalize()
    }

    /// Create a new [`Builder`] to construct a Snowflake.
    ///
    /// [`Builder`]: struct.Builder.html
    pub fn builder() -> Builder {
        Builder::new()
    }

    pub(crate) fn new_inner(shared: Arc<SharedSnowflake>) -> Self {
        Self(shared)
    }

    /// Generate the next unique id.
    ///
    /// Fails with [`Error::ClockRegression`] when the clock reads earlier than
    /// the last emitted id. If 4096 ids were already issued this millisecond,
    /// the call spins until the clock advances, holding the lock meanwhile.
    pub fn next_id(&self) -> Result<i64, Error> {
        let mut internals = self.0.internals.lock().map_err(|_| Error::MutexPoisoned)?;

        let mut now = self.0.clock.now_millis();
        if now < internals.last_time {
            let drift = internals.last_time - now;
            warn!(drift_ms = drift, "clock moved backwards");
            return Err(Error::ClockRegression(drift));
        }

        if now == internals.last_time {
            internals.sequence = (internals.sequence + 1) & MAX_SEQUENCE;
            if internals.sequence == 0 {
                trace!(
                    last_time = internals.last_time,
                    "sequence exhausted, waiting for next millisecond"
                );
                now = til_next_millis(&*self.0.clock, internals.last_time);
            }
        } else {
            internals.sequence = 0;
        }

        internals.last_time = now;

        Ok(((now - self.0.epoch) << TIMESTAMP_SHIFT)
            | (self.0.datacenter_id << DATACENTER_ID_SHIFT)
            | (self.0.machine_id << MACHINE_ID_SHIFT)
            | internals.sequence)
    }

    /// Break an id up into its parts, using this generator's epoch.
    pub fn parse_id(&self, id: i64) -> ParsedId {
        parse_id_with_epoch(id, self.0.epoch)
    }

    /// Static layout and identity of this generator.
    pub fn stats(&self) -> Stats {
        Stats {
            datacenter_id: self.0.datacenter_id,
            machine_id: self.0.machine_id,
            max_sequence: MAX_SEQUENCE,
            epoch: self.0.epoch,
        }
    }

    pub fn datacenter_id(&self) -> i64 {
        self.0.datacenter_id
    }

    pub fn machine_id(&self) -> i64 {
        self.0.machine_id
    }

    /// Epoch in milliseconds since the Unix epoch.
    pub fn epoch(&self) -> i64 {
        self.0.epoch
    }
}

/// Returns a new `Snowflake` referencing the same state as `self`.
/// This is used for concurrent use.
impl Clone for Snowflake {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

/// Busy-polls the clock until it reads strictly later than `last_time`.
fn til_next_millis(clock: &dyn Clock, last_time: i64) -> i64 {
    let mut now = clock.now_millis();
    while now <= last_time {
        std::hint::spin_loop();
        now = clock.now_millis();
    }
    now
}

/// ParsedId is the parts of a Snowflake ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedId {
    pub id: i64,
    /// Absolute timestamp in milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// `timestamp` as an RFC 3339 UTC string with second precision.
    pub datetime: String,
    pub datacenter_id: i64,
    pub machine_id: i64,
    pub sequence: i64,
}

/// Static information about a generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub datacenter_id: i64,
    pub machine_id: i64,
    pub max_sequence: i64,
    pub epoch: i64,
}

/// Break a Snowflake ID up into its parts, assuming the default epoch.
pub fn parse_id(id: i64) -> ParsedId {
    parse_id_with_epoch(id, DEFAULT_EPOCH)
}

/// Break a Snowflake ID up into its parts.
///
/// Any integer decodes to something; nothing checks that `id` was produced
/// with the same epoch.
pub fn parse_id_with_epoch(id: i64, epoch: i64) -> ParsedId {
    let timestamp = (id >> TIMESTAMP_SHIFT).saturating_add(epoch);
    let datetime = DateTime::from_timestamp_millis(timestamp)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default();

    ParsedId {
        id,
        timestamp,
        datetime,
        datacenter_id: (id >> DATACENTER_ID_SHIFT) & MAX_DATACENTER_ID,
        machine_id: (id >> MACHINE_ID_SHIFT) & MAX_MACHINE_ID,
        sequence: id & MAX_SEQUENCE,
    }
}
