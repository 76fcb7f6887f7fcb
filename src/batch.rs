use crate::Snowflake;
use crate::error::Error;
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

/// Upper bound on the number of ids a single batch may request.
pub const MAX_BATCH_SIZE: usize = 10_000;

/// Ids produced by one [`Snowflake::next_ids`] call.
#[derive(Debug, Clone, Serialize)]
pub struct Batch {
    pub ids: Vec<i64>,
    pub count: usize,
    pub duration_micros: u64,
}

impl Batch {
    /// Ids generated per second over the batch.
    pub fn rate(&self) -> f64 {
        if self.duration_micros == 0 {
            return f64::INFINITY;
        }
        self.count as f64 * 1_000_000.0 / self.duration_micros as f64
    }
}

impl Snowflake {
    /// Generate `count` ids in a row, timing the run.
    ///
    /// `count` must be within `1..=MAX_BATCH_SIZE`. The first failing
    /// [`next_id`](Snowflake::next_id) aborts the batch and its error is returned.
    pub fn next_ids(&self, count: usize) -> Result<Batch, Error> {
        if count == 0 || count > MAX_BATCH_SIZE {
            return Err(Error::InvalidBatchSize {
                count,
                max: MAX_BATCH_SIZE,
            });
        }

        let start = Instant::now();
        let ids = (0..count)
            .map(|_| self.next_id())
            .collect::<Result<Vec<_>, _>>()?;
        let duration_micros = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);

        debug!(count, duration_micros, "batch generated");
        Ok(Batch {
            ids,
            count,
            duration_micros,
        })
    }
}
