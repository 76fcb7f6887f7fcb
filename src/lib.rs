//! A distributed unique ID generator using [Twitter's Snowflake] layout.
//!
//! Every generator is pre-assigned a `(datacenter_id, machine_id)` pair and
//! packs a millisecond timestamp, that pair and a per-millisecond sequence
//! into one `i64`:
//!
//! ```text
//! | 1 bit unused | 41 bits time | 5 bits datacenter | 5 bits machine | 12 bits sequence |
//! ```
//!
//! IDs are unique across generators as long as pairs are assigned uniquely,
//! and never decrease within one generator.
//!
//! ## Quickstart
//!
//! Add the following to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! snowflake_id = "0.1"
//! ```
//!
//! Use the library like this:
//!
//! ```
//! use snowflake_id::Snowflake;
//!
//! let sf = Snowflake::new(1, 1).unwrap();
//! let next_id = sf.next_id().unwrap();
//! let parts = sf.parse_id(next_id);
//! assert_eq!(parts.datacenter_id, 1);
//! assert_eq!(parts.machine_id, 1);
//! ```
//!
//! ## Concurrent use
//!
//! Snowflake is thread safe. `clone` it before moving to another thread;
//! clones share the same state:
//! ```
//! use snowflake_id::Snowflake;
//! use std::thread;
//!
//! let sf = Snowflake::new(1, 1).unwrap();
//!
//! let mut children = Vec::new();
//! for _ in 0..10 {
//!     let thread_sf = sf.clone();
//!     children.push(thread::spawn(move || {
//!         println!("{}", thread_sf.next_id().unwrap());
//!     }));
//! }
//!
//! for child in children {
//!     child.join().unwrap();
//! }
//! ```
//!
//! ## Sequence exhaustion
//!
//! When 4096 IDs have been issued within one millisecond, `next_id` spins
//! until the clock advances while holding the generator lock, so every
//! other caller waits too. There is no timeout on this wait.
//!
//! [Twitter's Snowflake]: https://blog.twitter.com/2010/announcing-snowflake

pub mod batch;
mod builder;
pub mod cli;
mod clock;
pub mod config;
mod error;
pub mod logging;
mod snowflake;

pub use crate::snowflake::*;
pub use batch::{Batch, MAX_BATCH_SIZE};
pub use builder::*;
pub use clock::*;
pub use error::*;
