//! Background Tasks Module
//!
//! Optional maintenance that runs alongside the cache nodes.
//!
//! # Tasks
//! - Expiry sweeper: eagerly drops expired entries at a fixed interval.
//!   Without it, expiration stays lazy (checked on read).

mod sweeper;

pub use sweeper::spawn_sweeper;
