//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside the cache.
//!
//! # Tasks
//! - Sweep: Removes expired cache entries at configured intervals

mod sweep;

pub(crate) use sweep::spawn_sweep_task;
