//! Background Tasks Module
//!
//! Contains background tasks that run alongside a cache.
//!
//! # Tasks
//! - TTL Cleanup: Sweeps stale cache entries at the configured interval

mod cleanup;

pub(crate) use cleanup::{spawn_cleanup_task, CleanupHandle};
