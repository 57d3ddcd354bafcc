// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution-control primitives.
//!
//! Each primitive wraps an opaque operation: retry it on failure, bound it
//! with a wall-clock deadline, poll it until a condition holds, or fan it
//! out over a bounded worker pool. Primitives either propagate the
//! operation's failure unchanged or wrap it into a named taxonomy kind when
//! their own bound trips; nothing is swallowed except through an explicit
//! `Skip`/`Warn` disposition or a disabled spec.

pub mod notify;
pub mod parallel;
pub mod poll;
pub mod retry;
pub mod timeout;

pub use notify::{notify_on_failure, FailureNotificationSpec, Handle};
pub use parallel::ParallelRunner;
pub use poll::{poll, PollSpec};
pub use retry::{retry, RetrySpec};
pub use timeout::{with_timeout, TimeoutSpec};

use serde::{Deserialize, Serialize};

/// Configured reaction to a failure condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// Swallow silently
    Skip,
    /// Notify, then continue
    Warn,
    /// Signal the failure to the caller
    Raise,
}
