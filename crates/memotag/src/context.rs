//! Request-scoped caller identity and cancellation.
//!
//! Every operation receives a [`RequestContext`]. Its user id scopes store
//! queries to memos the caller owns. Its [`CancellationToken`] is polled
//! between memos by the multi-memo loops; a cancelled request stops before
//! touching the next memo, leaving earlier writes committed.

use crate::error::{MemotagError, Result};
use crate::model::UserId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user_id: UserId,
    cancellation: CancellationToken,
}

impl RequestContext {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn ensure_active(&self) -> Result<()> {
        if self.cancellation.is_cancelled() {
            return Err(MemotagError::Cancelled);
        }
        Ok(())
    }
}
