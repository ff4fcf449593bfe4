//! Outstanding requests awaiting a response.
//!
//! Each entry is consumed exactly once: [`PendingRequests::take`] removes
//! it before the responder runs, so a duplicate response finds nothing.

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::future::BoxFuture;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::Result;
use crate::identifiers::RequestId;

// ============================================================================
// Types
// ============================================================================

/// Single-shot callback receiving a request's outcome.
pub type ResponseCallback = Box<dyn FnOnce(Result<Value>) + Send>;

/// Where a request's outcome is delivered.
pub(crate) enum Responder {
    /// Future-style request, resolved through a oneshot channel.
    Channel(oneshot::Sender<Result<Value>>),
    /// Callback-style request.
    Callback(ResponseCallback),
}

impl Responder {
    /// Delivers the outcome, consuming the responder.
    pub(crate) fn resolve(self, result: Result<Value>) {
        match self {
            // Receiver dropped means the caller stopped waiting.
            Self::Channel(tx) => {
                let _ = tx.send(result);
            }
            Self::Callback(callback) => callback(result),
        }
    }
}

// ============================================================================
// PendingRequests
// ============================================================================

/// Request id → responder.
#[derive(Default)]
pub(crate) struct PendingRequests {
    entries: FxHashMap<RequestId, Responder>,
}

impl PendingRequests {
    pub(crate) fn insert(&mut self, request_id: RequestId, responder: Responder) {
        self.entries.insert(request_id, responder);
    }

    pub(crate) fn take(&mut self, request_id: &RequestId) -> Option<Responder> {
        self.entries.remove(request_id)
    }

    pub(crate) fn contains(&self, request_id: &RequestId) -> bool {
        self.entries.contains_key(request_id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

// ============================================================================
// PendingResponse
// ============================================================================

/// Future resolving to the provider's answer to one request.
///
/// Dropping it abandons the request: its pending entry is removed and a
/// late response is logged as an orphan.
#[must_use = "the response is only observable by awaiting it"]
pub struct PendingResponse {
    request_id: RequestId,
    inner: BoxFuture<'static, Result<Value>>,
}

impl PendingResponse {
    pub(crate) fn new(request_id: RequestId, inner: BoxFuture<'static, Result<Value>>) -> Self {
        Self { request_id, inner }
    }

    /// Returns the correlation id of the request.
    #[inline]
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }
}

impl Future for PendingResponse {
    type Output = Result<Value>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().inner.as_mut().poll(cx)
    }
}

impl std::fmt::Debug for PendingResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingResponse")
            .field("request_id", &self.request_id)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
