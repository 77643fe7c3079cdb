//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Event bus with token-based subscriptions, plus reaction event types

use serde::{Deserialize, Serialize};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Handle returned by [`EventBus::subscribe`], consumed by
/// [`EventBus::unsubscribe`]. Tokens avoid any reliance on closure identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Handler<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Event bus for publishing events to registered handlers.
///
/// Dispatch is immediate and isolates each handler: a panicking subscriber
/// is logged and skipped so it cannot break delivery to the others.
pub struct EventBus<E> {
    handlers: Arc<RwLock<Vec<(u64, Handler<E>)>>>,
    next_id: Arc<AtomicU64>,
}

impl<E> EventBus<E> {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Subscribe a handler, returning its subscription token
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        handlers.push((id, Box::new(handler)));
        Subscription(id)
    }

    /// Remove a handler by token. Unknown or already-removed tokens are a no-op.
    pub fn unsubscribe(&self, subscription: Subscription) {
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        handlers.retain(|(id, _)| *id != subscription.0);
    }

    /// Publish an event to every subscribed handler
    pub fn emit(&self, event: &E) {
        let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        for (id, handler) in handlers.iter() {
            if catch_unwind(AssertUnwindSafe(|| handler(event))).is_err() {
                tracing::warn!(subscription = id, "Event handler panicked; skipping");
            }
        }
    }

    /// Number of registered handlers
    pub fn handler_count(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

/// Kinds of externally observable reactions a cat can have to a stimulus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReactionKind {
    NeedDetected,
    YarnDetected,
    YarnMoving,
    LaserDetected,
    LaserMoving,
    LaserDeactivated,
}

/// A discrete notification that a cat has responded to a stimulus.
///
/// `interest` carries the score that triggered the reaction. For moving
/// stimuli it is the boosted value and may exceed 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    pub kind: ReactionKind,
    pub stimulus: Option<Uuid>,
    pub interest: f32,
}

impl Reaction {
    /// Create a reaction tied to a stimulus
    pub fn new(kind: ReactionKind, stimulus: Uuid, interest: f32) -> Self {
        Self {
            kind,
            stimulus: Some(stimulus),
            interest,
        }
    }
}
