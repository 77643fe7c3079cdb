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

//! Shared registry of interactive stimuli (needs, yarn, laser)
//!
//! One registry is shared by every cat in a field. Cats only read from it,
//! by polling or by subscribing to push signals; placing, moving and
//! removing stimuli is the embedding environment's job. The registry is
//! injected into each brain at construction rather than reached through any
//! global state, so a brain without a registry simply never reacts.

use crate::events::{EventBus, Subscription};
use crate::spatial::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// The kind of an interactive stimulus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StimulusKind {
    Need,
    Yarn,
    Laser,
}

/// Current state of a stimulus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StimulusState {
    /// Stationary (needs, parked yarn)
    Idle,
    /// Yarn in motion
    Rolling,
    /// Laser switched on
    Active,
    /// Laser switched off
    Inactive,
}

/// Read-only snapshot of a stimulus at a moment in time.
///
/// Brains never hold one of these past the tick or push event that produced
/// it; the registry owns the live records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stimulus {
    pub id: Uuid,
    pub kind: StimulusKind,
    pub position: Point,
    pub state: StimulusState,
    pub velocity: Option<Point>,
}

impl Stimulus {
    fn new(kind: StimulusKind, position: Point, state: StimulusState) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
            state,
            velocity: None,
        }
    }
}

/// Push notifications emitted when the environment changes a stimulus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StimulusSignal {
    NeedPlaced { need: Stimulus },
    NeedRemoved { need_id: Uuid },
    YarnPlaced { yarn: Stimulus },
    YarnMoved { yarn: Stimulus },
    LaserActivated { laser: Stimulus },
    LaserMoved { laser: Stimulus },
    LaserDeactivated { laser_id: Uuid },
}

/// Shared registry of active stimuli.
///
/// Interior locking keeps concurrent reads from many brains safe; writes
/// only come from the single environment side.
pub struct StimulusRegistry {
    needs: RwLock<HashMap<Uuid, Stimulus>>,
    yarns: RwLock<HashMap<Uuid, Stimulus>>,
    laser: RwLock<Option<Stimulus>>,
    signals: EventBus<StimulusSignal>,
}

impl StimulusRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            needs: RwLock::new(HashMap::new()),
            yarns: RwLock::new(HashMap::new()),
            laser: RwLock::new(None),
            signals: EventBus::new(),
        }
    }

    // Environment-side mutation

    /// Place a need (food, water, ...) and announce it
    pub fn place_need(&self, position: Point) -> Uuid {
        let need = Stimulus::new(StimulusKind::Need, position, StimulusState::Idle);
        let id = need.id;
        self.needs
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, need);
        self.signals.emit(&StimulusSignal::NeedPlaced { need });
        id
    }

    /// Remove a consumed need. Unknown ids are a no-op.
    pub fn remove_need(&self, need_id: Uuid) {
        let removed = self
            .needs
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&need_id);
        if removed.is_some() {
            self.signals.emit(&StimulusSignal::NeedRemoved { need_id });
        }
    }

    /// Place a yarn toy and announce it
    pub fn place_yarn(&self, position: Point) -> Uuid {
        let yarn = Stimulus::new(StimulusKind::Yarn, position, StimulusState::Idle);
        let id = yarn.id;
        self.yarns
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, yarn);
        self.signals.emit(&StimulusSignal::YarnPlaced { yarn });
        id
    }

    /// Move a yarn (drag or roll), updating state and velocity.
    /// Unknown ids are a no-op.
    pub fn move_yarn(&self, yarn_id: Uuid, position: Point, state: StimulusState, velocity: Option<Point>) {
        let mut yarns = self.yarns.write().unwrap_or_else(|e| e.into_inner());
        let Some(yarn) = yarns.get_mut(&yarn_id) else {
            return;
        };
        yarn.position = position;
        yarn.state = state;
        yarn.velocity = velocity;
        let snapshot = *yarn;
        drop(yarns);
        self.signals.emit(&StimulusSignal::YarnMoved { yarn: snapshot });
    }

    /// Switch the laser pointer on at a position. Replaces any prior laser.
    pub fn activate_laser(&self, position: Point) -> Uuid {
        let laser = Stimulus::new(StimulusKind::Laser, position, StimulusState::Active);
        let id = laser.id;
        *self.laser.write().unwrap_or_else(|e| e.into_inner()) = Some(laser);
        self.signals.emit(&StimulusSignal::LaserActivated { laser });
        id
    }

    /// Move the active laser dot. No-op when the laser is off.
    pub fn move_laser(&self, position: Point) {
        let mut slot = self.laser.write().unwrap_or_else(|e| e.into_inner());
        let Some(laser) = slot.as_mut() else {
            return;
        };
        laser.position = position;
        let snapshot = *laser;
        drop(slot);
        self.signals.emit(&StimulusSignal::LaserMoved { laser: snapshot });
    }

    /// Switch the laser off. No-op when already off.
    pub fn deactivate_laser(&self) {
        let taken = self.laser.write().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(laser) = taken {
            self.signals
                .emit(&StimulusSignal::LaserDeactivated { laser_id: laser.id });
        }
    }

    // Brain-side polling

    /// Needs within `radius` of a position
    pub fn needs_near(&self, position: Point, radius: f32) -> Vec<Stimulus> {
        self.needs
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .filter(|s| s.position.distance(position) <= radius)
            .copied()
            .collect()
    }

    /// Yarns within `radius` of a position
    pub fn yarns_near(&self, position: Point, radius: f32) -> Vec<Stimulus> {
        self.yarns
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .filter(|s| s.position.distance(position) <= radius)
            .copied()
            .collect()
    }

    /// The laser, if currently active
    pub fn active_laser(&self) -> Option<Stimulus> {
        (*self.laser.read().unwrap_or_else(|e| e.into_inner()))
            .filter(|laser| laser.state == StimulusState::Active)
    }

    // Push side

    /// Subscribe to stimulus signals, returning a token for [`Self::unsubscribe`]
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&StimulusSignal) + Send + Sync + 'static,
    {
        self.signals.subscribe(handler)
    }

    /// Remove a signal subscription. Safe to call repeatedly.
    pub fn unsubscribe(&self, subscription: Subscription) {
        self.signals.unsubscribe(subscription);
    }
}

impl Default for StimulusRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_needs_near_filters_by_radius() {
        let registry = StimulusRegistry::new();
        let close = registry.place_need(Point::new(100.0, 0.0));
        registry.place_need(Point::new(500.0, 0.0));

        let found = registry.needs_near(Point::new(0.0, 0.0), 150.0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, close);
    }

    #[test]
    fn test_active_laser_requires_active_state() {
        let registry = StimulusRegistry::new();
        assert!(registry.active_laser().is_none());

        registry.activate_laser(Point::new(10.0, 10.0));
        assert!(registry.active_laser().is_some());

        registry.deactivate_laser();
        assert!(registry.active_laser().is_none());
    }

    #[test]
    fn test_move_yarn_updates_snapshot() {
        let registry = StimulusRegistry::new();
        let id = registry.place_yarn(Point::new(0.0, 0.0));
        registry.move_yarn(
            id,
            Point::new(50.0, 0.0),
            StimulusState::Rolling,
            Some(Point::new(5.0, 0.0)),
        );

        let yarns = registry.yarns_near(Point::new(50.0, 0.0), 1.0);
        assert_eq!(yarns.len(), 1);
        assert_eq!(yarns[0].state, StimulusState::Rolling);
        assert_eq!(yarns[0].velocity, Some(Point::new(5.0, 0.0)));
    }

    #[test]
    fn test_signals_reach_subscribers() {
        let registry = StimulusRegistry::new();
        let placed = Arc::new(AtomicUsize::new(0));
        let p = Arc::clone(&placed);
        let token = registry.subscribe(move |signal| {
            if matches!(signal, StimulusSignal::NeedPlaced { .. }) {
                p.fetch_add(1, Ordering::SeqCst);
            }
        });

        registry.place_need(Point::new(0.0, 0.0));
        assert_eq!(placed.load(Ordering::SeqCst), 1);

        registry.unsubscribe(token);
        registry.place_need(Point::new(1.0, 1.0));
        assert_eq!(placed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_deactivate_laser_idempotent() {
        let registry = StimulusRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        registry.subscribe(move |signal| {
            if matches!(signal, StimulusSignal::LaserDeactivated { .. }) {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        registry.activate_laser(Point::new(0.0, 0.0));
        registry.deactivate_laser();
        registry.deactivate_laser();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_remove_unknown_need_is_noop() {
        let registry = StimulusRegistry::new();
        registry.remove_need(Uuid::new_v4());
        assert!(registry.needs_near(Point::new(0.0, 0.0), 1e6).is_empty());
    }
}
