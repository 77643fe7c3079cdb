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

//! Push-side reaction to stimulus signals
//!
//! Subscribes to the registry's signal channel so a cat notices newly placed
//! or moving stimuli without waiting for the next poll. Every emitted
//! reaction is also queued for the next decision tick, where it can pre-empt
//! the weighted behavior choice.

use crate::config::BrainConfig;
use crate::evaluator::evaluate_interest;
use crate::events::{EventBus, Reaction, ReactionKind, Subscription};
use crate::mover::Mover;
use crate::personality::PersonalityProfile;
use crate::spatial::Point;
use crate::stimulus::{Stimulus, StimulusRegistry, StimulusSignal, StimulusState};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// Event-driven interaction listener for one cat.
///
/// `setup` and `teardown` are idempotent and silently no-op without a
/// registry; `destroy` tears down permanently. All reaction gating runs
/// inside the registry's signal dispatch, guarded by `running && !destroyed`.
pub struct InteractionListener {
    source: Option<Arc<StimulusRegistry>>,
    inner: Arc<ListenerInner>,
    subscription: Option<Subscription>,
}

struct ListenerInner {
    personality: Arc<RwLock<PersonalityProfile>>,
    config: Arc<RwLock<BrainConfig>>,
    mover: Arc<RwLock<Option<Arc<dyn Mover>>>>,
    reactions: EventBus<Reaction>,
    pending: Mutex<Vec<Reaction>>,
    running: AtomicBool,
    destroyed: AtomicBool,
}

impl InteractionListener {
    /// Create a listener sharing the brain's personality, config and mover
    pub(crate) fn new(
        source: Option<Arc<StimulusRegistry>>,
        personality: Arc<RwLock<PersonalityProfile>>,
        config: Arc<RwLock<BrainConfig>>,
        mover: Arc<RwLock<Option<Arc<dyn Mover>>>>,
        reactions: EventBus<Reaction>,
    ) -> Self {
        Self {
            source,
            inner: Arc::new(ListenerInner {
                personality,
                config,
                mover,
                reactions,
                pending: Mutex::new(Vec::new()),
                running: AtomicBool::new(false),
                destroyed: AtomicBool::new(false),
            }),
            subscription: None,
        }
    }

    /// Register against the registry's signal channel. Idempotent; a missing
    /// registry or a destroyed listener makes this a no-op.
    pub fn setup(&mut self) {
        if self.inner.destroyed.load(Ordering::SeqCst) {
            tracing::debug!("Ignoring setup on destroyed interaction listener");
            return;
        }
        if self.subscription.is_some() {
            return;
        }
        let Some(source) = &self.source else {
            tracing::warn!("No stimulus registry available; listener stays inert");
            return;
        };
        let inner = Arc::clone(&self.inner);
        self.subscription = Some(source.subscribe(move |signal| inner.handle(signal)));
        self.inner.running.store(true, Ordering::SeqCst);
    }

    /// Deregister without destroying the listener. Idempotent, best-effort.
    pub fn teardown(&mut self) {
        self.inner.running.store(false, Ordering::SeqCst);
        if let (Some(token), Some(source)) = (self.subscription.take(), self.source.as_ref()) {
            source.unsubscribe(token);
        }
    }

    /// Tear down permanently. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if self.inner.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.teardown();
        self.inner
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    /// Swap the registry, re-registering if the listener was running
    pub fn set_source(&mut self, source: Option<Arc<StimulusRegistry>>) {
        let was_running = self.subscription.is_some();
        self.teardown();
        self.source = source;
        if was_running {
            self.setup();
        }
    }

    /// Whether the listener is currently registered
    pub fn is_running(&self) -> bool {
        self.subscription.is_some() && self.inner.running.load(Ordering::SeqCst)
    }

    /// Take the reactions queued since the last decision tick
    pub fn drain_pending(&self) -> Vec<Reaction> {
        std::mem::take(
            &mut *self
                .inner
                .pending
                .lock()
                .unwrap_or_else(|e| e.into_inner()),
        )
    }
}

impl Drop for InteractionListener {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl ListenerInner {
    fn handle(&self, signal: &StimulusSignal) {
        if !self.running.load(Ordering::SeqCst) || self.destroyed.load(Ordering::SeqCst) {
            return;
        }
        match signal {
            StimulusSignal::NeedPlaced { need } => self.on_need_placed(need),
            StimulusSignal::NeedRemoved { .. } => {}
            StimulusSignal::YarnPlaced { yarn } => self.on_yarn_placed(yarn),
            StimulusSignal::YarnMoved { yarn } => self.on_yarn_moved(yarn),
            StimulusSignal::LaserActivated { laser } => self.on_laser_activated(laser),
            StimulusSignal::LaserMoved { laser } => self.on_laser_moved(laser),
            StimulusSignal::LaserDeactivated { laser_id } => {
                self.set_laser_flag(false);
                self.react(Reaction {
                    kind: ReactionKind::LaserDeactivated,
                    stimulus: Some(*laser_id),
                    interest: 0.0,
                });
            }
        }
    }

    fn on_need_placed(&self, need: &Stimulus) {
        let Some(position) = self.position() else {
            return;
        };
        let personality = *self.personality.read().unwrap_or_else(|e| e.into_inner());
        let config = self.config.read().unwrap_or_else(|e| e.into_inner()).clone();
        let radius = config.detection.need_radius;
        if position.distance(need.position) > radius {
            return;
        }
        let interest = evaluate_interest(need, position, &personality, radius);
        if interest > config.thresholds.need_interest
            && personality.independence < config.thresholds.need_independence_cap
        {
            self.react(Reaction::new(ReactionKind::NeedDetected, need.id, interest));
        }
    }

    fn on_yarn_placed(&self, yarn: &Stimulus) {
        let Some(position) = self.position() else {
            return;
        };
        let personality = *self.personality.read().unwrap_or_else(|e| e.into_inner());
        let config = self.config.read().unwrap_or_else(|e| e.into_inner()).clone();
        let radius = config.detection.yarn_radius;
        if position.distance(yarn.position) > radius {
            return;
        }
        let interest = evaluate_interest(yarn, position, &personality, radius);
        if interest >= config.thresholds.yarn_interest
            && personality.curiosity >= config.thresholds.yarn_curiosity_floor
        {
            self.react(Reaction::new(ReactionKind::YarnDetected, yarn.id, interest));
        }
    }

    fn on_yarn_moved(&self, yarn: &Stimulus) {
        // Only rolling yarn is worth chasing
        if yarn.state != StimulusState::Rolling {
            return;
        }
        let Some(position) = self.position() else {
            return;
        };
        let personality = *self.personality.read().unwrap_or_else(|e| e.into_inner());
        let config = self.config.read().unwrap_or_else(|e| e.into_inner()).clone();
        // Moving targets are easier to notice, so the radius widens
        let radius = config.thresholds.yarn_moving_radius;
        if position.distance(yarn.position) > radius {
            return;
        }
        let raw = evaluate_interest(yarn, position, &personality, radius);
        let boosted = raw * config.thresholds.yarn_moving_boost;
        if boosted >= config.thresholds.yarn_moving_interest
            && personality.energy >= config.thresholds.yarn_moving_energy_floor
        {
            self.react(Reaction::new(ReactionKind::YarnMoving, yarn.id, boosted));
        }
    }

    fn on_laser_activated(&self, laser: &Stimulus) {
        // No range gate on activation, but interest still needs a position
        let Some(position) = self.position() else {
            return;
        };
        let personality = *self.personality.read().unwrap_or_else(|e| e.into_inner());
        let config = self.config.read().unwrap_or_else(|e| e.into_inner()).clone();
        let interest =
            evaluate_interest(laser, position, &personality, config.detection.laser_radius);
        if interest > config.thresholds.laser_interest
            && personality.curiosity > config.thresholds.laser_curiosity_floor
        {
            self.react(Reaction::new(ReactionKind::LaserDetected, laser.id, interest));
        }
    }

    fn on_laser_moved(&self, laser: &Stimulus) {
        let Some(position) = self.position() else {
            return;
        };
        let personality = *self.personality.read().unwrap_or_else(|e| e.into_inner());
        let config = self.config.read().unwrap_or_else(|e| e.into_inner()).clone();
        let radius = config.detection.laser_radius;
        if position.distance(laser.position) > radius {
            self.set_laser_flag(false);
            return;
        }
        let raw = evaluate_interest(laser, position, &personality, radius);
        let boosted = raw * config.thresholds.laser_moving_boost;
        if boosted > config.thresholds.laser_moving_interest
            && personality.energy > config.thresholds.laser_moving_energy_floor
        {
            self.set_laser_flag(true);
            self.react(Reaction::new(ReactionKind::LaserMoving, laser.id, boosted));
        } else {
            self.set_laser_flag(false);
        }
    }

    /// Agent position from the mover; range-gated events are skipped without one
    fn position(&self) -> Option<Point> {
        let mover = self.mover.read().unwrap_or_else(|e| e.into_inner());
        match mover.as_ref() {
            Some(mover) => Some(mover.position()),
            None => {
                tracing::debug!("No mover attached; skipping positional stimulus check");
                None
            }
        }
    }

    fn set_laser_flag(&self, interested: bool) {
        let mover = self.mover.read().unwrap_or_else(|e| e.into_inner());
        if let Some(mover) = mover.as_ref() {
            mover.set_laser_interested(interested);
        }
    }

    fn react(&self, reaction: Reaction) {
        tracing::debug!(kind = ?reaction.kind, interest = reaction.interest, "Reaction triggered");
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(reaction);
        self.reactions.emit(&reaction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mover::MockMover;
    use crate::spatial::Bounds;

    struct Harness {
        registry: Arc<StimulusRegistry>,
        listener: InteractionListener,
        reactions: Arc<Mutex<Vec<Reaction>>>,
    }

    fn harness(personality: PersonalityProfile, agent_at: Point) -> Harness {
        let registry = Arc::new(StimulusRegistry::new());
        let mut mock = MockMover::new();
        mock.expect_position().returning(move || agent_at);
        mock.expect_set_laser_interested().returning(|_| {});
        mock.expect_boundaries().returning(Bounds::default);

        let reactions_bus: EventBus<Reaction> = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        reactions_bus.subscribe(move |reaction: &Reaction| {
            sink.lock().unwrap().push(*reaction);
        });

        let mut listener = InteractionListener::new(
            Some(Arc::clone(&registry)),
            Arc::new(RwLock::new(personality)),
            Arc::new(RwLock::new(BrainConfig::default())),
            Arc::new(RwLock::new(Some(Arc::new(mock) as Arc<dyn Mover>))),
            reactions_bus,
        );
        listener.setup();
        Harness {
            registry,
            listener,
            reactions: seen,
        }
    }

    fn kinds(harness: &Harness) -> Vec<ReactionKind> {
        harness.reactions.lock().unwrap().iter().map(|r| r.kind).collect()
    }

    #[test]
    fn test_need_reaction_within_range() {
        // Curious, dependent cat: interest 0.8 > 0.7, independence 0.3 < 0.5
        let personality = PersonalityProfile::new(1.0, 0.5, 0.3, 0.5, 0.5);
        let h = harness(personality, Point::new(0.0, 0.0));

        h.registry.place_need(Point::new(100.0, 0.0));
        let seen = h.reactions.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind, ReactionKind::NeedDetected);
        assert!((seen[0].interest - 0.8).abs() < 1e-4);
    }

    #[test]
    fn test_need_reaction_suppressed_by_independence() {
        let personality = PersonalityProfile::new(1.0, 0.5, 0.6, 0.5, 0.5);
        let h = harness(personality, Point::new(0.0, 0.0));

        h.registry.place_need(Point::new(100.0, 0.0));
        assert!(h.reactions.lock().unwrap().is_empty());
    }

    #[test]
    fn test_need_reaction_suppressed_out_of_range() {
        let personality = PersonalityProfile::new(1.0, 0.5, 0.3, 0.5, 0.5);
        let h = harness(personality, Point::new(0.0, 0.0));

        h.registry.place_need(Point::new(200.0, 0.0));
        assert!(h.reactions.lock().unwrap().is_empty());
    }

    #[test]
    fn test_rolling_yarn_reaction_and_suppression() {
        let personality = PersonalityProfile::new(0.8, 0.9, 0.5, 0.5, 0.8);
        let h = harness(personality, Point::new(0.0, 0.0));

        let yarn = h.registry.place_yarn(Point::new(400.0, 0.0));
        // Still yarn inside the widened radius: no reaction from movement
        h.registry
            .move_yarn(yarn, Point::new(180.0, 0.0), StimulusState::Idle, None);
        assert!(kinds(&h).is_empty());

        h.registry.move_yarn(
            yarn,
            Point::new(180.0, 0.0),
            StimulusState::Rolling,
            Some(Point::new(-4.0, 0.0)),
        );
        assert_eq!(kinds(&h), vec![ReactionKind::YarnMoving]);
    }

    #[test]
    fn test_yarn_moving_boost_can_exceed_one() {
        let personality = PersonalityProfile::new(1.0, 1.0, 0.5, 0.5, 1.0);
        let h = harness(personality, Point::new(0.0, 0.0));

        let yarn = h.registry.place_yarn(Point::new(400.0, 0.0));
        h.registry
            .move_yarn(yarn, Point::new(10.0, 0.0), StimulusState::Rolling, None);
        let seen = h.reactions.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].interest > 1.0);
    }

    #[test]
    fn test_laser_deactivated_always_reacts() {
        // Dull cat that would never chase the laser
        let personality = PersonalityProfile::new(0.0, 0.0, 1.0, 0.0, 0.0);
        let h = harness(personality, Point::new(0.0, 0.0));

        h.registry.activate_laser(Point::new(50.0, 0.0));
        h.registry.deactivate_laser();
        let seen = h.reactions.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind, ReactionKind::LaserDeactivated);
        assert_eq!(seen[0].interest, 0.0);
    }

    #[test]
    fn test_teardown_setup_round_trip() {
        let personality = PersonalityProfile::new(1.0, 0.5, 0.3, 0.5, 0.5);
        let mut h = harness(personality, Point::new(0.0, 0.0));

        h.listener.teardown();
        h.listener.teardown();
        h.registry.place_need(Point::new(100.0, 0.0));
        assert!(h.reactions.lock().unwrap().is_empty());

        h.listener.setup();
        h.registry.place_need(Point::new(100.0, 0.0));
        assert_eq!(h.reactions.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_destroy_idempotent_and_final() {
        let personality = PersonalityProfile::new(1.0, 0.5, 0.3, 0.5, 0.5);
        let mut h = harness(personality, Point::new(0.0, 0.0));

        h.listener.destroy();
        h.listener.destroy();
        h.listener.setup();
        h.registry.place_need(Point::new(100.0, 0.0));
        assert!(h.reactions.lock().unwrap().is_empty());
        assert!(!h.listener.is_running());
    }

    #[test]
    fn test_pending_queue_drains() {
        let personality = PersonalityProfile::new(1.0, 0.5, 0.3, 0.5, 0.5);
        let h = harness(personality, Point::new(0.0, 0.0));

        h.registry.place_need(Point::new(100.0, 0.0));
        let drained = h.listener.drain_pending();
        assert_eq!(drained.len(), 1);
        assert!(h.listener.drain_pending().is_empty());
    }

    #[test]
    fn test_setup_without_registry_is_noop() {
        let mut listener = InteractionListener::new(
            None,
            Arc::new(RwLock::new(PersonalityProfile::default())),
            Arc::new(RwLock::new(BrainConfig::default())),
            Arc::new(RwLock::new(None)),
            EventBus::new(),
        );
        listener.setup();
        assert!(!listener.is_running());
        listener.teardown();
    }
}
