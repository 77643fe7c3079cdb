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

//! The cat brain: decision loop orchestrating all subsystems
//!
//! One [`CatBrain`] per cat. Each tick is an atomic, synchronous pass:
//! motivation decay, queued push reactions, stimulus polling, interest
//! evaluation, behavior selection, state transition, and finally movement
//! and state commands to the attached mover. The loop runs on a tokio timer
//! with a randomized cadence, independent of any render rate.

use crate::config::{BrainConfig, BrainConfigPatch};
use crate::detector::InteractionDetector;
use crate::events::{EventBus, Reaction};
use crate::listener::InteractionListener;
use crate::memory::BrainMemory;
use crate::motivation::MotivationState;
use crate::mover::{Mover, MoverEvent};
use crate::personality::{PersonalityPatch, PersonalityProfile};
use crate::selector::BehaviorSelector;
use crate::spatial::Point;
use crate::state::{BehaviorStateMachine, BehaviorType};
use crate::stimulus::{Stimulus, StimulusRegistry};
use rand::Rng;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Candidate targets sampled when picking an exploration destination
const EXPLORE_CANDIDATES: usize = 5;
/// Duration hint for chasing a stimulus
const CHASE_HINT: Duration = Duration::from_millis(800);

/// Autonomous decision core for a single cat
pub struct CatBrain {
    inner: Arc<BrainInner>,
}

struct BrainInner {
    id: Uuid,
    personality: Arc<RwLock<PersonalityProfile>>,
    config: Arc<RwLock<BrainConfig>>,
    mover: Arc<RwLock<Option<Arc<dyn Mover>>>>,
    reactions: EventBus<Reaction>,
    detector: Mutex<InteractionDetector>,
    listener: Mutex<InteractionListener>,
    state: Mutex<TickState>,
    running: AtomicBool,
    destroyed: AtomicBool,
    epoch: AtomicU64,
}

struct TickState {
    motivation: MotivationState,
    memory: BrainMemory,
    machine: BehaviorStateMachine,
    last_tick: Option<Instant>,
    companions: usize,
}

impl CatBrain {
    /// Create a brain for one cat.
    ///
    /// The stimulus registry is injected here (or later via
    /// [`CatBrain::set_environment`]); without one the cat never reacts but
    /// keeps its baseline loop.
    pub fn new(
        id: Uuid,
        personality: PersonalityProfile,
        config: BrainConfig,
        source: Option<Arc<StimulusRegistry>>,
    ) -> Self {
        let personality = Arc::new(RwLock::new(personality));
        let mover: Arc<RwLock<Option<Arc<dyn Mover>>>> = Arc::new(RwLock::new(None));
        let reactions = EventBus::new();
        let detector = InteractionDetector::new(source.clone(), config.detection);
        let memory = BrainMemory::with_capacity(config.position_memory, config.behavior_memory);
        let config = Arc::new(RwLock::new(config));
        let mut listener = InteractionListener::new(
            source,
            Arc::clone(&personality),
            Arc::clone(&config),
            Arc::clone(&mover),
            reactions.clone(),
        );
        listener.setup();

        Self {
            inner: Arc::new(BrainInner {
                id,
                personality,
                config,
                mover,
                reactions,
                detector: Mutex::new(detector),
                listener: Mutex::new(listener),
                state: Mutex::new(TickState {
                    motivation: MotivationState::default(),
                    memory,
                    machine: BehaviorStateMachine::default(),
                    last_tick: None,
                    companions: 0,
                }),
                running: AtomicBool::new(false),
                destroyed: AtomicBool::new(false),
                epoch: AtomicU64::new(0),
            }),
        }
    }

    /// This cat's identity
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Attach the movement executor for this cat
    pub fn attach_mover(&self, mover: Arc<dyn Mover>) {
        *self
            .inner
            .mover
            .write()
            .unwrap_or_else(|e| e.into_inner()) = Some(mover);
    }

    /// Swap or detach the stimulus registry; takes effect immediately
    pub fn set_environment(&self, source: Option<Arc<StimulusRegistry>>) {
        self.inner
            .detector
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .set_source(source.clone());
        let mut listener = self
            .inner
            .listener
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        listener.set_source(source);
        listener.setup();
    }

    /// Bus carrying this cat's reaction events; subscribe freely
    pub fn reactions(&self) -> EventBus<Reaction> {
        self.inner.reactions.clone()
    }

    /// Merge a partial personality update, effective next tick
    pub fn set_personality(&self, patch: PersonalityPatch) {
        self.inner
            .personality
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .apply(patch);
    }

    /// Snapshot of the current personality
    pub fn personality(&self) -> PersonalityProfile {
        *self
            .inner
            .personality
            .read()
            .unwrap_or_else(|e| e.into_inner())
    }

    /// Merge a partial configuration update, effective next tick
    pub fn update_config(&self, patch: BrainConfigPatch) {
        if let Some(detection) = patch.detection {
            self.inner
                .detector
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .update_config(detection);
        }
        self.inner
            .config
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .apply(patch);
    }

    /// Tell the brain how many other cats are nearby
    pub fn set_companions(&self, count: usize) {
        self.lock_state().companions = count;
    }

    /// The behavior the cat is currently in
    pub fn current_behavior(&self) -> BehaviorType {
        self.lock_state().machine.current()
    }

    /// Snapshot of the current motivation state
    pub fn motivation(&self) -> MotivationState {
        self.lock_state().motivation
    }

    /// Snapshot of the rolling memory
    pub fn memory(&self) -> BrainMemory {
        self.lock_state().memory.clone()
    }

    /// Feed a mover event (boundary collision, completed move) into memory
    pub fn handle_mover_event(&self, event: MoverEvent) {
        if self.inner.destroyed.load(Ordering::SeqCst) {
            return;
        }
        let mut state = self.lock_state();
        match event {
            MoverEvent::BoundaryHit { position } => {
                state.memory.record_boundary_hit();
                state.memory.record_position(position);
            }
            MoverEvent::MoveEnd { position } => {
                state.memory.record_position(position);
            }
        }
    }

    /// Begin ticking on a tokio timer. Must be called inside a runtime.
    /// Idempotent while running.
    pub fn start(&self) {
        if self.inner.destroyed.load(Ordering::SeqCst) {
            tracing::debug!(cat = %self.inner.id, "Ignoring start on destroyed brain");
            return;
        }
        if self.inner.running.swap(true, Ordering::SeqCst) {
            return;
        }
        // Each start supersedes any loop task still asleep from before a
        // stop(); a stale task sees the epoch mismatch on wakeup and exits
        // instead of resuming alongside the new one.
        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tracing::debug!(cat = %inner.id, "Decision loop started");
            loop {
                let wait = {
                    let config = inner.config.read().unwrap_or_else(|e| e.into_inner());
                    let min = config.tick_interval_min.as_secs_f64();
                    let max = config.tick_interval_max.as_secs_f64();
                    let mut rng = rand::rng();
                    Duration::from_secs_f64(rng.random_range(min..=max))
                };
                tokio::time::sleep(wait).await;
                if inner.epoch.load(Ordering::SeqCst) != epoch
                    || !inner.running.load(Ordering::SeqCst)
                    || inner.destroyed.load(Ordering::SeqCst)
                {
                    break;
                }
                inner.tick();
            }
            tracing::debug!(cat = %inner.id, "Decision loop stopped");
        });
    }

    /// Stop ticking. Takes effect before the next scheduled tick, never
    /// mid-tick.
    pub fn stop(&self) {
        self.inner.running.store(false, Ordering::SeqCst);
    }

    /// Whether the decision loop is scheduled
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Run one decision tick synchronously. The loop calls this on its
    /// timer; tests and embedders may step it directly.
    pub fn tick(&self) {
        self.inner.tick();
    }

    /// Stop the loop, tear the listener down and clear memory. Idempotent.
    pub fn destroy(&self) {
        if self.inner.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.stop();
        self.inner
            .listener
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .destroy();
        self.lock_state().memory.clear();
        tracing::debug!(cat = %self.inner.id, "Brain destroyed");
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, TickState> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl BrainInner {
    fn tick(&self) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }
        let now = Instant::now();
        let personality = *self.personality.read().unwrap_or_else(|e| e.into_inner());
        let config = self.config.read().unwrap_or_else(|e| e.into_inner()).clone();
        let mover = self
            .mover
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        // Decay
        let elapsed = state.last_tick.map(|t| now - t).unwrap_or(Duration::ZERO);
        state.last_tick = Some(now);
        state.motivation.decay(elapsed, &config.rates);

        // Consume push reactions queued since the last tick
        let pending = self
            .listener
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .drain_pending();
        let strongest = pending
            .iter()
            .copied()
            .max_by(|a, b| a.interest.total_cmp(&b.interest));
        if !pending.is_empty() {
            state.memory.touch_interaction(chrono::Utc::now());
        }

        // Poll for stimuli around the cat and score them
        let position = mover.as_ref().map(|m| m.position());
        let best_target = position.and_then(|pos| {
            self.best_polled_target(pos, &personality, &config, strongest.as_ref())
        });

        // Select and transition
        let mut rng = rand::rng();
        let previous = state.machine.current();
        let choice = BehaviorSelector::choose(
            &state.motivation,
            &personality,
            &state.memory,
            &state.machine,
            strongest.as_ref(),
            state.companions,
            config.reaction_independence_gate,
            &mut rng,
        );
        state.machine.transition(choice);
        state.motivation.satisfy(choice);
        state.memory.record_behavior(choice);
        if let Some(pos) = position {
            state.memory.record_position(pos);
        }
        tracing::debug!(
            cat = %self.id,
            behavior = %choice,
            rest = state.motivation.rest,
            stimulation = state.motivation.stimulation,
            exploration = state.motivation.exploration,
            "Tick decided"
        );

        // Emit commands to the mover
        let Some(mover) = mover else {
            return;
        };
        mover.set_state(choice);
        if previous == BehaviorType::Resting && choice != BehaviorType::Resting {
            mover.resume();
        }
        match choice {
            BehaviorType::Wandering => {
                let target = mover.boundaries().random_point(&mut rng);
                mover.move_to(target, None);
            }
            BehaviorType::Resting => mover.pause(),
            BehaviorType::Playing => {
                if let Some((stimulus, _)) = best_target {
                    mover.move_to(stimulus.position, Some(CHASE_HINT));
                } else {
                    let target = mover.boundaries().random_point(&mut rng);
                    mover.move_to(target, Some(CHASE_HINT));
                }
            }
            // Observing holds still and watches
            BehaviorType::Observing => {}
            BehaviorType::Exploring => {
                let target = Self::exploration_target(&mover, &state.memory, &mut rng);
                if let Some(pos) = position {
                    let midpoint = Point::new(
                        (pos.x + target.x) / 2.0,
                        (pos.y + target.y) / 2.0,
                    );
                    mover.move_along_path(&[midpoint, target], None);
                } else {
                    mover.move_to(target, None);
                }
            }
        }
    }

    /// The most interesting polled stimulus this tick. The stimulus behind
    /// the strongest push reaction wins when it is still in range.
    fn best_polled_target(
        &self,
        position: Point,
        personality: &PersonalityProfile,
        config: &BrainConfig,
        strongest: Option<&Reaction>,
    ) -> Option<(Stimulus, f32)> {
        let detector = self.detector.lock().unwrap_or_else(|e| e.into_inner());
        let mut candidates: Vec<(Stimulus, f32)> = Vec::new();
        for need in detector.nearby_needs(position) {
            let score = crate::evaluator::evaluate_interest(
                &need,
                position,
                personality,
                config.detection.need_radius,
            );
            candidates.push((need, score));
        }
        for yarn in detector.nearby_yarns(position) {
            let score = crate::evaluator::evaluate_interest(
                &yarn,
                position,
                personality,
                config.detection.yarn_radius,
            );
            candidates.push((yarn, score));
        }
        if let Some(laser) = detector.nearby_laser(position) {
            let score = crate::evaluator::evaluate_interest(
                &laser,
                position,
                personality,
                config.detection.laser_radius,
            );
            candidates.push((laser, score));
        }
        drop(detector);

        if let Some(reaction) = strongest
            && let Some(id) = reaction.stimulus
            && let Some(hit) = candidates.iter().find(|(s, _)| s.id == id)
        {
            return Some(*hit);
        }
        candidates
            .into_iter()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
    }

    /// Pick the sampled point farthest from recently visited positions
    fn exploration_target<R: Rng + ?Sized>(
        mover: &Arc<dyn Mover>,
        memory: &BrainMemory,
        rng: &mut R,
    ) -> Point {
        let bounds = mover.boundaries();
        let mut best = bounds.random_point(rng);
        let mut best_score = f32::MIN;
        for _ in 0..EXPLORE_CANDIDATES {
            let candidate = bounds.random_point(rng);
            let score = memory
                .visited_positions()
                .map(|p| p.distance(candidate))
                .fold(f32::INFINITY, f32::min);
            let score = if score.is_finite() { score } else { 0.0 };
            if score > best_score {
                best_score = score;
                best = candidate;
            }
        }
        best
    }
}

impl Drop for CatBrain {
    fn drop(&mut self) {
        self.destroy();
    }
}
